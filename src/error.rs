use thiserror::Error;

#[derive(Error, Debug)]
pub enum LobbyError {
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read Excel workbook: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    #[error("Failed to write Excel report: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("SMTP transport error: {0}")]
    Email(#[from] lettre::transport::smtp::Error),

    #[error("Email message could not be built: {0}")]
    EmailMessage(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Baseline inventory not found: {0}")]
    BaselineNotFound(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider {0} is not available yet")]
    ProviderUnavailable(String),

    #[error("Scrape failed: {message}")]
    Scrape { message: String },

    #[error("Extraction for {provider} produced no usable data after {attempts} attempts")]
    ExtractionExhausted { provider: String, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, LobbyError>;
