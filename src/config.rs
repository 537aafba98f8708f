use crate::error::{LobbyError, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub directories: DirectoryConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

/// Retry policy knobs for the extraction control loop.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_reload_attempts")]
    pub reload_attempts: u32,
}

#[derive(Debug, Deserialize)]
pub struct WebDriverConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Landing page with the login form
    pub base_url: String,
    /// Casino page listing the provider tiles
    pub casino_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_expected_json")]
    pub expected_json: PathBuf,
    #[serde(default = "default_actual_json")]
    pub actual_json: PathBuf,
    #[serde(default = "default_report_json")]
    pub report_json: PathBuf,
    #[serde(default = "default_report_excel")]
    pub report_excel: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            LobbyError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            reload_attempts: default_reload_attempts(),
        }
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            expected_json: default_expected_json(),
            actual_json: default_actual_json(),
            report_json: default_report_json(),
            report_excel: default_report_excel(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_reload_attempts() -> u32 {
    3
}

fn default_server_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_window_width() -> u32 {
    1500
}

fn default_window_height() -> u32 {
    1000
}

fn default_expected_json() -> PathBuf {
    PathBuf::from("assets/json/expected")
}

fn default_actual_json() -> PathBuf {
    PathBuf::from("assets/json/actual")
}

fn default_report_json() -> PathBuf {
    PathBuf::from("assets/json/report")
}

fn default_report_excel() -> PathBuf {
    PathBuf::from("assets/excel/report")
}

fn default_smtp_host() -> String {
    "smtp-mail.outlook.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}
