use crate::config::EmailConfig;
use crate::error::{LobbyError, Result};
use chrono::{DateTime, Local};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::Path;
use tracing::info;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Fully rendered email content; a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
}

/// Render the report email for a given send time.
pub fn report_content(timestamp: DateTime<Local>) -> EmailContent {
    let subject = format!(
        "Third Party Lobby Checking - {}",
        timestamp.format("%d %b %y %H:%M:%S")
    );
    let html_body = r#"
    <h4>Hello Team,</h4>
    <p>The attached Excel files contain the results from the <b>Third-Party Lobby Checking</b> for each provider.</p>
    <p>Every provider has its own sheet, and each sheet features three key columns for comparison: <b>Expected List</b>, <b>Added List</b>, and <b>Removed List</b>.</p>
    <ul>
        <li><b>Expected Tables</b>: The list of tables the Game Lobby is compared against</li>
        <li><b>Added Tables</b>: Tables found inside the game but not in the base list</li>
        <li><b>Removed Tables</b>: Tables in the base list that cannot be found in the Game Lobby</li>
    </ul>
    <p>Please review the attached reports. Thank you! - <b>Automation Team</b></p>
    "#
    .to_string();

    EmailContent { subject, html_body }
}

/// Email every file in `dir` as an attachment of one report message.
///
/// Credentials come from `SENDER_EMAIL_USERNAME` / `SENDER_EMAIL_PASSWORD`,
/// the recipient from `RECEIVER_EMAIL_USERNAME`. Send failures are surfaced
/// to the caller, which logs them; sending is never retried and never rolls
/// back already-written artifacts.
pub fn send_report(config: &EmailConfig, dir: &Path) -> Result<()> {
    let sender = std::env::var("SENDER_EMAIL_USERNAME")?;
    let password = std::env::var("SENDER_EMAIL_PASSWORD")?;
    let receiver = std::env::var("RECEIVER_EMAIL_USERNAME")?;

    let content = report_content(Local::now());
    let xlsx_type = ContentType::parse(XLSX_MIME)
        .map_err(|e| LobbyError::Config(format!("Bad attachment content type: {e}")))?;

    let html_part = SinglePart::builder()
        .header(ContentType::TEXT_HTML)
        .body(content.html_body.clone());
    let mut multipart = MultiPart::mixed().singlepart(html_part);
    let mut attachment_count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let body = fs::read(entry.path())?;
        multipart = multipart.singlepart(Attachment::new(filename).body(body, xlsx_type.clone()));
        attachment_count += 1;
    }

    let message = Message::builder()
        .from(sender.parse()?)
        .to(receiver.parse()?)
        .subject(content.subject.clone())
        .multipart(multipart)?;

    let mailer = SmtpTransport::starttls_relay(&config.host)?
        .port(config.port)
        .credentials(Credentials::new(sender.clone(), password))
        .build();
    mailer.send(&message)?;

    info!(
        "Report email sent from {} to {} with {} attachments: {}",
        sender, receiver, attachment_count, content.subject
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn subject_carries_the_formatted_timestamp() {
        let timestamp = Local.with_ymd_and_hms(2025, 10, 17, 15, 49, 39).unwrap();
        let content = report_content(timestamp);
        assert_eq!(
            content.subject,
            "Third Party Lobby Checking - 17 Oct 25 15:49:39"
        );
    }

    #[test]
    fn content_is_a_pure_function_of_the_timestamp() {
        let timestamp = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(report_content(timestamp), report_content(timestamp));
        assert!(report_content(timestamp).html_body.contains("Expected Tables"));
    }
}
