//! Mail types

use async_trait::async_trait;
use thiserror::Error;

/// A single outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl MailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

/// Errors from sending mail
#[derive(Debug, Error)]
pub enum MailError {
    /// No server token configured
    #[error("no mail server token configured (set POSTMARK_TOKEN)")]
    MissingToken,

    /// No recipient given on the command line or in config
    #[error("no recipient configured (set RECIPIENT_EMAIL or pass --recipient)")]
    MissingRecipient,

    /// Provider rejected the message
    #[error("mail provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection-level failure
    #[error("network error: {message}")]
    Network { message: String },

    /// Client could not be built
    #[error("mailer configuration error: {message}")]
    Config { message: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Something that can deliver a digest
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;

    /// Provider name, for logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_env_vars() {
        assert!(MailError::MissingToken.to_string().contains("POSTMARK_TOKEN"));
        assert!(
            MailError::MissingRecipient
                .to_string()
                .contains("RECIPIENT_EMAIL")
        );
    }

    #[test]
    fn test_http_error_display() {
        let err = MailError::Http {
            status: 422,
            body: "Invalid 'To' address".into(),
        };
        assert_eq!(
            err.to_string(),
            "mail provider returned HTTP 422: Invalid 'To' address"
        );
    }
}
