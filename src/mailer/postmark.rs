//! Postmark HTTP API mailer

use super::types::{MailError, MailMessage, Mailer};
use crate::config::EmailConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Postmark-Server-Token";
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends mail through Postmark's `/email` endpoint
#[derive(Debug, Clone)]
pub struct PostmarkMailer {
    api_url: String,
    server_token: String,
    message_stream: String,
    client: reqwest::Client,
}

/// Request body for `POST /email`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    message_stream: &'a str,
}

impl PostmarkMailer {
    /// Create a mailer from config; fails without a server token
    pub fn from_config(config: &EmailConfig) -> Result<Self, MailError> {
        let server_token = config
            .server_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(MailError::MissingToken)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| MailError::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            api_url: config.api_url.clone(),
            server_token,
            message_stream: config.message_stream.clone(),
            client,
        })
    }

    fn email_url(&self) -> String {
        format!("{}/email", self.api_url.trim_end_matches('/'))
    }

    fn request_body<'a>(&'a self, message: &'a MailMessage) -> PostmarkEmail<'a> {
        PostmarkEmail {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            html_body: &message.html_body,
            message_stream: &self.message_stream,
        }
    }
}

#[async_trait]
impl Mailer for PostmarkMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.trim().is_empty() {
            return Err(MailError::MissingRecipient);
        }

        let response = self
            .client
            .post(self.email_url())
            .header("Accept", "application/json")
            .header(TOKEN_HEADER, &self.server_token)
            .json(&self.request_body(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "postmark"
    }
}
