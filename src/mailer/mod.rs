//! Digest delivery
//!
//! - `Mailer` trait for anything that can deliver a rendered digest
//! - `PostmarkMailer` for the Postmark HTTP API

mod postmark;
mod types;

pub use postmark::PostmarkMailer;
pub use types::{MailError, MailMessage, Mailer};

/// Pick the recipient: command-line override first, then config
pub fn resolve_recipient(
    override_recipient: Option<&str>,
    configured: Option<&str>,
) -> Result<String, MailError> {
    override_recipient
        .or(configured)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .ok_or(MailError::MissingRecipient)
}
