//! Configuration sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the metrics database and logs live
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database path (`~` is expanded)
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory for daily log files (`~` is expanded)
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_db_path() -> String {
    "data/newsletter.db".into()
}

fn default_log_dir() -> String {
    "logs".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_dir: default_log_dir(),
        }
    }
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        expand_path(&self.db_path)
    }

    pub fn log_dir(&self) -> PathBuf {
        expand_path(&self.log_dir)
    }

    pub(super) fn merge(&mut self, other: Self) {
        if other.db_path != default_db_path() {
            self.db_path = other.db_path;
        }
        if other.log_dir != default_log_dir() {
            self.log_dir = other.log_dir;
        }
    }
}

/// Model catalog endpoint and fetch limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Hub API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Public site URL used to build model links
    #[serde(default = "default_hub_url")]
    pub hub_url: String,

    /// How many of the most-downloaded models to examine
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_url() -> String {
    "https://huggingface.co/api".into()
}

fn default_hub_url() -> String {
    "https://huggingface.co".into()
}

fn default_limit() -> usize {
    500
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            hub_url: default_hub_url(),
            limit: default_limit(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl CatalogConfig {
    pub(super) fn merge(&mut self, other: Self) {
        if other.api_url != default_api_url() {
            self.api_url = other.api_url;
        }
        if other.hub_url != default_hub_url() {
            self.hub_url = other.hub_url;
        }
        if other.limit != default_limit() {
            self.limit = other.limit;
        }
        if other.timeout != default_timeout() {
            self.timeout = other.timeout;
        }
        if other.max_retries != default_max_retries() {
            self.max_retries = other.max_retries;
        }
    }
}

/// Featurability thresholds
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrendConfig {
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,

    #[serde(default = "default_weekly_likes")]
    pub weekly_likes_threshold: f64,

    #[serde(default = "default_weekly_downloads")]
    pub weekly_downloads_threshold: f64,

    #[serde(default = "default_total_likes")]
    pub total_likes_threshold: f64,

    #[serde(default = "default_total_downloads")]
    pub total_downloads_threshold: f64,
}

fn default_cooldown_days() -> i64 {
    14
}

fn default_weekly_likes() -> f64 {
    0.25
}

fn default_weekly_downloads() -> f64 {
    0.50
}

fn default_total_likes() -> f64 {
    2.0
}

fn default_total_downloads() -> f64 {
    5.0
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
            weekly_likes_threshold: default_weekly_likes(),
            weekly_downloads_threshold: default_weekly_downloads(),
            total_likes_threshold: default_total_likes(),
            total_downloads_threshold: default_total_downloads(),
        }
    }
}

impl TrendConfig {
    pub(super) fn merge(&mut self, other: Self) {
        if other.cooldown_days != default_cooldown_days() {
            self.cooldown_days = other.cooldown_days;
        }
        if other.weekly_likes_threshold != default_weekly_likes() {
            self.weekly_likes_threshold = other.weekly_likes_threshold;
        }
        if other.weekly_downloads_threshold != default_weekly_downloads() {
            self.weekly_downloads_threshold = other.weekly_downloads_threshold;
        }
        if other.total_likes_threshold != default_total_likes() {
            self.total_likes_threshold = other.total_likes_threshold;
        }
        if other.total_downloads_threshold != default_total_downloads() {
            self.total_downloads_threshold = other.total_downloads_threshold;
        }
    }

    /// Reject thresholds that would make the policy meaningless
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.cooldown_days < 0 {
            errors.push(format!(
                "trend.cooldown_days must not be negative (got {})",
                self.cooldown_days
            ));
        }

        for (name, value) in [
            ("weekly_likes_threshold", self.weekly_likes_threshold),
            ("weekly_downloads_threshold", self.weekly_downloads_threshold),
            ("total_likes_threshold", self.total_likes_threshold),
            ("total_downloads_threshold", self.total_downloads_threshold),
        ] {
            if !value.is_finite() {
                errors.push(format!("trend.{} must be a finite number", name));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Digest selection and presentation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DigestConfig {
    /// Maximum number of models in one digest
    #[serde(default = "default_max_featured")]
    pub max_featured: usize,

    /// Email subject line
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_max_featured() -> usize {
    10
}

fn default_subject() -> String {
    "🤗 Rising Stars in Hugging Face Top 500".into()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_featured: default_max_featured(),
            subject: default_subject(),
        }
    }
}

impl DigestConfig {
    pub(super) fn merge(&mut self, other: Self) {
        if other.max_featured != default_max_featured() {
            self.max_featured = other.max_featured;
        }
        if other.subject != default_subject() {
            self.subject = other.subject;
        }
    }
}

/// Postmark delivery settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// Postmark API base URL
    #[serde(default = "default_email_api_url")]
    pub api_url: String,

    /// Postmark server token (usually from POSTMARK_TOKEN)
    pub server_token: Option<String>,

    #[serde(default = "default_sender")]
    pub sender: String,

    /// Default recipient (usually from RECIPIENT_EMAIL)
    pub recipient: Option<String>,

    #[serde(default = "default_message_stream")]
    pub message_stream: String,
}

fn default_email_api_url() -> String {
    "https://api.postmarkapp.com".into()
}

fn default_sender() -> String {
    "newsletter@openhands.dev".into()
}

fn default_message_stream() -> String {
    "outbound".into()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: default_email_api_url(),
            server_token: None,
            sender: default_sender(),
            recipient: None,
            message_stream: default_message_stream(),
        }
    }
}

impl EmailConfig {
    pub(super) fn merge(&mut self, other: Self) {
        if other.api_url != default_email_api_url() {
            self.api_url = other.api_url;
        }
        if other.server_token.is_some() {
            self.server_token = other.server_token;
        }
        if other.sender != default_sender() {
            self.sender = other.sender;
        }
        if other.recipient.is_some() {
            self.recipient = other.recipient;
        }
        if other.message_stream != default_message_stream() {
            self.message_stream = other.message_stream;
        }
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
