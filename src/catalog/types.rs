//! Core types and traits for catalog access

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Placeholder used when a model has no usable description
pub const NO_DESCRIPTION: &str = "No description available";

/// Error types that can occur while talking to the catalog
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Request timed out
    #[error("timeout after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// Rate limited by the hub
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimit { retry_after: Option<Duration> },

    /// Network error
    #[error("network error: {message}")]
    Network { message: String },

    /// Non-success HTTP status that is not worth retrying
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Failed to parse response
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Invalid configuration
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl CatalogError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Timeout { .. }
                | CatalogError::RateLimit { .. }
                | CatalogError::Network { .. }
        )
    }

    /// Get suggested retry delay for rate limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            CatalogError::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// One observation of a model's popularity, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Repository id, e.g. "acme/model-x"
    pub id: String,

    /// Owning user or organization
    pub owner: String,

    /// Source-reported last-modification time, kept as the raw string
    pub last_modified_at: String,

    pub likes: u64,

    pub downloads: u64,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Card description, when the listing already carried one
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelSnapshot {
    /// Create a snapshot with the fields the trend engine consumes
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        last_modified_at: impl Into<String>,
        likes: u64,
        downloads: u64,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            last_modified_at: last_modified_at.into(),
            likes,
            downloads,
            tags: Vec::new(),
            description: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Trait for model catalogs
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the most-downloaded models, most downloaded first
    async fn top_models(&self, limit: usize) -> Result<Vec<ModelSnapshot>, CatalogError>;

    /// Look up the card description for a single model
    async fn model_description(&self, id: &str) -> Result<Option<String>, CatalogError>;

    /// Get the catalog name
    fn name(&self) -> &str;
}

#[async_trait]
impl CatalogSource for Box<dyn CatalogSource> {
    async fn top_models(&self, limit: usize) -> Result<Vec<ModelSnapshot>, CatalogError> {
        (**self).top_models(limit).await
    }

    async fn model_description(&self, id: &str) -> Result<Option<String>, CatalogError> {
        (**self).model_description(id).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries
    pub max_retries: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,

    /// Whether to add jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given retry count and default backoff
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Calculate delay for a given attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay =
            self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_delay.as_secs_f64());

        let final_delay = if self.jitter {
            // Up to 25% jitter
            let jitter = rand::random::<f64>() * 0.25 * capped_delay;
            capped_delay + jitter
        } else {
            capped_delay
        };

        Duration::from_secs_f64(final_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_retryable() {
        assert!(
            CatalogError::Timeout {
                elapsed: Duration::from_secs(30)
            }
            .is_retryable()
        );
        assert!(CatalogError::RateLimit { retry_after: None }.is_retryable());
        assert!(CatalogError::network("connection reset").is_retryable());

        assert!(!CatalogError::parse("invalid json").is_retryable());
        assert!(
            !CatalogError::Http {
                status: 404,
                body: "not found".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_snapshot_builder() {
        let snapshot = ModelSnapshot::new("acme/model-x", "acme", "2026-01-01T00:00:00Z", 50, 1000)
            .with_tags(vec!["text-generation".into()])
            .with_description("A small model");

        assert_eq!(snapshot.id, "acme/model-x");
        assert_eq!(snapshot.tags.len(), 1);
        assert_eq!(snapshot.description.as_deref(), Some("A small model"));
    }

    #[test]
    fn test_retry_policy_delays() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: false,
            ..Default::default()
        };

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_policy_with_jitter() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_secs(1),
            jitter: true,
            ..Default::default()
        };

        let delay = policy.delay_for_attempt(0);
        assert!(delay >= Duration::from_secs(1));
        assert!(delay <= Duration::from_millis(1250));
    }
}
