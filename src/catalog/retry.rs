//! Retry wrapper with exponential backoff

use super::types::{CatalogError, CatalogSource, ModelSnapshot, RetryPolicy};
use async_trait::async_trait;
use std::future::Future;

/// Wrapper that adds retry logic to any catalog source
pub struct RetryingCatalog<T: CatalogSource> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: CatalogSource> RetryingCatalog<T> {
    /// Create a new retrying catalog
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn retry<R, F, Fut>(&self, operation: &str, mut call: F) -> Result<R, CatalogError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<R, CatalogError>> + Send,
        R: Send,
    {
        let mut attempt = 0;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_retryable() || attempt >= self.policy.max_retries {
                        return Err(e);
                    }

                    // Prefer the server-specified delay when there is one
                    let delay = e
                        .retry_after()
                        .unwrap_or_else(|| self.policy.delay_for_attempt(attempt));

                    tracing::warn!(
                        catalog = self.inner.name(),
                        operation,
                        attempt = attempt + 1,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Catalog request failed, retrying"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl<T: CatalogSource> CatalogSource for RetryingCatalog<T> {
    async fn top_models(&self, limit: usize) -> Result<Vec<ModelSnapshot>, CatalogError> {
        self.retry("top_models", || self.inner.top_models(limit))
            .await
    }

    async fn model_description(&self, id: &str) -> Result<Option<String>, CatalogError> {
        self.retry("model_description", || self.inner.model_description(id))
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
