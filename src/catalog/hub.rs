//! Hugging Face Hub API catalog

use super::types::{CatalogError, CatalogSource, ModelSnapshot};
use crate::config::CatalogConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Catalog backed by the Hub's public models API
#[derive(Debug, Clone)]
pub struct HubCatalog {
    /// Base URL for the API, e.g. https://huggingface.co/api
    api_url: String,

    /// Default timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

/// Listing entry from `GET /models?full=true&cardData=true`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HubModel {
    id: Option<String>,
    model_id: Option<String>,
    author: Option<String>,
    last_modified: Option<String>,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    tags: Vec<String>,
    card_data: Option<serde_json::Value>,
}

/// Detail response from `GET /models/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HubModelInfo {
    card_data: Option<serde_json::Value>,
}

impl HubModel {
    /// Convert to a snapshot; entries without any id are dropped
    fn into_snapshot(self) -> Option<ModelSnapshot> {
        let id = self.id.or(self.model_id)?;

        // Older listings omit the author; the namespace part of the id is the owner
        let owner = self.author.unwrap_or_else(|| {
            id.split_once('/')
                .map(|(ns, _)| ns.to_string())
                .unwrap_or_default()
        });

        let snapshot = ModelSnapshot::new(
            id,
            owner,
            self.last_modified.unwrap_or_default(),
            self.likes,
            self.downloads,
        )
        .with_tags(self.tags);

        Some(match card_description(self.card_data.as_ref()) {
            Some(description) => snapshot.with_description(description),
            None => snapshot,
        })
    }
}

impl HubCatalog {
    /// Create a catalog client from config
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let timeout = Duration::from_secs(config.timeout);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rising-stars/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            api_url: config.api_url.clone(),
            timeout,
            client,
        })
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.api_url.trim_end_matches('/'))
    }

    fn model_url(&self, id: &str) -> String {
        format!("{}/models/{}", self.api_url.trim_end_matches('/'), id)
    }

    /// Map HTTP status to CatalogError
    fn map_http_error(&self, status: reqwest::StatusCode, body: String) -> CatalogError {
        match status.as_u16() {
            429 => CatalogError::RateLimit { retry_after: None },
            408 | 504 => CatalogError::Timeout {
                elapsed: self.timeout,
            },
            500..=599 => CatalogError::network(format!("HTTP {}: {}", status, body)),
            code => CatalogError::Http { status: code, body },
        }
    }

    fn map_request_error(&self, e: reqwest::Error, started: Instant) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout {
                elapsed: started.elapsed(),
            }
        } else if e.is_connect() {
            CatalogError::network(format!("connection failed: {}", e))
        } else {
            CatalogError::network(format!("request failed: {}", e))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| self.map_request_error(e, started))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.map_http_error(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::parse(format!("failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CatalogSource for HubCatalog {
    async fn top_models(&self, limit: usize) -> Result<Vec<ModelSnapshot>, CatalogError> {
        tracing::debug!(url = %self.models_url(), limit, "Fetching top models");

        let limit = limit.to_string();
        let request = self.client.get(self.models_url()).query(&[
            ("sort", "downloads"),
            ("direction", "-1"),
            ("limit", limit.as_str()),
            ("full", "true"),
            ("cardData", "true"),
        ]);

        let models: Vec<HubModel> = self.get_json(request).await?;
        let total = models.len();
        let snapshots: Vec<ModelSnapshot> =
            models.into_iter().filter_map(HubModel::into_snapshot).collect();

        if snapshots.len() < total {
            tracing::warn!(
                dropped = total - snapshots.len(),
                "Skipped catalog entries without an id"
            );
        }

        Ok(snapshots)
    }

    async fn model_description(&self, id: &str) -> Result<Option<String>, CatalogError> {
        let info: HubModelInfo = self.get_json(self.client.get(self.model_url(id))).await?;
        Ok(card_description(info.card_data.as_ref()))
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Extract the free-text description from a model card's metadata block
fn card_description(card_data: Option<&serde_json::Value>) -> Option<String> {
    card_data?
        .get("model-description")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_model_parsing() {
        let json = r#"[
            {"id": "acme/model-x", "author": "acme", "lastModified": "2026-01-02T03:04:05.000Z",
             "likes": 50, "downloads": 1000, "tags": ["text-generation", "pytorch"]},
            {"modelId": "bert-base-uncased", "likes": 10},
            {"likes": 3}
        ]"#;

        let models: Vec<HubModel> = serde_json::from_str(json).unwrap();
        let snapshots: Vec<ModelSnapshot> =
            models.into_iter().filter_map(HubModel::into_snapshot).collect();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].id, "acme/model-x");
        assert_eq!(snapshots[0].owner, "acme");
        assert_eq!(snapshots[0].last_modified_at, "2026-01-02T03:04:05.000Z");
        assert_eq!(snapshots[0].downloads, 1000);
        assert_eq!(snapshots[0].tags, vec!["text-generation", "pytorch"]);

        assert_eq!(snapshots[1].id, "bert-base-uncased");
        assert_eq!(snapshots[1].owner, "");
        assert_eq!(snapshots[1].downloads, 0);
        assert!(snapshots[1].last_modified_at.is_empty());
    }

    #[test]
    fn test_owner_falls_back_to_namespace() {
        let model = HubModel {
            id: Some("org/name".into()),
            model_id: None,
            author: None,
            last_modified: None,
            likes: 0,
            downloads: 0,
            tags: Vec::new(),
            card_data: None,
        };
        assert_eq!(model.into_snapshot().unwrap().owner, "org");
    }

    #[test]
    fn test_listing_card_data_fills_description() {
        let json = r#"[
            {"id": "acme/described", "cardData": {"model-description": "Summarizes text."}},
            {"id": "acme/bare", "cardData": {"license": "mit"}}
        ]"#;

        let models: Vec<HubModel> = serde_json::from_str(json).unwrap();
        let snapshots: Vec<ModelSnapshot> =
            models.into_iter().filter_map(HubModel::into_snapshot).collect();

        assert_eq!(snapshots[0].description.as_deref(), Some("Summarizes text."));
        assert_eq!(snapshots[1].description, None);
    }

    #[test]
    fn test_card_description() {
        let card = serde_json::json!({"model-description": "  A tiny model.  "});
        assert_eq!(card_description(Some(&card)), Some("A tiny model.".into()));

        let empty = serde_json::json!({"model-description": ""});
        assert_eq!(card_description(Some(&empty)), None);

        let other = serde_json::json!({"license": "mit"});
        assert_eq!(card_description(Some(&other)), None);
        assert_eq!(card_description(None), None);
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let config = CatalogConfig {
            api_url: "https://example.test/api/".into(),
            ..Default::default()
        };
        let catalog = HubCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.models_url(), "https://example.test/api/models");
        assert_eq!(
            catalog.model_url("acme/model-x"),
            "https://example.test/api/models/acme/model-x"
        );
    }

    #[test]
    fn test_map_http_error() {
        let catalog = HubCatalog::from_config(&CatalogConfig::default()).unwrap();

        let err = catalog.map_http_error(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(err, CatalogError::RateLimit { .. }));

        let err = catalog.map_http_error(reqwest::StatusCode::BAD_GATEWAY, "oops".into());
        assert!(err.is_retryable());

        let err = catalog.map_http_error(reqwest::StatusCode::NOT_FOUND, "missing".into());
        assert!(matches!(err, CatalogError::Http { status: 404, .. }));
        assert!(!err.is_retryable());
    }
}
