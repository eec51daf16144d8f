//! Model catalog access
//!
//! The catalog is the input side of a digest run: it yields the current
//! popularity snapshots that the trend engine classifies.
//!
//! - `CatalogSource` trait for anything that can list top models
//! - `HubCatalog` for the Hugging Face Hub HTTP API
//! - `RetryingCatalog` for exponential backoff on transient failures

mod hub;
mod retry;
mod types;

pub use hub::HubCatalog;
pub use retry::RetryingCatalog;
pub use types::{CatalogError, CatalogSource, ModelSnapshot, NO_DESCRIPTION, RetryPolicy};

use crate::config::CatalogConfig;

/// Create the configured catalog, wrapped with retries
pub fn create_catalog(config: &CatalogConfig) -> Result<Box<dyn CatalogSource>, CatalogError> {
    let hub = HubCatalog::from_config(config)?;
    Ok(Box::new(RetryingCatalog::new(
        hub,
        RetryPolicy::with_max_retries(config.max_retries),
    )))
}
