//! Configuration types and loading for rising-stars

mod loader;
mod sections;

pub use loader::RisingStarsConfig;
pub use sections::{CatalogConfig, DigestConfig, EmailConfig, StorageConfig, TrendConfig};
