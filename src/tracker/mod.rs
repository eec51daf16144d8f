//! Metrics store - persistent last-known state of featured models

mod schema;
mod store;

#[allow(unused_imports)]
pub use store::{
    LikedModel, MetricsStore, OwnerCount, RecentFeature, StorageError, StoreStatistics,
    TrackedEntity,
};
