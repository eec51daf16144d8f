//! Trend detection
//!
//! Compares a fresh catalog snapshot with the stored row for the same model
//! and decides whether the model belongs in this run's digest.
//!
//! # Example
//!
//! ```ignore
//! use rising_stars::trend::TrendPolicy;
//!
//! let policy = TrendPolicy::default();
//! let prior = store.get(&snapshot.id)?;
//! let eval = policy.evaluate(&snapshot, prior.as_ref());
//! if eval.featured {
//!     store.upsert(&snapshot)?;
//! }
//! ```

mod metrics;
mod policy;

#[allow(unused_imports)]
pub use metrics::{DataError, Growth, GrowthMetrics, parse_timestamp};
#[allow(unused_imports)]
pub use policy::{Evaluation, NEW_MODEL_LABEL, TrendPolicy};
