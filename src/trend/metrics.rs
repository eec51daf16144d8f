//! Growth metrics computed from a snapshot and its stored predecessor

use crate::catalog::ModelSnapshot;
use crate::tracker::TrackedEntity;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Malformed input on a snapshot or stored row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("missing timestamp")]
    MissingTimestamp,

    #[error("unparsable timestamp '{value}'")]
    InvalidTimestamp { value: String },
}

/// Parse a source or stored timestamp
///
/// Accepts RFC 3339 (`2026-01-02T03:04:05.000Z`), the space-separated form
/// SQLite adapters write (`2026-01-02 03:04:05+00:00`), naive date-times
/// (read as UTC) and bare dates.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DataError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DataError::MissingTimestamp);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(DataError::InvalidTimestamp {
        value: value.to_string(),
    })
}

/// Fractional change of a counter between two observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Growth {
    /// `(current - previous) / previous`
    Finite(f64),

    /// Previous value was zero, so any change counts as maximal
    Unbounded,
}

impl Growth {
    /// Growth from `previous` to `current`
    pub fn between(previous: u64, current: u64) -> Self {
        if previous > 0 {
            Growth::Finite((current as f64 - previous as f64) / previous as f64)
        } else {
            Growth::Unbounded
        }
    }

    /// Normalize to a rate over `weeks`
    pub fn per(self, weeks: f64) -> Self {
        match self {
            Growth::Finite(g) => Growth::Finite(g / weeks),
            Growth::Unbounded => Growth::Unbounded,
        }
    }

    /// Strictly greater than `threshold`
    pub fn exceeds(self, threshold: f64) -> bool {
        match self {
            Growth::Finite(g) => g > threshold,
            Growth::Unbounded => true,
        }
    }
}

impl fmt::Display for Growth {
    /// Integer percentage, e.g. `40%`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Growth::Finite(g) => write!(f, "{:.0}%", g * 100.0),
            Growth::Unbounded => write!(f, "∞%"),
        }
    }
}

/// Growth of a model since its stored snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthMetrics {
    /// No stored row existed
    pub is_new: bool,

    /// `None` for new models
    pub likes_growth: Option<Growth>,
    pub downloads_growth: Option<Growth>,

    /// Whole days between the stored and current modification times.
    /// `None` when either timestamp could not be parsed; may be negative
    /// when the source timestamp went backwards.
    pub days_since_last_store: Option<i64>,

    pub prior_record: Option<TrackedEntity>,
}

impl GrowthMetrics {
    /// Compute metrics for `snapshot` against its stored row, if any
    pub fn compute(snapshot: &ModelSnapshot, prior: Option<&TrackedEntity>) -> Self {
        let Some(prior) = prior else {
            return Self {
                is_new: true,
                likes_growth: None,
                downloads_growth: None,
                days_since_last_store: Some(0),
                prior_record: None,
            };
        };

        let days_since_last_store =
            match days_between(&prior.last_modified_at, &snapshot.last_modified_at) {
                Ok(days) => Some(days),
                Err(e) => {
                    tracing::warn!(
                        model_id = %snapshot.id,
                        error = %e,
                        "Cannot compute days since last store"
                    );
                    None
                }
            };

        Self {
            is_new: false,
            likes_growth: Some(Growth::between(prior.likes, snapshot.likes)),
            downloads_growth: Some(Growth::between(prior.downloads, snapshot.downloads)),
            days_since_last_store,
            prior_record: Some(prior.clone()),
        }
    }
}

/// Whole days from `earlier` to `later`, floored
fn days_between(earlier: &str, later: &str) -> Result<i64, DataError> {
    let earlier = parse_timestamp(earlier)?;
    let later = parse_timestamp(later)?;
    Ok((later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY))
}
