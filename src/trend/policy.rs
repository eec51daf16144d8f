//! Featurability policy

use super::metrics::{Growth, GrowthMetrics};
use crate::catalog::ModelSnapshot;
use crate::config::TrendConfig;
use crate::tracker::TrackedEntity;
use serde::Serialize;

/// Label shown for models with no stored row
pub const NEW_MODEL_LABEL: &str = "🆕 New to Top 500";

const LABEL_SEPARATOR: &str = " | ";

/// Thresholds deciding whether a model is newsworthy
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPolicy {
    /// Models stored fewer than this many days ago are never re-featured
    pub cooldown_days: i64,

    /// Weekly likes growth that features a model (0.25 = 25%/week)
    pub weekly_likes_threshold: f64,

    /// Weekly downloads growth that features a model
    pub weekly_downloads_threshold: f64,

    /// Total likes growth since the stored snapshot that features a model
    pub total_likes_threshold: f64,

    /// Total downloads growth since the stored snapshot that features a model
    pub total_downloads_threshold: f64,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self {
            cooldown_days: 14,
            weekly_likes_threshold: 0.25,
            weekly_downloads_threshold: 0.50,
            total_likes_threshold: 2.0,
            total_downloads_threshold: 5.0,
        }
    }
}

/// Outcome of evaluating one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub metrics: GrowthMetrics,
    pub featured: bool,
    pub growth_label: String,
}

impl TrendPolicy {
    /// Create a policy from the `[trend]` config section
    pub fn from_config(config: &TrendConfig) -> Self {
        Self {
            cooldown_days: config.cooldown_days,
            weekly_likes_threshold: config.weekly_likes_threshold,
            weekly_downloads_threshold: config.weekly_downloads_threshold,
            total_likes_threshold: config.total_likes_threshold,
            total_downloads_threshold: config.total_downloads_threshold,
        }
    }

    /// Compute metrics, decide featurability and build the growth label
    pub fn evaluate(&self, snapshot: &ModelSnapshot, prior: Option<&TrackedEntity>) -> Evaluation {
        let metrics = GrowthMetrics::compute(snapshot, prior);
        let featured = self.is_featured(&metrics);
        let growth_label = self.growth_label(&metrics);

        tracing::debug!(
            model_id = %snapshot.id,
            is_new = metrics.is_new,
            days = ?metrics.days_since_last_store,
            featured,
            "Evaluated model"
        );

        Evaluation {
            metrics,
            featured,
            growth_label,
        }
    }

    /// Decide whether the metrics make a model newsworthy
    ///
    /// New models always are. Stored models inside the cooldown never are.
    /// Otherwise any one of the weekly-rate or total-growth thresholds is
    /// enough. An unknown day count skips the cooldown and counts as one week.
    pub fn is_featured(&self, metrics: &GrowthMetrics) -> bool {
        if metrics.is_new {
            return true;
        }

        if let Some(days) = metrics.days_since_last_store {
            if days < self.cooldown_days {
                return false;
            }
        }

        let weeks = weeks_elapsed(metrics);
        let exceeds = |growth: Option<Growth>, threshold: f64| {
            growth.is_some_and(|g| g.exceeds(threshold))
        };

        exceeds(
            metrics.likes_growth.map(|g| g.per(weeks)),
            self.weekly_likes_threshold,
        ) || exceeds(
            metrics.downloads_growth.map(|g| g.per(weeks)),
            self.weekly_downloads_threshold,
        ) || exceeds(metrics.likes_growth, self.total_likes_threshold)
            || exceeds(metrics.downloads_growth, self.total_downloads_threshold)
    }

    /// Human-readable growth summary
    ///
    /// Only the weekly rates above their thresholds are shown, so a model
    /// featured on total growth alone gets an empty label.
    pub fn growth_label(&self, metrics: &GrowthMetrics) -> String {
        if metrics.is_new {
            return NEW_MODEL_LABEL.to_string();
        }

        let weeks = weeks_elapsed(metrics);
        let mut parts = Vec::new();

        if let Some(weekly) = metrics.likes_growth.map(|g| g.per(weeks)) {
            if weekly.exceeds(self.weekly_likes_threshold) {
                parts.push(format!("⭐ {} likes/week", weekly));
            }
        }

        if let Some(weekly) = metrics.downloads_growth.map(|g| g.per(weeks)) {
            if weekly.exceeds(self.weekly_downloads_threshold) {
                parts.push(format!("📈 {} downloads/week", weekly));
            }
        }

        parts.join(LABEL_SEPARATOR)
    }
}

/// Elapsed time in weeks, never less than one
fn weeks_elapsed(metrics: &GrowthMetrics) -> f64 {
    metrics
        .days_since_last_store
        .map(|days| (days as f64 / 7.0).max(1.0))
        .unwrap_or(1.0)
}
