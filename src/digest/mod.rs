//! Digest selection
//!
//! Runs the trend policy over a full catalog snapshot, refreshes the store
//! for every featured model and hands the capped list to presentation.

use crate::catalog::{CatalogSource, ModelSnapshot, NO_DESCRIPTION};
use crate::tracker::{MetricsStore, StorageError};
use crate::trend::TrendPolicy;
use serde::Serialize;

/// A model chosen for this run
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedModel {
    pub snapshot: ModelSnapshot,
    pub growth_label: String,
}

/// Everything the digest renderer needs about one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestEntry {
    pub id: String,
    pub owner: String,
    pub description: String,
    pub growth_label: String,
    pub likes: u64,
    pub downloads: u64,
    pub last_modified_at: String,
    pub link: String,
    pub tags: Vec<String>,
}

/// Evaluate every snapshot, store the featured ones and return the first `limit`
///
/// Every featured model is written to the store, including those past the
/// cap, so they enter their cooldown even if they don't make this digest.
/// Order follows the catalog's order.
pub fn select_featured<I>(
    store: &mut MetricsStore,
    snapshots: I,
    policy: &TrendPolicy,
    limit: usize,
) -> Result<Vec<FeaturedModel>, StorageError>
where
    I: IntoIterator<Item = ModelSnapshot>,
{
    let mut featured = Vec::new();
    let mut evaluated = 0usize;

    for snapshot in snapshots {
        evaluated += 1;

        let prior = store.get(&snapshot.id)?;
        let evaluation = policy.evaluate(&snapshot, prior.as_ref());
        if !evaluation.featured {
            continue;
        }

        store.upsert(&snapshot)?;
        tracing::info!(
            model_id = %snapshot.id,
            growth = %evaluation.growth_label,
            "Featuring model"
        );

        featured.push(FeaturedModel {
            snapshot,
            growth_label: evaluation.growth_label,
        });
    }

    tracing::info!(
        evaluated,
        featured = featured.len(),
        limit,
        "Selected rising stars"
    );

    featured.truncate(limit);
    Ok(featured)
}

/// Build presentation entries, looking up descriptions where missing
///
/// A failed lookup degrades to the placeholder description.
pub async fn build_entries(
    featured: Vec<FeaturedModel>,
    catalog: &dyn CatalogSource,
    hub_url: &str,
) -> Vec<DigestEntry> {
    let mut entries = Vec::with_capacity(featured.len());

    for FeaturedModel {
        snapshot,
        growth_label,
    } in featured
    {
        let description = match snapshot.description.clone() {
            Some(description) => description,
            None => match catalog.model_description(&snapshot.id).await {
                Ok(Some(description)) => description,
                Ok(None) => NO_DESCRIPTION.to_string(),
                Err(e) => {
                    tracing::warn!(
                        model_id = %snapshot.id,
                        error = %e,
                        "Description lookup failed"
                    );
                    NO_DESCRIPTION.to_string()
                }
            },
        };

        entries.push(DigestEntry {
            link: model_link(hub_url, &snapshot.id),
            id: snapshot.id,
            owner: snapshot.owner,
            description,
            growth_label,
            likes: snapshot.likes,
            downloads: snapshot.downloads,
            last_modified_at: snapshot.last_modified_at,
            tags: snapshot.tags,
        });
    }

    entries
}

/// Public page for a model
pub fn model_link(hub_url: &str, id: &str) -> String {
    format!("{}/{}", hub_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::trend::NEW_MODEL_LABEL;
    use async_trait::async_trait;

    fn snapshot(id: &str, modified: &str, likes: u64, downloads: u64) -> ModelSnapshot {
        let owner = id.split('/').next().unwrap_or_default();
        ModelSnapshot::new(id, owner, modified, likes, downloads)
    }

    /// Catalog that only answers description lookups
    struct DescriptionCatalog;

    #[async_trait]
    impl CatalogSource for DescriptionCatalog {
        async fn top_models(&self, _limit: usize) -> Result<Vec<ModelSnapshot>, CatalogError> {
            Ok(Vec::new())
        }

        async fn model_description(&self, id: &str) -> Result<Option<String>, CatalogError> {
            match id {
                "acme/described" => Ok(Some("Fetched description".into())),
                "acme/broken" => Err(CatalogError::network("reset")),
                _ => Ok(None),
            }
        }

        fn name(&self) -> &str {
            "descriptions"
        }
    }

    #[test]
    fn test_new_models_are_featured_and_stored() {
        let mut store = MetricsStore::open_in_memory().unwrap();
        let policy = TrendPolicy::default();

        let featured = select_featured(
            &mut store,
            vec![snapshot("acme/model-x", "2026-01-01T00:00:00Z", 50, 1000)],
            &policy,
            10,
        )
        .unwrap();

        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].growth_label, NEW_MODEL_LABEL);

        let stored = store.get("acme/model-x").unwrap().unwrap();
        assert_eq!(stored.likes, 50);
        assert_eq!(stored.downloads, 1000);
    }

    #[test]
    fn test_second_run_respects_cooldown() {
        let mut store = MetricsStore::open_in_memory().unwrap();
        let policy = TrendPolicy::default();

        select_featured(
            &mut store,
            vec![snapshot("acme/model-x", "2026-01-01T00:00:00Z", 100, 1000)],
            &policy,
            10,
        )
        .unwrap();

        // A week later with 30% growth: still cooling down, row untouched
        let featured = select_featured(
            &mut store,
            vec![snapshot("acme/model-x", "2026-01-08T00:00:00Z", 130, 1000)],
            &policy,
            10,
        )
        .unwrap();

        assert!(featured.is_empty());
        let stored = store.get("acme/model-x").unwrap().unwrap();
        assert_eq!(stored.likes, 100);
        assert_eq!(stored.last_modified_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn test_refeatured_model_replaces_row() {
        let mut store = MetricsStore::open_in_memory().unwrap();
        let policy = TrendPolicy::default();

        select_featured(
            &mut store,
            vec![snapshot("acme/model-x", "2026-01-01T00:00:00Z", 100, 1000)],
            &policy,
            10,
        )
        .unwrap();

        let featured = select_featured(
            &mut store,
            vec![snapshot("acme/model-x", "2026-01-15T00:00:00Z", 200, 1000)],
            &policy,
            10,
        )
        .unwrap();

        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].growth_label, "⭐ 50% likes/week");
        assert_eq!(store.get("acme/model-x").unwrap().unwrap().likes, 200);
    }

    #[test]
    fn test_cap_keeps_catalog_order_but_stores_all() {
        let mut store = MetricsStore::open_in_memory().unwrap();
        let policy = TrendPolicy::default();

        let snapshots: Vec<ModelSnapshot> = (0..15)
            .map(|i| snapshot(&format!("org/model-{:02}", i), "2026-01-01T00:00:00Z", 10, 10))
            .collect();

        let featured = select_featured(&mut store, snapshots, &policy, 10).unwrap();

        assert_eq!(featured.len(), 10);
        assert_eq!(featured[0].snapshot.id, "org/model-00");
        assert_eq!(featured[9].snapshot.id, "org/model-09");
        assert_eq!(store.statistics().unwrap().total_count, 15);
        assert!(store.get("org/model-14").unwrap().is_some());
    }

    #[test]
    fn test_unfeatured_models_are_not_stored() {
        let mut store = MetricsStore::open_in_memory().unwrap();
        let policy = TrendPolicy::default();

        store
            .upsert(&snapshot("acme/steady", "2026-01-01T00:00:00Z", 100, 1000))
            .unwrap();

        let featured = select_featured(
            &mut store,
            vec![
                snapshot("acme/steady", "2026-01-21T00:00:00Z", 140, 1000),
                snapshot("acme/fresh", "2026-01-21T00:00:00Z", 1, 1),
            ],
            &policy,
            10,
        )
        .unwrap();

        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].snapshot.id, "acme/fresh");
        assert_eq!(store.get("acme/steady").unwrap().unwrap().likes, 100);
    }

    #[tokio::test]
    async fn test_build_entries() {
        let featured = vec![
            FeaturedModel {
                snapshot: snapshot("acme/described", "2026-01-01T00:00:00Z", 5, 50)
                    .with_tags(vec!["nlp".into()]),
                growth_label: NEW_MODEL_LABEL.into(),
            },
            FeaturedModel {
                snapshot: snapshot("acme/broken", "2026-01-01T00:00:00Z", 1, 2),
                growth_label: String::new(),
            },
            FeaturedModel {
                snapshot: snapshot("acme/bare", "2026-01-01T00:00:00Z", 1, 2),
                growth_label: String::new(),
            },
            FeaturedModel {
                snapshot: snapshot("acme/inline", "2026-01-01T00:00:00Z", 1, 2)
                    .with_description("Inline description"),
                growth_label: String::new(),
            },
        ];

        let entries = build_entries(featured, &DescriptionCatalog, "https://huggingface.co/").await;

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].description, "Fetched description");
        assert_eq!(entries[0].link, "https://huggingface.co/acme/described");
        assert_eq!(entries[0].owner, "acme");
        assert_eq!(entries[0].tags, vec!["nlp"]);
        assert_eq!(entries[1].description, NO_DESCRIPTION);
        assert_eq!(entries[2].description, NO_DESCRIPTION);
        assert_eq!(entries[3].description, "Inline description");
    }
}
