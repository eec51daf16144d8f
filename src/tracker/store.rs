//! Metrics store

use super::schema::init_schema;
use crate::catalog::ModelSnapshot;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of rows returned by each top-N statistics query
const STATS_LIMIT: i64 = 5;

/// Header line written by `export`, in column order
const EXPORT_HEADER: &str = "model_id,author,last_highlighted,last_modified,likes,downloads";

/// Errors raised by the metrics store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open metrics store at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Last stored observation of a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedEntity {
    pub id: String,
    pub owner: String,

    /// Wall-clock time of the write (RFC 3339, UTC)
    pub last_featured_at: String,

    /// Source-reported modification time at the moment of the write
    pub last_modified_at: String,

    pub likes: u64,
    pub downloads: u64,
}

impl TrackedEntity {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            last_featured_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            last_modified_at: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            likes: read_count(row, 4)?,
            downloads: read_count(row, 5)?,
        })
    }

    /// Render as one export line; embedded commas are not escaped
    fn to_export_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.id,
            self.owner,
            self.last_featured_at,
            self.last_modified_at,
            self.likes,
            self.downloads
        )
    }
}

/// Number of stored models per owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerCount {
    pub owner: String,
    pub count: u64,
}

/// A recently written row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentFeature {
    pub id: String,
    pub owner: String,
    pub last_featured_at: String,
}

/// A row ranked by likes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikedModel {
    pub id: String,
    pub owner: String,
    pub likes: u64,
}

/// Aggregate view over the whole store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStatistics {
    pub total_count: u64,
    pub top_owners: Vec<OwnerCount>,
    pub recently_featured: Vec<RecentFeature>,
    pub most_liked: Vec<LikedModel>,
}

/// SQLite-backed single-snapshot cache of tracked models
pub struct MetricsStore {
    conn: Connection,
}

impl MetricsStore {
    /// Open or create the metrics database, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        init_schema(&conn)?;
        tracing::debug!(path = %path.display(), "Opened metrics store");

        Ok(Self { conn })
    }

    /// Open a private in-memory store
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Look up the stored row for a model
    pub fn get(&self, id: &str) -> Result<Option<TrackedEntity>, StorageError> {
        let entity = self
            .conn
            .query_row(
                "SELECT model_id, author, last_highlighted, last_modified, likes, downloads
                 FROM highlighted_models
                 WHERE model_id = ?1",
                [id],
                TrackedEntity::from_row,
            )
            .optional()?;

        Ok(entity)
    }

    /// Replace the stored row for this snapshot's model, stamped with the current time
    pub fn upsert(&mut self, snapshot: &ModelSnapshot) -> Result<(), StorageError> {
        self.upsert_at(snapshot, Utc::now())
    }

    /// Replace the stored row, stamped with `featured_at`
    pub fn upsert_at(
        &mut self,
        snapshot: &ModelSnapshot,
        featured_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO highlighted_models
             (model_id, author, last_highlighted, last_modified, likes, downloads)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &snapshot.id,
                &snapshot.owner,
                featured_at.to_rfc3339(),
                &snapshot.last_modified_at,
                write_count(snapshot.likes),
                write_count(snapshot.downloads),
            ),
        )?;

        tracing::debug!(model_id = %snapshot.id, "Stored snapshot");
        Ok(())
    }

    /// All rows in scan order
    pub fn entities(&self) -> Result<Vec<TrackedEntity>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT model_id, author, last_highlighted, last_modified, likes, downloads
             FROM highlighted_models
             ORDER BY rowid",
        )?;

        let entities = stmt
            .query_map([], TrackedEntity::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entities)
    }

    /// Aggregate statistics over the stored rows
    pub fn statistics(&self) -> Result<StoreStatistics, StorageError> {
        let total_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM highlighted_models", [], |row| {
                    row.get(0)
                })?;

        let top_owners = self
            .conn
            .prepare(
                "SELECT author, COUNT(*) AS count
                 FROM highlighted_models
                 GROUP BY author
                 ORDER BY count DESC, MIN(rowid)
                 LIMIT ?1",
            )?
            .query_map([STATS_LIMIT], |row| {
                Ok(OwnerCount {
                    owner: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    count: read_count(row, 1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let recently_featured = self
            .conn
            .prepare(
                "SELECT model_id, author, last_highlighted
                 FROM highlighted_models
                 ORDER BY last_highlighted DESC, rowid
                 LIMIT ?1",
            )?
            .query_map([STATS_LIMIT], |row| {
                Ok(RecentFeature {
                    id: row.get(0)?,
                    owner: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    last_featured_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let most_liked = self
            .conn
            .prepare(
                "SELECT model_id, author, likes
                 FROM highlighted_models
                 ORDER BY likes DESC, rowid
                 LIMIT ?1",
            )?
            .query_map([STATS_LIMIT], |row| {
                Ok(LikedModel {
                    id: row.get(0)?,
                    owner: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    likes: read_count(row, 2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StoreStatistics {
            total_count: total_count.max(0) as u64,
            top_owners,
            recently_featured,
            most_liked,
        })
    }

    /// Write every row as comma-delimited text, header first
    ///
    /// Fields are not quoted, so an owner or id containing a comma produces
    /// a line with extra columns.
    pub fn export<W: Write>(&self, mut sink: W) -> Result<usize, StorageError> {
        let entities = self.entities()?;

        writeln!(sink, "{}", EXPORT_HEADER)?;
        for entity in &entities {
            writeln!(sink, "{}", entity.to_export_line())?;
        }
        sink.flush()?;

        Ok(entities.len())
    }

    /// Export to a file, replacing it if it exists
    pub fn export_to_path(&self, path: &Path) -> Result<usize, StorageError> {
        let file = std::fs::File::create(path)?;
        let rows = self.export(std::io::BufWriter::new(file))?;
        tracing::info!(path = %path.display(), rows, "Exported metrics store");
        Ok(rows)
    }
}

/// Counts are stored as SQLite integers; NULL or negative reads as zero
fn read_count(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(0).max(0) as u64)
}

fn write_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
