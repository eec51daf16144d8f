//! Database schema for the metrics store

use rusqlite::Connection;

/// Initialize the database schema
///
/// Column names match databases written by earlier releases of the
/// newsletter, so an existing `newsletter.db` opens without migration.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS highlighted_models (
            model_id TEXT PRIMARY KEY,
            author TEXT,
            last_highlighted TIMESTAMP,
            last_modified TIMESTAMP,
            likes INTEGER,
            downloads INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_highlighted_author ON highlighted_models(author);
        "#,
    )
}
