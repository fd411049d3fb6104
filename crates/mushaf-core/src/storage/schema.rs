//! SQLite schema for the corpus and bookmark stores
//!
//! Verses carry no foreign key to chapters: bulk loading may insert them in
//! any order, and referential integrity is checked at query time instead.

use rusqlite::{Connection, Result};

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chapters (
            number INTEGER PRIMARY KEY,
            name_arabic TEXT NOT NULL,
            name_english TEXT NOT NULL,
            revelation TEXT NOT NULL,
            verse_count INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS verses (
            chapter INTEGER NOT NULL,
            number INTEGER NOT NULL,
            text TEXT NOT NULL,
            translation_urdu TEXT NOT NULL DEFAULT '',
            translation_english TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (chapter, number)
        );

        CREATE TABLE IF NOT EXISTS volume_index (
            volume INTEGER PRIMARY KEY,
            start_chapter INTEGER NOT NULL,
            start_verse INTEGER NOT NULL
        );

        -- At most one row: the id is pinned to 1
        CREATE TABLE IF NOT EXISTS bookmark (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            chapter INTEGER NOT NULL,
            verse INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_volume_index_start
            ON volume_index(start_chapter, start_verse);
        "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_info WHERE key = 'version'")?;
    let result: Result<String> = stmt.query_row([], |row| row.get(0));

    match result {
        Ok(version_str) => Ok(version_str.parse().ok()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Check if schema needs initialization or migration
pub fn needs_init(conn: &Connection) -> bool {
    let table_exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_info'")
        .and_then(|mut stmt| stmt.exists([]))
        .unwrap_or(false);

    if !table_exists {
        return true;
    }

    match get_schema_version(conn) {
        Ok(Some(v)) => v < SCHEMA_VERSION,
        _ => true,
    }
}
