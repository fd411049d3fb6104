//! Bookmark store
//!
//! Holds the single reading position in a table whose only legal row id is
//! 1. `set` is one UPSERT statement, so the chapter and verse of a bookmark
//! are always written together.

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::models::Bookmark;

/// The current bookmark, or `None` if none has been saved
pub fn get(conn: &Connection) -> Result<Option<Bookmark>> {
    conn.query_row(
        "SELECT chapter, verse FROM bookmark WHERE id = 1",
        [],
        |row| {
            Ok(Bookmark {
                chapter: row.get(0)?,
                verse: row.get(1)?,
            })
        },
    )
    .optional()
}

/// Replace the bookmark
pub fn set(conn: &Connection, chapter: u32, verse: u32) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO bookmark (id, chapter, verse) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET chapter = excluded.chapter, verse = excluded.verse
        "#,
        params![chapter, verse],
    )?;
    Ok(())
}

pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM bookmark", [])?;
    Ok(())
}
