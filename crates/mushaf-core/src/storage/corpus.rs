//! Corpus store
//!
//! Chapters, verses and the volume index. Every insert is an upsert keyed by
//! the record's identity, and no insert checks that the chapter it refers to
//! exists. List queries make no ordering promise; callers sort.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use crate::models::{Chapter, Revelation, Verse, VolumeIndexEntry};
use crate::storage::bookmark;

impl ToSql for Revelation {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Revelation {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Record counts across the corpus tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusCounts {
    pub chapters: i64,
    pub verses: i64,
    pub volumes: i64,
}

impl CorpusCounts {
    pub fn is_empty(&self) -> bool {
        self.chapters == 0 && self.verses == 0 && self.volumes == 0
    }
}

/// Insert or replace a chapter
pub fn add_chapter(conn: &Connection, chapter: &Chapter) -> Result<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO chapters (number, name_arabic, name_english, revelation, verse_count)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            chapter.number,
            chapter.name_arabic,
            chapter.name_english,
            chapter.revelation,
            chapter.verse_count,
        ],
    )?;
    Ok(())
}

/// Insert or replace a verse
pub fn add_verse(conn: &Connection, verse: &Verse) -> Result<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO verses (chapter, number, text, translation_urdu, translation_english)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            verse.chapter,
            verse.number,
            verse.text,
            verse.translation_urdu,
            verse.translation_english,
        ],
    )?;
    Ok(())
}

/// Insert or replace a volume index entry
pub fn add_volume_entry(conn: &Connection, entry: &VolumeIndexEntry) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO volume_index (volume, start_chapter, start_verse) VALUES (?1, ?2, ?3)",
        params![entry.volume, entry.start_chapter, entry.start_verse],
    )?;
    Ok(())
}

pub fn list_chapters(conn: &Connection) -> Result<Vec<Chapter>> {
    let mut stmt = conn.prepare(
        "SELECT number, name_arabic, name_english, revelation, verse_count FROM chapters",
    )?;
    let chapters = stmt
        .query_map([], chapter_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(chapters)
}

pub fn get_chapter(conn: &Connection, number: u32) -> Result<Option<Chapter>> {
    conn.query_row(
        "SELECT number, name_arabic, name_english, revelation, verse_count FROM chapters WHERE number = ?1",
        params![number],
        chapter_from_row,
    )
    .optional()
}

pub fn chapter_exists(conn: &Connection, number: u32) -> Result<bool> {
    conn.prepare("SELECT 1 FROM chapters WHERE number = ?1")?
        .exists(params![number])
}

pub fn verse_exists(conn: &Connection, chapter: u32, number: u32) -> Result<bool> {
    conn.prepare("SELECT 1 FROM verses WHERE chapter = ?1 AND number = ?2")?
        .exists(params![chapter, number])
}

/// All verses of one chapter; empty when the chapter has none or is unknown
pub fn list_verses_for_chapter(conn: &Connection, chapter: u32) -> Result<Vec<Verse>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT chapter, number, text, translation_urdu, translation_english
        FROM verses
        WHERE chapter = ?1
        "#,
    )?;
    let verses = stmt
        .query_map(params![chapter], verse_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(verses)
}

/// (chapter, verse) keys of every stored verse, without the text
pub fn list_verse_positions(conn: &Connection) -> Result<Vec<(u32, u32)>> {
    let mut stmt = conn.prepare("SELECT chapter, number FROM verses")?;
    let positions: Vec<(u32, u32)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>>>()?;
    Ok(positions)
}

pub fn list_volume_index(conn: &Connection) -> Result<Vec<VolumeIndexEntry>> {
    let mut stmt = conn.prepare("SELECT volume, start_chapter, start_verse FROM volume_index")?;
    let entries = stmt
        .query_map([], |row| {
            Ok(VolumeIndexEntry {
                volume: row.get(0)?,
                start_chapter: row.get(1)?,
                start_verse: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(entries)
}

pub fn counts(conn: &Connection) -> Result<CorpusCounts> {
    conn.query_row(
        r#"
        SELECT
            (SELECT COUNT(*) FROM chapters),
            (SELECT COUNT(*) FROM verses),
            (SELECT COUNT(*) FROM volume_index)
        "#,
        [],
        |row| {
            Ok(CorpusCounts {
                chapters: row.get(0)?,
                verses: row.get(1)?,
                volumes: row.get(2)?,
            })
        },
    )
}

/// Clear every corpus table and the bookmark
///
/// A bookmark cannot outlive the verses it points at, so it goes too.
/// Run inside a transaction to make the reset all-or-nothing.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM verses;
        DELETE FROM chapters;
        DELETE FROM volume_index;
        "#,
    )?;
    bookmark::clear(conn)
}

fn chapter_from_row(row: &Row<'_>) -> Result<Chapter> {
    Ok(Chapter {
        number: row.get(0)?,
        name_arabic: row.get(1)?,
        name_english: row.get(2)?,
        revelation: row.get(3)?,
        verse_count: row.get(4)?,
    })
}

fn verse_from_row(row: &Row<'_>) -> Result<Verse> {
    Ok(Verse {
        chapter: row.get(0)?,
        number: row.get(1)?,
        text: row.get(2)?,
        translation_urdu: row.get(3)?,
        translation_english: row.get(4)?,
    })
}
