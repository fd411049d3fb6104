//! Unified storage interface
//!
//! The `Store` is the only surface the presentation layer talks to. It wraps
//! the corpus and bookmark stores with validation:
//!
//! - lookups by chapter fail with `NotFound` when the chapter is missing
//! - list results come back sorted by their key
//! - a bookmark is saved only if it names a stored chapter and verse
//!
//! Every operation takes the database lock once, so the bookmark check and
//! write happen in one critical section and concurrent saves serialize.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open()?;
//!
//! store.import_bundle(&CorpusBundle::from_path(path)?)?;
//!
//! let verses = store.get_verses(1)?;
//! store.save_bookmark(1, 5)?;
//! ```

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bundle::{CorpusBundle, ImportSummary};
use crate::config::Config;
use crate::integrity::{self, IntegrityReport};
use crate::models::{Bookmark, Chapter, Verse, VolumeIndexEntry};
use crate::storage::{bookmark, corpus, CorpusCounts, Database, StorageError, StorageStats};

/// Errors returned by store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No chapter with this number is stored
    #[error("Chapter {chapter} not found")]
    NotFound { chapter: u32 },

    /// The (chapter, verse) pair does not exist in the corpus
    #[error("Verse {chapter}:{verse} does not exist in the corpus")]
    InvalidReference { chapter: u32, verse: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Storage(StorageError::Database(err))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Corpus size, bookmark and file information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub counts: CorpusCounts,
    pub bookmark: Option<Bookmark>,
    pub storage: StorageStats,
}

/// Access service over the corpus and bookmark stores
pub struct Store {
    db: Database,
    config: Config,
}

impl Store {
    /// Open the store described by the default configuration
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config).context("Failed to open database")
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> StoreResult<Self> {
        let db = Database::open(&config)?;
        Ok(Self { db, config })
    }

    /// Open a store backed by an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
            config: Config::default(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if nothing has been seeded yet
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.db.with_conn(corpus::counts)?.is_empty())
    }

    // ==================== Corpus Queries ====================

    /// All chapters, ascending by number
    pub fn get_chapters(&self) -> StoreResult<Vec<Chapter>> {
        let mut chapters = self.db.with_conn(corpus::list_chapters)?;
        chapters.sort_by_key(|c| c.number);
        debug!(count = chapters.len(), "Listed chapters");
        Ok(chapters)
    }

    pub fn get_chapter(&self, number: u32) -> StoreResult<Chapter> {
        self.db
            .with_conn(|conn| corpus::get_chapter(conn, number))?
            .ok_or(StoreError::NotFound { chapter: number })
    }

    /// Verses of a chapter, ascending by verse number
    ///
    /// Empty (not an error) when the chapter has no verses or doesn't exist.
    pub fn get_verses(&self, chapter: u32) -> StoreResult<Vec<Verse>> {
        let mut verses = self
            .db
            .with_conn(|conn| corpus::list_verses_for_chapter(conn, chapter))?;
        verses.sort_by_key(|v| v.number);
        debug!(chapter, count = verses.len(), "Listed verses");
        Ok(verses)
    }

    /// Volume index, ascending by volume number
    pub fn get_volume_index(&self) -> StoreResult<Vec<VolumeIndexEntry>> {
        let mut entries = self.db.with_conn(corpus::list_volume_index)?;
        entries.sort_by_key(|e| e.volume);
        Ok(entries)
    }

    /// The volume containing a verse
    ///
    /// That is the entry with the greatest start position at or before
    /// `(chapter, verse)`. Returns `None` when no volume starts that early.
    pub fn volume_for(&self, chapter: u32, verse: u32) -> StoreResult<Option<VolumeIndexEntry>> {
        let position = (chapter, verse);

        self.db.with_conn(|conn| {
            if !corpus::verse_exists(conn, chapter, verse)? {
                return Err(StoreError::InvalidReference { chapter, verse });
            }

            let entries = corpus::list_volume_index(conn)?;
            Ok(entries
                .into_iter()
                .filter(|e| e.start() <= position)
                .max_by_key(|e| (e.start(), e.volume)))
        })
    }

    // ==================== Bookmark ====================

    /// The saved reading position, or `None` if nothing was saved yet
    pub fn get_bookmark(&self) -> StoreResult<Option<Bookmark>> {
        Ok(self.db.with_conn(bookmark::get)?)
    }

    /// Replace the bookmark
    ///
    /// Fails with `InvalidReference` unless both the chapter and the verse
    /// exist; the previous bookmark is left untouched in that case.
    pub fn save_bookmark(&self, chapter: u32, verse: u32) -> StoreResult<()> {
        self.db.transaction(|tx| -> StoreResult<()> {
            if !corpus::chapter_exists(tx, chapter)? || !corpus::verse_exists(tx, chapter, verse)? {
                warn!(chapter, verse, "Rejected bookmark for unknown verse");
                return Err(StoreError::InvalidReference { chapter, verse });
            }
            bookmark::set(tx, chapter, verse)?;
            Ok(())
        })?;

        info!(chapter, verse, "Saved bookmark");
        Ok(())
    }

    // ==================== Seeding ====================

    pub fn add_chapter(&self, chapter: &Chapter) -> StoreResult<()> {
        self.db.with_conn(|conn| corpus::add_chapter(conn, chapter))?;
        Ok(())
    }

    pub fn add_verse(&self, verse: &Verse) -> StoreResult<()> {
        self.db.with_conn(|conn| corpus::add_verse(conn, verse))?;
        Ok(())
    }

    pub fn add_volume_entry(&self, entry: &VolumeIndexEntry) -> StoreResult<()> {
        self.db.with_conn(|conn| corpus::add_volume_entry(conn, entry))?;
        Ok(())
    }

    /// Seed a whole bundle in one transaction
    ///
    /// Existing records with the same keys are overwritten. Nothing is
    /// written if any insert fails.
    pub fn import_bundle(&self, bundle: &CorpusBundle) -> StoreResult<ImportSummary> {
        let summary = self.db.transaction(|tx| -> StoreResult<ImportSummary> {
            for chapter in &bundle.chapters {
                corpus::add_chapter(tx, chapter)?;
            }
            for verse in &bundle.verses {
                corpus::add_verse(tx, verse)?;
            }
            for entry in &bundle.volumes {
                corpus::add_volume_entry(tx, entry)?;
            }
            Ok(ImportSummary {
                chapters: bundle.chapters.len(),
                verses: bundle.verses.len(),
                volumes: bundle.volumes.len(),
            })
        })?;

        info!(
            chapters = summary.chapters,
            verses = summary.verses,
            volumes = summary.volumes,
            "Imported corpus bundle"
        );
        Ok(summary)
    }

    /// Clear the corpus and the bookmark
    ///
    /// Irreversible; meant for re-seeding.
    pub fn reset_all(&self) -> StoreResult<()> {
        self.db.transaction(|tx| corpus::reset(tx))?;
        info!("Reset corpus and bookmark");
        Ok(())
    }

    // ==================== Diagnostics ====================

    /// Check the stored corpus against its invariants
    pub fn check_integrity(&self) -> StoreResult<IntegrityReport> {
        let (chapters, positions, volumes) = self.db.with_conn(|conn| {
            Ok::<_, rusqlite::Error>((
                corpus::list_chapters(conn)?,
                corpus::list_verse_positions(conn)?,
                corpus::list_volume_index(conn)?,
            ))
        })?;

        let report = integrity::check(&chapters, &positions, &volumes);
        for issue in &report.issues {
            warn!("Integrity: {}", issue);
        }
        Ok(report)
    }

    pub fn stats(&self) -> StoreResult<StoreStats> {
        let (counts, bookmark) = self.db.with_conn(|conn| {
            Ok::<_, rusqlite::Error>((corpus::counts(conn)?, bookmark::get(conn)?))
        })?;

        Ok(StoreStats {
            counts,
            bookmark,
            storage: self.db.stats(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Revelation;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            log_level: None,
            log_file: None,
        }
    }

    fn fatihah() -> Chapter {
        Chapter::new(1, "الفاتحة", "Al-Fatihah", Revelation::Meccan, 7)
    }

    fn baqarah() -> Chapter {
        Chapter::new(2, "البقرة", "Al-Baqarah", Revelation::Medinan, 286)
    }

    fn verse(chapter: u32, number: u32) -> Verse {
        Verse::new(chapter, number, format!("text {chapter}:{number}"))
            .with_translations(format!("urdu {chapter}:{number}"), format!("english {chapter}:{number}"))
    }

    /// Chapters 1 and 2, all of chapter 1, and verses 2:1..=2:5
    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.add_chapter(&fatihah()).unwrap();
        store.add_chapter(&baqarah()).unwrap();
        for n in 1..=7 {
            store.add_verse(&verse(1, n)).unwrap();
        }
        for n in 1..=5 {
            store.add_verse(&verse(2, n)).unwrap();
        }
        store
    }

    #[test]
    fn test_open_creates_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let store = Store::open_with_config(config.clone()).unwrap();

        assert!(config.sqlite_path().exists());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_get_chapter_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let chapters: Vec<Chapter> = (1..=114)
            .map(|n| {
                let revelation = if n % 2 == 0 {
                    Revelation::Medinan
                } else {
                    Revelation::Meccan
                };
                Chapter::new(n, format!("سورة {n}"), format!("Surah {n}"), revelation, n + 2)
            })
            .collect();
        for chapter in &chapters {
            store.add_chapter(chapter).unwrap();
        }

        for chapter in &chapters {
            assert_eq!(&store.get_chapter(chapter.number).unwrap(), chapter);
        }
    }

    #[test]
    fn test_get_chapter_not_found() {
        let store = seeded_store();
        let err = store.get_chapter(3).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { chapter: 3 }));
        assert_eq!(err.to_string(), "Chapter 3 not found");
    }

    #[test]
    fn test_get_chapters_sorted() {
        let store = Store::open_in_memory().unwrap();
        for n in [5, 1, 114, 2, 40] {
            store
                .add_chapter(&Chapter::new(n, "", format!("Surah {n}"), Revelation::Meccan, 1))
                .unwrap();
        }

        let numbers: Vec<u32> = store.get_chapters().unwrap().iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 5, 40, 114]);
    }

    #[test]
    fn test_get_verses_sorted_without_duplicates() {
        let store = Store::open_in_memory().unwrap();
        for n in [4, 2, 7, 1, 2, 6, 3, 5, 7, 1] {
            store.add_verse(&verse(1, n)).unwrap();
        }

        let numbers: Vec<u32> = store.get_verses(1).unwrap().iter().map(|v| v.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_scenario_partial_seeding() {
        let store = Store::open_in_memory().unwrap();
        store.add_chapter(&fatihah()).unwrap();
        store.add_chapter(&baqarah()).unwrap();
        for n in 1..=7 {
            store.add_verse(&verse(1, n)).unwrap();
        }

        let verses = store.get_verses(1).unwrap();
        assert_eq!(verses.len(), 7);
        assert_eq!(
            verses.iter().map(|v| v.number).collect::<Vec<_>>(),
            (1..=7).collect::<Vec<_>>()
        );
        assert_eq!(verses[0], verse(1, 1));

        assert!(store.get_verses(2).unwrap().is_empty());
        assert!(store.get_verses(99).unwrap().is_empty());
    }

    #[test]
    fn test_scenario_single_volume_entry() {
        let store = Store::open_in_memory().unwrap();
        store.add_volume_entry(&VolumeIndexEntry::new(1, 1, 1)).unwrap();

        assert_eq!(
            store.get_volume_index().unwrap(),
            vec![VolumeIndexEntry::new(1, 1, 1)]
        );
    }

    #[test]
    fn test_volume_index_sorted() {
        let store = Store::open_in_memory().unwrap();
        store.add_volume_entry(&VolumeIndexEntry::new(3, 2, 253)).unwrap();
        store.add_volume_entry(&VolumeIndexEntry::new(1, 1, 1)).unwrap();
        store.add_volume_entry(&VolumeIndexEntry::new(2, 2, 142)).unwrap();

        let volumes: Vec<u32> = store.get_volume_index().unwrap().iter().map(|e| e.volume).collect();
        assert_eq!(volumes, vec![1, 2, 3]);
    }

    #[test]
    fn test_bookmark_absent_initially() {
        let store = seeded_store();
        assert_eq!(store.get_bookmark().unwrap(), None);
    }

    #[test]
    fn test_save_and_get_bookmark() {
        let store = seeded_store();
        store.save_bookmark(1, 4).unwrap();
        assert_eq!(store.get_bookmark().unwrap(), Some(Bookmark::new(1, 4)));
    }

    #[test]
    fn test_save_bookmark_replaces_previous() {
        let store = seeded_store();
        store.save_bookmark(1, 1).unwrap();
        store.save_bookmark(2, 5).unwrap();
        assert_eq!(store.get_bookmark().unwrap(), Some(Bookmark::new(2, 5)));
    }

    #[test]
    fn test_save_bookmark_rejects_unknown_chapter() {
        let store = seeded_store();
        store.save_bookmark(1, 3).unwrap();

        let err = store.save_bookmark(9, 1).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidReference {
                chapter: 9,
                verse: 1
            }
        ));
        assert_eq!(store.get_bookmark().unwrap(), Some(Bookmark::new(1, 3)));
    }

    #[test]
    fn test_save_bookmark_rejects_unknown_verse() {
        let store = seeded_store();

        // Chapter 2 declares 286 verses but only 1..=5 are stored
        let err = store.save_bookmark(2, 6).unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference { .. }));
        assert_eq!(store.get_bookmark().unwrap(), None);
    }

    #[test]
    fn test_save_bookmark_requires_chapter_record() {
        let store = Store::open_in_memory().unwrap();
        // Verse without its chapter, as during out-of-order loading
        store.add_verse(&verse(3, 1)).unwrap();

        assert!(matches!(
            store.save_bookmark(3, 1),
            Err(StoreError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_concurrent_bookmark_saves_never_interleave() {
        let store = Arc::new(seeded_store());
        let allowed = [Bookmark::new(1, 1), Bookmark::new(2, 5)];

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for round in 0..100 {
                        let (chapter, verse) = if (i + round) % 2 == 0 { (1, 1) } else { (2, 5) };
                        store.save_bookmark(chapter, verse).unwrap();
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        if let Some(bookmark) = store.get_bookmark().unwrap() {
                            assert!(allowed.contains(&bookmark), "torn bookmark {bookmark}");
                        }
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        let last = store.get_bookmark().unwrap().unwrap();
        assert!(allowed.contains(&last));
    }

    #[test]
    fn test_reset_all() {
        let store = seeded_store();
        store.add_volume_entry(&VolumeIndexEntry::new(1, 1, 1)).unwrap();
        store.save_bookmark(2, 5).unwrap();

        store.reset_all().unwrap();

        assert!(store.get_chapters().unwrap().is_empty());
        assert!(store.get_verses(1).unwrap().is_empty());
        assert!(store.get_volume_index().unwrap().is_empty());
        assert_eq!(store.get_bookmark().unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_import_bundle() {
        let store = Store::open_in_memory().unwrap();
        let bundle = CorpusBundle {
            chapters: vec![fatihah()],
            verses: (1..=7).rev().map(|n| verse(1, n)).collect(),
            volumes: vec![VolumeIndexEntry::new(1, 1, 1)],
        };

        let summary = store.import_bundle(&bundle).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                chapters: 1,
                verses: 7,
                volumes: 1
            }
        );
        assert_eq!(store.get_chapter(1).unwrap(), fatihah());
        assert_eq!(store.get_verses(1).unwrap()[6], verse(1, 7));
    }

    #[test]
    fn test_check_integrity() {
        let store = Store::open_in_memory().unwrap();
        store.add_chapter(&fatihah()).unwrap();
        for n in 1..=6 {
            store.add_verse(&verse(1, n)).unwrap();
        }

        let report = store.check_integrity().unwrap();
        assert!(report
            .issues
            .contains(&integrity::IntegrityIssue::VerseCountMismatch {
                chapter: 1,
                declared: 7,
                stored: 6
            }));

        store.add_verse(&verse(1, 7)).unwrap();
        let report = store.check_integrity().unwrap();
        assert!(!report.issues.iter().any(|i| matches!(
            i,
            integrity::IntegrityIssue::VerseCountMismatch { .. }
        )));
    }

    #[test]
    fn test_volume_for() {
        let store = seeded_store();
        store.add_volume_entry(&VolumeIndexEntry::new(1, 1, 1)).unwrap();
        store.add_volume_entry(&VolumeIndexEntry::new(2, 2, 3)).unwrap();

        assert_eq!(store.volume_for(1, 7).unwrap().map(|e| e.volume), Some(1));
        assert_eq!(store.volume_for(2, 2).unwrap().map(|e| e.volume), Some(1));
        assert_eq!(store.volume_for(2, 3).unwrap().map(|e| e.volume), Some(2));
        assert_eq!(store.volume_for(2, 5).unwrap().map(|e| e.volume), Some(2));
        assert!(matches!(
            store.volume_for(2, 6),
            Err(StoreError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_volume_for_before_first_volume() {
        let store = seeded_store();
        store.add_volume_entry(&VolumeIndexEntry::new(2, 2, 1)).unwrap();

        assert_eq!(store.volume_for(1, 1).unwrap(), None);
    }

    #[test]
    fn test_stats() {
        let store = seeded_store();
        store.save_bookmark(1, 2).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.counts.chapters, 2);
        assert_eq!(stats.counts.verses, 12);
        assert_eq!(stats.counts.volumes, 0);
        assert_eq!(stats.bookmark, Some(Bookmark::new(1, 2)));
        assert!(!stats.storage.database_exists);
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let store = Store::open_with_config(config.clone()).unwrap();
            store.add_chapter(&fatihah()).unwrap();
            store.add_verse(&verse(1, 1)).unwrap();
            store.save_bookmark(1, 1).unwrap();
        }

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.get_chapter(1).unwrap(), fatihah());
        assert_eq!(store.get_verses(1).unwrap(), vec![verse(1, 1)]);
        assert_eq!(store.get_bookmark().unwrap(), Some(Bookmark::new(1, 1)));
        assert!(store.stats().unwrap().storage.database_exists);
    }
}
