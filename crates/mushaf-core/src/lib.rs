//! Mushaf Core Library
//!
//! Data-access and persistence layer for a reference-text reader: a fixed
//! corpus of 114 chapters with their verses in three renderings, a 30-volume
//! reading index, and a single reading bookmark.
//!
//! # Architecture
//!
//! - **Corpus store**: chapters, verses and the volume index in SQLite
//! - **Bookmark store**: one reading position, written atomically
//! - **Store**: the access service that validates and sorts
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open()?;
//!
//! // Seed once
//! store.import_bundle(&CorpusBundle::from_path(path)?)?;
//!
//! // Read
//! let chapters = store.get_chapters()?;
//! let verses = store.get_verses(2)?;
//!
//! // Remember where the reader stopped
//! store.save_bookmark(2, 255)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Access service (main entry point)
//! - `models`: Chapter, Verse, VolumeIndexEntry, Bookmark
//! - `storage`: SQLite schema and the corpus/bookmark stores
//! - `bundle`: JSON corpus bundles for seeding
//! - `integrity`: Corpus invariant checks
//! - `config`: Application configuration

pub mod bundle;
pub mod config;
pub mod integrity;
pub mod models;
pub mod storage;
pub mod store;

pub use bundle::{CorpusBundle, ImportSummary};
pub use config::Config;
pub use integrity::{IntegrityIssue, IntegrityReport};
pub use models::{Bookmark, Chapter, Revelation, Verse, VolumeIndexEntry};
pub use storage::{StorageError, StorageStats};
pub use store::{Store, StoreError, StoreResult, StoreStats};
