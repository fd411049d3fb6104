//! Corpus bundles
//!
//! A bundle is the whole reference corpus in one JSON document, used to seed
//! an empty store in a single step:
//!
//! ```json
//! {
//!   "chapters": [{"number": 1, "name_arabic": "الفاتحة", "name_english": "Al-Fatihah",
//!                 "revelation": "Meccan", "verse_count": 7}],
//!   "verses":   [{"chapter": 1, "number": 1, "text": "...",
//!                 "translation_urdu": "...", "translation_english": "..."}],
//!   "volumes":  [{"volume": 1, "start_chapter": 1, "start_verse": 1}]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{Chapter, Verse, VolumeIndexEntry};
use crate::storage::{StorageError, StorageResult};

/// Chapters, verses and volume index loaded together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusBundle {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub verses: Vec<Verse>,
    #[serde(default)]
    pub volumes: Vec<VolumeIndexEntry>,
}

impl CorpusBundle {
    /// Read a bundle from a JSON file
    pub fn from_path(path: &Path) -> StorageResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StorageError::from_read(e, path.to_path_buf()))?;

        Self::from_json(&content).map_err(|e| StorageError::InvalidFormat {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty() && self.verses.is_empty() && self.volumes.is_empty()
    }
}

/// Number of records written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub chapters: usize,
    pub verses: usize,
    pub volumes: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.chapters + self.verses + self.volumes
    }
}
