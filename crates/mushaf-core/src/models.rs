//! Data models for Mushaf
//!
//! Defines the corpus records (Chapter, Verse, VolumeIndexEntry) and the
//! reading Bookmark. Values are plain data: the store hands out owned copies
//! and never live handles into storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of chapters in a complete corpus
pub const CHAPTER_COUNT: u32 = 114;

/// Number of reading volumes in a complete volume index
pub const VOLUME_COUNT: u32 = 30;

/// Place-of-revelation tag carried by every chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Revelation {
    Meccan,
    Medinan,
}

impl Revelation {
    /// Canonical text form, as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            Revelation::Meccan => "Meccan",
            Revelation::Medinan => "Medinan",
        }
    }
}

impl fmt::Display for Revelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a revelation tag is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown revelation type: '{0}' (expected Meccan or Medinan)")]
pub struct ParseRevelationError(pub String);

impl FromStr for Revelation {
    type Err = ParseRevelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meccan" => Ok(Revelation::Meccan),
            "medinan" => Ok(Revelation::Medinan),
            _ => Err(ParseRevelationError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Revelation {
    type Error = ParseRevelationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A top-level division of the corpus (a surah)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter number, 1..=114
    pub number: u32,
    /// Name in the source script
    pub name_arabic: String,
    /// Transliterated or translated name
    pub name_english: String,
    /// Place of revelation
    pub revelation: Revelation,
    /// Declared number of verses
    pub verse_count: u32,
}

impl Chapter {
    pub fn new(
        number: u32,
        name_arabic: impl Into<String>,
        name_english: impl Into<String>,
        revelation: Revelation,
        verse_count: u32,
    ) -> Self {
        Self {
            number,
            name_arabic: name_arabic.into(),
            name_english: name_english.into(),
            revelation,
            verse_count,
        }
    }
}

/// An addressable unit of text within a chapter (an ayah)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    /// Chapter this verse belongs to
    pub chapter: u32,
    /// Verse number within the chapter, starting at 1
    pub number: u32,
    /// Source-script text
    pub text: String,
    /// Urdu rendering, may be empty
    #[serde(default)]
    pub translation_urdu: String,
    /// English rendering, may be empty
    #[serde(default)]
    pub translation_english: String,
}

impl Verse {
    /// Create a verse with empty translations
    pub fn new(chapter: u32, number: u32, text: impl Into<String>) -> Self {
        Self {
            chapter,
            number,
            text: text.into(),
            translation_urdu: String::new(),
            translation_english: String::new(),
        }
    }

    /// Set both translations
    pub fn with_translations(
        mut self,
        urdu: impl Into<String>,
        english: impl Into<String>,
    ) -> Self {
        self.translation_urdu = urdu.into();
        self.translation_english = english.into();
        self
    }

    /// The (chapter, verse) key
    pub fn position(&self) -> (u32, u32) {
        (self.chapter, self.number)
    }
}

/// Where one of the reading volumes (a juz) begins
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeIndexEntry {
    /// Volume number, 1..=30
    pub volume: u32,
    pub start_chapter: u32,
    pub start_verse: u32,
}

impl VolumeIndexEntry {
    pub fn new(volume: u32, start_chapter: u32, start_verse: u32) -> Self {
        Self {
            volume,
            start_chapter,
            start_verse,
        }
    }

    /// The (chapter, verse) position this volume starts at
    pub fn start(&self) -> (u32, u32) {
        (self.start_chapter, self.start_verse)
    }
}

/// The single persisted reading position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub chapter: u32,
    pub verse: u32,
}

impl Bookmark {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}
