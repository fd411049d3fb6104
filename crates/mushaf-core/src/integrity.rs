//! Corpus integrity checking
//!
//! Inserts never validate cross-record references, so a partially or badly
//! loaded corpus is only caught here. `check` is a pure function over the
//! stored keys and reports every violation it finds.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::models::{Chapter, VolumeIndexEntry, CHAPTER_COUNT, VOLUME_COUNT};

/// One violated corpus invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Chapter numbers that should exist but don't
    MissingChapters { missing: Vec<u32> },
    ChapterOutOfRange { chapter: u32 },
    VerseCountMismatch {
        chapter: u32,
        declared: u32,
        stored: u32,
    },
    /// Verses stored for a chapter that has no record
    OrphanVerses { chapter: u32, count: u32 },
    VerseOutOfRange {
        chapter: u32,
        verse: u32,
        verse_count: u32,
    },
    /// Volume numbers that should exist but don't
    MissingVolumes { missing: Vec<u32> },
    VolumeOutOfRange { volume: u32 },
    UnresolvedVolumeStart {
        volume: u32,
        chapter: u32,
        verse: u32,
    },
    /// A volume starting before the volume numbered below it
    VolumeOutOfOrder { volume: u32, previous: u32 },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::MissingChapters { missing } => {
                write!(f, "missing chapters: {}", format_ranges(missing))
            }
            IntegrityIssue::ChapterOutOfRange { chapter } => {
                write!(f, "chapter {} is outside 1-{}", chapter, CHAPTER_COUNT)
            }
            IntegrityIssue::VerseCountMismatch {
                chapter,
                declared,
                stored,
            } => write!(
                f,
                "chapter {} declares {} verses but {} are stored",
                chapter, declared, stored
            ),
            IntegrityIssue::OrphanVerses { chapter, count } => {
                write!(f, "{} verse(s) reference missing chapter {}", count, chapter)
            }
            IntegrityIssue::VerseOutOfRange {
                chapter,
                verse,
                verse_count,
            } => write!(
                f,
                "verse {}:{} is outside 1-{}",
                chapter, verse, verse_count
            ),
            IntegrityIssue::MissingVolumes { missing } => {
                write!(f, "missing volumes: {}", format_ranges(missing))
            }
            IntegrityIssue::VolumeOutOfRange { volume } => {
                write!(f, "volume {} is outside 1-{}", volume, VOLUME_COUNT)
            }
            IntegrityIssue::UnresolvedVolumeStart {
                volume,
                chapter,
                verse,
            } => write!(
                f,
                "volume {} starts at {}:{}, which is not a stored verse",
                volume, chapter, verse
            ),
            IntegrityIssue::VolumeOutOfOrder { volume, previous } => write!(
                f,
                "volume {} starts before volume {}",
                volume, previous
            ),
        }
    }
}

/// Result of an integrity check; empty means consistent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check the corpus invariants over the stored keys
pub fn check(
    chapters: &[Chapter],
    verse_positions: &[(u32, u32)],
    volumes: &[VolumeIndexEntry],
) -> IntegrityReport {
    let mut issues = Vec::new();

    let chapters: BTreeMap<u32, &Chapter> = chapters.iter().map(|c| (c.number, c)).collect();
    let verses: BTreeSet<(u32, u32)> = verse_positions.iter().copied().collect();

    let missing: Vec<u32> = (1..=CHAPTER_COUNT)
        .filter(|n| !chapters.contains_key(n))
        .collect();
    if !missing.is_empty() {
        issues.push(IntegrityIssue::MissingChapters { missing });
    }

    let mut stored_per_chapter: BTreeMap<u32, u32> = BTreeMap::new();
    for (chapter, _) in &verses {
        *stored_per_chapter.entry(*chapter).or_default() += 1;
    }

    for (&number, chapter) in &chapters {
        if number == 0 || number > CHAPTER_COUNT {
            issues.push(IntegrityIssue::ChapterOutOfRange { chapter: number });
        }
        let stored = stored_per_chapter.get(&number).copied().unwrap_or(0);
        if stored != chapter.verse_count {
            issues.push(IntegrityIssue::VerseCountMismatch {
                chapter: number,
                declared: chapter.verse_count,
                stored,
            });
        }
    }

    for (&chapter, &count) in &stored_per_chapter {
        if !chapters.contains_key(&chapter) {
            issues.push(IntegrityIssue::OrphanVerses { chapter, count });
        }
    }

    for &(chapter, verse) in &verses {
        if let Some(c) = chapters.get(&chapter) {
            if verse == 0 || verse > c.verse_count {
                issues.push(IntegrityIssue::VerseOutOfRange {
                    chapter,
                    verse,
                    verse_count: c.verse_count,
                });
            }
        }
    }

    let mut volumes: Vec<VolumeIndexEntry> = volumes.to_vec();
    volumes.sort_by_key(|v| v.volume);

    let present: BTreeSet<u32> = volumes.iter().map(|v| v.volume).collect();
    let missing: Vec<u32> = (1..=VOLUME_COUNT)
        .filter(|n| !present.contains(n))
        .collect();
    if !missing.is_empty() {
        issues.push(IntegrityIssue::MissingVolumes { missing });
    }

    for entry in &volumes {
        if entry.volume == 0 || entry.volume > VOLUME_COUNT {
            issues.push(IntegrityIssue::VolumeOutOfRange {
                volume: entry.volume,
            });
        }
        if !verses.contains(&entry.start()) {
            issues.push(IntegrityIssue::UnresolvedVolumeStart {
                volume: entry.volume,
                chapter: entry.start_chapter,
                verse: entry.start_verse,
            });
        }
    }

    for pair in volumes.windows(2) {
        if pair[1].start() < pair[0].start() {
            issues.push(IntegrityIssue::VolumeOutOfOrder {
                volume: pair[1].volume,
                previous: pair[0].volume,
            });
        }
    }

    IntegrityReport { issues }
}

/// Collapse sorted numbers into "1-3, 7, 9-10"
fn format_ranges(numbers: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = numbers.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(", ")
}
