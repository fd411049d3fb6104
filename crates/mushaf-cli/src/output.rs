//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::collections::HashMap;

use serde::Serialize;

use mushaf_core::{Bookmark, Chapter, IntegrityReport, Verse, VolumeIndexEntry};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print the chapter list
    pub fn print_chapters(&self, chapters: &[Chapter]) {
        match self.format {
            OutputFormat::Human => {
                if chapters.is_empty() {
                    println!("No surahs found. Seed the corpus with `mushaf import <file>`.");
                    return;
                }
                for chapter in chapters {
                    println!(
                        "{:>3} | {:<22} | {:<20} | {:<7} | {} ayahs",
                        chapter.number,
                        truncate(&chapter.name_english, 22),
                        chapter.name_arabic,
                        chapter.revelation,
                        chapter.verse_count
                    );
                }
                println!("\n{} surah(s)", chapters.len());
            }
            OutputFormat::Json => print_json(&chapters),
            OutputFormat::Quiet => {
                for chapter in chapters {
                    println!("{}", chapter.number);
                }
            }
        }
    }

    /// Print a single chapter
    pub fn print_chapter(&self, chapter: &Chapter) {
        match self.format {
            OutputFormat::Human => {
                println!("Surah:      {}", chapter.number);
                println!("Name:       {}", chapter.name_english);
                println!("Arabic:     {}", chapter.name_arabic);
                println!("Revelation: {}", chapter.revelation);
                println!("Ayahs:      {}", chapter.verse_count);
            }
            OutputFormat::Json => print_json(chapter),
            OutputFormat::Quiet => println!("{}", chapter.number),
        }
    }

    /// Print a chapter's verses, marking the bookmarked one
    pub fn print_verses(&self, chapter: &Chapter, verses: &[Verse], bookmark: Option<Bookmark>) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "{} ({}) · {} · {} ayahs",
                    chapter.name_english, chapter.name_arabic, chapter.revelation, chapter.verse_count
                );
                println!();

                if verses.is_empty() {
                    println!("No ayahs found for this surah.");
                    return;
                }

                let marked = bookmark
                    .filter(|b| b.chapter == chapter.number)
                    .map(|b| b.verse);

                for verse in verses {
                    let marker = if marked == Some(verse.number) { "*" } else { " " };
                    println!("{}[{}] {}", marker, verse.number, verse.text);
                    if !verse.translation_urdu.is_empty() {
                        println!("      {}", verse.translation_urdu);
                    }
                    if !verse.translation_english.is_empty() {
                        println!("      {}", verse.translation_english);
                    }
                    println!();
                }
            }
            OutputFormat::Json => print_json(&verses),
            OutputFormat::Quiet => {
                for verse in verses {
                    println!("{}:{}", verse.chapter, verse.number);
                }
            }
        }
    }

    /// Print the volume index, naming each starting chapter
    pub fn print_volume_index(&self, entries: &[VolumeIndexEntry], chapters: &[Chapter]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No juz index found.");
                    return;
                }
                let names: HashMap<u32, &str> = chapters
                    .iter()
                    .map(|c| (c.number, c.name_english.as_str()))
                    .collect();

                for entry in entries {
                    let name = names
                        .get(&entry.start_chapter)
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| format!("Surah {}", entry.start_chapter));
                    println!(
                        "Juz {:>2} | {} {}:{}",
                        entry.volume, name, entry.start_chapter, entry.start_verse
                    );
                }
                println!("\n{} juz", entries.len());
            }
            OutputFormat::Json => print_json(&entries),
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{} {}:{}", entry.volume, entry.start_chapter, entry.start_verse);
                }
            }
        }
    }

    /// Print the bookmark, or say there is none
    pub fn print_bookmark(
        &self,
        bookmark: Option<Bookmark>,
        chapter: Option<&Chapter>,
        volume: Option<VolumeIndexEntry>,
    ) {
        match self.format {
            OutputFormat::Human => match bookmark {
                Some(b) => {
                    let name = chapter
                        .map(|c| c.name_english.clone())
                        .unwrap_or_else(|| format!("Surah {}", b.chapter));
                    println!("Continue reading: {}, ayah {}", name, b.verse);
                    if let Some(v) = volume {
                        println!("Juz:              {}", v.volume);
                    }
                }
                None => {
                    println!("No bookmark yet.");
                    println!("Save one with `mushaf bookmark set <surah> <ayah>`.");
                }
            },
            OutputFormat::Json => print_json(&serde_json::json!({
                "bookmark": bookmark,
                "surah_name": chapter.map(|c| c.name_english.as_str()),
                "juz": volume.map(|v| v.volume),
            })),
            OutputFormat::Quiet => {
                if let Some(b) = bookmark {
                    println!("{}", b);
                }
            }
        }
    }

    /// Print integrity check results
    pub fn print_integrity(&self, report: &IntegrityReport) {
        match self.format {
            OutputFormat::Human => {
                if report.is_clean() {
                    println!("✓ Corpus is consistent");
                    return;
                }
                for issue in &report.issues {
                    println!("✗ {}", issue);
                }
                println!("\n{} issue(s)", report.issues.len());
            }
            OutputFormat::Json => print_json(report),
            OutputFormat::Quiet => {
                for issue in &report.issues {
                    println!("{}", issue);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_should_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(Output::new(OutputFormat::Quiet).is_quiet());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_counts_characters() {
        // Multi-byte text must not be split inside a character
        assert_eq!(truncate("الفاتحة", 7), "الفاتحة");
        assert_eq!(truncate("الفاتحةالفاتحة", 6), "الف...");
    }
}
