//! Corpus command handlers

use std::path::Path;

use anyhow::{bail, Context, Result};

use mushaf_core::{CorpusBundle, Store};

use crate::output::{Output, OutputFormat};
use crate::prompt::confirm;

/// Seed the store from a JSON bundle
pub fn import(store: &Store, file: &Path, output: &Output) -> Result<()> {
    let bundle = CorpusBundle::from_path(file)
        .with_context(|| format!("Failed to load bundle {}", file.display()))?;

    if bundle.is_empty() {
        bail!("Bundle {} contains no records", file.display());
    }

    let summary = store.import_bundle(&bundle)?;
    let report = store.check_integrity()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "imported": summary,
                    "issues": report.issues.len()
                })
            );
        }
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            println!(
                "✓ Imported {} surah(s), {} ayah(s), {} juz entries",
                summary.chapters, summary.verses, summary.volumes
            );
            if !report.is_clean() {
                println!(
                    "{} integrity issue(s) remain. Run `mushaf check` for details.",
                    report.issues.len()
                );
            }
        }
    }

    Ok(())
}

/// List all surahs
pub fn surahs(store: &Store, output: &Output) -> Result<()> {
    let chapters = store.get_chapters()?;
    output.print_chapters(&chapters);
    Ok(())
}

/// Show one surah
pub fn surah(store: &Store, number: u32, output: &Output) -> Result<()> {
    let chapter = store.get_chapter(number)?;
    output.print_chapter(&chapter);
    Ok(())
}

/// Print a surah's ayahs, marking the bookmarked one
pub fn read(store: &Store, number: u32, output: &Output) -> Result<()> {
    let chapter = store.get_chapter(number)?;
    let verses = store.get_verses(number)?;
    let bookmark = store.get_bookmark()?;

    output.print_verses(&chapter, &verses, bookmark);
    Ok(())
}

/// Show the juz index
pub fn juz(store: &Store, output: &Output) -> Result<()> {
    let entries = store.get_volume_index()?;
    let chapters = store.get_chapters()?;
    output.print_volume_index(&entries, &chapters);
    Ok(())
}

/// Report integrity issues; fails when any are found
pub fn check(store: &Store, output: &Output) -> Result<()> {
    let report = store.check_integrity()?;
    output.print_integrity(&report);

    if !report.is_clean() {
        bail!("{} integrity issue(s) found", report.issues.len());
    }
    Ok(())
}

/// Delete the corpus and bookmark after confirmation
pub fn reset(store: &Store, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to reset without confirmation. Pass --yes to proceed.");
        }
        if !confirm("Delete the whole corpus and the bookmark?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    store.reset_all()?;
    output.success("Corpus and bookmark deleted");
    Ok(())
}
