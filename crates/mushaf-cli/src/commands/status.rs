//! Status command handler

use anyhow::Result;

use mushaf_core::Store;

use crate::output::{Output, OutputFormat};

/// Show corpus counts, the bookmark and storage information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let stats = store.stats()?;
    let config = store.config();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "counts": {
                        "surahs": stats.counts.chapters,
                        "ayahs": stats.counts.verses,
                        "juz": stats.counts.volumes
                    },
                    "bookmark": stats.bookmark,
                    "storage": {
                        "data_dir": config.data_dir,
                        "database_path": stats.storage.database_path,
                        "database_exists": stats.storage.database_exists,
                        "database_size": stats.storage.database_size
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!(
                "{} {} {}",
                stats.counts.chapters, stats.counts.verses, stats.counts.volumes
            );
        }
        OutputFormat::Human => {
            println!("Mushaf Status");
            println!("=============");
            println!();
            println!("Corpus:");
            println!("  Surahs: {}", stats.counts.chapters);
            println!("  Ayahs:  {}", stats.counts.verses);
            println!("  Juz:    {}", stats.counts.volumes);
            if stats.counts.is_empty() {
                println!("  (empty - seed it with `mushaf import <file>`)");
            }
            println!();
            println!("Bookmark:");
            match stats.bookmark {
                Some(b) => println!("  {}", b),
                None => println!("  (none)"),
            }
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {}", stats.storage.database_size_human());
        }
    }

    Ok(())
}
