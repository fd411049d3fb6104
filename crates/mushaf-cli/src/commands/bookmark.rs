//! Bookmark command handlers

use anyhow::Result;

use mushaf_core::{Store, StoreError};

use crate::output::Output;

/// Show the bookmark with its surah name and juz
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let bookmark = store.get_bookmark()?;

    let (chapter, volume) = match bookmark {
        Some(b) => {
            let chapter = match store.get_chapter(b.chapter) {
                Ok(chapter) => Some(chapter),
                Err(StoreError::NotFound { .. }) => None,
                Err(e) => return Err(e.into()),
            };
            let volume = match store.volume_for(b.chapter, b.verse) {
                Ok(volume) => volume,
                Err(StoreError::InvalidReference { .. }) => None,
                Err(e) => return Err(e.into()),
            };
            (chapter, volume)
        }
        None => (None, None),
    };

    output.print_bookmark(bookmark, chapter.as_ref(), volume);
    Ok(())
}

/// Save the bookmark, rejecting positions that are not in the corpus
pub fn set(store: &Store, surah: u32, ayah: u32, output: &Output) -> Result<()> {
    store.save_bookmark(surah, ayah)?;
    output.success(&format!("Bookmark saved at {}:{}", surah, ayah));
    Ok(())
}
