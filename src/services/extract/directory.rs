//! Bounded copy from an already extracted package directory.
//!
//! Items of the source directory named `<word_id>` (a word folder) or
//! `<word_id>.tar.gz` (a word archive) are processed in word-id order, a
//! folder before an archive of the same word. Full listings are cheap here,
//! so both use sort-then-slice selection.

use super::ExtractContext;
use super::classify::{self, FileKind};
use super::nested;
use super::select::sort_and_pick;
use crate::io::output;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A word-level item found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSource {
    Folder { word_id: String, path: PathBuf },
    Archive { word_id: String, path: PathBuf },
}

/// List the word folders and word archives directly inside `source`.
pub fn list_word_sources(source: &Path) -> std::io::Result<Vec<WordSource>> {
    let mut items = Vec::new();

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();

        if classify::is_word_id(&name) && path.is_dir() {
            items.push(WordSource::Folder {
                word_id: name,
                path,
            });
        } else if let Some(word_id) = classify::nested_word_id(&name)
            && path.is_file()
        {
            items.push(WordSource::Archive {
                word_id: word_id.to_string(),
                path,
            });
        }
    }

    // A folder and an archive for the same word: the folder goes first.
    items.sort_by(|a, b| {
        a.word_id()
            .cmp(b.word_id())
            .then_with(|| a.is_archive().cmp(&b.is_archive()))
    });
    Ok(items)
}

impl WordSource {
    #[must_use]
    pub fn word_id(&self) -> &str {
        match self {
            WordSource::Folder { word_id, .. } | WordSource::Archive { word_id, .. } => word_id,
        }
    }

    #[must_use]
    pub fn is_archive(&self) -> bool {
        matches!(self, WordSource::Archive { .. })
    }
}

/// Copy at most `limit` images per word from the directory `source` into `dest`.
pub fn copy_directory(source: &Path, dest: &Path, context: &mut ExtractContext) -> Result<()> {
    let items = list_word_sources(source)?;
    log::info!("Found {} word items in {}", items.len(), source.display());

    for item in items {
        if context.cancel_requested() {
            break;
        }
        context.note_entry();

        match item {
            WordSource::Folder { word_id, path } => {
                copy_word_folder(&path, &word_id, dest, context);
            }
            WordSource::Archive { word_id, path } => {
                let archive_bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        context.record_io_error(&path, &e);
                        continue;
                    }
                };
                if let Err(e) = nested::extract_nested(&archive_bytes, &word_id, dest, context) {
                    context.record_archive_error(
                        &path,
                        format!("failed to process word archive: {e}"),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Copy the first images by file name plus all sidecars from one word folder.
fn copy_word_folder(src_dir: &Path, word_id: &str, dest: &Path, context: &mut ExtractContext) {
    let listing = match fs::read_dir(src_dir) {
        Ok(listing) => listing,
        Err(e) => {
            context.record_io_error(src_dir, &e);
            return;
        }
    };

    let mut images = Vec::new();
    let mut sidecars = Vec::new();
    for entry in listing {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                context.record_io_error(src_dir, &e);
                continue;
            }
        };
        if !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        match FileKind::of(&name) {
            Some(FileKind::Image) => images.push(name),
            Some(FileKind::Sidecar) => sidecars.push(name),
            None => {}
        }
    }

    let dest_dir = dest.join(word_id);
    if let Err(e) = fs::create_dir_all(&dest_dir) {
        context.record_io_error(&dest_dir, &e);
        return;
    }
    context.touch_word(word_id);

    let selected = sort_and_pick(
        images,
        word_id,
        context.admission(),
        String::as_str,
        String::as_str,
    )
    .into_iter()
    .map(|name| (name, FileKind::Image))
    .chain(sidecars.into_iter().map(|name| (name, FileKind::Sidecar)));

    for (name, kind) in selected {
        match output::copy_file(&src_dir.join(&name), &dest_dir, &name) {
            Ok(bytes) => context.record_write(word_id, &name, kind, bytes),
            Err(e) => context.record_io_error(&src_dir.join(&name), &e),
        }
    }
}
