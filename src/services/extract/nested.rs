//! Per-word `.tar.gz` archives.
//!
//! Word archives are small, so the whole member list is read first and the
//! images are chosen by name (sort-then-slice). A second pass over the same
//! bytes writes the chosen members, flattened to their base file name. Only
//! the first member (in name order) for a given base name is kept.

use super::ExtractContext;
use super::classify::{self, FileKind};
use super::select::{AdmissionCounter, sort_and_pick};
use crate::io::output;
use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tar::Archive;

/// A retainable member of a word archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub path: String,
    /// Base file name the member is written under.
    pub name: String,
    pub kind: FileKind,
}

/// List the image and sidecar members of a gzip-compressed word archive.
pub fn list_members(archive_bytes: &[u8]) -> io::Result<Vec<Member>> {
    let mut archive = Archive::new(MultiGzDecoder::new(archive_bytes));
    let mut members = Vec::new();

    for entry in archive.entries()? {
        let entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path()?.into_owned();
        let Some(name) = classify::base_name(&path) else {
            continue;
        };
        let Some(kind) = FileKind::of(name) else {
            continue;
        };

        members.push(Member {
            path: path.to_string_lossy().into_owned(),
            name: name.to_string(),
            kind,
        });
    }

    Ok(members)
}

/// Images by member name, up to what `counter` still admits for `word_id`,
/// followed by every sidecar.
#[must_use]
pub fn select_members(
    members: Vec<Member>,
    word_id: &str,
    counter: &AdmissionCounter,
) -> Vec<Member> {
    let (images, sidecars): (Vec<Member>, Vec<Member>) = members
        .into_iter()
        .partition(|m| m.kind == FileKind::Image);

    let mut selected = sort_and_pick(
        images,
        word_id,
        counter,
        |m| m.path.as_str(),
        |m| m.name.as_str(),
    );
    selected.extend(sidecars);
    selected
}

/// Extract the selected members of one word archive into `dest_root/word_id`.
///
/// An `Err` means the archive itself could not be read; per-file write
/// failures are recorded on the context instead.
pub fn extract_nested(
    archive_bytes: &[u8],
    word_id: &str,
    dest_root: &Path,
    context: &mut ExtractContext,
) -> io::Result<()> {
    let selected = select_members(list_members(archive_bytes)?, word_id, context.admission());
    log::debug!("Word {word_id}: {} members selected", selected.len());

    let dest_dir = dest_root.join(word_id);
    fs::create_dir_all(&dest_dir)?;
    context.touch_word(word_id);

    let mut wanted: HashMap<String, FileKind> =
        selected.into_iter().map(|m| (m.path, m.kind)).collect();

    let mut archive = Archive::new(MultiGzDecoder::new(archive_bytes));
    for entry in archive.entries()? {
        if wanted.is_empty() {
            break;
        }

        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path()?.into_owned();
        let Some(kind) = wanted.remove(path.to_string_lossy().as_ref()) else {
            continue;
        };
        let Some(file_name) = classify::base_name(&path) else {
            continue;
        };

        match output::write_stream(&mut entry, &dest_dir, file_name) {
            Ok(bytes) => context.record_write(word_id, file_name, kind, bytes),
            Err(e) => context.record_io_error(&dest_dir.join(file_name), &e),
        }
    }

    Ok(())
}
