//! Single forward pass over a package archive.
//!
//! The outer archive can be tens of gigabytes, so it is never listed or
//! extracted up front: each member is classified as it arrives and either
//! copied straight off the decompression stream, opened as a word archive,
//! or skipped.

use super::ExtractContext;
use super::classify::{self, EntryKind, FileKind};
use super::nested;
use crate::io::output;
use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tar::{Archive, Entry};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open `path` for sequential reading, transparently decompressing gzip.
pub fn open_archive_reader(path: &Path) -> io::Result<Box<dyn Read>> {
    let mut reader = BufReader::with_capacity(1 << 20, File::open(path)?);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        log::debug!("{} has no gzip header, reading as plain tar", path.display());
        Ok(Box::new(reader))
    }
}

/// Scan the package at `path` once, writing retained files under `dest`.
///
/// Opening the package or reading its stream fails the whole scan; problems
/// with a single word archive or a single output file are recorded and the
/// scan moves on.
pub fn scan_archive(path: &Path, dest: &Path, context: &mut ExtractContext) -> Result<()> {
    let reader = open_archive_reader(path)
        .map_err(|e| Error::Archive(format!("cannot open {}: {e}", path.display())))?;
    let mut archive = Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| Error::Archive(format!("cannot read {}: {e}", path.display())))?;

    for entry in entries {
        if context.cancel_requested() {
            break;
        }

        let mut entry = entry.map_err(|e| {
            Error::Archive(format!("corrupt archive stream in {}: {e}", path.display()))
        })?;
        context.note_entry();

        let member_path = match entry.path() {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(e) => {
                context.record_io_error(path, &e);
                continue;
            }
        };
        let is_file = entry.header().entry_type().is_file();

        match classify::classify(&member_path, is_file) {
            EntryKind::NestedArchive { word_id } => {
                handle_nested(&mut entry, &member_path, word_id, dest, context)?;
            }
            EntryKind::FlatMember {
                word_id,
                file_name,
                kind,
            } => handle_flat(
                &mut entry,
                word_id,
                file_name,
                kind,
                dest,
                context,
            ),
            EntryKind::Irrelevant => {
                log::trace!("Skipping {member_path}");
            }
        }
    }

    Ok(())
}

fn handle_nested<R: Read>(
    entry: &mut Entry<'_, R>,
    member_path: &str,
    word_id: &str,
    dest: &Path,
    context: &mut ExtractContext,
) -> Result<()> {
    // The word archive is buffered compressed; reading it is a read of the
    // outer stream, so a failure here is fatal.
    let mut archive_bytes = Vec::new();
    entry.read_to_end(&mut archive_bytes).map_err(|e| {
        Error::Archive(format!("failed reading {member_path} from package: {e}"))
    })?;

    if let Err(e) = nested::extract_nested(&archive_bytes, word_id, dest, context) {
        context.record_archive_error(
            Path::new(member_path),
            format!("failed to process word archive: {e}"),
        );
    }
    Ok(())
}

fn handle_flat<R: Read>(
    entry: &mut Entry<'_, R>,
    word_id: &str,
    file_name: &str,
    kind: FileKind,
    dest: &Path,
    context: &mut ExtractContext,
) {
    if kind == FileKind::Image && !context.admits_image(word_id, file_name) {
        return;
    }

    let word_dir = dest.join(word_id);
    match output::write_stream(entry, &word_dir, file_name) {
        Ok(bytes) => context.record_write(word_id, file_name, kind, bytes),
        Err(e) => context.record_io_error(&word_dir.join(file_name), &e),
    }
}
