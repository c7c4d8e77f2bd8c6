//! Classification of archive members into the shapes MMID packages use.

use std::path::{Component, Path};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const SIDECAR_NAMES: [&str; 3] = ["word.txt", "metadata.json", "errors.json"];
const NESTED_SUFFIX: &str = ".tar.gz";

/// Kind of per-word file kept in the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Counted against the per-word limit.
    Image,
    /// Per-word metadata, always kept.
    Sidecar,
}

impl FileKind {
    /// Classify a bare file name.
    #[must_use]
    pub fn of(file_name: &str) -> Option<Self> {
        if SIDECAR_NAMES.contains(&file_name) {
            return Some(FileKind::Sidecar);
        }

        let ext = Path::new(file_name).extension()?.to_str()?;
        IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
            .then_some(FileKind::Image)
    }
}

/// What a single outer archive member means for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind<'a> {
    /// `<word_id>.tar.gz` holding that word's files.
    NestedArchive { word_id: &'a str },
    /// `.../<word_id>/<file_name>` in a flat package tree.
    FlatMember {
        word_id: &'a str,
        file_name: &'a str,
        kind: FileKind,
    },
    Irrelevant,
}

/// Word identifiers are non-empty runs of ASCII digits.
#[must_use]
pub fn is_word_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Word identifier named by a `<digits>.tar.gz` file name.
#[must_use]
pub fn nested_word_id(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(NESTED_SUFFIX)
        .filter(|stem| is_word_id(stem))
}

/// Classify an archive member by its path.
///
/// Only regular files are considered; `./` and empty segments are ignored.
#[must_use]
pub fn classify(path: &str, is_file: bool) -> EntryKind<'_> {
    if !is_file {
        return EntryKind::Irrelevant;
    }

    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    let Some((&file_name, parents)) = segments.split_last() else {
        return EntryKind::Irrelevant;
    };

    if let Some(word_id) = nested_word_id(file_name) {
        return EntryKind::NestedArchive { word_id };
    }

    match (parents.last(), FileKind::of(file_name)) {
        (Some(&word_id), Some(kind)) if is_word_id(word_id) => EntryKind::FlatMember {
            word_id,
            file_name,
            kind,
        },
        _ => EntryKind::Irrelevant,
    }
}

/// Base file name of a member path, or `None` for paths like `..` that have none.
#[must_use]
pub fn base_name(path: &Path) -> Option<&str> {
    match path.components().next_back()? {
        Component::Normal(name) => name.to_str(),
        _ => None,
    }
}
