//! Word-id to word mapping (`words.json`) built from a language dictionary.
//!
//! MMID dictionaries are TSV files with the word in the first column and its
//! identifier in the second.

use super::catalog::{Catalog, PackageKind};
use super::fetch::FetchTool;
use crate::Result;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WORDS_JSON: &str = "words.json";

/// Language named by a package file such as `scale-spanish-package.tgz`.
#[must_use]
pub fn language_from_package(file_name: &str) -> Option<&str> {
    let end = file_name.rfind("-package.tgz")?;
    let head = &file_name[..end];

    head.char_indices().find_map(|(idx, _)| {
        let rest = &head[idx..];
        rest.strip_prefix("scale-")
            .or_else(|| rest.strip_prefix("mini-"))
            .filter(|language| !language.is_empty())
    })
}

/// Parse dictionary lines into `id -> word`; later lines win on duplicate ids.
pub fn parse_dictionary<R: BufRead>(reader: R) -> std::io::Result<BTreeMap<String, String>> {
    let mut words = BTreeMap::new();
    for line in reader.lines() {
        let line = line?;
        let mut columns = line.trim().split('\t');
        if let (Some(word), Some(word_id)) = (columns.next(), columns.next()) {
            words.insert(word_id.to_string(), word.to_string());
        }
    }
    Ok(words)
}

/// Write the mapping as pretty-printed JSON.
pub fn write_words_json(words: &BTreeMap<String, String>, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, words)?;
    writer.flush()?;
    Ok(())
}

/// Make sure `dest/words.json` exists for the language of `package`.
///
/// Downloads the dictionary listed in `catalog` when needed. Returns `None`
/// when the package name carries no language or the catalog has no
/// dictionary for it.
pub fn prepare_word_map(
    package: &Path,
    dest: &Path,
    catalog: &Catalog,
    fetcher: &FetchTool,
) -> Result<Option<PathBuf>> {
    let Some(file_name) = package.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    let Some(language) = language_from_package(file_name) else {
        return Ok(None);
    };
    let Some(url) = catalog
        .get(language)
        .and_then(|links| links.get(PackageKind::Dictionary))
    else {
        log::warn!("No dictionary link found for language '{language}'");
        return Ok(None);
    };

    fs::create_dir_all(dest)?;
    let json_path = dest.join(WORDS_JSON);
    if json_path.exists() {
        return Ok(Some(json_path));
    }

    let dictionary_path = fetcher.download(url, dest)?;
    let words = parse_dictionary(BufReader::new(File::open(&dictionary_path)?))?;
    write_words_json(&words, &json_path)?;
    log::info!(
        "Created {} with {} entries",
        json_path.display(),
        words.len()
    );

    Ok(Some(json_path))
}
