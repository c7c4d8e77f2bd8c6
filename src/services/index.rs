//! `index.csv` generation for an extracted dataset.

use crate::io::index_csv;
use crate::models::{ErrorItem, IndexRow};
use crate::{Error, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.csv";

/// Outcome of indexing one dataset directory.
#[derive(Debug)]
pub struct IndexReport {
    pub output: PathBuf,
    pub rows: Vec<IndexRow>,
    pub errors: Vec<ErrorItem>,
}

/// Collect `{id, word}` rows from every word folder holding a non-empty `word.txt`.
pub fn collect_rows(dataset: &Path) -> Result<(Vec<IndexRow>, Vec<ErrorItem>)> {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for entry in fs::read_dir(dataset)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let word_txt = path.join("word.txt");
        if !word_txt.is_file() {
            continue;
        }

        match fs::read_to_string(&word_txt) {
            Ok(text) => {
                let word = text.trim();
                if !word.is_empty() {
                    rows.push(IndexRow {
                        id: entry.file_name().to_string_lossy().into_owned(),
                        word: word.to_string(),
                    });
                }
            }
            Err(e) => {
                log::warn!("Error reading {}: {e}", word_txt.display());
                errors.push(ErrorItem {
                    path: word_txt.to_string_lossy().to_string(),
                    code: "IO".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    sort_rows(&mut rows);
    Ok((rows, errors))
}

/// Numeric id order when every id is numeric, plain string order otherwise.
pub fn sort_rows(rows: &mut [IndexRow]) {
    let all_numeric = rows
        .iter()
        .all(|row| !row.id.is_empty() && row.id.bytes().all(|b| b.is_ascii_digit()));

    if all_numeric {
        rows.sort_by(|a, b| compare_numeric(&a.id, &b.id));
    } else {
        rows.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

/// Compare digit strings by value without parsing into a fixed-width integer.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Index `dataset` and write the CSV, by default to `<dataset>/index.csv`.
pub fn generate_index(dataset: &Path, output: Option<&Path>) -> Result<IndexReport> {
    if !dataset.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Dataset path does not exist: {}",
            dataset.display()
        )));
    }

    let (rows, errors) = collect_rows(dataset)?;
    let output = output.map_or_else(|| dataset.join(INDEX_FILE), Path::to_path_buf);

    log::info!("Writing {} entries to {}", rows.len(), output.display());
    index_csv::write_index(&output, &rows)?;

    Ok(IndexReport {
        output,
        rows,
        errors,
    })
}
