//! Random "mini" packages cut from a full extracted package.

use crate::io::{index_csv, output};
use crate::{Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};

use super::index::INDEX_FILE;

/// Options for cutting a mini package
#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub count: usize,
    pub seed: u64,
    pub prefix: String,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            count: 600,
            seed: 42,
            prefix: "mini-".to_string(),
        }
    }
}

/// Result of cutting a mini package
#[derive(Debug)]
pub struct SampleReport {
    pub target: PathBuf,
    pub kept: Vec<String>,
}

/// Sibling directory that receives the sample: `scale-` is swapped for the prefix.
pub fn target_dir(package: &Path, prefix: &str) -> Result<PathBuf> {
    let name = package
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::InvalidInput(format!("Package has no name: {}", package.display()))
        })?;

    let target_name = if name.contains("scale-") {
        name.replace("scale-", prefix)
    } else {
        format!("{prefix}{name}")
    };

    if target_name == name {
        return Err(Error::InvalidInput(format!(
            "Sample target would overwrite the package itself: {}",
            package.display()
        )));
    }

    Ok(package.with_file_name(target_name))
}

/// Copy up to `opts.count` randomly chosen word folders listed in the package index.
pub fn create_sample(package: &Path, opts: &SampleOptions) -> Result<SampleReport> {
    let index_path = package.join(INDEX_FILE);
    if !index_path.is_file() {
        return Err(Error::InvalidInput(format!(
            "{} not found",
            index_path.display()
        )));
    }

    let target = target_dir(package, &opts.prefix)?;
    if target.exists() {
        log::info!("Removing existing {}", target.display());
        fs::remove_dir_all(&target)?;
    }
    fs::create_dir_all(&target)?;

    let (header, mut records) = index_csv::read_records(&index_path)?;
    let mut rng = StdRng::seed_from_u64(opts.seed);
    records.shuffle(&mut rng);

    let mut kept_records = Vec::new();
    let mut kept = Vec::new();
    for record in records {
        if kept.len() >= opts.count {
            break;
        }
        if record.len() < 2 {
            continue;
        }

        let word_id = record[0].to_string();
        let src_folder = package.join(&word_id);
        if !src_folder.is_dir() {
            log::debug!("Folder {} missing, skipping", src_folder.display());
            continue;
        }

        output::copy_dir_recursive(&src_folder, &target.join(&word_id))?;
        kept_records.push(record);
        kept.push(word_id);
    }

    index_csv::write_records(&target.join(INDEX_FILE), &header, &kept_records)?;
    log::info!("Created {} with {} items", target.display(), kept.len());

    Ok(SampleReport { target, kept })
}
