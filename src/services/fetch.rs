//! Package downloads through an external command-line fetch tool.

use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// External downloader invoked as `<program> -L -o <file> <url>`.
#[derive(Debug, Clone)]
pub struct FetchTool {
    pub program: String,
}

impl Default for FetchTool {
    fn default() -> Self {
        Self {
            program: "curl".to_string(),
        }
    }
}

impl FetchTool {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Download `url` into `dest_dir`, returning the local file path.
    ///
    /// An existing file of the same name is reused without downloading.
    pub fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let file_name = file_name_from_url(url)?;
        fs::create_dir_all(dest_dir)?;
        let dest_path = dest_dir.join(file_name);

        if dest_path.exists() {
            log::info!(
                "{} already exists, skipping download",
                dest_path.display()
            );
            return Ok(dest_path);
        }

        log::info!("Downloading {url} to {}", dest_path.display());
        let status = Command::new(&self.program)
            .arg("-L")
            .arg("-o")
            .arg(&dest_path)
            .arg(url)
            .status()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::External(format!("{} is not installed or not found", self.program))
                } else {
                    Error::External(format!("failed to run {}: {e}", self.program))
                }
            })?;

        if !status.success() {
            let _ = fs::remove_file(&dest_path);
            return Err(Error::External(format!(
                "{} exited with {status} while downloading {url}",
                self.program
            )));
        }

        Ok(dest_path)
    }
}

/// Last path segment of a download URL.
pub fn file_name_from_url(url: &str) -> Result<&str> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("URL has no file name: {url}")))
}

/// Package file name without its `.tgz` / `.tar.gz` extension.
#[must_use]
pub fn package_stem(file_name: &str) -> &str {
    file_name
        .strip_suffix(".tgz")
        .or_else(|| file_name.strip_suffix(".tar.gz"))
        .unwrap_or(file_name)
}
