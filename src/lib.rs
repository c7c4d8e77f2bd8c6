//! MMID Dataset Preparation Library
//!
//! This library prepares image-vocabulary datasets from the Massively
//! Multilingual Image Dataset (MMID) packages: it streams very large
//! `.tar.gz` packages entry-by-entry, keeps at most *k* images per word
//! identifier, and produces the index and manifest files consumed by the
//! flashcard front end.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{ErrorItem, ProgressSnapshot, WordTally};
pub use services::extract::SourceKind;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::result;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    Archive(String),
    Format(String),
    External(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Archive(msg) => write!(f, "Archive error: {msg}"),
            Error::Format(msg) => write!(f, "Format error: {msg}"),
            Error::External(msg) => write!(f, "External tool error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Format(format!("CSV: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Format(format!("JSON: {err}"))
    }
}

pub type Result<T> = result::Result<T, Error>;

/// How many images to keep for each word identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageLimit {
    /// Keep at most this many images (always at least one).
    Limited(usize),
    /// Keep every image.
    #[default]
    Unlimited,
}

impl ImageLimit {
    /// Build a bounded limit, rejecting zero.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidInput(
                "image limit must be greater than zero".to_string(),
            ));
        }
        Ok(ImageLimit::Limited(k))
    }

    /// Whether a word that already holds `count` images may take another one.
    #[must_use]
    pub fn admits(self, count: usize) -> bool {
        match self {
            ImageLimit::Limited(k) => count < k,
            ImageLimit::Unlimited => true,
        }
    }

    /// Number of images to slice off a sorted listing.
    #[must_use]
    pub fn take(self) -> usize {
        match self {
            ImageLimit::Limited(k) => k,
            ImageLimit::Unlimited => usize::MAX,
        }
    }
}

impl fmt::Display for ImageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageLimit::Limited(k) => write!(f, "{k}"),
            ImageLimit::Unlimited => f.write_str("all"),
        }
    }
}

impl FromStr for ImageLimit {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ImageLimit::Unlimited);
        }
        let k: usize = s
            .parse()
            .map_err(|_| format!("invalid image limit '{s}'"))?;
        ImageLimit::new(k).map_err(|e| e.to_string())
    }
}

/// Callback receiving throttled progress snapshots during extraction.
pub type ProgressNotifier = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Options for an extraction run
#[derive(Clone)]
pub struct ExtractOptions {
    pub limit: ImageLimit,
    pub progress_interval: Duration,
    pub progress_entry_trigger: u64,
    pub progress_notifier: Option<ProgressNotifier>,
    /// Checked between archive entries; once set the scan stops early.
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            limit: ImageLimit::Unlimited,
            progress_interval: Duration::from_secs(2),
            progress_entry_trigger: 10_000,
            progress_notifier: None,
            cancel_flag: None,
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("limit", &self.limit)
            .field("progress_interval", &self.progress_interval)
            .field("progress_entry_trigger", &self.progress_entry_trigger)
            .field("progress_notifier", &self.progress_notifier.is_some())
            .field("cancel_flag", &self.cancel_flag.is_some())
            .finish()
    }
}

/// Summary result from an extraction run
#[derive(Debug)]
pub struct Summary {
    pub source: String,
    pub destination: String,
    pub kind: SourceKind,
    pub limit: ImageLimit,
    pub words: BTreeMap<String, WordTally>,
    pub errors: Vec<ErrorItem>,
    pub progress: Vec<ProgressSnapshot>,
    pub started_at: std::time::SystemTime,
    pub finished_at: std::time::SystemTime,
    pub cancelled: bool,
}

impl Summary {
    #[must_use]
    pub fn images_written(&self) -> u64 {
        self.words.values().map(|t| t.images).sum()
    }

    #[must_use]
    pub fn sidecars_written(&self) -> u64 {
        self.words.values().map(|t| t.sidecars).sum()
    }

    /// Words that ended up with fewer images than the limit asked for.
    #[must_use]
    pub fn short_words(&self) -> usize {
        match self.limit {
            ImageLimit::Limited(k) => self
                .words
                .values()
                .filter(|t| t.images < k as u64)
                .count(),
            ImageLimit::Unlimited => 0,
        }
    }
}

/// Extract at most `opts.limit` images per word from `source` into `dest`.
///
/// # Arguments
/// * `source` - A `.tar.gz` package, or a directory of word folders / word archives
/// * `dest` - Destination root; `<dest>/<word_id>/` is created per word
/// * `opts` - Extraction options
///
/// # Returns
/// A Summary with per-word tallies and every recoverable error encountered
pub fn extract_top_k<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest: Q,
    opts: &ExtractOptions,
) -> Result<Summary> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    let source_str = source.to_string_lossy().to_string();

    if !source.exists() {
        return Err(Error::InvalidInput(format!(
            "Source does not exist: {source_str}"
        )));
    }

    let started_at = std::time::SystemTime::now();

    std::fs::create_dir_all(dest)?;

    let mut context = services::extract::ExtractContext::new(opts.clone());
    let kind = services::extract::run(source, dest, &mut context)?;
    let outcome = context.finish();

    let finished_at = std::time::SystemTime::now();

    Ok(Summary {
        source: source_str,
        destination: dest.to_string_lossy().to_string(),
        kind,
        limit: opts.limit,
        words: outcome.words,
        errors: outcome.errors,
        progress: outcome.progress,
        started_at,
        finished_at,
        cancelled: outcome.cancelled,
    })
}
