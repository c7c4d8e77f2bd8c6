//! Data models for extraction tallies, progress, and errors

use serde::{Deserialize, Serialize};

/// Files retained for one word identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTally {
    pub images: u64,
    pub sidecars: u64,
}

/// Represents a recoverable error encountered during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

/// One `index.csv` row: a word identifier and its vocabulary word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRow {
    pub id: String,
    pub word: String,
}

/// Point-in-time counters reported while a package is being scanned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub timestamp_ms: u64,
    pub processed_entries: u64,
    pub processed_words: u64,
    pub files_written: u64,
    pub bytes_written: u64,
    pub recent_entries_per_sec: Option<u64>,
    pub finished: bool,
}
