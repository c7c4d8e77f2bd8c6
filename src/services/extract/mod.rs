//! Top-k extraction dispatcher and shared scan state.
//!
//! A source is either a (possibly huge) tar package, scanned once front to
//! back by [`stream`], or an already extracted directory, handled by
//! [`directory`]. Both paths share the same guarantees:
//!
//! - No word directory ever receives more images than the configured limit.
//! - Sidecar files (`word.txt`, `metadata.json`, `errors.json`) are always kept.
//! - A failure confined to one word or one file is recorded and skipped.
//! - Progress counters are monotonic.

pub mod classify;
pub mod directory;
pub mod nested;
pub mod progress;
pub mod select;
pub mod stream;

use crate::models::{ErrorItem, ProgressSnapshot, WordTally};
use crate::{ExtractOptions, Result};
use classify::FileKind;
use progress::{ProgressCounters, ProgressThrottler};
use select::AdmissionCounter;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

/// Layout of an extraction source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    Directory,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Archive => "archive",
            SourceKind::Directory => "directory",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final state handed back once a scan completes.
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    pub words: BTreeMap<String, WordTally>,
    pub errors: Vec<ErrorItem>,
    pub progress: Vec<ProgressSnapshot>,
    pub cancelled: bool,
}

/// Extraction context tracking tallies, errors, and progress during a scan
pub struct ExtractContext {
    pub options: ExtractOptions,
    words: BTreeMap<String, WordTally>,
    admission: AdmissionCounter,
    errors: Vec<ErrorItem>,
    processed_entries: u64,
    files_written: u64,
    bytes_written: u64,
    progress_events: Vec<ProgressSnapshot>,
    throttler: ProgressThrottler,
    start_instant: Instant,
    cancelled: bool,
}

impl ExtractContext {
    #[must_use]
    pub fn new(options: ExtractOptions) -> Self {
        let throttler = ProgressThrottler::with_interval_and_trigger(
            options.progress_interval,
            options.progress_entry_trigger,
        );
        let admission = AdmissionCounter::new(options.limit);
        Self {
            options,
            words: BTreeMap::new(),
            admission,
            errors: Vec::new(),
            processed_entries: 0,
            files_written: 0,
            bytes_written: 0,
            progress_events: Vec::new(),
            throttler,
            start_instant: Instant::now(),
            cancelled: false,
        }
    }

    /// Register a word even if nothing ends up written for it.
    pub fn touch_word(&mut self, word_id: &str) {
        if !self.words.contains_key(word_id) {
            self.words.insert(word_id.to_string(), WordTally::default());
        }
    }

    /// Per-word image bookkeeping shared by every source of a word.
    #[must_use]
    pub fn admission(&self) -> &AdmissionCounter {
        &self.admission
    }

    /// Whether the image `file_name` may still be written for `word_id`.
    #[must_use]
    pub fn admits_image(&self, word_id: &str, file_name: &str) -> bool {
        self.admission.admits(word_id, file_name)
    }

    /// Account for one retained file.
    pub fn record_write(&mut self, word_id: &str, file_name: &str, kind: FileKind, bytes: u64) {
        self.touch_word(word_id);
        if kind == FileKind::Image {
            self.admission.record(word_id, file_name);
        }
        if let Some(tally) = self.words.get_mut(word_id) {
            match kind {
                FileKind::Image => tally.images += 1,
                FileKind::Sidecar => tally.sidecars += 1,
            }
        }
        self.files_written += 1;
        self.bytes_written += bytes;
    }

    #[must_use]
    pub fn tally(&self, word_id: &str) -> Option<WordTally> {
        self.words.get(word_id).copied()
    }

    /// Record an I/O failure confined to one file or word.
    pub fn record_io_error(&mut self, path: &Path, error: &std::io::Error) {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };
        self.push_error(path, code, error.to_string());
    }

    /// Record a word archive that could not be opened or parsed.
    pub fn record_archive_error(&mut self, path: &Path, message: String) {
        self.push_error(path, "ARCHIVE", message);
    }

    fn push_error(&mut self, path: &Path, code: &str, message: String) {
        log::warn!("Skipping {}: {message}", path.display());
        self.errors.push(ErrorItem {
            path: path.to_string_lossy().to_string(),
            code: code.to_string(),
            message,
        });
    }

    /// Count one visited source entry and maybe report progress.
    pub fn note_entry(&mut self) {
        self.processed_entries += 1;
        let counters = self.counters();
        let timestamp_ms = self.elapsed_ms();
        if let Some(snapshot) = self
            .throttler
            .consider(Instant::now(), counters, timestamp_ms)
        {
            self.emit(snapshot);
        }
    }

    /// True once the caller's cancel flag is raised; latches `cancelled`.
    pub fn cancel_requested(&mut self) -> bool {
        let raised = self
            .options
            .cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        if raised && !self.cancelled {
            log::info!(
                "Cancellation requested after {} entries",
                self.processed_entries
            );
            self.cancelled = true;
        }
        raised
    }

    /// Emit the final progress snapshot and hand back the collected state.
    pub fn finish(mut self) -> ExtractOutcome {
        let counters = self.counters();
        let timestamp_ms = self.elapsed_ms();
        let snapshot = self
            .throttler
            .force_emit(Instant::now(), counters, timestamp_ms);
        self.emit(snapshot);

        ExtractOutcome {
            words: self.words,
            errors: self.errors,
            progress: self.progress_events,
            cancelled: self.cancelled,
        }
    }

    fn emit(&mut self, snapshot: ProgressSnapshot) {
        if let Some(notifier) = self.options.progress_notifier.as_ref() {
            notifier(&snapshot);
        }
        self.progress_events.push(snapshot);
    }

    fn counters(&self) -> ProgressCounters {
        ProgressCounters {
            processed_entries: self.processed_entries,
            processed_words: self.words.len() as u64,
            files_written: self.files_written,
            bytes_written: self.bytes_written,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start_instant.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Extract from `source` into `dest`, choosing the path by source layout.
pub fn run(source: &Path, dest: &Path, context: &mut ExtractContext) -> Result<SourceKind> {
    if source.is_dir() {
        log::info!("Processing directory: {}", source.display());
        directory::copy_directory(source, dest, context)?;
        Ok(SourceKind::Directory)
    } else {
        log::info!("Processing archive: {}", source.display());
        stream::scan_archive(source, dest, context)?;
        Ok(SourceKind::Archive)
    }
}
