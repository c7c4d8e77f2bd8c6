//! Progress reporting primitives for archive scans.

use crate::models::ProgressSnapshot;
use std::time::{Duration, Instant};

const ENTRY_TRIGGER: u64 = 10_000;
const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Counters sampled by the throttler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressCounters {
    pub processed_entries: u64,
    pub processed_words: u64,
    pub files_written: u64,
    pub bytes_written: u64,
}

/// Time/entry-based throttler governing progress event emission.
#[derive(Debug)]
pub struct ProgressThrottler {
    interval: Duration,
    entry_trigger: u64,
    last_emit: Option<Instant>,
    last_emit_entries: u64,
}

impl Default for ProgressThrottler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressThrottler {
    /// Construct a throttler using the default interval of two seconds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval_and_trigger(Duration::from_secs(2), ENTRY_TRIGGER)
    }

    /// Construct a throttler with the supplied minimum interval and entry trigger.
    #[must_use]
    pub fn with_interval_and_trigger(interval: Duration, entry_trigger: u64) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            entry_trigger: entry_trigger.max(1),
            last_emit: None,
            last_emit_entries: 0,
        }
    }

    /// Consider emitting a snapshot using the current scan counters.
    pub fn consider(
        &mut self,
        now: Instant,
        counters: ProgressCounters,
        timestamp_ms: u64,
    ) -> Option<ProgressSnapshot> {
        let Some(last_emit) = self.last_emit else {
            self.last_emit = Some(now);
            self.last_emit_entries = counters.processed_entries;
            return None;
        };

        let elapsed = now.saturating_duration_since(last_emit);
        let entries_delta = counters
            .processed_entries
            .saturating_sub(self.last_emit_entries);

        if elapsed >= self.interval || entries_delta >= self.entry_trigger {
            self.last_emit = Some(now);
            self.last_emit_entries = counters.processed_entries;

            return Some(snapshot(
                counters,
                timestamp_ms,
                compute_rate(entries_delta, elapsed),
                false,
            ));
        }

        None
    }

    /// Emit a final snapshot regardless of thresholds.
    pub fn force_emit(
        &mut self,
        now: Instant,
        counters: ProgressCounters,
        timestamp_ms: u64,
    ) -> ProgressSnapshot {
        let rate = self.last_emit.and_then(|last_emit| {
            let elapsed = now.saturating_duration_since(last_emit);
            let delta = counters
                .processed_entries
                .saturating_sub(self.last_emit_entries);
            compute_rate(delta, elapsed)
        });

        self.last_emit = Some(now);
        self.last_emit_entries = counters.processed_entries;

        snapshot(counters, timestamp_ms, rate, true)
    }
}

fn snapshot(
    counters: ProgressCounters,
    timestamp_ms: u64,
    rate: Option<u64>,
    finished: bool,
) -> ProgressSnapshot {
    ProgressSnapshot {
        timestamp_ms,
        processed_entries: counters.processed_entries,
        processed_words: counters.processed_words,
        files_written: counters.files_written,
        bytes_written: counters.bytes_written,
        recent_entries_per_sec: rate,
        finished,
    }
}

fn compute_rate(delta: u64, elapsed: Duration) -> Option<u64> {
    let nanos = elapsed.as_nanos();
    if nanos == 0 {
        return None;
    }

    let numerator = u128::from(delta) * 1_000_000_000u128;
    let rate = numerator / nanos;
    u64::try_from(rate.min(u128::from(u64::MAX))).ok()
}
