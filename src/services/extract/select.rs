//! The two top-k selection policies.
//!
//! When a full listing is available (an inner word archive or a word
//! directory), images are sorted by name and the first *k* kept. When the
//! listing is only seen as a forward stream (a flat package tree), images are
//! admitted in arrival order until each word's counter reaches *k*. The two
//! can pick different files for the same word when names are not already in
//! arrival order.
//!
//! Both policies draw on one [`AdmissionCounter`] per scan, so a word fed by
//! several sources (a word archive and a flat folder, or two word archives)
//! still ends up with at most *k* images. Images land under their base file
//! name, so a name already kept for a word is never admitted twice.

use crate::ImageLimit;
use std::collections::{HashMap, HashSet};

/// Sort `items` by `key` and keep those the counter still admits for `word_id`.
///
/// `name` gives the output file name of an item; items whose name is already
/// kept, or already picked earlier in this listing, are skipped before the
/// remaining budget is applied.
pub fn sort_and_pick<T, K, N>(
    mut items: Vec<T>,
    word_id: &str,
    counter: &AdmissionCounter,
    key: K,
    name: N,
) -> Vec<T>
where
    K: Fn(&T) -> &str,
    N: Fn(&T) -> &str,
{
    items.sort_by(|a, b| key(a).cmp(key(b)));

    let budget = counter.remaining(word_id);
    let mut seen = HashSet::new();
    let mut picked = Vec::new();
    for item in items {
        if picked.len() >= budget {
            break;
        }
        let file_name = name(&item);
        if counter.holds(word_id, file_name) || !seen.insert(file_name.to_string()) {
            continue;
        }
        picked.push(item);
    }
    picked
}

/// Per-word record of the image names kept so far.
#[derive(Debug)]
pub struct AdmissionCounter {
    limit: ImageLimit,
    kept: HashMap<String, HashSet<String>>,
}

impl AdmissionCounter {
    #[must_use]
    pub fn new(limit: ImageLimit) -> Self {
        Self {
            limit,
            kept: HashMap::new(),
        }
    }

    /// Whether the image `file_name` may still be kept for `word_id`.
    #[must_use]
    pub fn admits(&self, word_id: &str, file_name: &str) -> bool {
        !self.holds(word_id, file_name) && self.limit.admits(self.count(word_id))
    }

    /// Whether `file_name` is already kept for `word_id`.
    #[must_use]
    pub fn holds(&self, word_id: &str, file_name: &str) -> bool {
        self.kept
            .get(word_id)
            .is_some_and(|names| names.contains(file_name))
    }

    /// Count one retained image for `word_id`, returning the new total.
    pub fn record(&mut self, word_id: &str, file_name: &str) -> usize {
        let names = self.kept.entry(word_id.to_string()).or_default();
        names.insert(file_name.to_string());
        names.len()
    }

    #[must_use]
    pub fn count(&self, word_id: &str) -> usize {
        self.kept.get(word_id).map_or(0, HashSet::len)
    }

    /// Images `word_id` may still take.
    #[must_use]
    pub fn remaining(&self, word_id: &str) -> usize {
        self.limit.take().saturating_sub(self.count(word_id))
    }
}
