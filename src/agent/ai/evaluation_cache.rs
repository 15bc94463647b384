use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Static evaluations keyed by short key, shared by all trees of a search.
///
/// Entries are only ever added; a value, once stored, is never replaced.
/// The owner clears the whole table between full moves to bound memory.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    entries: RwLock<HashMap<String, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        let found = self.entries.read().get(key).copied();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores `value` unless another search got there first.
    pub fn insert(&self, key: &str, value: f64) {
        self.entries.write().entry(key.to_string()).or_insert(value);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
