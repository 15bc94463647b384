//! State shared by every tree of one thinking episode.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::evaluation_cache::EvaluationCache;
use crate::config::SearchLimits;

/// Cooperative stop signal. Clones share the flag.
///
/// A token with a deadline trips itself the first time it is polled after the
/// deadline has passed.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(budget: Duration) -> Self {
        Self { flag: Arc::default(), deadline: Some(Instant::now() + budget) }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Counters aggregated over all trees of one episode.
#[derive(Debug, Default)]
pub struct SearchStats {
    nodes: AtomicU64,
    pruned: AtomicU64,
    leaves: AtomicU64,
}

impl SearchStats {
    pub(crate) fn node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn prune(&self) {
        self.pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn leaf(&self) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    pub fn pruned(&self) -> u64 {
        self.pruned.load(Ordering::Relaxed)
    }

    pub fn leaves(&self) -> u64 {
        self.leaves.load(Ordering::Relaxed)
    }
}

/// Everything a search tree needs besides its own root position.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub cache: Arc<EvaluationCache>,
    pub cancel: CancellationToken,
    pub limits: SearchLimits,
    pub stats: Arc<SearchStats>,
}

impl SearchContext {
    /// Fresh context whose token carries the think time of `limits`, if any.
    pub fn new(cache: Arc<EvaluationCache>, limits: SearchLimits) -> Self {
        let cancel = match limits.think_time {
            Some(budget) => CancellationToken::with_deadline(budget),
            None => CancellationToken::new(),
        };
        Self::with_cancel(cache, limits, cancel)
    }

    pub fn with_cancel(cache: Arc<EvaluationCache>, limits: SearchLimits, cancel: CancellationToken) -> Self {
        Self { cache, cancel, limits, stats: Arc::default() }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_cancellation() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_expired_deadline_cancels() {
        let token = CancellationToken::with_deadline(Duration::ZERO);
        assert!(token.is_cancelled());
        let long = CancellationToken::with_deadline(Duration::from_secs(3600));
        assert!(!long.is_cancelled());
    }
}
