//! Analyzer counters for diagnostics and tests.

use serde::{Deserialize, Serialize};

/// Counters collected by an [`Analyzer`](super::Analyzer) since it was
/// created or last cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerStats {
    /// Boards answered straight from the memo table.
    pub cache_hits: u64,

    /// Boards that had to be computed.
    pub cache_misses: u64,

    /// Computed boards that were already decided.
    pub terminal_boards: u64,

    /// Round outcomes dropped because they left the board unchanged.
    pub self_loops_excluded: u64,
}

impl AnalyzerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Boards looked up, whether cached or not.
    #[must_use]
    pub fn lookups(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }

    /// Fraction of lookups served from the memo table.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.lookups() == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.lookups() as f64
        }
    }
}
