//! Monte-Carlo runner configuration.

use serde::{Deserialize, Serialize};

/// Parameters for [`simulate`](super::simulate).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Battles to play out.
    pub trials: u32,

    /// Seed for the dice. Same seed, same report.
    pub seed: u64,

    /// Rounds after which a battle still undecided is recorded as
    /// unfinished.
    pub max_rounds: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: 42,
            max_rounds: 1_000,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with a custom number of trials.
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Create a new config with a custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom round limit.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}
