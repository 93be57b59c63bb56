//! Sampled battles: play a board out with real dice, many times.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::SimulationConfig;
use crate::combat::{Board, Outcome};
use crate::core::{BattleRng, Result};

/// Tally of a Monte-Carlo run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Battles played.
    pub trials: u32,

    /// How often each exact outcome occurred.
    pub outcomes: FxHashMap<Outcome, u32>,

    /// Battles still undecided at the round limit.
    pub unfinished: u32,

    /// Rounds played across all trials.
    pub total_rounds: u64,
}

impl SimulationReport {
    /// Trials the attacker won.
    #[must_use]
    pub fn attacker_wins(&self) -> u32 {
        self.count_where(Outcome::is_attacker_win)
    }

    /// Trials the defender won.
    #[must_use]
    pub fn defender_wins(&self) -> u32 {
        self.count_where(Outcome::is_defender_win)
    }

    #[must_use]
    pub fn ties(&self) -> u32 {
        self.count_where(Outcome::is_tie)
    }

    #[must_use]
    pub fn attacker_win_rate(&self) -> f64 {
        self.rate(self.attacker_wins())
    }

    #[must_use]
    pub fn defender_win_rate(&self) -> f64 {
        self.rate(self.defender_wins())
    }

    #[must_use]
    pub fn tie_rate(&self) -> f64 {
        self.rate(self.ties())
    }

    /// Average rounds per trial.
    #[must_use]
    pub fn average_rounds(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_rounds as f64 / f64::from(self.trials)
        }
    }

    fn count_where(&self, predicate: impl Fn(&Outcome) -> bool) -> u32 {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| predicate(*outcome))
            .map(|(_, &count)| count)
            .sum()
    }

    fn rate(&self, count: u32) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(self.trials)
        }
    }
}

/// Play `board` out `config.trials` times.
///
/// Every trial rolls on its own fork of the seeded RNG.
///
/// # Errors
///
/// Propagates casualty-picker contract violations from [`Board::roll`].
pub fn simulate(board: &Board, config: &SimulationConfig) -> Result<SimulationReport> {
    let mut rng = BattleRng::new(config.seed);
    let mut report = SimulationReport {
        trials: config.trials,
        ..SimulationReport::default()
    };

    for _ in 0..config.trials {
        let mut trial_rng = rng.fork();
        let mut current = board.clone();
        let mut rounds = 0;
        while !current.is_terminal() && rounds < config.max_rounds {
            current = current.roll(&mut trial_rng)?;
            rounds += 1;
        }
        report.total_rounds += u64::from(rounds);

        match current.outcome() {
            Some(outcome) => *report.outcomes.entry(outcome).or_insert(0) += 1,
            None => report.unfinished += 1,
        }
    }

    debug!(
        trials = report.trials,
        attacker_wins = report.attacker_wins(),
        defender_wins = report.defender_wins(),
        ties = report.ties(),
        unfinished = report.unfinished,
        "Simulation finished"
    );
    Ok(report)
}
