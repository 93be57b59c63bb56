//! Exact, memoized battle analysis.
//!
//! The probability of each outcome from a board is the probability-weighted
//! sum of the outcomes of every board one round can lead to. Some round
//! results leave the board exactly as it was (everybody misses, or the only
//! hits land on a domain with nothing in it). Those branches would recurse
//! into the same board forever, so they are dropped and the remaining
//! branches renormalized: conditioning on "something happened" gives the
//! same answer as summing the geometric series of repeated misses.
//!
//! Every other branch strictly reduces total hit points or strips
//! first-round-only units, so the recursion always terminates.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use super::AnalyzerStats;
use crate::combat::{Board, Outcome};
use crate::core::{BattleError, Result};
use crate::math::Rational;

/// Exact probability of every reachable outcome. Values sum to one.
pub type OutcomeDistribution = FxHashMap<Outcome, Rational>;

/// Exact analyzer with a memo table owned by the caller.
///
/// Boards are immutable values, so a cached entry never goes stale. Keep
/// one analyzer around to share work across related boards, or
/// [`clear`](Analyzer::clear) it to bound memory.
///
/// ## Usage
///
/// ```
/// use battle_odds::analysis::{Analyzer, OutcomeSummary};
/// use battle_odds::combat::{Board, Force};
/// use battle_odds::math::Rational;
/// use battle_odds::units::UnitType;
///
/// let board = Board::new(
///     Force::attacking([(UnitType::Tank, 1)]),
///     Force::defending([(UnitType::Tank, 1)]),
/// );
///
/// let mut analyzer = Analyzer::new();
/// let distribution = analyzer.analyze(&board).unwrap();
/// let summary = OutcomeSummary::from_distribution(&distribution);
///
/// assert_eq!(summary.attacker_wins, Rational::new(1, 3));
/// assert_eq!(summary.ties, Rational::new(1, 3));
/// ```
#[derive(Debug, Default)]
pub struct Analyzer {
    cache: FxHashMap<Board, Arc<OutcomeDistribution>>,
    stats: AnalyzerStats,
}

impl Analyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact outcome distribution of the battle starting at `board`.
    ///
    /// # Errors
    ///
    /// Propagates casualty-picker contract violations, and returns
    /// [`BattleError::Stalemate`] if no round from some reachable board can
    /// ever change it.
    pub fn analyze(&mut self, board: &Board) -> Result<OutcomeDistribution> {
        debug!(board = %board, cached_boards = self.cache.len(), "Starting analysis");
        let distribution = self.analyze_board(board)?;
        debug!(
            outcomes = distribution.len(),
            cache_hits = self.stats.cache_hits,
            cache_misses = self.stats.cache_misses,
            self_loops = self.stats.self_loops_excluded,
            "Analysis finished"
        );
        Ok(distribution.as_ref().clone())
    }

    /// Counters since creation or the last [`clear`](Analyzer::clear).
    #[must_use]
    pub fn stats(&self) -> &AnalyzerStats {
        &self.stats
    }

    /// Number of memoized boards.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every memoized board and reset the counters.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stats.reset();
    }

    fn analyze_board(&mut self, board: &Board) -> Result<Arc<OutcomeDistribution>> {
        if let Some(cached) = self.cache.get(board) {
            self.stats.cache_hits += 1;
            return Ok(Arc::clone(cached));
        }
        self.stats.cache_misses += 1;

        let distribution = match board.outcome() {
            Some(outcome) => {
                self.stats.terminal_boards += 1;
                let mut distribution = OutcomeDistribution::default();
                distribution.insert(outcome, Rational::one());
                distribution
            }
            None => {
                trace!(board = %board, "Expanding board");
                self.expand(board)?
            }
        };

        let distribution = Arc::new(distribution);
        self.cache.insert(board.clone(), Arc::clone(&distribution));
        Ok(distribution)
    }

    /// Weighted sum over every way one round can change `board`,
    /// renormalized to drop the rounds that change nothing.
    fn expand(&mut self, board: &Board) -> Result<OutcomeDistribution> {
        let attackers = board.attackers();
        let defenders = board.defenders();

        let attacker_opening = attackers.hit_distribution(defenders, true);
        let defender_opening = defenders.hit_distribution(attackers, true);

        let mut accumulated = OutcomeDistribution::default();
        for (attacker_hits, attacker_p) in attacker_opening.iter() {
            for (defender_hits, defender_p) in defender_opening.iter() {
                let opening_weight = attacker_p * defender_p;
                let opened = board.exchange_fire(attacker_hits, defender_hits)?;

                let attacker_regular = opened.attackers().hit_distribution(defenders, false);
                let defender_regular = opened.defenders().hit_distribution(attackers, false);

                for (attacker_hits, attacker_p) in attacker_regular.iter() {
                    for (defender_hits, defender_p) in defender_regular.iter() {
                        let next = opened
                            .exchange_fire(attacker_hits, defender_hits)?
                            .without_first_round_only_units();
                        if next == *board {
                            self.stats.self_loops_excluded += 1;
                            continue;
                        }

                        let weight = &opening_weight * &(attacker_p * defender_p);
                        let sub_distribution = self.analyze_board(&next)?;
                        for (outcome, probability) in sub_distribution.iter() {
                            *accumulated.entry(outcome.clone()).or_default() += &weight * probability;
                        }
                    }
                }
            }
        }

        // Unreachable with the stock unit table: every unit that outlasts
        // the first round can hit something that can hit it back.
        let total: Rational = accumulated.values().sum();
        if total.is_zero() {
            warn!(board = %board, "No round can change the board");
            return Err(BattleError::Stalemate);
        }
        if !total.is_one() {
            for probability in accumulated.values_mut() {
                *probability = &*probability / &total;
            }
        }
        Ok(accumulated)
    }
}

/// Analyze `board` with a fresh, throwaway memo table.
pub fn analyze(board: &Board) -> Result<OutcomeDistribution> {
    Analyzer::new().analyze(board)
}
