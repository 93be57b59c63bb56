//! # battle-odds
//!
//! Exact outcome probabilities for round-based dice attrition battles.
//!
//! ## Design Principles
//!
//! 1. **Exact, not estimated**: every probability is an arbitrary-precision
//!    [`Rational`]. The Monte-Carlo runner exists for comparison, not as the
//!    answer.
//!
//! 2. **Values all the way down**: forces and boards are immutable values
//!    with structural equality and hashing, so they key the memo table
//!    directly and never go stale.
//!
//! 3. **Pluggable casualties**: which units die is a [`CasualtyPicker`]
//!    strategy, validated by the caller rather than trusted.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs` for the many
//!   intermediate forces a round produces.
//!
//! - **Self-loop exclusion**: round results that leave the board unchanged
//!   are dropped and the rest renormalized, which keeps the recursion finite
//!   while staying exact.
//!
//! ## Modules
//!
//! - `core`: Errors and the dice RNG
//! - `math`: Rationals, multisets, binomial probabilities
//! - `units`: The static unit table, domains and weapon developments
//! - `combat`: Hit distributions, forces, casualty pickers, boards
//! - `analysis`: The exact memoized analyzer
//! - `simulation`: Monte-Carlo battles for comparison
//!
//! ## Example
//!
//! ```
//! use battle_odds::{analyze, Board, Force, OutcomeSummary, Rational, UnitType};
//!
//! let board = Board::new(
//!     Force::attacking([(UnitType::Infantry, 1)]),
//!     Force::defending([(UnitType::Infantry, 1)]),
//! );
//!
//! let summary = OutcomeSummary::from_distribution(&analyze(&board).unwrap());
//! assert_eq!(summary.attacker_wins, Rational::new(1, 4));
//! assert_eq!(summary.defender_wins, Rational::new(5, 8));
//! assert_eq!(summary.ties, Rational::new(1, 8));
//! ```

pub mod analysis;
pub mod combat;
pub mod core;
pub mod math;
pub mod simulation;
pub mod units;

// Re-export commonly used types
pub use crate::core::{BattleError, BattleRng, MultisetError, Result};

pub use crate::math::{binomial, Multiset, Rational};

pub use crate::units::{Developments, Domain, UnitType, WeaponDevelopment};

pub use crate::combat::{
    Board, ByCombatPower, ByCost, Casualties, CasualtyPicker, CasualtyPolicy,
    Force, HitDistribution, HitProfile, Outcome,
};

pub use crate::analysis::{analyze, Analyzer, AnalyzerStats, OutcomeDistribution, OutcomeSummary};

pub use crate::simulation::{simulate, SimulationConfig, SimulationReport};
