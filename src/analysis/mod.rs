//! Exact outcome analysis.
//!
//! [`Analyzer`] turns a [`Board`](crate::combat::Board) into the exact
//! probability of every way the battle can end. [`OutcomeSummary`] folds
//! that down to attacker/defender/tie totals.

pub mod analyzer;
pub mod stats;
pub mod summary;

pub use analyzer::{analyze, Analyzer, OutcomeDistribution};
pub use stats::AnalyzerStats;
pub use summary::OutcomeSummary;
