//! Exact arithmetic: rationals, multisets and binomial probabilities.
//!
//! Nothing in here knows about battles. The combat layer builds its hit
//! distributions and hit-point pools on top of these types.

pub mod combinatorics;
pub mod multiset;
pub mod rational;

pub use combinatorics::{binomial, factorial, factorial_from};
pub use multiset::Multiset;
pub use rational::Rational;
