//! Core plumbing shared by every layer: errors and dice.

pub mod error;
pub mod rng;

pub use error::{BattleError, MultisetError, Result};
pub use rng::{BattleRng, DIE_FACES};
