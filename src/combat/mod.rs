//! Battle mechanics: hit distributions, forces, casualties and rounds.
//!
//! ## Key Types
//!
//! - [`HitProfile`] / [`HitDistribution`]: hits landed in a sub-round, and
//!   their exact probabilities
//! - [`Force`]: one side's units and how it absorbs hits
//! - [`CasualtyPicker`]: strategy choosing which units die
//! - [`Board`] / [`Outcome`]: both sides together and how a battle ended

pub mod board;
pub mod casualty;
pub mod force;
pub mod hits;

pub use board::{Board, Outcome};
pub use casualty::{ByCombatPower, ByCost, Casualties, CasualtyPicker, CasualtyPolicy};
pub use force::{Force, Volley, Volleys};
pub use hits::{HitDistribution, HitProfile};
