//! Unit types, domains and weapon developments.
//!
//! The unit table is static data: nothing here changes during a battle.
//! Per-battle state (how many units, how much health is left) lives in
//! [`crate::combat::Force`].

pub mod unit_type;

pub use unit_type::{Developments, Domain, UnitStats, UnitType, WeaponDevelopment};
