//! Error types for battle resolution.
//!
//! Casualty errors are contract violations of a [`CasualtyPicker`]: they mean
//! the picker is broken, not that the battle configuration is invalid. They
//! propagate to the caller of `take_hits`, `roll` or `analyze` untouched.
//!
//! [`CasualtyPicker`]: crate::combat::CasualtyPicker

use thiserror::Error;

use crate::units::{Domain, UnitType};

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for battle resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// A picker claimed fewer casualties than the hits in a domain demand.
    ///
    /// `domain` is `None` for the general (any-domain) hits.
    #[error("Too few casualties for {}: picked {casualties} for {hits} hits", domain_label(.domain))]
    TooFewCasualties {
        /// Domain whose hits were under-claimed.
        domain: Option<Domain>,
        /// Casualties the picker claimed against these hits.
        casualties: u32,
        /// Hits that had to be absorbed.
        hits: u32,
    },

    /// A picker claimed more casualties of a type than the force holds.
    #[error("Too many casualties of {unit_type}: picked {casualties}, have {units}")]
    TooManyCasualties {
        /// Unit type that was over-claimed.
        unit_type: UnitType,
        /// Casualties claimed.
        casualties: u32,
        /// Units of this type available.
        units: u32,
    },

    /// No outcome of a round can change the board, so the battle never ends.
    #[error("Battle cannot progress: every round leaves the board unchanged")]
    Stalemate,
}

/// Errors from unsafe multiset removal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultisetError {
    /// More copies were removed than the multiset holds.
    #[error("Cannot remove {requested} copies, only {available} present")]
    Underflow {
        /// Copies requested for removal.
        requested: u32,
        /// Copies actually present.
        available: u32,
    },
}

fn domain_label(domain: &Option<Domain>) -> String {
    match domain {
        Some(domain) => domain.to_string(),
        None => "general hits".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BattleError::TooFewCasualties {
            domain: Some(Domain::Sea),
            casualties: 1,
            hits: 2,
        };
        assert_eq!(err.to_string(), "Too few casualties for Sea: picked 1 for 2 hits");

        let err = BattleError::TooFewCasualties {
            domain: None,
            casualties: 0,
            hits: 1,
        };
        assert_eq!(err.to_string(), "Too few casualties for general hits: picked 0 for 1 hits");

        let err = BattleError::TooManyCasualties {
            unit_type: UnitType::Tank,
            casualties: 3,
            units: 2,
        };
        assert_eq!(err.to_string(), "Too many casualties of Tank: picked 3, have 2");
    }

    #[test]
    fn test_multiset_error_message() {
        let err = MultisetError::Underflow {
            requested: 4,
            available: 1,
        };
        assert_eq!(err.to_string(), "Cannot remove 4 copies, only 1 present");
    }
}
