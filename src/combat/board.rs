//! Both sides of a battle and the rules for one round of it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Force, HitProfile};
use crate::core::{BattleRng, Result};

/// How a finished battle ended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Both sides were destroyed.
    Tie,
    /// The defenders were destroyed; carries the surviving attackers.
    AttackerWon(Force),
    /// The attackers were destroyed; carries the surviving defenders.
    DefenderWon(Force),
}

impl Outcome {
    #[must_use]
    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie)
    }

    #[must_use]
    pub fn is_attacker_win(&self) -> bool {
        matches!(self, Outcome::AttackerWon(_))
    }

    #[must_use]
    pub fn is_defender_win(&self) -> bool {
        matches!(self, Outcome::DefenderWon(_))
    }

    /// The winning side's survivors, if anyone won.
    #[must_use]
    pub fn survivors(&self) -> Option<&Force> {
        match self {
            Outcome::Tie => None,
            Outcome::AttackerWon(force) | Outcome::DefenderWon(force) => Some(force),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Tie => f.write_str("Tie"),
            Outcome::AttackerWon(force) => write!(f, "Attacker won with {force}"),
            Outcome::DefenderWon(force) => write!(f, "Defender won with {force}"),
        }
    }
}

/// Attackers and defenders at some point in a battle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    attackers: Force,
    defenders: Force,
}

impl Board {
    #[must_use]
    pub fn new(attackers: Force, defenders: Force) -> Self {
        Self {
            attackers,
            defenders,
        }
    }

    #[must_use]
    pub fn attackers(&self) -> &Force {
        &self.attackers
    }

    #[must_use]
    pub fn defenders(&self) -> &Force {
        &self.defenders
    }

    /// The battle's outcome, or `None` while both sides still have units.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.attackers.is_empty(), self.defenders.is_empty()) {
            (true, true) => Some(Outcome::Tie),
            (false, true) => Some(Outcome::AttackerWon(self.attackers.clone())),
            (true, false) => Some(Outcome::DefenderWon(self.defenders.clone())),
            (false, false) => None,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.attackers.is_empty() || self.defenders.is_empty()
    }

    /// Resolve simultaneous fire: each side absorbs the hits the other
    /// landed.
    pub fn exchange_fire(&self, attacker_hits: &HitProfile, defender_hits: &HitProfile) -> Result<Board> {
        Ok(Self {
            attackers: self.attackers.take_hits(defender_hits)?,
            defenders: self.defenders.take_hits(attacker_hits)?,
        })
    }

    /// The board once first-round-only units on both sides have left.
    #[must_use]
    pub fn without_first_round_only_units(&self) -> Board {
        Self {
            attackers: self.attackers.without_first_round_only_units(),
            defenders: self.defenders.without_first_round_only_units(),
        }
    }

    /// Play one round with real dice.
    ///
    /// Opening fire is rolled and resolved first, then regular fire. Within
    /// each sub-round both sides roll before either takes casualties, and
    /// everyone aims at the enemy force as it stood when the round began.
    /// A finished battle is returned unchanged.
    pub fn roll(&self, rng: &mut BattleRng) -> Result<Board> {
        if self.is_terminal() {
            return Ok(self.clone());
        }

        let attacker_opening = self.attackers.roll_hits(&self.defenders, true, rng);
        let defender_opening = self.defenders.roll_hits(&self.attackers, true, rng);
        let opened = self.exchange_fire(&attacker_opening, &defender_opening)?;

        let attacker_regular = opened.attackers.roll_hits(&self.defenders, false, rng);
        let defender_regular = opened.defenders.roll_hits(&self.attackers, false, rng);
        let fought = opened.exchange_fire(&attacker_regular, &defender_regular)?;

        Ok(fought.without_first_round_only_units())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.attackers, self.defenders)
    }
}
