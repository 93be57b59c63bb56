//! Casualty selection: which units die when hits must be absorbed.
//!
//! A [`CasualtyPicker`] only decides *how many of each type* are lost. The
//! caller ([`Force::take_hits_with`]) applies the damage phase before asking
//! and validates the answer afterwards, so a picker that claims too few or
//! too many casualties surfaces as a [`BattleError`].
//!
//! The stock strategies are greedy: unit types are ranked by a comparator,
//! and hits are handed out to the lowest-ranked types first, domain hits
//! before general hits.
//!
//! [`Force::take_hits_with`]: crate::combat::Force::take_hits_with
//! [`BattleError`]: crate::core::BattleError

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Force, HitProfile};
use crate::units::{Domain, UnitType};

/// Casualty counts per unit type.
pub type Casualties = FxHashMap<UnitType, u32>;

/// Strategy choosing which units absorb unavoidable losses.
///
/// Implementations must be deterministic. They receive the force after the
/// damage phase and the hits still left to absorb.
pub trait CasualtyPicker {
    /// Casualties to take from `force` for `hits`.
    fn pick(&self, force: &Force, hits: &HitProfile, is_attacking: bool) -> Casualties;
}

/// Lose the cheapest units first, weakest first among equal costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByCost {
    /// Hold back one unit able to take territory while other losses suffice.
    pub keep_invading_unit: bool,
}

impl CasualtyPicker for ByCost {
    fn pick(&self, force: &Force, hits: &HitProfile, is_attacking: bool) -> Casualties {
        greedy_pick(force, hits, self.keep_invading_unit, |a, b| {
            a.cost()
                .cmp(&b.cost())
                .then_with(|| power(force, *a, is_attacking).cmp(&power(force, *b, is_attacking)))
                .then_with(|| a.cmp(b))
        })
    }
}

/// Lose the weakest units first, cheapest first among equal strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByCombatPower {
    /// Hold back one unit able to take territory while other losses suffice.
    pub keep_invading_unit: bool,
}

impl CasualtyPicker for ByCombatPower {
    fn pick(&self, force: &Force, hits: &HitProfile, is_attacking: bool) -> Casualties {
        greedy_pick(force, hits, self.keep_invading_unit, |a, b| {
            power(force, *a, is_attacking)
                .cmp(&power(force, *b, is_attacking))
                .then_with(|| a.cost().cmp(&b.cost()))
                .then_with(|| a.cmp(b))
        })
    }
}

/// Serializable choice of stock picker, carried by every [`Force`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasualtyPolicy {
    ByCost(ByCost),
    ByCombatPower(ByCombatPower),
}

impl CasualtyPolicy {
    /// Cheapest-first, optionally holding back an invader.
    #[must_use]
    pub fn by_cost(keep_invading_unit: bool) -> Self {
        CasualtyPolicy::ByCost(ByCost { keep_invading_unit })
    }

    /// Weakest-first, optionally holding back an invader.
    #[must_use]
    pub fn by_combat_power(keep_invading_unit: bool) -> Self {
        CasualtyPolicy::ByCombatPower(ByCombatPower { keep_invading_unit })
    }

    #[must_use]
    pub fn keeps_invading_unit(&self) -> bool {
        match self {
            CasualtyPolicy::ByCost(picker) => picker.keep_invading_unit,
            CasualtyPolicy::ByCombatPower(picker) => picker.keep_invading_unit,
        }
    }
}

impl Default for CasualtyPolicy {
    fn default() -> Self {
        CasualtyPolicy::by_cost(false)
    }
}

impl CasualtyPicker for CasualtyPolicy {
    fn pick(&self, force: &Force, hits: &HitProfile, is_attacking: bool) -> Casualties {
        match self {
            CasualtyPolicy::ByCost(picker) => picker.pick(force, hits, is_attacking),
            CasualtyPolicy::ByCombatPower(picker) => picker.pick(force, hits, is_attacking),
        }
    }
}

fn power(force: &Force, unit_type: UnitType, is_attacking: bool) -> u32 {
    unit_type.combat_power(is_attacking, force.developments())
}

/// Shared greedy walk over the ranked unit types.
fn greedy_pick(
    force: &Force,
    hits: &HitProfile,
    keep_invading_unit: bool,
    compare: impl Fn(&UnitType, &UnitType) -> Ordering,
) -> Casualties {
    let mut ranked: SmallVec<[UnitType; 16]> = force
        .unit_types()
        .filter(|unit_type| !unit_type.is_first_round_only())
        .collect();
    ranked.sort_by(|a, b| compare(a, b));

    let mut remaining: FxHashMap<UnitType, u32> =
        ranked.iter().map(|&unit_type| (unit_type, force.count(unit_type))).collect();
    let mut casualties = Casualties::default();

    let mut claim = |unit_type: UnitType, hits: &mut u32, remaining: &mut FxHashMap<UnitType, u32>| {
        let available = remaining.entry(unit_type).or_insert(0);
        let taken = (*hits).min(*available);
        if taken > 0 {
            *available -= taken;
            *hits -= taken;
            *casualties.entry(unit_type).or_insert(0) += taken;
        }
    };

    for domain in Domain::ALL {
        let mut domain_hits = hits.domain_hits(domain);
        for &unit_type in ranked.iter().filter(|unit_type| unit_type.domain() == domain) {
            if domain_hits == 0 {
                break;
            }
            claim(unit_type, &mut domain_hits, &mut remaining);
        }
    }

    let mut general_hits = hits.general_hits();
    if general_hits == 0 {
        return casualties;
    }

    let reserved = if keep_invading_unit {
        ranked
            .iter()
            .rev()
            .copied()
            .find(|unit_type| unit_type.can_invade() && remaining.get(unit_type).copied().unwrap_or(0) > 0)
    } else {
        None
    };
    if let Some(unit_type) = reserved {
        if let Some(available) = remaining.get_mut(&unit_type) {
            *available -= 1;
        }
    }

    for &unit_type in &ranked {
        if general_hits == 0 {
            break;
        }
        claim(unit_type, &mut general_hits, &mut remaining);
    }

    // Holding the invader back must never leave hits unabsorbed.
    if let Some(unit_type) = reserved {
        if general_hits > 0 {
            remaining.insert(unit_type, 1);
            claim(unit_type, &mut general_hits, &mut remaining);
        }
    }

    casualties
}
