//! One side of a battle.
//!
//! A [`Force`] is an immutable value: unit counts with per-unit remaining
//! hit points, the side's role, its casualty policy and its weapon
//! developments. Receiving hits produces a new force. Because forces are
//! plain values with structural equality and hashing, they can key the
//! analyzer's memo table directly.
//!
//! ## Taking hits
//!
//! [`Force::take_hits_with`] resolves a [`HitProfile`] in two phases:
//!
//! 1. **Damage**: units with more than one hit point soak hits by losing
//!    health (never below 1), domain hits first, then general hits.
//! 2. **Casualties**: whatever is left goes to the casualty picker, whose
//!    answer is validated before units are removed.
//!
//! A force that cannot possibly survive the hits is wiped out directly.

use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::casualty::{Casualties, CasualtyPicker, CasualtyPolicy};
use super::hits::{HitDistribution, HitProfile};
use crate::core::{BattleError, BattleRng, Result, DIE_FACES};
use crate::math::{Multiset, Rational};
use crate::units::{Developments, Domain, UnitType, WeaponDevelopment};

/// A group of identical dice fired by one unit type in one sub-round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Volley {
    pub unit_type: UnitType,
    pub dice: u32,
    /// Highest face that counts as a hit.
    pub power: u32,
    /// Domain the hits are restricted to, if any.
    pub target: Option<Domain>,
}

impl Volley {
    /// Chance that one die of this volley hits.
    #[must_use]
    pub fn hit_probability(&self) -> Rational {
        Rational::new(i64::from(self.power.min(DIE_FACES)), i64::from(DIE_FACES))
    }
}

/// Volleys fired by one side in one sub-round.
pub type Volleys = SmallVec<[Volley; 8]>;

/// One side's units, role, casualty policy and developments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Force {
    /// Remaining hit points of every unit, grouped by type. Never holds an
    /// empty multiset.
    units: OrdMap<UnitType, Multiset<u32>>,
    is_attacking: bool,
    policy: CasualtyPolicy,
    developments: Developments,
}

impl Force {
    /// Build a force with every unit at full health.
    ///
    /// Zero counts are ignored and repeated types are summed.
    pub fn from_counts(
        counts: impl IntoIterator<Item = (UnitType, u32)>,
        is_attacking: bool,
        policy: CasualtyPolicy,
        developments: Developments,
    ) -> Self {
        let mut units: OrdMap<UnitType, Multiset<u32>> = OrdMap::new();
        for (unit_type, count) in counts {
            if count == 0 {
                continue;
            }
            let pool = units.get(&unit_type).cloned().unwrap_or_default();
            units.insert(unit_type, pool.plus(unit_type.max_hit_points(), count));
        }
        Self {
            units,
            is_attacking,
            policy,
            developments,
        }
    }

    /// Attacking force with the default policy and no developments.
    pub fn attacking(counts: impl IntoIterator<Item = (UnitType, u32)>) -> Self {
        Self::from_counts(counts, true, CasualtyPolicy::default(), Developments::new())
    }

    /// Defending force with the default policy and no developments.
    pub fn defending(counts: impl IntoIterator<Item = (UnitType, u32)>) -> Self {
        Self::from_counts(counts, false, CasualtyPolicy::default(), Developments::new())
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CasualtyPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_developments(mut self, developments: Developments) -> Self {
        self.developments = developments;
        self
    }

    #[must_use]
    pub fn with_development(mut self, development: WeaponDevelopment) -> Self {
        self.developments.insert(development);
        self
    }

    /// Replace the hit points of every unit of `unit_type`.
    ///
    /// Zero entries are dropped; an empty pool removes the type.
    #[must_use]
    pub fn with_hit_points(&self, unit_type: UnitType, hit_points: Multiset<u32>) -> Self {
        let hit_points = hit_points.saturating_minus(&0, u32::MAX);
        let mut result = self.clone();
        if hit_points.is_empty() {
            result.units.remove(&unit_type);
        } else {
            result.units.insert(unit_type, hit_points);
        }
        result
    }

    /// Same role, policy and developments, but no units.
    #[must_use]
    pub fn emptied(&self) -> Self {
        Self {
            units: OrdMap::new(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    #[must_use]
    pub fn policy(&self) -> CasualtyPolicy {
        self.policy
    }

    #[must_use]
    pub fn developments(&self) -> &Developments {
        &self.developments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether at least one unit of `unit_type` is present.
    #[must_use]
    pub fn contains(&self, unit_type: UnitType) -> bool {
        self.units.contains_key(&unit_type)
    }

    /// Number of units of `unit_type`.
    #[must_use]
    pub fn count(&self, unit_type: UnitType) -> u32 {
        self.units.get(&unit_type).map_or(0, Multiset::len)
    }

    /// Remaining hit points of each unit of `unit_type`.
    #[must_use]
    pub fn hit_points(&self, unit_type: UnitType) -> Option<&Multiset<u32>> {
        self.units.get(&unit_type)
    }

    /// Unit types present, in table order.
    pub fn unit_types(&self) -> impl Iterator<Item = UnitType> + '_ {
        self.units.keys().copied()
    }

    /// Unit types present with their hit-point pools, in table order.
    pub fn units(&self) -> impl Iterator<Item = (UnitType, &Multiset<u32>)> {
        self.units.iter().map(|(&unit_type, pool)| (unit_type, pool))
    }

    /// Number of units across all types.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.units.values().map(Multiset::len).sum()
    }

    /// Sum of remaining hit points across all units.
    #[must_use]
    pub fn total_hit_points(&self) -> u32 {
        self.units.values().map(total_hit_points).sum()
    }

    /// Number of units belonging to `domain`.
    #[must_use]
    pub fn units_in_domain(&self, domain: Domain) -> u32 {
        self.units()
            .filter(|(unit_type, _)| unit_type.domain() == domain)
            .map(|(_, pool)| pool.len())
            .sum()
    }

    /// Total purchase cost of the units present.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.units().map(|(unit_type, pool)| unit_type.cost() * pool.len()).sum()
    }

    /// Die threshold of `unit_type` for this side.
    #[must_use]
    pub fn combat_power(&self, unit_type: UnitType) -> u32 {
        unit_type.combat_power(self.is_attacking, &self.developments)
    }

    /// Dice this force fires at `enemies` in the opening or regular
    /// sub-round.
    ///
    /// Attacking infantry paired one-to-one with artillery roll at the
    /// artillery's attack value.
    #[must_use]
    pub fn volleys(&self, enemies: &Force, opening_fire: bool) -> Volleys {
        let mut volleys = Volleys::new();
        for (unit_type, pool) in self.units() {
            if unit_type.has_opening_fire(enemies) != opening_fire {
                continue;
            }
            let dice =
                pool.len() * unit_type.number_of_rolls(enemies, self.is_attacking, &self.developments);
            let power = self.combat_power(unit_type);
            let target = unit_type.target_domain();

            let supported = if self.is_attacking && unit_type == UnitType::Infantry {
                pool.len().min(self.count(UnitType::Artillery))
            } else {
                0
            };
            if supported > 0 {
                volleys.push(Volley {
                    unit_type,
                    dice: supported,
                    power: self.combat_power(UnitType::Artillery),
                    target,
                });
            }
            volleys.push(Volley {
                unit_type,
                dice: dice - supported,
                power,
                target,
            });
        }
        volleys.retain(|volley| volley.dice > 0 && volley.power > 0);
        volleys
    }

    /// Exact distribution of the hits this force lands on `enemies`.
    #[must_use]
    pub fn hit_distribution(&self, enemies: &Force, opening_fire: bool) -> HitDistribution {
        self.volleys(enemies, opening_fire)
            .iter()
            .fold(HitDistribution::identity(), |dist, volley| {
                dist.plus_binomial(volley.target, &volley.hit_probability(), volley.dice)
            })
    }

    /// Roll this force's dice against `enemies`.
    pub fn roll_hits(&self, enemies: &Force, opening_fire: bool, rng: &mut BattleRng) -> HitProfile {
        self.volleys(enemies, opening_fire)
            .iter()
            .fold(HitProfile::new(), |hits, volley| {
                hits.plus(rng.count_hits(volley.dice, volley.power), volley.target)
            })
    }

    /// Absorb `hits` using this force's own casualty policy.
    pub fn take_hits(&self, hits: &HitProfile) -> Result<Force> {
        let policy = self.policy;
        self.take_hits_with(hits, &policy)
    }

    /// Absorb `hits`, asking `picker` for casualties.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::TooFewCasualties`] or
    /// [`BattleError::TooManyCasualties`] when `picker` breaks its contract.
    pub fn take_hits_with(&self, hits: &HitProfile, picker: &dyn CasualtyPicker) -> Result<Force> {
        if hits.is_empty() {
            return Ok(self.clone());
        }

        // First-round-only units cannot be hit; they leave once they have fired
        let eligible = self.eligible_hit_points(None);
        if eligible == 0 {
            return Ok(self.clone());
        }

        let absorbable: u32 = hits.general_hits()
            + hits
                .restricted_domains()
                .map(|(domain, count)| count.min(self.eligible_hit_points(Some(domain))))
                .sum::<u32>();
        if absorbable >= eligible {
            return Ok(self.emptied());
        }

        let (damaged, remaining) = self.apply_damage(hits);
        if remaining.is_empty() {
            return Ok(damaged);
        }

        let casualties = picker.pick(&damaged, &remaining, self.is_attacking);
        damaged.validate_casualties(&remaining, &casualties)?;
        Ok(damaged.remove_casualties(&casualties))
    }

    /// The force after its first-round-only units have fired and left.
    #[must_use]
    pub fn without_first_round_only_units(&self) -> Self {
        Self {
            units: self
                .units
                .iter()
                .filter(|(unit_type, _)| !unit_type.is_first_round_only())
                .map(|(&unit_type, pool)| (unit_type, pool.clone()))
                .collect(),
            ..self.clone()
        }
    }

    /// Hit points that hits restricted to `domain` (or general hits, for
    /// `None`) could ever reach.
    fn eligible_hit_points(&self, domain: Option<Domain>) -> u32 {
        self.eligible_units(domain)
            .map(|(_, pool)| total_hit_points(pool))
            .sum()
    }

    fn eligible_units(&self, domain: Option<Domain>) -> impl Iterator<Item = (UnitType, &Multiset<u32>)> {
        self.units().filter(move |(unit_type, _)| {
            !unit_type.is_first_round_only() && domain.map_or(true, |domain| unit_type.domain() == domain)
        })
    }

    /// Spend hits on multi-HP units, returning the damaged force and the
    /// hits that still need casualties.
    fn apply_damage(&self, hits: &HitProfile) -> (Force, HitProfile) {
        let mut force = self.clone();
        let mut remaining = HitProfile::new();

        for (domain, count) in hits.restricted_domains() {
            let left = force.soak_damage(Some(domain), count);
            remaining = remaining.plus(left, Some(domain));
        }
        let left = force.soak_damage(None, hits.general_hits());
        (force, remaining.plus(left, None))
    }

    /// Reduce the healthiest eligible units by one hit point per hit, down
    /// to 1, walking unit types in table order. Returns the hits left over.
    fn soak_damage(&mut self, domain: Option<Domain>, mut hits: u32) -> u32 {
        let candidates: SmallVec<[UnitType; 16]> = self
            .eligible_units(domain)
            .filter(|(unit_type, _)| unit_type.max_hit_points() > 1)
            .map(|(unit_type, _)| unit_type)
            .collect();

        for unit_type in candidates {
            let Some(mut pool) = self.units.get(&unit_type).cloned() else {
                continue;
            };
            while hits > 0 {
                let Some(&healthiest) = pool.copies().last() else {
                    break;
                };
                if healthiest <= 1 {
                    break;
                }
                pool = pool.saturating_minus(&healthiest, 1).plus(healthiest - 1, 1);
                hits -= 1;
            }
            self.units.insert(unit_type, pool);
            if hits == 0 {
                break;
            }
        }
        hits
    }

    fn validate_casualties(&self, hits: &HitProfile, casualties: &Casualties) -> Result<()> {
        for (&unit_type, &count) in casualties {
            let units = self.count(unit_type);
            if count > units {
                return Err(BattleError::TooManyCasualties {
                    unit_type,
                    casualties: count,
                    units,
                });
            }
        }

        let mut domain_attributed = 0;
        for (domain, domain_hits) in hits.restricted_domains() {
            let available: u32 = self.eligible_units(Some(domain)).map(|(_, pool)| pool.len()).sum();
            let claimed: u32 = casualties
                .iter()
                .filter(|(unit_type, _)| unit_type.domain() == domain)
                .map(|(_, &count)| count)
                .sum();
            if claimed < domain_hits.min(available) {
                return Err(BattleError::TooFewCasualties {
                    domain: Some(domain),
                    casualties: claimed,
                    hits: domain_hits,
                });
            }
            domain_attributed += domain_hits.min(claimed);
        }

        let eligible: u32 = self.eligible_units(None).map(|(_, pool)| pool.len()).sum();
        let total: u32 = casualties.values().sum();
        let general_claimed = total.saturating_sub(domain_attributed);
        let general_required = hits
            .general_hits()
            .min(eligible.saturating_sub(domain_attributed));
        if general_claimed < general_required {
            return Err(BattleError::TooFewCasualties {
                domain: None,
                casualties: general_claimed,
                hits: hits.general_hits(),
            });
        }
        Ok(())
    }

    /// Remove the weakest units of each type first.
    fn remove_casualties(&self, casualties: &Casualties) -> Force {
        let mut result = self.clone();
        for (&unit_type, &count) in casualties {
            let Some(mut pool) = result.units.get(&unit_type).cloned() else {
                continue;
            };
            let mut to_remove = count;
            while to_remove > 0 {
                let Some(&weakest) = pool.copies().next() else {
                    break;
                };
                let removed = to_remove.min(pool.count_of(&weakest));
                pool = pool.saturating_minus(&weakest, removed);
                to_remove -= removed;
            }
            if pool.is_empty() {
                result.units.remove(&unit_type);
            } else {
                result.units.insert(unit_type, pool);
            }
        }
        result
    }
}

fn total_hit_points(pool: &Multiset<u32>) -> u32 {
    pool.iter().map(|(&hp, count)| hp * count).sum()
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no units");
        }
        let parts: Vec<String> = self
            .units()
            .map(|(unit_type, pool)| {
                let damaged = pool
                    .iter()
                    .filter(|&(&hp, _)| hp < unit_type.max_hit_points())
                    .map(|(_, count)| count)
                    .sum::<u32>();
                if damaged > 0 {
                    format!("{} {unit_type} ({damaged} damaged)", pool.len())
                } else {
                    format!("{} {unit_type}", pool.len())
                }
            })
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPicker(Casualties);

    impl CasualtyPicker for FixedPicker {
        fn pick(&self, _force: &Force, _hits: &HitProfile, _is_attacking: bool) -> Casualties {
            self.0.clone()
        }
    }

    #[test]
    fn test_from_counts() {
        let force = Force::attacking([(UnitType::Infantry, 3), (UnitType::Tank, 0), (UnitType::Battleship, 1)]);

        assert_eq!(force.count(UnitType::Infantry), 3);
        assert!(!force.contains(UnitType::Tank));
        assert_eq!(force.hit_points(UnitType::Battleship), Some(&Multiset::from_counts([(2, 1)])));
        assert_eq!(force.total_units(), 4);
        assert_eq!(force.total_hit_points(), 5);
        assert!(force.is_attacking());
    }

    #[test]
    fn test_volleys_artillery_support() {
        let force = Force::attacking([(UnitType::Infantry, 3), (UnitType::Artillery, 2)]);
        let enemies = Force::defending([(UnitType::Infantry, 1)]);
        let volleys = force.volleys(&enemies, false);

        let infantry: Vec<(u32, u32)> = volleys
            .iter()
            .filter(|volley| volley.unit_type == UnitType::Infantry)
            .map(|volley| (volley.dice, volley.power))
            .collect();
        assert_eq!(infantry, vec![(2, 2), (1, 1)]);
    }

    #[test]
    fn test_defending_infantry_not_supported() {
        let force = Force::defending([(UnitType::Infantry, 2), (UnitType::Artillery, 2)]);
        let enemies = Force::attacking([(UnitType::Tank, 1)]);

        assert!(force
            .volleys(&enemies, false)
            .iter()
            .all(|volley| volley.power == 2 && volley.dice == 2));
    }

    #[test]
    fn test_volleys_skip_zero_power() {
        let force = Force::defending([(UnitType::Transport, 2)]);
        let enemies = Force::attacking([(UnitType::Destroyer, 1)]);

        assert_eq!(force.volleys(&enemies, false).len(), 1);
        assert!(Force::attacking([(UnitType::Transport, 2)]).volleys(&enemies, false).is_empty());
    }

    #[test]
    fn test_take_no_hits() {
        let force = Force::defending([(UnitType::Tank, 2)]);
        assert_eq!(force.take_hits(&HitProfile::new()), Ok(force.clone()));
    }

    #[test]
    fn test_take_overwhelming_hits() {
        let force = Force::defending([(UnitType::Tank, 2), (UnitType::Battleship, 1)]);
        let result = force.take_hits(&HitProfile::general(10)).unwrap();

        assert!(result.is_empty());
        assert!(!result.is_attacking());
        assert_eq!(result.policy(), force.policy());
    }

    #[test]
    fn test_first_round_only_units_ignore_hits() {
        let force = Force::defending([(UnitType::AntiaircraftGun, 1)]);

        let sea = HitProfile::new().plus(1, Some(Domain::Sea));
        assert_eq!(force.take_hits(&sea), Ok(force.clone()));
        assert_eq!(force.take_hits(&HitProfile::general(3)), Ok(force.clone()));
        assert!(force.without_first_round_only_units().is_empty());
    }

    #[test]
    fn test_without_first_round_only_keeps_role_and_policy() {
        let force = Force::attacking([(UnitType::BombardingBattleship, 1), (UnitType::Tank, 2)])
            .with_policy(CasualtyPolicy::by_combat_power(true));
        let stripped = force.without_first_round_only_units();

        assert_eq!(stripped.count(UnitType::Tank), 2);
        assert!(!stripped.contains(UnitType::BombardingBattleship));
        assert!(stripped.is_attacking());
        assert_eq!(stripped.policy(), force.policy());
    }

    #[test]
    fn test_battleship_damaged_before_casualties() {
        let force = Force::defending([(UnitType::Battleship, 1), (UnitType::Transport, 1)]);
        let result = force.take_hits(&HitProfile::general(1)).unwrap();

        assert_eq!(result.count(UnitType::Transport), 1);
        assert_eq!(result.hit_points(UnitType::Battleship), Some(&Multiset::from_counts([(1, 1)])));

        let result = force.take_hits(&HitProfile::general(2)).unwrap();
        assert_eq!(result.count(UnitType::Transport), 0);
        assert_eq!(result.hit_points(UnitType::Battleship), Some(&Multiset::from_counts([(1, 1)])));
    }

    #[test]
    fn test_domain_hits_only_reach_domain() {
        let force = Force::defending([(UnitType::Infantry, 2), (UnitType::Fighter, 1)]);
        let hits = HitProfile::new().plus(1, Some(Domain::Air));
        let result = force.take_hits(&hits).unwrap();

        assert_eq!(result.count(UnitType::Infantry), 2);
        assert_eq!(result.count(UnitType::Fighter), 0);
    }

    #[test]
    fn test_domain_hits_without_targets_do_nothing() {
        let force = Force::defending([(UnitType::Infantry, 2)]);
        let hits = HitProfile::new().plus(3, Some(Domain::Sea));

        assert_eq!(force.take_hits(&hits), Ok(force.clone()));
    }

    #[test]
    fn test_too_few_casualties() {
        let force = Force::defending([(UnitType::Infantry, 3)]);
        let picker = FixedPicker([(UnitType::Infantry, 1)].into_iter().collect());

        assert_eq!(
            force.take_hits_with(&HitProfile::general(2), &picker),
            Err(BattleError::TooFewCasualties {
                domain: None,
                casualties: 1,
                hits: 2
            })
        );
    }

    #[test]
    fn test_too_few_domain_casualties() {
        let force = Force::defending([(UnitType::Infantry, 3), (UnitType::Transport, 2)]);
        let picker = FixedPicker([(UnitType::Infantry, 1)].into_iter().collect());
        let hits = HitProfile::new().plus(1, Some(Domain::Sea));

        assert_eq!(
            force.take_hits_with(&hits, &picker),
            Err(BattleError::TooFewCasualties {
                domain: Some(Domain::Sea),
                casualties: 0,
                hits: 1
            })
        );
    }

    #[test]
    fn test_too_many_casualties() {
        let force = Force::defending([(UnitType::Infantry, 3), (UnitType::Tank, 1)]);
        let picker = FixedPicker([(UnitType::Tank, 2)].into_iter().collect());

        assert_eq!(
            force.take_hits_with(&HitProfile::general(2), &picker),
            Err(BattleError::TooManyCasualties {
                unit_type: UnitType::Tank,
                casualties: 2,
                units: 1
            })
        );
    }

    #[test]
    fn test_casualties_remove_weakest_first() {
        let force = Force::defending([(UnitType::Battleship, 2), (UnitType::Destroyer, 3)])
            .with_hit_points(UnitType::Battleship, Multiset::from_counts([(1, 1), (2, 1)]));
        let picker = FixedPicker([(UnitType::Battleship, 1)].into_iter().collect());
        let result = force.take_hits_with(&HitProfile::general(2), &picker);

        // One hit damages the healthy battleship, the other sinks a damaged one
        assert_eq!(
            result.map(|force| force.hit_points(UnitType::Battleship).cloned()),
            Ok(Some(Multiset::from_counts([(1, 1)])))
        );
    }

    #[test]
    fn test_without_first_round_only_units() {
        let force = Force::defending([(UnitType::AntiaircraftGun, 1), (UnitType::Infantry, 2)]);
        let stripped = force.without_first_round_only_units();

        assert!(!stripped.contains(UnitType::AntiaircraftGun));
        assert_eq!(stripped.count(UnitType::Infantry), 2);
    }

    #[test]
    fn test_hit_distribution_sums_to_one() {
        let force = Force::attacking([(UnitType::Infantry, 2), (UnitType::Artillery, 1), (UnitType::Submarine, 1)]);
        let enemies = Force::defending([(UnitType::Destroyer, 1)]);

        assert_eq!(force.hit_distribution(&enemies, false).total(), Rational::one());
        assert_eq!(force.hit_distribution(&enemies, true), HitDistribution::identity());
    }

    #[test]
    fn test_display() {
        let force = Force::defending([(UnitType::Infantry, 2), (UnitType::Battleship, 1)])
            .with_hit_points(UnitType::Battleship, Multiset::from_counts([(1, 1)]));

        assert_eq!(force.to_string(), "2 Infantry, 1 Battleship (1 damaged)");
        assert_eq!(force.emptied().to_string(), "no units");
    }
}
