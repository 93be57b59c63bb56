//! Hit profiles and exact distributions over them.
//!
//! A round of fire does not produce a single hit count. Submarines can only
//! hit ships and antiaircraft guns can only hit planes, so a [`HitProfile`]
//! keeps domain-restricted hits apart from general ones. A
//! [`HitDistribution`] maps every reachable profile to its exact
//! probability.

use std::fmt;

use im::OrdMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::math::{binomial, Rational};
use crate::units::Domain;

/// Hits one side lands in one sub-round.
///
/// Domain hits must be absorbed by units of that domain; general hits can
/// be absorbed by anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitProfile {
    general_hits: u32,
    domain_hits: OrdMap<Domain, u32>,
}

impl HitProfile {
    /// The profile with no hits at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A profile of `hits` general hits.
    #[must_use]
    pub fn general(hits: u32) -> Self {
        Self::new().plus(hits, None)
    }

    /// Copy with `hits` more hits, restricted to `domain` if given.
    #[must_use]
    pub fn plus(&self, hits: u32, domain: Option<Domain>) -> Self {
        if hits == 0 {
            return self.clone();
        }
        let mut result = self.clone();
        match domain {
            None => result.general_hits += hits,
            Some(domain) => *result.domain_hits.entry(domain).or_insert(0) += hits,
        }
        result
    }

    #[must_use]
    pub fn general_hits(&self) -> u32 {
        self.general_hits
    }

    /// Hits restricted to `domain`.
    #[must_use]
    pub fn domain_hits(&self, domain: Domain) -> u32 {
        self.domain_hits.get(&domain).copied().unwrap_or(0)
    }

    /// Domains with at least one restricted hit, in resolution order.
    pub fn restricted_domains(&self) -> impl Iterator<Item = (Domain, u32)> + '_ {
        self.domain_hits.iter().map(|(&domain, &hits)| (domain, hits))
    }

    /// All hits, restricted or not.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.general_hits + self.domain_hits.values().sum::<u32>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.general_hits == 0 && self.domain_hits.is_empty()
    }
}

impl fmt::Display for HitProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("No hits");
        }
        let mut parts: Vec<String> = self
            .restricted_domains()
            .map(|(domain, hits)| format!("{hits} to {}", domain.to_string().to_lowercase()))
            .collect();
        if self.general_hits > 0 {
            parts.push(format!("{} to anywhere", self.general_hits));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Exact probability distribution over [`HitProfile`]s.
///
/// Probabilities always sum to exactly one.
///
/// ```
/// use battle_odds::combat::{HitDistribution, HitProfile};
/// use battle_odds::math::Rational;
///
/// // Two dice hitting on a 1 or 2
/// let dist = HitDistribution::identity().plus_binomial(None, &Rational::new(2, 6), 2);
/// assert_eq!(dist.probability_of(&HitProfile::general(2)), Rational::new(1, 9));
/// assert_eq!(dist.total(), Rational::one());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitDistribution {
    outcomes: FxHashMap<HitProfile, Rational>,
}

impl HitDistribution {
    /// Certainty of no hits.
    #[must_use]
    pub fn identity() -> Self {
        let mut outcomes = FxHashMap::default();
        outcomes.insert(HitProfile::new(), Rational::one());
        Self { outcomes }
    }

    /// Convolve with `trials` independent dice that each hit with
    /// probability `p`, their hits restricted to `domain` if given.
    #[must_use]
    pub fn plus_binomial(&self, domain: Option<Domain>, p: &Rational, trials: u32) -> Self {
        if trials == 0 || p.is_zero() {
            return self.clone();
        }

        let weights: Vec<(u32, Rational)> = (0..=trials)
            .map(|hits| (hits, binomial(p, trials, hits)))
            .filter(|(_, weight)| !weight.is_zero())
            .collect();

        let mut outcomes: FxHashMap<HitProfile, Rational> = FxHashMap::default();
        for (profile, probability) in &self.outcomes {
            for (hits, weight) in &weights {
                *outcomes.entry(profile.plus(*hits, domain)).or_default() += probability * weight;
            }
        }
        Self { outcomes }
    }

    /// Probability of exactly `profile` (zero if unreachable).
    #[must_use]
    pub fn probability_of(&self, profile: &HitProfile) -> Rational {
        self.outcomes.get(profile).cloned().unwrap_or_default()
    }

    /// Reachable profiles with their probabilities, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&HitProfile, &Rational)> {
        self.outcomes.iter()
    }

    /// Number of reachable profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Sum of all probabilities.
    #[must_use]
    pub fn total(&self) -> Rational {
        self.outcomes.values().sum()
    }
}

impl Default for HitDistribution {
    fn default() -> Self {
        Self::identity()
    }
}
