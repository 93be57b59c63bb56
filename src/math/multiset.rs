//! Immutable bag of elements with strictly positive multiplicities.
//!
//! A force tracks each unit type's remaining hit points as a
//! `Multiset<u32>` rather than one object per unit, so "three full-health
//! battleships" is a single entry `2 -> 3`.
//!
//! Backed by `im::OrdMap`, so every "mutating" method returns a new multiset
//! while cloning stays O(1), and two multisets with the same contents are
//! structurally equal and hash identically.
//!
//! ```
//! use battle_odds::math::Multiset;
//!
//! let hps = Multiset::<u32>::from_counts([(2, 1), (1, 2)]);
//! assert_eq!(hps.len(), 3);
//!
//! let damaged = hps.map(|hp| hp.saturating_sub(1).max(1));
//! assert_eq!(damaged.count_of(&1), 3);
//! ```

use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::MultisetError;

/// Immutable multiset over an ordered element type.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Multiset<T: Ord + Clone> {
    counts: OrdMap<T, u32>,
}

impl<T: Ord + Clone> Multiset<T> {
    /// Create an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: OrdMap::new(),
        }
    }

    /// Create a multiset from `(element, count)` pairs.
    ///
    /// Zero counts are dropped and repeated elements are summed.
    pub fn from_counts(counts: impl IntoIterator<Item = (T, u32)>) -> Self {
        let mut result = OrdMap::new();
        for (element, count) in counts {
            if count > 0 {
                *result.entry(element).or_insert(0) += count;
            }
        }
        Self { counts: result }
    }

    /// Total number of elements, counting repetitions.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Whether there are no elements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct elements.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    /// Occurrences of `element` (0 if absent).
    #[must_use]
    pub fn count_of(&self, element: &T) -> u32 {
        self.counts.get(element).copied().unwrap_or(0)
    }

    /// Whether `element` occurs at least once.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.counts.contains_key(element)
    }

    /// Whether every element equals `element`.
    #[must_use]
    pub fn has_only(&self, element: &T) -> bool {
        self.counts.len() == 1 && self.counts.contains_key(element)
    }

    /// Iterate over distinct elements with their counts, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u32)> {
        self.counts.iter().map(|(element, &count)| (element, count))
    }

    /// Iterate over every copy, in ascending order.
    pub fn copies(&self) -> impl Iterator<Item = &T> {
        self.counts
            .iter()
            .flat_map(|(element, &count)| std::iter::repeat(element).take(count as usize))
    }

    /// Copy with `n` more copies of `element`.
    #[must_use]
    pub fn plus(&self, element: T, n: u32) -> Self {
        if n == 0 {
            return self.clone();
        }
        let mut counts = self.counts.clone();
        *counts.entry(element).or_insert(0) += n;
        Self { counts }
    }

    /// Copy with `n` copies of `element` removed.
    ///
    /// Fails if fewer than `n` copies are present.
    pub fn minus(&self, element: &T, n: u32) -> Result<Self, MultisetError> {
        let available = self.count_of(element);
        if n > available {
            return Err(MultisetError::Underflow {
                requested: n,
                available,
            });
        }
        Ok(self.saturating_minus(element, n))
    }

    /// Copy with up to `n` copies of `element` removed, clamping at zero.
    #[must_use]
    pub fn saturating_minus(&self, element: &T, n: u32) -> Self {
        let available = self.count_of(element);
        if n == 0 || available == 0 {
            return self.clone();
        }
        let mut counts = self.counts.clone();
        if n >= available {
            counts.remove(element);
        } else {
            counts.insert(element.clone(), available - n);
        }
        Self { counts }
    }

    /// Multiset holding the elements of both, counts summed.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        let mut counts = self.counts.clone();
        for (element, &count) in other.counts.iter() {
            *counts.entry(element.clone()).or_insert(0) += count;
        }
        Self { counts }
    }

    /// Remove every element of `other`.
    ///
    /// Fails if `other` holds more copies of some element than `self`.
    pub fn difference(&self, other: &Self) -> Result<Self, MultisetError> {
        for (element, &count) in other.counts.iter() {
            let available = self.count_of(element);
            if count > available {
                return Err(MultisetError::Underflow {
                    requested: count,
                    available,
                });
            }
        }
        Ok(self.saturating_difference(other))
    }

    /// Remove every element of `other`, ignoring copies `self` lacks.
    #[must_use]
    pub fn saturating_difference(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let counts = self
            .counts
            .iter()
            .filter_map(|(element, &count)| {
                let remaining = count.saturating_sub(other.count_of(element));
                (remaining > 0).then(|| (element.clone(), remaining))
            })
            .collect();
        Self { counts }
    }

    /// Every count multiplied by `n`; empty when `n` is zero.
    #[must_use]
    pub fn repeat(&self, n: u32) -> Self {
        match n {
            0 => Self::new(),
            1 => self.clone(),
            _ => Self {
                counts: self
                    .counts
                    .iter()
                    .map(|(element, &count)| (element.clone(), count * n))
                    .collect(),
            },
        }
    }

    /// Apply `mapper` to each copy and regroup the results.
    ///
    /// `mapper` runs once per copy, not once per distinct element, so
    /// previously distinct elements may merge.
    #[must_use]
    pub fn map<R: Ord + Clone>(&self, mut mapper: impl FnMut(&T) -> R) -> Multiset<R> {
        let mut counts = OrdMap::new();
        for element in self.copies() {
            *counts.entry(mapper(element)).or_insert(0) += 1;
        }
        Multiset { counts }
    }
}

impl<T: Ord + Clone> Default for Multiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_counts(iter.into_iter().map(|element| (element, 1)))
    }
}

impl<T: Ord + Clone + fmt::Debug> fmt::Debug for Multiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts.iter()).finish()
    }
}

impl<T: Ord + Clone + fmt::Display> fmt::Display for Multiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(element, count)| format!("{count} of {element}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
