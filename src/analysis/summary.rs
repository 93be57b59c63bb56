//! Win/loss/tie totals folded out of a full outcome distribution.

use std::fmt;

use serde::Serialize;

use super::OutcomeDistribution;
use crate::combat::Outcome;
use crate::math::Rational;

/// Exact probability of each kind of result, ignoring who survives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub attacker_wins: Rational,
    pub defender_wins: Rational,
    pub ties: Rational,
}

impl OutcomeSummary {
    /// Sum the probabilities of every outcome by kind.
    #[must_use]
    pub fn from_distribution(distribution: &OutcomeDistribution) -> Self {
        let mut summary = Self::default();
        for (outcome, probability) in distribution {
            let bucket = match outcome {
                Outcome::Tie => &mut summary.ties,
                Outcome::AttackerWon(_) => &mut summary.attacker_wins,
                Outcome::DefenderWon(_) => &mut summary.defender_wins,
            };
            *bucket += probability;
        }
        summary
    }

    /// Sum of the three totals; one for any complete distribution.
    #[must_use]
    pub fn total(&self) -> Rational {
        &(&self.attacker_wins + &self.defender_wins) + &self.ties
    }
}

impl fmt::Display for OutcomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attacker {:.2}%, defender {:.2}%, tie {:.2}%",
            self.attacker_wins.to_f64() * 100.0,
            self.defender_wins.to_f64() * 100.0,
            self.ties.to_f64() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Force;
    use crate::units::UnitType;

    #[test]
    fn test_from_distribution_groups_by_kind() {
        let big = Force::attacking([(UnitType::Tank, 2)]);
        let small = Force::attacking([(UnitType::Tank, 1)]);

        let mut distribution = OutcomeDistribution::default();
        distribution.insert(Outcome::AttackerWon(big), Rational::new(1, 4));
        distribution.insert(Outcome::AttackerWon(small), Rational::new(1, 4));
        distribution.insert(Outcome::Tie, Rational::new(1, 2));

        let summary = OutcomeSummary::from_distribution(&distribution);

        assert_eq!(summary.attacker_wins, Rational::new(1, 2));
        assert_eq!(summary.defender_wins, Rational::zero());
        assert_eq!(summary.ties, Rational::new(1, 2));
        assert_eq!(summary.total(), Rational::one());
        assert_eq!(summary.to_string(), "attacker 50.00%, defender 0.00%, tie 50.00%");
    }
}
