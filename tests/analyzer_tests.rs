//! Exact analyzer integration tests against known battle odds.

use battle_odds::analysis::{analyze, Analyzer, OutcomeDistribution, OutcomeSummary};
use battle_odds::combat::{Board, Force, Outcome};
use battle_odds::math::{Multiset, Rational};
use battle_odds::units::UnitType;

fn attackers(counts: &[(UnitType, u32)]) -> Force {
    Force::attacking(counts.iter().copied())
}

fn defenders(counts: &[(UnitType, u32)]) -> Force {
    Force::defending(counts.iter().copied())
}

fn distribution(entries: Vec<(Outcome, Rational)>) -> OutcomeDistribution {
    entries.into_iter().collect()
}

fn total(distribution: &OutcomeDistribution) -> Rational {
    distribution.values().sum()
}

// =============================================================================
// Immediate Outcomes
// =============================================================================

#[test]
fn test_empty_board_is_tie() {
    let board = Board::new(attackers(&[]), defenders(&[]));

    assert_eq!(
        analyze(&board).unwrap(),
        distribution(vec![(Outcome::Tie, Rational::one())])
    );
}

#[test]
fn test_one_sided_boards_are_decided() {
    let armies: [&[(UnitType, u32)]; 4] = [
        &[(UnitType::Infantry, 1)],
        &[(UnitType::Tank, 2), (UnitType::Fighter, 1)],
        &[(UnitType::Battleship, 1), (UnitType::Submarine, 3)],
        &[(UnitType::AntiaircraftGun, 1), (UnitType::Infantry, 4)],
    ];

    let mut analyzer = Analyzer::new();
    for army in armies {
        let attacking = attackers(army);
        let defending = defenders(army);

        let won = analyzer
            .analyze(&Board::new(attacking.clone(), defenders(&[])))
            .unwrap();
        assert_eq!(won, distribution(vec![(Outcome::AttackerWon(attacking), Rational::one())]));

        let lost = analyzer
            .analyze(&Board::new(attackers(&[]), defending.clone()))
            .unwrap();
        assert_eq!(lost, distribution(vec![(Outcome::DefenderWon(defending), Rational::one())]));
    }

    assert_eq!(analyzer.stats().self_loops_excluded, 0);
}

// =============================================================================
// Single-Unit Duels
// =============================================================================

#[test]
fn test_tank_one_on_one() {
    let board = Board::new(attackers(&[(UnitType::Tank, 1)]), defenders(&[(UnitType::Tank, 1)]));

    assert_eq!(
        analyze(&board).unwrap(),
        distribution(vec![
            (Outcome::AttackerWon(attackers(&[(UnitType::Tank, 1)])), Rational::new(1, 3)),
            (Outcome::DefenderWon(defenders(&[(UnitType::Tank, 1)])), Rational::new(1, 3)),
            (Outcome::Tie, Rational::new(1, 3)),
        ])
    );
}

#[test]
fn test_infantry_one_on_one() {
    let board = Board::new(attackers(&[(UnitType::Infantry, 1)]), defenders(&[(UnitType::Infantry, 1)]));

    assert_eq!(
        analyze(&board).unwrap(),
        distribution(vec![
            (Outcome::AttackerWon(attackers(&[(UnitType::Infantry, 1)])), Rational::new(1, 4)),
            (Outcome::DefenderWon(defenders(&[(UnitType::Infantry, 1)])), Rational::new(5, 8)),
            (Outcome::Tie, Rational::new(1, 8)),
        ])
    );
}

#[test]
fn test_submarine_one_on_one() {
    let board = Board::new(attackers(&[(UnitType::Submarine, 1)]), defenders(&[(UnitType::Submarine, 1)]));

    assert_eq!(
        analyze(&board).unwrap(),
        distribution(vec![
            (Outcome::AttackerWon(attackers(&[(UnitType::Submarine, 1)])), Rational::new(2, 5)),
            (Outcome::DefenderWon(defenders(&[(UnitType::Submarine, 1)])), Rational::new(2, 5)),
            (Outcome::Tie, Rational::new(1, 5)),
        ])
    );
}

#[test]
fn test_submarine_cannot_hit_land() {
    // The submarine's hits only reach ships, so it can never win
    let board = Board::new(attackers(&[(UnitType::Submarine, 1)]), defenders(&[(UnitType::Infantry, 1)]));

    assert_eq!(
        analyze(&board).unwrap(),
        distribution(vec![(
            Outcome::DefenderWon(defenders(&[(UnitType::Infantry, 1)])),
            Rational::one()
        )])
    );
}

// =============================================================================
// Mixed Forces
// =============================================================================

#[test]
fn test_infantry_tank_versus_infantry_artillery() {
    let attacking = attackers(&[(UnitType::Infantry, 1), (UnitType::Tank, 1)]);
    let defending = defenders(&[(UnitType::Infantry, 1), (UnitType::Artillery, 1)]);

    assert_eq!(
        analyze(&Board::new(attacking.clone(), defending.clone())).unwrap(),
        distribution(vec![
            (Outcome::AttackerWon(attackers(&[(UnitType::Tank, 1)])), Rational::new(1257, 4004)),
            (Outcome::DefenderWon(defenders(&[(UnitType::Artillery, 1)])), Rational::new(1977, 8008)),
            (Outcome::AttackerWon(attacking), Rational::new(5, 26)),
            (Outcome::DefenderWon(defending), Rational::new(85, 616)),
            (Outcome::Tie, Rational::new(109, 1001)),
        ])
    );
}

#[test]
fn test_artillery_supports_attacking_infantry() {
    let attacking = attackers(&[(UnitType::Infantry, 1), (UnitType::Artillery, 1)]);
    let defending = defenders(&[(UnitType::Infantry, 1)]);

    assert_eq!(
        analyze(&Board::new(attacking.clone(), defending.clone())).unwrap(),
        distribution(vec![
            (Outcome::AttackerWon(attacking), Rational::new(10, 19)),
            (Outcome::AttackerWon(attackers(&[(UnitType::Artillery, 1)])), Rational::new(33, 95)),
            (Outcome::DefenderWon(defending), Rational::new(8, 95)),
            (Outcome::Tie, Rational::new(4, 95)),
        ])
    );
}

#[test]
fn test_antiaircraft_gun_fires_once() {
    let attacking = attackers(&[(UnitType::Fighter, 1)]);
    let defending = defenders(&[(UnitType::Infantry, 1), (UnitType::AntiaircraftGun, 1)]);

    assert_eq!(
        analyze(&Board::new(attacking.clone(), defending)).unwrap(),
        distribution(vec![
            (Outcome::AttackerWon(attacking), Rational::new(5, 12)),
            (Outcome::DefenderWon(defenders(&[(UnitType::Infantry, 1)])), Rational::new(3, 8)),
            (Outcome::Tie, Rational::new(5, 24)),
        ])
    );
}

// =============================================================================
// Multi-Hit-Point Units
// =============================================================================

fn damaged_battleship() -> Force {
    attackers(&[(UnitType::Battleship, 1)])
        .with_hit_points(UnitType::Battleship, Multiset::from_counts([(1, 1)]))
}

#[test]
fn test_battleship_versus_destroyers() {
    let attacking = attackers(&[(UnitType::Battleship, 1)]);
    let defending = defenders(&[(UnitType::Destroyer, 2)]);

    assert_eq!(
        analyze(&Board::new(attacking.clone(), defending.clone())).unwrap(),
        distribution(vec![
            (Outcome::DefenderWon(defenders(&[(UnitType::Destroyer, 1)])), Rational::new(1112, 3025)),
            (Outcome::AttackerWon(damaged_battleship()), Rational::new(744, 3025)),
            (Outcome::Tie, Rational::new(524, 3025)),
            (Outcome::DefenderWon(defending), Rational::new(17, 121)),
            (Outcome::AttackerWon(attacking), Rational::new(4, 55)),
        ])
    );
}

#[test]
fn test_battleship_versus_submarines() {
    let attacking = attackers(&[(UnitType::Battleship, 1)]);
    let defending = defenders(&[(UnitType::Submarine, 3)]);

    assert_eq!(
        analyze(&Board::new(attacking.clone(), defending.clone())).unwrap(),
        distribution(vec![
            (Outcome::DefenderWon(defending), Rational::new(2217, 5329)),
            (
                Outcome::DefenderWon(defenders(&[(UnitType::Submarine, 2)])),
                Rational::new(821_352, 2_819_041)
            ),
            (Outcome::AttackerWon(damaged_battleship()), Rational::new(20_947_968, 138_133_009)),
            (
                Outcome::DefenderWon(defenders(&[(UnitType::Submarine, 1)])),
                Rational::new(13_454_400, 138_133_009)
            ),
            (Outcome::AttackerWon(attacking), Rational::new(512, 11753)),
        ])
    );
}

#[test]
fn test_every_single_unit_pairing_resolves() {
    let mut analyzer = Analyzer::new();

    for attacker in UnitType::ALL {
        for defender in UnitType::ALL {
            let board = Board::new(attackers(&[(attacker, 1)]), defenders(&[(defender, 1)]));
            let result = analyzer.analyze(&board);

            assert!(result.is_ok(), "{attacker} v {defender}: {result:?}");
            assert_eq!(total(&result.unwrap()), Rational::one());
        }
    }
}

// =============================================================================
// Memoization
// =============================================================================

#[test]
fn test_shared_analyzer_matches_fresh_analyzer() {
    let small = Board::new(attackers(&[(UnitType::Tank, 1)]), defenders(&[(UnitType::Infantry, 2)]));
    let large = Board::new(attackers(&[(UnitType::Tank, 3)]), defenders(&[(UnitType::Infantry, 3)]));

    let mut shared = Analyzer::new();
    let small_shared = shared.analyze(&small).unwrap();
    let large_shared = shared.analyze(&large).unwrap();

    assert_eq!(small_shared, analyze(&small).unwrap());
    assert_eq!(large_shared, analyze(&large).unwrap());
    assert!(shared.stats().cache_hits > 0);
}

#[test]
fn test_repeat_analysis_is_one_cache_hit() {
    let board = Board::new(attackers(&[(UnitType::Tank, 2)]), defenders(&[(UnitType::Infantry, 2)]));
    let mut analyzer = Analyzer::new();

    let first = analyzer.analyze(&board).unwrap();
    let before = analyzer.stats().clone();
    let cached = analyzer.cache_len();

    let second = analyzer.analyze(&board).unwrap();

    assert_eq!(first, second);
    assert_eq!(analyzer.stats().cache_hits, before.cache_hits + 1);
    assert_eq!(analyzer.stats().cache_misses, before.cache_misses);
    assert_eq!(analyzer.cache_len(), cached);
}

// =============================================================================
// Summaries
// =============================================================================

#[test]
fn test_summary_of_larger_battle_sums_to_one() {
    let board = Board::new(
        attackers(&[(UnitType::Infantry, 2), (UnitType::Artillery, 1), (UnitType::Fighter, 1)]),
        defenders(&[(UnitType::Infantry, 3), (UnitType::AntiaircraftGun, 1)]),
    );
    let result = analyze(&board).unwrap();
    let summary = OutcomeSummary::from_distribution(&result);

    assert_eq!(total(&result), Rational::one());
    assert_eq!(summary.total(), Rational::one());
    assert!(summary.attacker_wins > Rational::zero());
    assert!(summary.defender_wins > Rational::zero());
}
