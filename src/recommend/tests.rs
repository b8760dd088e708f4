#![cfg(test)]

use crate::session::{MatrixSet, PredictionMatrix};

use super::engine::recommend;
use super::error::RecommendError;
use super::optimizer::RoundOptimizer;
use super::scoring::MonteCarloScoring;
use super::types::{Choice, DecisionType, RecommendationRequest};

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|n| n.to_string()).collect()
}

fn matrix(cells: &[(&str, i64)]) -> PredictionMatrix {
    PredictionMatrix::from_scores(cells.iter().map(|(name, s)| (name.to_string(), *s)))
        .expect("valid matrix")
}

fn scorer() -> MonteCarloScoring {
    MonteCarloScoring::new(200, 42)
}

fn defender_request(yours: &[&str], opponents: &[&str]) -> RecommendationRequest {
    RecommendationRequest {
        decision_type: DecisionType::PickDefender,
        unpaired_your_team: names(yours),
        unpaired_opponent_team: names(opponents),
        your_defender: None,
        opponent_defender: None,
        opponent_attackers: None,
    }
}

#[test]
fn pick_defender_is_deterministic_across_calls() {
    let mut matrices = MatrixSet::new();
    matrices.insert("Alice", matrix(&[("Carl", 15), ("Dave", 5)]));
    matrices.insert("Bob", matrix(&[("Carl", 8), ("Dave", 18)]));

    let request = defender_request(&["Alice", "Bob"], &["Carl", "Dave"]);
    let scorer = scorer();
    let first = recommend(&request, &matrices, &scorer).unwrap();
    let second = recommend(&request, &matrices, &scorer).unwrap();
    assert_eq!(first, second);
}

#[test]
fn pick_defender_covers_every_candidate_ranked_descending() {
    let matrices = MatrixSet::new();
    let request = defender_request(&["Alice", "Bob", "Cara"], &["Carl", "Dave", "Erin"]);
    let result = recommend(&request, &matrices, &scorer()).unwrap();

    assert_eq!(result.all_options.len(), 3);
    for pair in result.all_options.windows(2) {
        assert!(pair[0].expected_total_score >= pair[1].expected_total_score);
    }
    assert_eq!(result.expected_total_score, result.all_options[0].expected_total_score);
}

#[test]
fn equal_candidates_tie_break_by_input_order() {
    // Every read hits the neutral default, so all candidates score the same.
    let matrices = MatrixSet::new();
    let request = defender_request(&["Bob", "Alice", "Cara"], &["Carl", "Dave", "Erin"]);
    let result = recommend(&request, &matrices, &scorer()).unwrap();
    assert_eq!(result.recommendation, Choice::Single("Bob".into()));
}

#[test]
fn attacker_candidates_are_all_unordered_pairs() {
    let matrices = MatrixSet::new();
    let request = RecommendationRequest {
        decision_type: DecisionType::PickAttackers,
        // Defender still present in the list; the engine filters it out,
        // leaving n = 4 and C(4,2) = 6 pairs.
        unpaired_your_team: names(&["Def", "A", "B", "C", "D"]),
        unpaired_opponent_team: names(&["W", "X", "Y", "Z"]),
        your_defender: Some("Def".into()),
        opponent_defender: Some("W".into()),
        opponent_attackers: None,
    };
    let result = recommend(&request, &matrices, &scorer()).unwrap();
    assert_eq!(result.all_options.len(), 6);
    assert!(result
        .all_options
        .iter()
        .all(|option| matches!(option.choice, Choice::Pair(_, _))));
}

#[test]
fn attackers_strong_into_revealed_defender_are_preferred() {
    let mut matrices = MatrixSet::new();
    matrices.insert("A", matrix(&[("W", 20)]));
    matrices.insert("B", matrix(&[("W", 20)]));
    matrices.insert("C", matrix(&[("W", 0)]));

    let request = RecommendationRequest {
        decision_type: DecisionType::PickAttackers,
        unpaired_your_team: names(&["A", "B", "C"]),
        unpaired_opponent_team: names(&["X", "Y", "Z"]),
        your_defender: Some("Def".into()),
        opponent_defender: Some("W".into()),
        opponent_attackers: None,
    };
    let result = recommend(&request, &matrices, &scorer()).unwrap();
    assert_eq!(
        result.recommendation,
        Choice::Pair("A".into(), "B".into())
    );
}

#[test]
fn attacker_pick_with_one_unpaired_player_fails() {
    let matrices = MatrixSet::new();
    let request = RecommendationRequest {
        decision_type: DecisionType::PickAttackers,
        unpaired_your_team: names(&["Bob"]),
        unpaired_opponent_team: names(&["Dave"]),
        your_defender: Some("Alice".into()),
        opponent_defender: Some("Carl".into()),
        opponent_attackers: None,
    };
    let err = recommend(&request, &matrices, &scorer()).unwrap_err();
    assert_eq!(
        err,
        RecommendError::InsufficientPlayers {
            required: 2,
            available: 1
        }
    );
}

#[test]
fn missing_extras_are_reported_by_field() {
    let matrices = MatrixSet::new();
    let mut request = RecommendationRequest {
        decision_type: DecisionType::PickAttackers,
        unpaired_your_team: names(&["A", "B", "C"]),
        unpaired_opponent_team: names(&["X", "Y", "Z"]),
        your_defender: None,
        opponent_defender: Some("X".into()),
        opponent_attackers: None,
    };
    assert_eq!(
        recommend(&request, &matrices, &scorer()).unwrap_err(),
        RecommendError::MissingExtra {
            decision: DecisionType::PickAttackers,
            field: "your_defender"
        }
    );

    request.your_defender = Some("A".into());
    request.opponent_defender = None;
    assert_eq!(
        recommend(&request, &matrices, &scorer()).unwrap_err(),
        RecommendError::MissingExtra {
            decision: DecisionType::PickAttackers,
            field: "opponent_defender"
        }
    );

    request.decision_type = DecisionType::PickDefenderMatchup;
    assert_eq!(
        recommend(&request, &matrices, &scorer()).unwrap_err(),
        RecommendError::MissingExtra {
            decision: DecisionType::PickDefenderMatchup,
            field: "opponent_attackers"
        }
    );
}

#[test]
fn defender_matchup_prefers_the_favorable_announced_attacker() {
    // Only the defender's row is populated; every continuation read is the
    // neutral default, so the announced-attacker cell decides the ranking.
    let mut matrices = MatrixSet::new();
    matrices.insert("Def", matrix(&[("A1", 18), ("A2", 2)]));

    let request = RecommendationRequest {
        decision_type: DecisionType::PickDefenderMatchup,
        unpaired_your_team: names(&["Def", "X", "Y"]),
        unpaired_opponent_team: names(&["A1", "A2", "B"]),
        your_defender: Some("Def".into()),
        opponent_defender: None,
        opponent_attackers: Some(names(&["A1", "A2"])),
    };
    let result = recommend(&request, &matrices, &scorer()).unwrap();
    assert_eq!(result.recommendation, Choice::Single("A1".into()));
    assert_eq!(result.all_options.len(), 2);
    assert!(
        result.all_options[0].expected_total_score
            > result.all_options[1].expected_total_score
    );
}

#[test]
fn two_versus_two_round_trip_scenario() {
    let mut matrices = MatrixSet::new();
    matrices.insert("Alice", matrix(&[("Carl", 15), ("Dave", 5)]));
    matrices.insert("Bob", matrix(&[("Carl", 8), ("Dave", 18)]));
    assert_eq!(matrices.submitted_count(), 2);

    let defender = recommend(
        &defender_request(&["Alice", "Bob"], &["Carl", "Dave"]),
        &matrices,
        &scorer(),
    )
    .unwrap();
    assert!(matches!(
        &defender.recommendation,
        Choice::Single(name) if name == "Alice" || name == "Bob"
    ));
    assert_eq!(defender.all_options.len(), 2);

    // Alice defends, Carl is announced; only Bob remains, so no pair exists.
    let attackers = RecommendationRequest {
        decision_type: DecisionType::PickAttackers,
        unpaired_your_team: names(&["Bob"]),
        unpaired_opponent_team: names(&["Dave"]),
        your_defender: Some("Alice".into()),
        opponent_defender: Some("Carl".into()),
        opponent_attackers: None,
    };
    assert_eq!(
        recommend(&attackers, &matrices, &scorer()).unwrap_err(),
        RecommendError::InsufficientPlayers {
            required: 2,
            available: 1
        }
    );
}

#[test]
fn optimizer_produces_a_full_round_plan() {
    let yours = names(&["Laurence", "Byron", "Denis", "Sam", "Euan"]);
    let theirs = names(&["Jack", "John", "James", "Jim", "Joe"]);

    let mut matrices = MatrixSet::new();
    matrices.insert(
        "Laurence",
        matrix(&[("Jack", 15), ("John", 8), ("James", 12), ("Jim", 6), ("Joe", 11)]),
    );
    matrices.insert(
        "Byron",
        matrix(&[("Jack", 9), ("John", 14), ("James", 10), ("Jim", 16), ("Joe", 7)]),
    );
    matrices.insert(
        "Denis",
        matrix(&[("Jack", 11), ("John", 7), ("James", 18), ("Jim", 10), ("Joe", 13)]),
    );
    matrices.insert(
        "Sam",
        matrix(&[("Jack", 8), ("John", 12), ("James", 9), ("Jim", 13), ("Joe", 15)]),
    );
    matrices.insert(
        "Euan",
        matrix(&[("Jack", 13), ("John", 16), ("James", 6), ("Jim", 11), ("Joe", 9)]),
    );

    let optimizer = RoundOptimizer::new(&yours, &theirs, &matrices);
    let plan = optimizer.optimize(3000, 7).unwrap();

    assert!(yours.contains(&plan.best_defender));
    assert_eq!(plan.best_attackers.len(), 2);
    assert!(!plan.best_attackers.contains(&plan.best_defender));
    assert!(plan.worst_case_score <= plan.expected_score);
    assert!(plan.expected_score <= plan.best_case_score);
    assert!(plan.simulations_run >= 1);
    assert!(plan.confidence > 0.0 && plan.confidence <= 1.0);

    assert_eq!(plan.decision_tree.len(), theirs.len());
    for chosen in plan.decision_tree.values() {
        assert!(plan.best_attackers.contains(chosen));
    }

    // Same inputs, same seed, same plan (wall-clock time aside).
    let again = optimizer.optimize(3000, 7).unwrap();
    assert_eq!(plan.best_defender, again.best_defender);
    assert_eq!(plan.best_attackers, again.best_attackers);
    assert_eq!(plan.expected_score, again.expected_score);
    assert_eq!(plan.confidence, again.confidence);
    assert_eq!(plan.decision_tree, again.decision_tree);
}

#[test]
fn optimizer_needs_three_players_a_side() {
    let yours = names(&["Alice", "Bob"]);
    let theirs = names(&["Carl", "Dave", "Erin"]);
    let matrices = MatrixSet::new();
    let err = RoundOptimizer::new(&yours, &theirs, &matrices)
        .optimize(100, 1)
        .unwrap_err();
    assert_eq!(
        err,
        RecommendError::InsufficientPlayers {
            required: 3,
            available: 2
        }
    );
}
