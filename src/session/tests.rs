#![cfg(test)]

use std::sync::Arc;

use crate::roster::{InMemoryRoster, PlayerDraft, RosterProvider, TeamDraft, TournamentDraft};

use super::code::SessionCode;
use super::error::SessionError;
use super::matrix::{MatrixSet, PredictionMatrix, NEUTRAL_SCORE};
use super::registry::{CreateSessionParams, SessionRegistry};

fn players(names: &[&str]) -> Vec<PlayerDraft> {
    names
        .iter()
        .map(|name| PlayerDraft {
            name: (*name).to_string(),
            army: None,
            archetype: None,
        })
        .collect()
}

struct Fixture {
    roster: Arc<InMemoryRoster>,
    registry: SessionRegistry,
    params: CreateSessionParams,
}

fn fixture() -> Fixture {
    let roster = Arc::new(InMemoryRoster::new());
    let tournament = roster.create_tournament(TournamentDraft {
        name: "League".into(),
        teams: vec![
            TeamDraft {
                name: "Ours".into(),
                players: players(&["Alice", "Bob", "Cara"]),
            },
            TeamDraft {
                name: "Theirs".into(),
                players: players(&["Carl", "Dave", "Erin"]),
            },
        ],
    });
    let params = CreateSessionParams {
        tournament_id: tournament.id,
        your_team_id: tournament.teams[0].id,
        opponent_team_id: tournament.teams[1].id,
        round_number: 1,
        round_name: "Round 1".into(),
    };
    let registry = SessionRegistry::new(roster.clone());
    Fixture {
        roster,
        registry,
        params,
    }
}

fn matrix(cells: &[(&str, i64)]) -> PredictionMatrix {
    PredictionMatrix::from_scores(cells.iter().map(|(name, s)| (name.to_string(), *s)))
        .expect("valid matrix")
}

#[tokio::test]
async fn submit_then_fetch_returns_exact_scores() {
    let fx = fixture();
    let session = fx.registry.create(fx.params.clone()).await.unwrap();

    for score in [0i64, 7, 20] {
        fx.registry
            .submit_matrix(&session.code, "Alice", matrix(&[("Carl", score)]))
            .await
            .unwrap();
        let snapshot = fx.registry.matrices(&session.code).await.unwrap();
        assert_eq!(snapshot.score("Alice", "Carl"), score as u8);
    }
}

#[tokio::test]
async fn out_of_range_scores_reject_whole_submission() {
    for bad in [-1i64, 21, 1000] {
        let err = PredictionMatrix::from_scores([
            ("Carl".to_string(), 5),
            ("Dave".to_string(), bad),
        ])
        .unwrap_err();
        assert!(matches!(err, SessionError::InvalidScore { score, .. } if score == bad));
    }
}

#[tokio::test]
async fn resubmission_overwrites_never_merges() {
    let fx = fixture();
    let session = fx.registry.create(fx.params.clone()).await.unwrap();

    fx.registry
        .submit_matrix(&session.code, "Alice", matrix(&[("Carl", 5), ("Dave", 12)]))
        .await
        .unwrap();
    fx.registry
        .submit_matrix(&session.code, "Alice", matrix(&[("Carl", 15)]))
        .await
        .unwrap();

    let snapshot = fx.registry.matrices(&session.code).await.unwrap();
    assert_eq!(snapshot.score("Alice", "Carl"), 15);
    // The earlier Dave entry is gone; the neutral default applies again.
    assert_eq!(snapshot.score("Alice", "Dave"), NEUTRAL_SCORE);
    assert_eq!(snapshot.submitted_count(), 1);
}

#[test]
fn missing_cells_and_missing_players_read_as_neutral() {
    let mut set = MatrixSet::new();
    set.insert("Alice", matrix(&[("Carl", 3)]));
    assert_eq!(set.score("Alice", "Dave"), NEUTRAL_SCORE);
    assert_eq!(set.score("Nobody", "Carl"), NEUTRAL_SCORE);
}

#[tokio::test]
async fn completeness_is_a_cardinality_check() {
    let fx = fixture();
    let session = fx.registry.create(fx.params.clone()).await.unwrap();

    for name in ["Alice", "Bob"] {
        fx.registry
            .submit_matrix(&session.code, name, matrix(&[("Carl", 10)]))
            .await
            .unwrap();
    }
    let snapshot = fx.registry.matrices(&session.code).await.unwrap();
    assert!(!snapshot.is_complete(3));

    fx.registry
        .submit_matrix(&session.code, "Cara", matrix(&[("Carl", 10)]))
        .await
        .unwrap();
    let snapshot = fx.registry.matrices(&session.code).await.unwrap();
    assert!(snapshot.is_complete(3));

    let status = fx.registry.submission_status(&session.code).await.unwrap();
    assert!(status.is_complete());
    assert!(status.missing.is_empty());
}

#[tokio::test]
async fn lookup_is_case_insensitive() {
    let fx = fixture();
    let session = fx.registry.create(fx.params.clone()).await.unwrap();

    let lower = SessionCode::parse(&session.code.as_str().to_ascii_lowercase()).unwrap();
    let found = fx.registry.get(&lower).await.unwrap();
    assert_eq!(found, session);
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let fx = fixture();
    let code = SessionCode::parse("ZZZZZ9").unwrap();
    let err = fx.registry.get(&code).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));
}

#[test]
fn malformed_codes_are_rejected() {
    for raw in ["", "ABC", "ABCDEFG", "AB CD1", "ABC_12"] {
        assert!(matches!(
            SessionCode::parse(raw),
            Err(SessionError::MalformedCode(_))
        ));
    }
    assert_eq!(SessionCode::parse(" abc123 ").unwrap().as_str(), "ABC123");
}

#[tokio::test]
async fn create_rejects_unresolvable_team_ids() {
    let fx = fixture();
    let mut params = fx.params.clone();
    params.opponent_team_id = 999;
    let err = fx.registry.create(params).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidReference(_)));
}

#[tokio::test]
async fn code_alone_reconstructs_the_creating_captains_view() {
    let fx = fixture();
    let session = fx.registry.create(fx.params.clone()).await.unwrap();
    fx.registry
        .submit_matrix(&session.code, "Alice", matrix(&[("Carl", 15), ("Dave", 5)]))
        .await
        .unwrap();

    // A reattaching captain holds only the code.
    let resumed = fx.registry.get(&session.code).await.unwrap();
    let your_team = fx
        .roster
        .find_team(resumed.tournament_id, resumed.your_team_id)
        .unwrap();
    let opponent_team = fx
        .roster
        .find_team(resumed.tournament_id, resumed.opponent_team_id)
        .unwrap();
    let snapshot = fx.registry.matrices(&session.code).await.unwrap();

    assert_eq!(your_team.name, "Ours");
    assert_eq!(opponent_team.name, "Theirs");
    assert_eq!(snapshot.score("Alice", "Carl"), 15);
    assert_eq!(snapshot.submitted_count(), 1);
}
