use tracing::info;

use super::provider::RosterProvider;
use super::types::{PlayerDraft, TeamDraft, Tournament, TournamentDraft};

const LOG_TARGET: &str = "strategium::roster::seed";

fn squad(names: &[&str], army: &str, archetype: &str) -> Vec<PlayerDraft> {
    names
        .iter()
        .map(|name| PlayerDraft {
            name: (*name).to_string(),
            army: Some(army.to_string()),
            archetype: Some(archetype.to_string()),
        })
        .collect()
}

/// Seed the demo tournament: two five-player teams ready for a round session.
pub fn seed_demo_tournament(roster: &dyn RosterProvider) -> Tournament {
    let tournament = roster.create_tournament(TournamentDraft {
        name: "Test Tournament 2024".into(),
        teams: vec![
            TeamDraft {
                name: "Fire and Dice Test".into(),
                players: squad(
                    &["Laurence", "Byron", "Denis", "Sam", "Euan"],
                    "Space Marines",
                    "Balanced",
                ),
            },
            TeamDraft {
                name: "Enemy Team 1".into(),
                players: squad(&["Jack", "John", "James", "Jim", "Joe"], "Chaos", "Aggressive"),
            },
        ],
    });

    info!(
        target: LOG_TARGET,
        tournament_id = tournament.id,
        name = %tournament.name,
        "seeded demo tournament"
    );
    tournament
}
