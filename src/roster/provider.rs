use parking_lot::RwLock;
use tracing::debug;

use super::error::RosterError;
use super::types::{Team, TeamId, Tournament, TournamentDraft, TournamentId};

const LOG_TARGET: &str = "strategium::roster";

/// Boundary contract for tournament/team/player lookup. The pairing core
/// reads rosters through this trait and never mutates them.
pub trait RosterProvider: Send + Sync {
    fn create_tournament(&self, draft: TournamentDraft) -> Tournament;

    fn list_tournaments(&self) -> Vec<Tournament>;

    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, RosterError>;

    fn find_team(&self, tournament: TournamentId, team: TeamId) -> Result<Team, RosterError> {
        let record = self.get_tournament(tournament)?;
        record
            .team(team)
            .cloned()
            .ok_or(RosterError::TeamNotFound { tournament, team })
    }
}

#[derive(Default)]
struct RosterInner {
    next_tournament_id: TournamentId,
    next_team_id: TeamId,
    next_player_id: u32,
    tournaments: Vec<Tournament>,
}

/// In-memory roster backing the server and tests. Read-mostly, so a sync
/// lock is enough.
#[derive(Default)]
pub struct InMemoryRoster {
    inner: RwLock<RosterInner>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterProvider for InMemoryRoster {
    fn create_tournament(&self, draft: TournamentDraft) -> Tournament {
        let mut inner = self.inner.write();
        inner.next_tournament_id += 1;
        let tournament_id = inner.next_tournament_id;

        let mut teams = Vec::with_capacity(draft.teams.len());
        for team_draft in draft.teams {
            inner.next_team_id += 1;
            let team_id = inner.next_team_id;
            let mut players = Vec::with_capacity(team_draft.players.len());
            for player_draft in team_draft.players {
                inner.next_player_id += 1;
                players.push(super::types::Player {
                    id: inner.next_player_id,
                    name: player_draft.name,
                    army: player_draft.army,
                    archetype: player_draft.archetype,
                });
            }
            teams.push(Team {
                id: team_id,
                name: team_draft.name,
                players,
            });
        }

        let tournament = Tournament {
            id: tournament_id,
            name: draft.name,
            teams,
        };
        inner.tournaments.push(tournament.clone());

        debug!(
            target: LOG_TARGET,
            tournament_id,
            teams = tournament.teams.len(),
            "tournament created"
        );
        tournament
    }

    fn list_tournaments(&self) -> Vec<Tournament> {
        self.inner.read().tournaments.clone()
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, RosterError> {
        self.inner
            .read()
            .tournaments
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(RosterError::TournamentNotFound(id))
    }
}
