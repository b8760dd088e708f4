use super::types::{TeamId, TournamentId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("team {team} not found in tournament {tournament}")]
    TeamNotFound {
        tournament: TournamentId,
        team: TeamId,
    },
}
