pub mod error;
pub mod provider;
pub mod seed;
pub mod types;

pub use error::RosterError;
pub use provider::{InMemoryRoster, RosterProvider};
pub use seed::seed_demo_tournament;
pub use types::{
    Player, PlayerDraft, PlayerId, Team, TeamDraft, TeamId, Tournament, TournamentDraft,
    TournamentId,
};
