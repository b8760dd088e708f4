use serde::{Deserialize, Serialize};

pub type TournamentId = u32;
pub type TeamId = u32;
pub type PlayerId = u32;

/// Roster player. Army and archetype are display-only labels; they never
/// feed into scoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub army: Option<String>,
    pub archetype: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub teams: Vec<Team>,
}

impl Tournament {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }
}

/// Input shapes for tournament creation, before ids are assigned.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerDraft {
    pub name: String,
    #[serde(default)]
    pub army: Option<String>,
    #[serde(default)]
    pub archetype: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamDraft {
    pub name: String,
    pub players: Vec<PlayerDraft>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TournamentDraft {
    pub name: String,
    pub teams: Vec<TeamDraft>,
}
