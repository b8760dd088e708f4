use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::recommend::RoundPlan;
use crate::roster::{TeamId, TournamentId};
use crate::session::{MatrixSet, SessionCode};

fn default_round_number() -> u32 {
    1
}

fn default_round_name() -> String {
    "Round 1".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub tournament_id: TournamentId,
    pub your_team_id: TeamId,
    pub opponent_team_id: TeamId,
    #[serde(default = "default_round_number")]
    pub round_number: u32,
    #[serde(default = "default_round_name")]
    pub round_name: String,
}

/// Raw matrix submission; scores arrive unvalidated and may be out of range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSubmission {
    pub player_name: String,
    pub matrix: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSubmitted {
    pub message: String,
    pub player: String,
    pub total_submitted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatricesResponse {
    pub session_code: SessionCode,
    pub matrices: MatrixSet,
    pub submitted_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Mirror of the optimizer endpoint's two outcomes: either the round plan,
/// or the per-name submission gap when the store is not complete yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptimizeResponse {
    Incomplete {
        error: String,
        submitted: Vec<String>,
        required: Vec<String>,
        missing: Vec<String>,
    },
    Plan(RoundPlan),
}
