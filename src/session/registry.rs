use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::roster::{RosterProvider, TeamId, TournamentId};

use super::code::SessionCode;
use super::error::SessionError;
use super::matrix::{MatrixSet, PredictionMatrix};

const LOG_TARGET: &str = "strategium::session::registry";

#[derive(Clone, Debug)]
pub struct CreateSessionParams {
    pub tournament_id: TournamentId,
    pub your_team_id: TeamId,
    pub opponent_team_id: TeamId,
    pub round_number: u32,
    pub round_name: String,
}

/// Persistent view of a round session. Team bindings are immutable after
/// creation; only the matrix store behind the code grows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSession {
    pub code: SessionCode,
    pub tournament_id: TournamentId,
    pub your_team_id: TeamId,
    pub opponent_team_id: TeamId,
    pub round_number: u32,
    pub round_name: String,
    pub created_at: DateTime<Utc>,
}

/// Per-name submission view for captains. The completeness predicate itself
/// stays a cardinality check; `missing` lets a caller surface roster names
/// that have not submitted under their own name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub submitted: Vec<String>,
    pub required: Vec<String>,
    pub missing: Vec<String>,
}

impl SubmissionStatus {
    pub fn is_complete(&self) -> bool {
        self.submitted.len() >= self.required.len()
    }
}

struct SessionRecord {
    info: RoundSession,
    matrices: MatrixSet,
}

/// Session records behind one write lock; every mutating operation commits
/// or rejects atomically under that lock.
pub struct SessionRegistry {
    roster: Arc<dyn RosterProvider>,
    sessions: RwLock<HashMap<SessionCode, SessionRecord>>,
}

impl SessionRegistry {
    pub fn new(roster: Arc<dyn RosterProvider>) -> Self {
        Self {
            roster,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, params: CreateSessionParams) -> Result<RoundSession, SessionError> {
        self.roster
            .find_team(params.tournament_id, params.your_team_id)?;
        self.roster
            .find_team(params.tournament_id, params.opponent_team_id)?;

        let mut sessions = self.sessions.write().await;
        let mut rng = rand::thread_rng();
        let code = loop {
            let candidate = SessionCode::generate(&mut rng);
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let info = RoundSession {
            code: code.clone(),
            tournament_id: params.tournament_id,
            your_team_id: params.your_team_id,
            opponent_team_id: params.opponent_team_id,
            round_number: params.round_number,
            round_name: params.round_name,
            created_at: Utc::now(),
        };
        sessions.insert(
            code.clone(),
            SessionRecord {
                info: info.clone(),
                matrices: MatrixSet::new(),
            },
        );

        info!(
            target: LOG_TARGET,
            code = %code,
            tournament_id = info.tournament_id,
            round = info.round_number,
            total_sessions = sessions.len(),
            "session created"
        );
        Ok(info)
    }

    pub async fn get(&self, code: &SessionCode) -> Result<RoundSession, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(code)
            .map(|record| record.info.clone())
            .ok_or_else(|| SessionError::NotFound(code.to_string()))
    }

    /// Sessions bound to a tournament, oldest first.
    pub async fn list_for_tournament(&self, tournament_id: TournamentId) -> Vec<RoundSession> {
        let sessions = self.sessions.read().await;
        let mut found: Vec<RoundSession> = sessions
            .values()
            .filter(|record| record.info.tournament_id == tournament_id)
            .map(|record| record.info.clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        found
    }

    /// Store a player's matrix, replacing any earlier submission under the
    /// same name. Returns the total submitted count after the write.
    pub async fn submit_matrix(
        &self,
        code: &SessionCode,
        player_name: &str,
        matrix: PredictionMatrix,
    ) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions
            .get_mut(code)
            .ok_or_else(|| SessionError::NotFound(code.to_string()))?;
        let overwrite = record.matrices.contains(player_name);
        record.matrices.insert(player_name, matrix);

        debug!(
            target: LOG_TARGET,
            code = %code,
            player = player_name,
            overwrite,
            total_submitted = record.matrices.submitted_count(),
            "matrix stored"
        );
        Ok(record.matrices.submitted_count())
    }

    pub async fn matrices(&self, code: &SessionCode) -> Result<MatrixSet, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(code)
            .map(|record| record.matrices.clone())
            .ok_or_else(|| SessionError::NotFound(code.to_string()))
    }

    pub async fn submission_status(
        &self,
        code: &SessionCode,
    ) -> Result<SubmissionStatus, SessionError> {
        let session = self.get(code).await?;
        let team = self
            .roster
            .find_team(session.tournament_id, session.your_team_id)?;
        let required = team.player_names();

        let sessions = self.sessions.read().await;
        let record = sessions
            .get(code)
            .ok_or_else(|| SessionError::NotFound(code.to_string()))?;
        let submitted: Vec<String> = record
            .matrices
            .submitted_players()
            .map(str::to_string)
            .collect();
        let missing = required
            .iter()
            .filter(|name| !record.matrices.contains(name))
            .cloned()
            .collect();

        Ok(SubmissionStatus {
            submitted,
            required,
            missing,
        })
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
