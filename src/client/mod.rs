use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::recommend::{RecommendationRequest, RecommendationResult};
use crate::roster::{Team, Tournament, TournamentId};
use crate::server::dto::{
    CreateSessionRequest, MatricesResponse, MatrixSubmission, MatrixSubmitted, OptimizeResponse,
};
use crate::session::{MatrixSet, RoundSession, SessionCode};
use crate::sync::MatrixSource;

/// HTTP client for the strategium API, one method per endpoint.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("invalid endpoint path {path}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        self.get_json("tournaments").await
    }

    pub async fn get_tournament(&self, id: TournamentId) -> Result<Tournament> {
        self.get_json(&format!("tournaments/{id}")).await
    }

    pub async fn tournament_sessions(&self, id: TournamentId) -> Result<Vec<RoundSession>> {
        self.get_json(&format!("tournaments/{id}/sessions")).await
    }

    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<RoundSession> {
        self.post_json("sessions", request).await
    }

    pub async fn get_session(&self, code: &SessionCode) -> Result<RoundSession> {
        self.get_json(&format!("sessions/{code}")).await
    }

    pub async fn submit_matrix(
        &self,
        code: &SessionCode,
        submission: &MatrixSubmission,
    ) -> Result<MatrixSubmitted> {
        self.post_json(&format!("sessions/{code}/matrix"), submission)
            .await
    }

    pub async fn get_matrices(&self, code: &SessionCode) -> Result<MatricesResponse> {
        self.get_json(&format!("sessions/{code}/matrices")).await
    }

    pub async fn get_recommendation(
        &self,
        code: &SessionCode,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult> {
        self.post_json(&format!("sessions/{code}/recommend"), request)
            .await
    }

    pub async fn optimize(&self, code: &SessionCode) -> Result<OptimizeResponse> {
        self.post_json(&format!("sessions/{code}/optimize"), &serde_json::json!({}))
            .await
    }
}

/// Everything a captain needs to drive (or re-drive) a session, rebuilt
/// from nothing but a code: the session record, both rosters, and the
/// current matrix snapshot.
pub struct CaptainSession {
    pub session: RoundSession,
    pub tournament: Tournament,
    pub your_team: Team,
    pub opponent_team: Team,
    pub matrices: MatrixSet,
}

impl CaptainSession {
    pub async fn resume(client: &ApiClient, code: &SessionCode) -> Result<Self> {
        let session = client
            .get_session(code)
            .await
            .context("session not found, check the code")?;
        let tournament = client.get_tournament(session.tournament_id).await?;
        let your_team = tournament
            .team(session.your_team_id)
            .cloned()
            .context("session references a team missing from the tournament")?;
        let opponent_team = tournament
            .team(session.opponent_team_id)
            .cloned()
            .context("session references a team missing from the tournament")?;
        let matrices = client.get_matrices(code).await?.matrices;

        Ok(Self {
            session,
            tournament,
            your_team,
            opponent_team,
            matrices,
        })
    }

    pub fn unpaired_your_team(&self) -> Vec<String> {
        self.your_team.player_names()
    }

    pub fn unpaired_opponent_team(&self) -> Vec<String> {
        self.opponent_team.player_names()
    }

    pub fn required_submissions(&self) -> usize {
        self.your_team.players.len()
    }

    pub fn is_ready(&self) -> bool {
        self.matrices.is_complete(self.required_submissions())
    }
}

/// HTTP-backed source for the captain-side matrix poller.
pub struct RemoteMatrixSource {
    client: Arc<ApiClient>,
    code: SessionCode,
}

impl RemoteMatrixSource {
    pub fn new(client: Arc<ApiClient>, code: SessionCode) -> Self {
        Self { client, code }
    }
}

#[async_trait]
impl MatrixSource for RemoteMatrixSource {
    async fn fetch_matrices(&self) -> Result<MatrixSet> {
        Ok(self.client.get_matrices(&self.code).await?.matrices)
    }
}
