use std::sync::Arc;

use axum::extract::Path;
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use tower_http::cors::CorsLayer;

use crate::recommend::{
    recommend, RecommendationRequest, RecommendationResult, RoundOptimizer, ScoringStrategy,
};
use crate::roster::{RosterProvider, Tournament, TournamentDraft, TournamentId};
use crate::session::{
    CreateSessionParams, PredictionMatrix, RoundSession, SessionCode, SessionRegistry,
};

use super::dto::{
    CreateSessionRequest, HealthResponse, MatricesResponse, MatrixSubmission, MatrixSubmitted,
    OptimizeResponse,
};
use super::error::ApiError;
use super::logging::log_requests;

/// Shared state injected into every handler.
pub struct AppContext {
    pub roster: Arc<dyn RosterProvider>,
    pub registry: Arc<SessionRegistry>,
    pub scorer: Arc<dyn ScoringStrategy>,
    pub optimize_simulations: usize,
    pub optimize_seed: u64,
}

/// Axum facade over the session/recommendation APIs.
pub struct StrategiumServer {
    router: Router,
}

impl StrategiumServer {
    pub fn new(context: Arc<AppContext>) -> Self {
        let router = Router::new()
            .route("/health", get(health))
            .route("/tournaments", post(create_tournament).get(list_tournaments))
            .route("/tournaments/:tournament_id", get(get_tournament))
            .route(
                "/tournaments/:tournament_id/sessions",
                get(list_tournament_sessions),
            )
            .route("/sessions", post(create_session))
            .route("/sessions/:code", get(get_session))
            .route("/sessions/:code/matrix", post(submit_matrix))
            .route("/sessions/:code/matrices", get(get_matrices))
            .route("/sessions/:code/recommend", post(get_recommendation))
            .route("/sessions/:code/optimize", post(optimize_pairings))
            .layer(middleware::from_fn(log_requests))
            .layer(CorsLayer::permissive())
            .layer(Extension(context));

        Self { router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
    })
}

async fn create_tournament(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(draft): Json<TournamentDraft>,
) -> Json<Tournament> {
    Json(ctx.roster.create_tournament(draft))
}

async fn list_tournaments(Extension(ctx): Extension<Arc<AppContext>>) -> Json<Vec<Tournament>> {
    Json(ctx.roster.list_tournaments())
}

async fn get_tournament(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(tournament_id): Path<TournamentId>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(ctx.roster.get_tournament(tournament_id)?))
}

async fn list_tournament_sessions(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(tournament_id): Path<TournamentId>,
) -> Json<Vec<RoundSession>> {
    Json(ctx.registry.list_for_tournament(tournament_id).await)
}

async fn create_session(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<RoundSession>, ApiError> {
    let session = ctx
        .registry
        .create(CreateSessionParams {
            tournament_id: request.tournament_id,
            your_team_id: request.your_team_id,
            opponent_team_id: request.opponent_team_id,
            round_number: request.round_number,
            round_name: request.round_name,
        })
        .await?;
    Ok(Json(session))
}

async fn get_session(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(code): Path<String>,
) -> Result<Json<RoundSession>, ApiError> {
    let code = SessionCode::parse(&code)?;
    Ok(Json(ctx.registry.get(&code).await?))
}

async fn submit_matrix(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(code): Path<String>,
    Json(submission): Json<MatrixSubmission>,
) -> Result<Json<MatrixSubmitted>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let matrix = PredictionMatrix::from_scores(submission.matrix)?;
    let total_submitted = ctx
        .registry
        .submit_matrix(&code, &submission.player_name, matrix)
        .await?;
    Ok(Json(MatrixSubmitted {
        message: "Matrix submitted".into(),
        player: submission.player_name,
        total_submitted,
    }))
}

async fn get_matrices(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(code): Path<String>,
) -> Result<Json<MatricesResponse>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let matrices = ctx.registry.matrices(&code).await?;
    let submitted_count = matrices.submitted_count();
    Ok(Json(MatricesResponse {
        session_code: code,
        matrices,
        submitted_count,
    }))
}

async fn get_recommendation(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(code): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let matrices = ctx.registry.matrices(&code).await?;
    if matrices.is_empty() {
        return Err(ApiError::bad_request("no matrices submitted"));
    }
    let result = recommend(&request, &matrices, ctx.scorer.as_ref())?;
    Ok(Json(result))
}

async fn optimize_pairings(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(code): Path<String>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let session = ctx.registry.get(&code).await?;

    let status = ctx.registry.submission_status(&code).await?;
    if !status.is_complete() {
        return Ok(Json(OptimizeResponse::Incomplete {
            error: "Not all players have submitted matrices".into(),
            submitted: status.submitted,
            required: status.required,
            missing: status.missing,
        }));
    }

    let your_team = ctx
        .roster
        .find_team(session.tournament_id, session.your_team_id)?;
    let opponent_team = ctx
        .roster
        .find_team(session.tournament_id, session.opponent_team_id)?;
    let your_names = your_team.player_names();
    let opponent_names = opponent_team.player_names();
    let matrices = ctx.registry.matrices(&code).await?;

    let plan = RoundOptimizer::new(&your_names, &opponent_names, &matrices)
        .optimize(ctx.optimize_simulations, ctx.optimize_seed)?;
    Ok(Json(OptimizeResponse::Plan(plan)))
}
