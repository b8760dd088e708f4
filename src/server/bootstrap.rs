use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::recommend::MonteCarloScoring;
use crate::roster::{seed_demo_tournament, InMemoryRoster, RosterProvider};
use crate::session::SessionRegistry;

use super::routes::{AppContext, StrategiumServer};

const LOG_TARGET: &str = "strategium::server::bootstrap";

pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Simulation count per scored candidate for recommendation requests.
    pub simulations: usize,
    pub scoring_seed: u64,
    /// Total simulation budget for the full-round optimizer endpoint.
    pub optimize_simulations: usize,
    /// Seed the demo tournament on startup so the API is usable immediately.
    pub seed_demo: bool,
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let roster: Arc<dyn RosterProvider> = Arc::new(InMemoryRoster::new());
    if config.seed_demo {
        seed_demo_tournament(roster.as_ref());
    }

    let registry = Arc::new(SessionRegistry::new(Arc::clone(&roster)));
    let scorer = Arc::new(MonteCarloScoring::new(
        config.simulations,
        config.scoring_seed,
    ));

    let context = Arc::new(AppContext {
        roster,
        registry,
        scorer,
        optimize_simulations: config.optimize_simulations,
        optimize_seed: config.scoring_seed,
    });

    let server = StrategiumServer::new(context);
    let make_service = server.into_router().into_make_service();

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!(target: LOG_TARGET, %local_addr, "strategium server listening");

    axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn shutdown_signal() {
    use tracing::warn;

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target: LOG_TARGET,
            error = %err,
            "failed to install ctrl-c handler"
        );
    }
    info!(target: LOG_TARGET, "shutdown signal received");
}
