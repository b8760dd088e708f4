//! End-to-end walkthrough of one round session over the real HTTP surface:
//! serve the API on an ephemeral port, create a session through the client,
//! let "player" tasks trickle in their matrices, poll to completeness, then
//! drive the pairing negotiation following the engine's recommendations.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use strategium::client::{ApiClient, CaptainSession, RemoteMatrixSource};
use strategium::config::DEFAULT_SCORING_SEED;
use strategium::pairing::{PairingConductor, PairingStep};
use strategium::recommend::{Choice, MonteCarloScoring, RankedOption};
use strategium::roster::{seed_demo_tournament, InMemoryRoster, RosterProvider};
use strategium::server::dto::{CreateSessionRequest, MatrixSubmission, OptimizeResponse};
use strategium::server::{AppContext, StrategiumServer};
use strategium::session::SessionRegistry;
use strategium::sync::MatrixPoller;

const LOG_TARGET: &str = "bin::captain_demo";

fn sample_matrices() -> Vec<(&'static str, Vec<(&'static str, i64)>)> {
    vec![
        ("Laurence", vec![("Jack", 15), ("John", 8), ("James", 12), ("Jim", 6), ("Joe", 11)]),
        ("Byron", vec![("Jack", 9), ("John", 14), ("James", 10), ("Jim", 16), ("Joe", 7)]),
        ("Denis", vec![("Jack", 11), ("John", 7), ("James", 18), ("Jim", 10), ("Joe", 13)]),
        ("Sam", vec![("Jack", 8), ("John", 12), ("James", 9), ("Jim", 13), ("Joe", 15)]),
        ("Euan", vec![("Jack", 13), ("John", 16), ("James", 6), ("Jim", 11), ("Joe", 9)]),
    ]
}

/// Bind the full API on an ephemeral port and serve it in the background.
async fn serve_api() -> Result<Url> {
    let roster: Arc<dyn RosterProvider> = Arc::new(InMemoryRoster::new());
    seed_demo_tournament(roster.as_ref());
    let registry = Arc::new(SessionRegistry::new(Arc::clone(&roster)));
    let context = Arc::new(AppContext {
        roster,
        registry,
        scorer: Arc::new(MonteCarloScoring::default()),
        optimize_simulations: 10_000,
        optimize_seed: DEFAULT_SCORING_SEED,
    });

    let router = StrategiumServer::new(context).into_router();
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind an ephemeral port")?;
    let local_addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router.into_make_service()).await {
            tracing::error!(target: LOG_TARGET, %error, "api server exited");
        }
    });

    Ok(Url::parse(&format!("http://{local_addr}/"))?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::fmt().with_env_filter(filter).with_target(false).compact().init();

    let base = serve_api().await?;
    info!(target: LOG_TARGET, %base, "api server up");
    let client = ApiClient::new(base);

    let tournament = client
        .list_tournaments()
        .await?
        .into_iter()
        .next()
        .context("no seeded tournament")?;
    let your_team = tournament.teams[0].clone();
    let opponent_team = tournament.teams[1].clone();

    let session = client
        .create_session(&CreateSessionRequest {
            tournament_id: tournament.id,
            your_team_id: your_team.id,
            opponent_team_id: opponent_team.id,
            round_number: 1,
            round_name: "Round 1".into(),
        })
        .await?;
    info!(target: LOG_TARGET, code = %session.code, "share this code with your players");

    // Players submit independently, each a little later than the last.
    let submitter = {
        let client = client.clone();
        let code = session.code.clone();
        tokio::spawn(async move {
            for (i, (player, cells)) in sample_matrices().into_iter().enumerate() {
                tokio::time::sleep(Duration::from_millis(300 * (i as u64 + 1))).await;
                let matrix: BTreeMap<String, i64> = cells
                    .into_iter()
                    .map(|(name, score)| (name.to_string(), score))
                    .collect();
                let receipt = client
                    .submit_matrix(
                        &code,
                        &MatrixSubmission {
                            player_name: player.to_string(),
                            matrix,
                        },
                    )
                    .await?;
                info!(
                    target: LOG_TARGET,
                    player,
                    total = receipt.total_submitted,
                    "matrix submitted"
                );
            }
            Ok::<_, anyhow::Error>(())
        })
    };

    // Captain side: poll over the wire until every matrix is in.
    let source = RemoteMatrixSource::new(Arc::new(client.clone()), session.code.clone());
    let poller = MatrixPoller::with_default_period(your_team.players.len());
    let cancel = CancellationToken::new();
    poller
        .run(&source, &cancel)
        .await
        .ok_or_else(|| anyhow!("poller cancelled before completion"))?;
    submitter.await.context("submitter task panicked")??;

    // A pre-negotiation plan for the whole round.
    let plan = match client.optimize(&session.code).await? {
        OptimizeResponse::Plan(plan) => plan,
        OptimizeResponse::Incomplete {
            submitted, missing, ..
        } => {
            return Err(anyhow!(
                "optimizer refused with {} submitted, missing {missing:?}",
                submitted.len()
            ))
        }
    };
    info!(
        target: LOG_TARGET,
        defender = %plan.best_defender,
        attackers = ?plan.best_attackers,
        expected = plan.expected_score,
        confidence = plan.confidence,
        "round plan"
    );

    // Reattach from nothing but the code, as a restarted captain device would.
    let resumed = CaptainSession::resume(&client, &session.code).await?;
    anyhow::ensure!(resumed.is_ready(), "resumed view should see the full store");

    // Drive the negotiation, always taking the top recommendation.
    let scorer = Arc::new(MonteCarloScoring::default());
    let opponent_names = resumed.unpaired_opponent_team();
    let mut conductor = PairingConductor::begin(
        resumed.matrices.clone(),
        resumed.unpaired_your_team(),
        opponent_names.clone(),
        scorer,
    )?;

    let defender = match conductor.step() {
        PairingStep::PickDefender { recommendation } => {
            log_options("defender options", &recommendation.all_options);
            match &recommendation.recommendation {
                Choice::Single(name) => name.clone(),
                other => return Err(anyhow!("unexpected defender recommendation {other}")),
            }
        }
        other => return Err(anyhow!("unexpected entry step {}", other.name())),
    };
    conductor.pick_defender(&defender)?;
    info!(target: LOG_TARGET, %defender, "defender committed");

    // Stand-in for the opposing captain's announcement.
    let announced = opponent_names
        .first()
        .cloned()
        .context("opponent team is empty")?;
    conductor.record_opponent_defender(&announced)?;
    info!(target: LOG_TARGET, opponent_defender = %announced, "opponent defender recorded");

    let (first, second) = match conductor.step() {
        PairingStep::PickAttackers { recommendation, .. } => {
            log_options("attacker pair options", &recommendation.all_options);
            match &recommendation.recommendation {
                Choice::Pair(a, b) => (a.clone(), b.clone()),
                other => return Err(anyhow!("unexpected attacker recommendation {other}")),
            }
        }
        other => return Err(anyhow!("unexpected step {}", other.name())),
    };
    conductor.confirm_attackers(&first, &second)?;

    if let PairingStep::Complete {
        your_defender,
        opponent_defender,
        attackers,
    } = conductor.step()
    {
        info!(
            target: LOG_TARGET,
            defender = %your_defender,
            opponent_defender = %opponent_defender,
            attackers = ?attackers,
            remaining = ?conductor.unpaired_your_team(),
            "round step complete"
        );
    }
    Ok(())
}

fn log_options(label: &str, options: &[RankedOption]) {
    let summary: BTreeMap<String, f64> = options
        .iter()
        .map(|option| (option.choice.to_string(), option.expected_total_score))
        .collect();
    info!(target: LOG_TARGET, %label, options = ?summary, "ranked options");
}
