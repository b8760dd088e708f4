use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use strategium::config::{DEFAULT_SCORING_SEED, DEFAULT_SIMULATIONS};
use strategium::server::{run_server, ServerConfig};

const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_OPTIMIZE_SIMULATIONS: usize = 10_000;

#[derive(Debug, Parser)]
#[command(name = "strategium_server")]
#[command(about = "Launch the pairing coordination API server", long_about = None)]
struct Args {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "STRATEGIUM_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Simulation count per scored candidate in recommendations
    #[arg(long, env = "STRATEGIUM_SIMULATIONS", default_value_t = DEFAULT_SIMULATIONS)]
    simulations: usize,

    /// Seed for the deterministic scoring RNG
    #[arg(long, env = "STRATEGIUM_SCORING_SEED", default_value_t = DEFAULT_SCORING_SEED)]
    scoring_seed: u64,

    /// Total simulation budget for the full-round optimizer
    #[arg(long, env = "STRATEGIUM_OPTIMIZE_SIMULATIONS", default_value_t = DEFAULT_OPTIMIZE_SIMULATIONS)]
    optimize_simulations: usize,

    /// Skip seeding the demo tournament on startup
    #[arg(long, env = "STRATEGIUM_NO_SEED", default_value_t = false)]
    no_seed: bool,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "STRATEGIUM_LOG_JSON", default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing(args.json);

    let config = ServerConfig {
        bind: args.bind,
        simulations: args.simulations,
        scoring_seed: args.scoring_seed,
        optimize_simulations: args.optimize_simulations,
        seed_demo: !args.no_seed,
    };
    run_server(config).await.context("server failed")
}

fn load_dotenv() {
    let manifest_env = env!("CARGO_MANIFEST_DIR");
    let manifest_env_path = PathBuf::from(manifest_env).join(".env");
    dotenv::from_filename(manifest_env_path).ok();
    dotenv::dotenv().ok();
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(false);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
}
