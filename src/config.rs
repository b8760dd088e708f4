use std::time::Duration;

/// How often the captain-side poller refetches the matrix snapshot.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Simulation count per scored candidate in the default scoring strategy.
pub const DEFAULT_SIMULATIONS: usize = 500;

/// Fixed seed so repeated scoring calls with identical inputs rank identically.
pub const DEFAULT_SCORING_SEED: u64 = 0x5742_4147;
