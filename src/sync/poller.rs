use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::session::{MatrixSet, SessionCode, SessionRegistry};

const LOG_TARGET: &str = "strategium::sync::poller";

/// Where a poller fetches matrix snapshots from. Implemented over HTTP by
/// the client and in-process by [`RegistryMatrixSource`].
#[async_trait]
pub trait MatrixSource: Send + Sync {
    async fn fetch_matrices(&self) -> Result<MatrixSet>;
}

/// In-process source reading straight from a shared registry.
pub struct RegistryMatrixSource {
    registry: Arc<SessionRegistry>,
    code: SessionCode,
}

impl RegistryMatrixSource {
    pub fn new(registry: Arc<SessionRegistry>, code: SessionCode) -> Self {
        Self { registry, code }
    }
}

#[async_trait]
impl MatrixSource for RegistryMatrixSource {
    async fn fetch_matrices(&self) -> Result<MatrixSet> {
        Ok(self.registry.matrices(&self.code).await?)
    }
}

/// Captain-side convergence loop standing in for push delivery: refetch the
/// snapshot on a fixed period until the submission count reaches `required`,
/// then stop. One fetch per tick, no retry storm.
pub struct MatrixPoller {
    period: Duration,
    required: usize,
}

impl MatrixPoller {
    pub fn new(period: Duration, required: usize) -> Self {
        Self { period, required }
    }

    pub fn with_default_period(required: usize) -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, required)
    }

    /// Poll until complete or cancelled. A failed fetch is logged and the
    /// loop simply waits for the next tick; a single missed tick is never
    /// surfaced to the captain.
    pub async fn run<S>(&self, source: &S, cancel: &CancellationToken) -> Option<MatrixSet>
    where
        S: MatrixSource + ?Sized,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(target: LOG_TARGET, "poll loop cancelled");
                    return None;
                }
                _ = ticker.tick() => {
                    match source.fetch_matrices().await {
                        Ok(snapshot) => {
                            if snapshot.is_complete(self.required) {
                                info!(
                                    target: LOG_TARGET,
                                    submitted = snapshot.submitted_count(),
                                    required = self.required,
                                    "all matrices submitted"
                                );
                                return Some(snapshot);
                            }
                            debug!(
                                target: LOG_TARGET,
                                submitted = snapshot.submitted_count(),
                                required = self.required,
                                "waiting for submissions"
                            );
                        }
                        Err(error) => {
                            warn!(
                                target: LOG_TARGET,
                                %error,
                                "matrix fetch failed, retrying on next tick"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;

    use super::*;
    use crate::session::PredictionMatrix;

    /// Source that errors for the first few fetches, then fills the store
    /// one matrix per call.
    struct FlakySource {
        calls: AtomicUsize,
        failures: usize,
        team: Vec<&'static str>,
    }

    #[async_trait]
    impl MatrixSource for FlakySource {
        async fn fetch_matrices(&self) -> Result<MatrixSet> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(anyhow!("transient fetch failure"));
            }
            let visible = (call - self.failures + 1).min(self.team.len());
            let mut set = MatrixSet::new();
            for name in &self.team[..visible] {
                set.insert(
                    *name,
                    PredictionMatrix::from_scores([("Opp".to_string(), 10)]).unwrap(),
                );
            }
            Ok(set)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_complete_despite_transient_failures() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
            failures: 2,
            team: vec!["Alice", "Bob", "Cara"],
        };
        let poller = MatrixPoller::new(Duration::from_secs(2), 3);
        let cancel = CancellationToken::new();

        let snapshot = poller.run(&source, &cancel).await.expect("should complete");
        assert_eq!(snapshot.submitted_count(), 3);
        // 2 failing ticks + 3 growing snapshots before completeness held.
        assert_eq!(source.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn default_period_poller_returns_once_the_snapshot_is_complete() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
            failures: 0,
            team: vec!["Alice"],
        };
        let poller = MatrixPoller::with_default_period(1);
        let cancel = CancellationToken::new();

        let snapshot = poller.run(&source, &cancel).await.expect("should complete");
        assert_eq!(snapshot.submitted_count(), 1);
        // The first tick fires immediately; one fetch is enough here.
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop_without_a_snapshot() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
            failures: 0,
            team: vec!["Alice"],
        };
        // Requires more players than the source will ever report.
        let poller = MatrixPoller::new(Duration::from_secs(2), 5);
        let cancel = CancellationToken::new();

        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            cancel_clone.cancel();
        });

        assert!(poller.run(&source, &cancel).await.is_none());
    }
}
