//! Poll loop: synthesize a reading, classify it, record the result

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::prediction::Predictor;
use crate::reading::Reading;
use crate::state::{HistoryPoint, StateHandle};

/// Consecutive failures after which the loop logs a streak warning
const FAILURE_STREAK_WARNING: u32 = 5;

/// Counts consecutive failed cycles
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FailureStreak {
    count: u32,
}

impl FailureStreak {
    /// Record a failure; returns true on the cycle that reaches the warning threshold
    fn record_failure(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.count == FAILURE_STREAK_WARNING
    }

    /// Record a success; returns the length of the streak it ended, if any
    fn record_success(&mut self) -> Option<u32> {
        let ended = std::mem::take(&mut self.count);
        (ended > 0).then_some(ended)
    }
}

/// Drives poll cycles against a predictor and writes results into shared state
pub struct Poller {
    predictor: Arc<dyn Predictor>,
    state: StateHandle,
    interval: Duration,
    rng: StdRng,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("predictor", &self.predictor)
            .field("interval", &self.interval)
            .finish()
    }
}

impl Poller {
    pub fn new(
        predictor: Arc<dyn Predictor>,
        state: StateHandle,
        interval: Duration,
    ) -> crate::Result<Self> {
        if interval.is_zero() {
            return Err(crate::EquipGuardError::Config(
                "Polling interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            predictor,
            state,
            interval,
            rng: StdRng::from_entropy(),
        })
    }

    /// Use a deterministic reading sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single poll cycle.
    ///
    /// On failure the shared state is left untouched.
    pub async fn poll_once(&mut self) -> crate::Result<HistoryPoint> {
        let reading = Reading::synthesize(&mut self.rng);
        tracing::debug!(
            "Synthesized reading: temperature={:.2} vibration={:.2} voltage={:.2} spike={}",
            reading.temperature,
            reading.vibration,
            reading.voltage,
            reading.is_spike()
        );

        let result = self.predictor.predict(&reading).await?;
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();

        let point = self.state.write().await.apply(&reading, &result, timestamp);
        tracing::debug!(
            "Prediction at {}: status={} anomaly={}",
            point.timestamp,
            result.status,
            result.is_anomaly
        );
        Ok(point)
    }

    /// Start polling in a background task.
    ///
    /// The first cycle runs one interval after start. Cycles never overlap: a
    /// tick that elapses while a request is outstanding is skipped.
    /// Cancelling `cancel` also stops the loop.
    pub fn start(self, cancel: CancellationToken) -> PollerHandle {
        let cancel = cancel.child_token();
        let loop_cancel = cancel.clone();
        tracing::info!("Polling every {:?}", self.interval);
        let task = tokio::spawn(async move {
            self.run(loop_cancel).await;
        });
        PollerHandle { cancel, task }
    }

    async fn run(mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut streak = FailureStreak::default();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                outcome = self.poll_once() => outcome,
            };

            match outcome {
                Ok(_) => {
                    if let Some(failed) = streak.record_success() {
                        tracing::info!(
                            "Prediction service recovered after {} failed cycles",
                            failed
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!("Poll cycle failed: {}", e);
                    if streak.record_failure() {
                        tracing::warn!(
                            "Prediction service has failed {} consecutive cycles",
                            streak.count
                        );
                    }
                }
            }
        }

        tracing::debug!("Poll loop cancelled");
    }
}

/// Handle to a running poll loop
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// True until the loop task has exited
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling and wait for the loop to exit.
    ///
    /// No request is issued and no state is written after this returns.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Poll loop ended abnormally: {}", e);
        }
        tracing::info!("Polling stopped");
    }
}
