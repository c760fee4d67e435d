//! BDD step definitions for the poll loop feature

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use equipguard::poller::Poller;
use equipguard::prediction::{HealthStatus, PredictionResult, Predictor};
use equipguard::reading::Reading;
use equipguard::state::new_state_handle;
use equipguard::EquipGuardError;

use crate::world::EquipGuardWorld;

/// A predictor whose answer can be changed between cycles
#[derive(Debug, Default)]
pub struct ScriptedPredictor {
    answer: Mutex<Option<PredictionResult>>,
    calls: AtomicU32,
}

impl ScriptedPredictor {
    pub fn answering(result: PredictionResult) -> Self {
        Self {
            answer: Mutex::new(Some(result)),
            calls: AtomicU32::new(0),
        }
    }

    fn start_failing(&self) {
        *self.answer.lock().unwrap() = None;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Predictor for ScriptedPredictor {
    async fn predict(&self, _reading: &Reading) -> equipguard::Result<PredictionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EquipGuardError::Http("connection refused".to_string()))
    }
}

fn scripted(world: &EquipGuardWorld) -> Arc<ScriptedPredictor> {
    Arc::clone(world.scripted.as_ref().expect("prediction service not set"))
}

fn build_poller(world: &mut EquipGuardWorld, interval: Duration) -> Poller {
    let predictor = scripted(world);
    let state = world.state.get_or_insert_with(new_state_handle).clone();
    Poller::new(predictor as Arc<dyn Predictor>, state, interval)
        .expect("valid interval")
        .with_seed(11)
}

async fn run_cycles(world: &mut EquipGuardWorld, cycles: usize) {
    let mut poller = build_poller(world, Duration::from_millis(2000));
    for _ in 0..cycles {
        let _ = poller.poll_once().await;
    }
}

#[given(expr = "a prediction service that answers {string} with anomaly")]
fn service_answers_with_anomaly(world: &mut EquipGuardWorld, status: String) {
    world.scripted = Some(Arc::new(ScriptedPredictor::answering(PredictionResult {
        status: HealthStatus::from(status),
        is_anomaly: true,
    })));
}

#[given(expr = "a prediction service that answers {string} without anomaly")]
fn service_answers_without_anomaly(world: &mut EquipGuardWorld, status: String) {
    world.scripted = Some(Arc::new(ScriptedPredictor::answering(PredictionResult {
        status: HealthStatus::from(status),
        is_anomaly: false,
    })));
}

#[given("a prediction service that is unreachable")]
fn service_unreachable(world: &mut EquipGuardWorld) {
    world.scripted = Some(Arc::new(ScriptedPredictor::default()));
}

#[given("one poll cycle has run")]
async fn one_cycle_has_run(world: &mut EquipGuardWorld) {
    run_cycles(world, 1).await;
}

#[given(expr = "the poller is running every {int} milliseconds")]
fn poller_running(world: &mut EquipGuardWorld, interval_ms: u64) {
    let poller = build_poller(world, Duration::from_millis(interval_ms));
    world.poller = Some(poller.start(CancellationToken::new()));
}

#[when("the prediction service starts failing")]
async fn service_starts_failing(world: &mut EquipGuardWorld) {
    scripted(world).start_failing();
    let state = world.state.as_ref().expect("state not set");
    world.snapshot = Some(state.read().await.clone());
}

#[when("one poll cycle runs")]
async fn one_cycle_runs(world: &mut EquipGuardWorld) {
    run_cycles(world, 1).await;
}

#[when(expr = "{int} poll cycles run")]
async fn many_cycles_run(world: &mut EquipGuardWorld, cycles: usize) {
    run_cycles(world, cycles).await;
}

#[when(expr = "the poller has run for {int} milliseconds")]
async fn poller_has_run(_world: &mut EquipGuardWorld, millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[when("the poller is stopped")]
async fn poller_stopped(world: &mut EquipGuardWorld) {
    let handle = world.poller.take().expect("poller not running");
    handle.stop().await;
    world.calls_at_stop = Some(scripted(world).calls());
    let state = world.state.as_ref().expect("state not set");
    world.snapshot = Some(state.read().await.clone());
}

#[then(expr = "the status should be {string}")]
async fn status_should_be(world: &mut EquipGuardWorld, expected: String) {
    let state = world.state.as_ref().expect("state not set").read().await;
    assert_eq!(state.status.to_string(), expected);
}

#[then("the anomaly flag should be set")]
async fn anomaly_flag_set(world: &mut EquipGuardWorld) {
    let state = world.state.as_ref().expect("state not set").read().await;
    assert!(state.is_anomaly);
}

#[then("the anomaly flag should be clear")]
async fn anomaly_flag_clear(world: &mut EquipGuardWorld) {
    let state = world.state.as_ref().expect("state not set").read().await;
    assert!(!state.is_anomaly);
}

#[then(expr = "the history should contain {int} point(s)")]
async fn history_length(world: &mut EquipGuardWorld, expected: usize) {
    let state = world.state.as_ref().expect("state not set").read().await;
    assert_eq!(state.history.len(), expected);
}

#[then("the dashboard state should be unchanged")]
async fn state_unchanged(world: &mut EquipGuardWorld) {
    let snapshot = world.snapshot.as_ref().expect("no snapshot taken");
    let state = world.state.as_ref().expect("state not set").read().await;
    assert_eq!(&*state, snapshot);
}

#[then(expr = "no further predictions are requested within {int} milliseconds")]
async fn no_further_predictions(world: &mut EquipGuardWorld, millis: u64) {
    let calls_at_stop = world.calls_at_stop.expect("poller was not stopped");
    assert!(calls_at_stop > 0, "poller never ran");
    tokio::time::sleep(Duration::from_millis(millis)).await;
    assert_eq!(scripted(world).calls(), calls_at_stop);
    let snapshot = world.snapshot.as_ref().expect("no snapshot taken");
    let state = world.state.as_ref().expect("state not set").read().await;
    assert_eq!(&*state, snapshot);
}
