//! Shared dashboard state: current status and the bounded telemetry history

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::prediction::{HealthStatus, PredictionResult};
use crate::reading::Reading;

/// Number of poll cycles retained for charting
pub const HISTORY_CAPACITY: usize = 20;

/// One retained poll cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub temperature: f64,
    pub vibration: f64,
    pub status: HealthStatus,
}

/// State shown by the dashboard. Written only by the poll loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub status: HealthStatus,
    pub is_anomaly: bool,
    pub history: VecDeque<HistoryPoint>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            status: HealthStatus::Healthy,
            is_anomaly: false,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful cycle, evicting the oldest point when full
    pub fn apply(
        &mut self,
        reading: &Reading,
        result: &PredictionResult,
        timestamp: String,
    ) -> HistoryPoint {
        self.status = result.status.clone();
        self.is_anomaly = result.is_anomaly;

        let point = HistoryPoint {
            timestamp,
            temperature: reading.temperature,
            vibration: reading.vibration,
            status: result.status.clone(),
        };
        if self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(point.clone());
        point
    }

    /// Most recent history point, if any
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.history.back()
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new()))
}
