//! Configuration types for the equipguard service

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Remote prediction service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Fixed seed for reproducible readings
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            seed: None,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_endpoint() -> String {
    "https://equipguard.onrender.com/predict".to_string()
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    3000
}

impl Config {
    /// Reject settings the service cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let url = reqwest::Url::parse(&self.predictor.endpoint).map_err(|e| {
            crate::EquipGuardError::Config(format!(
                "Invalid predictor endpoint {:?}: {}",
                self.predictor.endpoint, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(crate::EquipGuardError::Config(format!(
                "Invalid predictor endpoint {:?}: scheme must be http or https",
                self.predictor.endpoint
            )));
        }
        if self.polling.interval_ms == 0 {
            return Err(crate::EquipGuardError::Config(
                "polling.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::EquipGuardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
