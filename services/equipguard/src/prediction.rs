//! Prediction service client and result types

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::io::HttpClient;
use crate::reading::Reading;

/// Equipment health as classified by the prediction service.
///
/// The service speaks plain strings; values outside the known three are
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Warning,
    Critical,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
            HealthStatus::Other(s) => s,
        }
    }
}

impl From<String> for HealthStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Healthy" => HealthStatus::Healthy,
            "Warning" => HealthStatus::Warning,
            "Critical" => HealthStatus::Critical,
            _ => HealthStatus::Other(s),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub status: HealthStatus,
    pub is_anomaly: bool,
}

/// Response envelope of the /predict endpoint. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: PredictionResult,
}

/// Trait for classifying a reading
#[async_trait]
pub trait Predictor: Send + Sync + fmt::Debug {
    /// Classify one reading
    async fn predict(&self, reading: &Reading) -> crate::Result<PredictionResult>;
}

/// Predictor backed by the remote HTTP prediction service
pub struct RemotePredictor {
    endpoint: String,
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for RemotePredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotePredictor")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RemotePredictor {
    pub fn new(endpoint: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let endpoint = endpoint.into();
        tracing::debug!("Created RemotePredictor for {}", endpoint);
        Self { endpoint, http }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Predictor for RemotePredictor {
    async fn predict(&self, reading: &Reading) -> crate::Result<PredictionResult> {
        let body = serde_json::to_value(reading)?;
        let response = self.http.post_json(&self.endpoint, &body).await?;

        if !response.is_success() {
            return Err(crate::EquipGuardError::Prediction(format!(
                "{} returned status {}",
                self.endpoint, response.status
            )));
        }

        let parsed: PredictResponse = serde_json::from_str(&response.body).map_err(|e| {
            crate::EquipGuardError::Prediction(format!(
                "Malformed response from {}: {}",
                self.endpoint, e
            ))
        })?;

        Ok(parsed.prediction)
    }
}
