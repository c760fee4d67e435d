//! Error types for the equipguard service

/// Errors that can occur in the equipguard service
#[derive(Debug, thiserror::Error)]
pub enum EquipGuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for equipguard operations
pub type Result<T> = std::result::Result<T, EquipGuardError>;
