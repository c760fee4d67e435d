//! EquipGuard - predictive maintenance telemetry console
//!
//! Periodically synthesizes sensor readings, submits them to a remote
//! prediction service, and serves a live dashboard of the results.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod poller;
pub mod prediction;
pub mod reading;
pub mod state;
pub mod view;

pub use config::{load_config, Config};
pub use error::{EquipGuardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::{HttpClient, ReqwestHttpClient};
use crate::poller::Poller;
use crate::prediction::{Predictor, RemotePredictor};
use crate::state::StateHandle;

/// Assembles an [`EquipGuard`] service, with optional injected collaborators
pub struct EquipGuardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    predictor: Option<Arc<dyn Predictor>>,
    cancel: Option<CancellationToken>,
}

impl EquipGuardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            predictor: None,
            cancel: None,
        }
    }

    /// HTTP client used by the remote predictor
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the remote predictor entirely
    pub fn with_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<EquipGuard> {
        self.config.validate()?;

        let predictor: Arc<dyn Predictor> = match self.predictor {
            Some(predictor) => predictor,
            None => {
                let http: Arc<dyn HttpClient> = match self.http {
                    Some(http) => http,
                    None => Arc::new(ReqwestHttpClient::new()),
                };
                Arc::new(RemotePredictor::new(
                    self.config.predictor.endpoint.clone(),
                    http,
                ))
            }
        };

        let state = state::new_state_handle();
        let mut poller = Poller::new(
            predictor,
            Arc::clone(&state),
            self.config.polling.interval(),
        )?;
        if let Some(seed) = self.config.polling.seed {
            tracing::debug!("Using fixed reading seed {}", seed);
            poller = poller.with_seed(seed);
        }

        Ok(EquipGuard {
            config: self.config,
            poller,
            state,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A built service, ready to start
#[derive(Debug)]
pub struct EquipGuard {
    config: Config,
    poller: Poller,
    state: StateHandle,
    cancel: CancellationToken,
}

impl EquipGuard {
    /// Shared dashboard state
    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    /// Cancelling this token shuts the service down
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until the cancellation token fires or Ctrl-C is received
    pub async fn start(self) -> Result<()> {
        let cancel = self.cancel;

        let cancel_for_signal = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => {
                        tracing::info!("Shutdown signal received");
                        cancel_for_signal.cancel();
                    }
                    Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
                },
                _ = cancel_for_signal.cancelled() => {}
            }
        });

        let dashboard = if self.config.dashboard.enabled {
            let port = self.config.dashboard.port;
            let router = dashboard::build_router(Arc::clone(&self.state), self.poller.interval());
            let cancel_for_dashboard = cancel.clone();

            Some(tokio::spawn(async move {
                let addr = SocketAddr::from(([0, 0, 0, 0], port));
                let listener = match tokio::net::TcpListener::bind(addr).await {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::error!(
                            "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                            port,
                            e
                        );
                        return;
                    }
                };
                tracing::info!("Dashboard listening on http://{}", addr);

                if let Err(e) = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        cancel_for_dashboard.cancelled().await;
                    })
                    .await
                {
                    tracing::error!("Dashboard server failed: {}", e);
                }

                tracing::debug!("Dashboard stopped");
            }))
        } else {
            None
        };

        tracing::info!(
            "EquipGuard started, predicting via {}",
            self.config.predictor.endpoint
        );

        let handle = self.poller.start(cancel.clone());
        cancel.cancelled().await;
        handle.stop().await;

        if let Some(dashboard) = dashboard {
            dashboard
                .await
                .map_err(|e| EquipGuardError::Dashboard(format!("Dashboard task failed: {}", e)))?;
        }

        tracing::info!("EquipGuard stopped");
        Ok(())
    }
}
