//! Lifecycle actions against the backend, published as presentation events.
//!
//! Errors never escape as panics; each action turns its failure into status
//! text and hands the error back to the caller.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::presentation::Presenter;
use crate::service::client::ServiceBackend;
use crate::service::types::{
    BurnResponse, RunBotResponse, ServiceError, ServiceStatusSnapshot, DEFAULT_USER_ID,
};
use crate::types::Identity;

pub struct ServiceController {
    backend: Arc<dyn ServiceBackend>,
    presenter: Presenter,
    user_id: String,
}

impl ServiceController {
    pub fn new(backend: Arc<dyn ServiceBackend>, presenter: Presenter) -> Self {
        Self {
            backend,
            presenter,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }

    /// Identify requests by wallet instead of the shared default user.
    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.user_id = identity
            .map(|identity| identity.to_string())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Start the accumulation job, then refresh logs and counters.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn run_bot(&self) -> Result<RunBotResponse, ServiceError> {
        match self.backend.run_bot(&self.user_id).await {
            Ok(response) => {
                info!("Bot run started: {}", response.logs);
                self.presenter
                    .status(format!("Bot running... Logs: {}", response.logs));
                tokio::join!(self.refresh_logs(), self.refresh_counters());
                Ok(response)
            }
            Err(e) => {
                error!("Run failed: {}", e);
                self.presenter.status(format!("Run failed: {}", e));
                Err(e)
            }
        }
    }

    /// Trigger burn and reclaim, then refresh counters once.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn burn(&self) -> Result<BurnResponse, ServiceError> {
        match self.backend.burn(&self.user_id).await {
            Ok(response) => {
                info!("Burn reclaimed {} SOL", response.reclaimed);
                self.presenter
                    .status(format!("Burned! Reclaimed: {} SOL", response.reclaimed));
                self.refresh_counters().await;
                Ok(response)
            }
            Err(e) => {
                error!("Burn failed: {}", e);
                self.presenter.status(format!("Burn failed: {}", e));
                Err(e)
            }
        }
    }

    /// Fetch and publish the service counters.
    #[instrument(skip(self))]
    pub async fn check_status(&self) -> Result<ServiceStatusSnapshot, ServiceError> {
        match self.backend.fetch_status().await {
            Ok(snapshot) => {
                self.presenter.counters(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                error!("Status check failed: {}", e);
                self.presenter
                    .status(format!("Status check failed: {}", e));
                Err(e)
            }
        }
    }

    /// Fetch and publish recent logs.
    #[instrument(skip(self))]
    pub async fn refresh_logs(&self) -> Vec<String> {
        let lines = self.backend.fetch_logs().await;
        self.presenter.logs(lines.clone());
        lines
    }

    // Follow-up refresh after an action; failure must not replace the
    // action's own status text.
    async fn refresh_counters(&self) {
        match self.backend.fetch_status().await {
            Ok(snapshot) => self.presenter.counters(snapshot),
            Err(e) => warn!("Counter refresh failed: {}", e),
        }
    }
}
