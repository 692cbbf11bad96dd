//! HTTP client for the service control backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::service::types::{
    ActionRequest, BurnResponse, RunBotResponse, ServiceError, ServiceStatusSnapshot,
    NO_LOGS_SENTINEL,
};

/// Remote lifecycle actions and reads exposed by the bot backend.
#[async_trait]
pub trait ServiceBackend: Send + Sync {
    /// Start (or report the already running) dust accumulation job.
    async fn run_bot(&self, user_id: &str) -> Result<RunBotResponse, ServiceError>;

    /// Burn accumulated dust and reclaim rent.
    async fn burn(&self, user_id: &str) -> Result<BurnResponse, ServiceError>;

    async fn fetch_status(&self) -> Result<ServiceStatusSnapshot, ServiceError>;

    /// Recent log lines. Never fails: any error yields `["No logs available"]`.
    async fn fetch_logs(&self) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    http: Client,
    base_url: String,
}

impl HttpServiceClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;
        Ok(Self::new(http, config.api_base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &ActionRequest,
    ) -> Result<T, ServiceError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Could not read body of {} response: {}", status, e);
                    String::new()
                }
            };
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ServiceBackend for HttpServiceClient {
    #[instrument(skip(self))]
    async fn run_bot(&self, user_id: &str) -> Result<RunBotResponse, ServiceError> {
        let request = ActionRequest {
            user_id: user_id.to_string(),
        };
        let response: RunBotResponse = self.post_json("/api/run-bot", &request).await?;
        debug!("Run bot response: {}", response.logs);
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn burn(&self, user_id: &str) -> Result<BurnResponse, ServiceError> {
        let request = ActionRequest {
            user_id: user_id.to_string(),
        };
        let response: BurnResponse = self.post_json("/api/burn", &request).await?;
        debug!("Burn reclaimed {} SOL", response.reclaimed);
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn fetch_status(&self) -> Result<ServiceStatusSnapshot, ServiceError> {
        self.get_json("/api/status").await
    }

    #[instrument(skip(self))]
    async fn fetch_logs(&self) -> Vec<String> {
        match self.get_json::<Vec<String>>("/api/logs").await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Failed to fetch logs: {}", e);
                vec![NO_LOGS_SENTINEL.to_string()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = HttpServiceClient::new(Client::new(), "https://bot.example.com/");
        assert_eq!(client.base_url(), "https://bot.example.com");
        assert_eq!(client.url("/api/status"), "https://bot.example.com/api/status");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::default().with_api_base_url("http://127.0.0.1:5000");
        let client = HttpServiceClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    }
}
