//! Client configuration.
//!
//! Values come from defaults, then the environment (`DUST_*` variables, with
//! `.env` support in the binary), then command-line overrides.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

use crate::types::{max_deposit_sol, Identity, BOT_WALLET, DEFAULT_RPC_ENDPOINT};

/// Local address the backend listens on when run with its defaults.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Solana RPC endpoint
    pub rpc_endpoint: String,
    /// Base URL of the service control backend
    pub api_base_url: String,
    /// RPC timeout in seconds
    pub rpc_timeout_seconds: u64,
    /// HTTP timeout for backend calls in seconds
    pub http_timeout_seconds: u64,
    /// Largest accepted deposit, in SOL
    pub max_deposit_sol: Decimal,
    /// Deposit destination
    pub bot_wallet: Identity,
    /// Capacity of the presentation event channel
    pub event_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            rpc_timeout_seconds: 30,
            http_timeout_seconds: 30,
            max_deposit_sol: max_deposit_sol(),
            bot_wallet: BOT_WALLET,
            event_channel_capacity: 100,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `DUST_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(endpoint) = env::var("DUST_RPC_ENDPOINT") {
            config.rpc_endpoint = endpoint;
        }
        if let Ok(base_url) = env::var("DUST_API_BASE_URL") {
            config.api_base_url = base_url;
        }
        if let Ok(raw) = env::var("DUST_RPC_TIMEOUT_SECONDS") {
            config.rpc_timeout_seconds = raw
                .parse()
                .with_context(|| format!("Invalid DUST_RPC_TIMEOUT_SECONDS: {}", raw))?;
        }
        if let Ok(raw) = env::var("DUST_HTTP_TIMEOUT_SECONDS") {
            config.http_timeout_seconds = raw
                .parse()
                .with_context(|| format!("Invalid DUST_HTTP_TIMEOUT_SECONDS: {}", raw))?;
        }
        if let Ok(raw) = env::var("DUST_MAX_DEPOSIT_SOL") {
            config.max_deposit_sol = Decimal::from_str(&raw)
                .with_context(|| format!("Invalid DUST_MAX_DEPOSIT_SOL: {}", raw))?;
        }
        if let Ok(raw) = env::var("DUST_BOT_WALLET") {
            config.bot_wallet = Identity::from_str(&raw)
                .map_err(|e| anyhow!("Invalid DUST_BOT_WALLET {}: {}", raw, e))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the RPC endpoint.
    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rpc_endpoint = endpoint.into();
        self
    }

    /// Set the backend base URL.
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_rpc_timeout(mut self, seconds: u64) -> Self {
        self.rpc_timeout_seconds = seconds;
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    /// Set the deposit upper bound.
    pub fn with_max_deposit(mut self, max_sol: Decimal) -> Self {
        self.max_deposit_sol = max_sol;
        self
    }

    pub fn with_bot_wallet(mut self, wallet: Identity) -> Self {
        self.bot_wallet = wallet;
        self
    }

    /// Reject configurations no deposit could succeed under.
    pub fn validate(&self) -> Result<()> {
        if self.max_deposit_sol <= Decimal::ZERO {
            return Err(anyhow!(
                "max deposit must be positive, got {}",
                self.max_deposit_sol
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(anyhow!("API base URL must not be empty"));
        }
        if self.event_channel_capacity == 0 {
            return Err(anyhow!("event channel capacity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.rpc_endpoint, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.max_deposit_sol, Decimal::new(10, 0));
        assert_eq!(config.bot_wallet, BOT_WALLET);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .with_api_base_url("https://bot.example.com")
            .with_http_timeout(5)
            .with_max_deposit(Decimal::new(5, 1));

        assert_eq!(config.api_base_url, "https://bot.example.com");
        assert_eq!(config.http_timeout_seconds, 5);
        assert_eq!(config.max_deposit_sol.to_string(), "0.5");
    }

    #[test]
    fn test_config_rejects_non_positive_maximum() {
        let config = ClientConfig::default().with_max_deposit(Decimal::ZERO);
        assert!(config.validate().is_err());
    }
}
