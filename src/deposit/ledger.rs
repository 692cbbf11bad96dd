//! Ledger client contract and its Solana RPC implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::types::{Identity, RecencyToken};

/// Read/write access to the ledger network.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current balance of `identity` in lamports.
    async fn get_balance(&self, identity: &Identity) -> Result<u64>;

    /// A fresh blockhash. Callers must not reuse it across deposit attempts.
    async fn get_latest_blockhash(&self) -> Result<RecencyToken>;

    /// Broadcast a signed transaction and return its signature without
    /// waiting for confirmation.
    async fn submit(&self, transaction: &Transaction) -> Result<Signature>;
}

/// [`LedgerClient`] backed by a nonblocking Solana RPC client.
pub struct RpcLedgerClient {
    rpc: Arc<RpcClient>,
}

impl RpcLedgerClient {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    /// Connect to the configured endpoint with `confirmed` commitment.
    pub fn from_config(config: &ClientConfig) -> Self {
        let rpc = RpcClient::new_with_timeout_and_commitment(
            config.rpc_endpoint.clone(),
            Duration::from_secs(config.rpc_timeout_seconds),
            CommitmentConfig::confirmed(),
        );
        info!("Using RPC endpoint {}", config.rpc_endpoint);
        Self::new(Arc::new(rpc))
    }

    pub fn endpoint(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    #[instrument(skip_all, fields(identity = %identity))]
    async fn get_balance(&self, identity: &Identity) -> Result<u64> {
        let lamports = self
            .rpc
            .get_balance(identity)
            .await
            .context("Failed to fetch balance")?;
        debug!("Balance: {} lamports", lamports);
        Ok(lamports)
    }

    #[instrument(skip(self))]
    async fn get_latest_blockhash(&self) -> Result<RecencyToken> {
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .context("Failed to fetch latest blockhash")?;
        debug!("Latest blockhash: {}", blockhash);
        Ok(blockhash)
    }

    #[instrument(skip(self, transaction))]
    async fn submit(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = self
            .rpc
            .send_transaction(transaction)
            .await
            .context("Failed to send transaction")?;
        debug!("Submitted transaction {}", signature);
        Ok(signature)
    }
}
