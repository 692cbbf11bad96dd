//! Deposit orchestrator.
//!
//! Drives one deposit attempt: validate, fetch a fresh blockhash, build the
//! transfer, ask the wallet to sign, submit, then refresh the balance in the
//! background. Every failure stops the attempt where it happened; nothing is
//! retried. A new attempt always starts over with a new blockhash.
//!
//! Overlapping attempts are not serialized. Two calls in flight at once are
//! two independent chains, each with its own blockhash, and the balance
//! refresh that resolves last wins.

use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ClientConfig;
use crate::deposit::builder::{build_transfer, validate_amount};
use crate::deposit::ledger::LedgerClient;
use crate::deposit::signer::SigningAuthority;
use crate::deposit::types::{
    DepositError, DepositOutcome, DepositReceipt, PreconditionError, SigningError,
};
use crate::presentation::Presenter;
use crate::types::Identity;

/// Asks the user to connect a wallet. Does not connect one itself.
pub trait WalletConnector: Send + Sync {
    fn request_connection(&self);
}

impl<F> WalletConnector for F
where
    F: Fn() + Send + Sync,
{
    fn request_connection(&self) {
        self()
    }
}

pub struct DepositOrchestrator {
    ledger: Arc<dyn LedgerClient>,
    presenter: Presenter,
    connector: Arc<dyn WalletConnector>,
    destination: Identity,
    max_amount: Decimal,
}

impl DepositOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        presenter: Presenter,
        connector: Arc<dyn WalletConnector>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            ledger,
            presenter,
            connector,
            destination: config.bot_wallet,
            max_amount: config.max_deposit_sol,
        }
    }

    pub fn destination(&self) -> &Identity {
        &self.destination
    }

    /// Run one deposit attempt of `amount` SOL from the connected wallet.
    ///
    /// Returns as soon as the ledger accepts the transaction; confirmation is
    /// not awaited. The follow-up balance refresh runs on its own task and its
    /// failure does not affect the returned outcome.
    #[instrument(skip_all, fields(amount = %amount))]
    pub async fn deposit(
        &self,
        wallet: Option<&dyn SigningAuthority>,
        amount: Decimal,
    ) -> Result<DepositOutcome, DepositError> {
        match self.try_deposit(wallet, amount).await {
            Ok(outcome) => {
                self.presenter.status(format!(
                    "Deposited {} SOL! TX: {}",
                    amount,
                    outcome.receipt.explorer_url()
                ));
                Ok(outcome)
            }
            Err(err) => {
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    async fn try_deposit(
        &self,
        wallet: Option<&dyn SigningAuthority>,
        amount: Decimal,
    ) -> Result<DepositOutcome, DepositError> {
        let (wallet, source) = self.check_preconditions(wallet, amount)?;

        let recent_blockhash = self
            .ledger
            .get_latest_blockhash()
            .await
            .map_err(|e| DepositError::Network(format!("{:#}", e)))?;
        debug!("Binding deposit to blockhash {}", recent_blockhash);

        let transfer = build_transfer(
            source,
            self.destination,
            amount,
            self.max_amount,
            recent_blockhash,
        )
        .map_err(PreconditionError::from)?;
        let lamports = transfer.lamports();

        info!("Requesting signature for {} lamports to {}", lamports, self.destination);
        let signed = wallet.sign(transfer).await.map_err(|e| match e {
            SigningError::Rejected(reason) => DepositError::UserRejected(reason),
            SigningError::Unavailable(reason) => {
                PreconditionError::SignerUnavailable(reason).into()
            }
        })?;

        let signature = self
            .ledger
            .submit(signed.transaction())
            .await
            .map_err(|e| DepositError::Submission(format!("{:#}", e)))?;
        info!("Deposit submitted: {}", signature);

        let receipt = DepositReceipt {
            signature,
            source,
            destination: self.destination,
            amount_sol: amount,
            lamports,
            recent_blockhash,
        };
        let balance_refresh = self.spawn_balance_refresh(source);

        Ok(DepositOutcome {
            receipt,
            balance_refresh,
        })
    }

    fn check_preconditions<'a>(
        &self,
        wallet: Option<&'a dyn SigningAuthority>,
        amount: Decimal,
    ) -> Result<(&'a dyn SigningAuthority, Identity), PreconditionError> {
        let wallet = wallet.ok_or(PreconditionError::MissingIdentity)?;
        let source = wallet
            .current_identity()
            .ok_or(PreconditionError::MissingIdentity)?;
        if !wallet.can_sign() {
            return Err(PreconditionError::MissingSigner);
        }
        validate_amount(amount, self.max_amount)?;
        Ok((wallet, source))
    }

    fn report_failure(&self, err: &DepositError) {
        match err {
            DepositError::Precondition(reason) => {
                warn!("Wallet precondition not met: {}", reason);
                self.connector.request_connection();
            }
            DepositError::UserRejected(reason) => {
                info!("Deposit declined in wallet: {}", reason);
                self.presenter.status(format!("Deposit cancelled in wallet: {}", reason));
                return;
            }
            DepositError::Network(_) | DepositError::Submission(_) => {
                error!("Deposit failed: {}", err);
            }
        }
        self.presenter.status(format!("Error: {}", err));
    }

    fn spawn_balance_refresh(&self, identity: Identity) -> JoinHandle<Result<u64>> {
        let ledger = Arc::clone(&self.ledger);
        let presenter = self.presenter.clone();
        tokio::spawn(async move {
            match ledger.get_balance(&identity).await {
                Ok(lamports) => {
                    presenter.balance(lamports);
                    Ok(lamports)
                }
                Err(e) => {
                    warn!("Balance refresh after deposit failed: {:#}", e);
                    Err(e)
                }
            }
        })
    }

    /// Fetch and publish the balance of `identity`.
    #[instrument(skip(self))]
    pub async fn refresh_balance(&self, identity: Option<Identity>) -> Result<u64, DepositError> {
        let identity = match identity {
            Some(identity) => identity,
            None => {
                let err = DepositError::from(PreconditionError::MissingIdentity);
                self.report_failure(&err);
                return Err(err);
            }
        };

        match self.ledger.get_balance(&identity).await {
            Ok(lamports) => {
                self.presenter.balance(lamports);
                Ok(lamports)
            }
            Err(e) => {
                let err = DepositError::Network(format!("{:#}", e));
                error!("Balance refresh failed: {}", err);
                self.presenter.status(format!("Error: {}", err));
                Err(err)
            }
        }
    }
}
