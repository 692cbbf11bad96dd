//! Transfer payloads, receipts and the deposit error taxonomy.

use rust_decimal::Decimal;
use solana_sdk::message::Message;
use solana_sdk::signature::Signature;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::types::{explorer_url, Identity, RecencyToken};

/// Reasons an amount cannot become a transfer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must be greater than zero, got {0}")]
    NotPositive(Decimal),
    #[error("amount {amount} exceeds the maximum deposit of {max} SOL")]
    AboveMaximum { amount: Decimal, max: Decimal },
    #[error("amount {0} is smaller than one lamport")]
    RoundsToZero(Decimal),
    #[error("amount {0} does not fit in a lamport count")]
    Overflow(Decimal),
}

/// Failures detected before anything is sent to the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("wallet not connected")]
    MissingIdentity,
    #[error("wallet cannot sign transactions")]
    MissingSigner,
    #[error("wallet unavailable: {0}")]
    SignerUnavailable(String),
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}

/// Outcome categories of a failed deposit attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DepositError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("network error: {0}")]
    Network(String),
    #[error("transaction rejected by wallet: {0}")]
    UserRejected(String),
    #[error("transaction submission failed: {0}")]
    Submission(String),
}

impl DepositError {
    /// Rejections are user decisions, not faults.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, DepositError::UserRejected(_))
    }
}

/// Errors reported by a signing authority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("user rejected the request: {0}")]
    Rejected(String),
    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

/// A single-instruction native transfer bound to a recent blockhash, ready
/// for signing. The source pays the network fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransfer {
    source: Identity,
    destination: Identity,
    lamports: u64,
    recent_blockhash: RecencyToken,
}

impl UnsignedTransfer {
    pub(crate) fn new(
        source: Identity,
        destination: Identity,
        lamports: u64,
        recent_blockhash: RecencyToken,
    ) -> Self {
        Self {
            source,
            destination,
            lamports,
            recent_blockhash,
        }
    }

    pub fn source(&self) -> &Identity {
        &self.source
    }

    pub fn destination(&self) -> &Identity {
        &self.destination
    }

    pub fn lamports(&self) -> u64 {
        self.lamports
    }

    pub fn recent_blockhash(&self) -> &RecencyToken {
        &self.recent_blockhash
    }

    /// Always the source identity.
    pub fn fee_payer(&self) -> &Identity {
        &self.source
    }

    /// Canonical signable message.
    pub fn message(&self) -> Message {
        let instruction =
            system_instruction::transfer(&self.source, &self.destination, self.lamports);
        Message::new_with_blockhash(&[instruction], Some(self.fee_payer()), &self.recent_blockhash)
    }

    /// Unsigned transaction carrying [`Self::message`].
    pub fn to_transaction(&self) -> Transaction {
        Transaction::new_unsigned(self.message())
    }
}

/// A transfer together with the signed transaction the wallet produced for it.
#[derive(Debug, Clone)]
pub struct SignedTransfer {
    transfer: UnsignedTransfer,
    transaction: Transaction,
}

impl SignedTransfer {
    /// Pair a transfer with its signed transaction. The transaction must carry
    /// exactly the transfer's message and a complete set of signatures.
    pub fn new(transfer: UnsignedTransfer, transaction: Transaction) -> Result<Self, SigningError> {
        if transaction.message != transfer.message() {
            return Err(SigningError::Unavailable(
                "signed transaction does not match the requested transfer".to_string(),
            ));
        }
        if !transaction.is_signed() {
            return Err(SigningError::Unavailable(
                "transaction returned without a signature".to_string(),
            ));
        }
        Ok(Self {
            transfer,
            transaction,
        })
    }

    pub fn transfer(&self) -> &UnsignedTransfer {
        &self.transfer
    }

    /// Wire form handed to the ledger for broadcast.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Fee payer signature, which is also the ledger's transaction id.
    pub fn signature(&self) -> Signature {
        self.transaction
            .signatures
            .first()
            .copied()
            .unwrap_or_default()
    }
}

/// Reference to a submitted (not necessarily confirmed) deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    pub signature: Signature,
    pub source: Identity,
    pub destination: Identity,
    pub amount_sol: Decimal,
    pub lamports: u64,
    /// Blockhash consumed by this attempt
    pub recent_blockhash: RecencyToken,
}

impl DepositReceipt {
    pub fn explorer_url(&self) -> String {
        explorer_url(&self.signature)
    }
}

/// Successful deposit plus the handle of its best-effort balance refresh.
///
/// The receipt is final as soon as this is returned; the refresh result only
/// affects the displayed balance.
#[derive(Debug)]
pub struct DepositOutcome {
    pub receipt: DepositReceipt,
    pub balance_refresh: JoinHandle<anyhow::Result<u64>>,
}
