//! Deposit module - wallet-to-bot transfers
//!
//! The builder turns an amount into an unsigned transfer, the signing
//! authority and ledger client are the external collaborators, and the
//! orchestrator sequences them for one attempt.

pub mod types;
pub mod builder;
pub mod ledger;
pub mod signer;
pub mod orchestrator;

// Re-export main types
pub use types::{
    AmountError, PreconditionError, DepositError, SigningError,
    UnsignedTransfer, SignedTransfer, DepositReceipt, DepositOutcome,
};

// Re-export key components
pub use builder::{build_transfer, sol_to_lamports, lamports_to_sol, validate_amount};
pub use ledger::{LedgerClient, RpcLedgerClient};
pub use signer::{SigningAuthority, TransferApproval, KeypairSigner, ApprovingSigner};
pub use orchestrator::{DepositOrchestrator, WalletConnector};
