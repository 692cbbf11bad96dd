//! dust-client - wallet deposit and service control client for the Solana dust bot
//!
//! Two independent flows share nothing but the presentation channel: the
//! deposit flow moves SOL from the user's wallet to the bot wallet, and the
//! service flow drives the remote bot (run, burn, status, logs).

pub mod types;
pub mod config;
pub mod deposit;
pub mod service;
pub mod presentation;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use deposit::{DepositError, DepositOrchestrator, DepositOutcome, DepositReceipt};
pub use presentation::{Dashboard, PresentationEvent, Presenter};
pub use service::{ServiceController, ServiceStatusSnapshot};
pub use types::{Identity, RecencyToken, BOT_WALLET, FEE_WALLET, LAMPORTS_PER_SOL};
