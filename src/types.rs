//! Core types and constants shared by the deposit and service control flows.

use rust_decimal::Decimal;
use solana_sdk::pubkey;
use solana_sdk::signature::Signature;

/// Public key identifying a wallet holder.
pub type Identity = solana_sdk::pubkey::Pubkey;

/// Short-lived reference to recent ledger state ("latest blockhash").
pub type RecencyToken = solana_sdk::hash::Hash;

/// Custodial wallet receiving user deposits.
pub const BOT_WALLET: Identity = pubkey!("B99peTzS2ZRXkZLpcE3CbisFXkxZ77EEWwgkGRbkuWmb");

/// Wallet the service forwards its collected fees to.
pub const FEE_WALLET: Identity = pubkey!("9tzPdS72tm7vE8669BkghpsFaiR3Z1VS9K8rdEDeFQRD");

/// Atomic units (lamports) per whole SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Default public mainnet RPC endpoint
pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

pub const EXPLORER_TX_BASE: &str = "https://solscan.io/tx/";

/// Upper bound for a single deposit, in SOL (10.0).
pub fn max_deposit_sol() -> Decimal {
    Decimal::new(10, 0)
}

/// Input granularity offered to the user, in SOL (0.001).
pub fn deposit_step_sol() -> Decimal {
    Decimal::new(1, 3)
}

/// Whether `amount` is a whole number of input steps.
pub fn is_whole_step(amount: Decimal) -> bool {
    (amount % deposit_step_sol()).is_zero()
}

/// Explorer link for a submitted transaction.
pub fn explorer_url(signature: &Signature) -> String {
    format!("{}{}", EXPLORER_TX_BASE, signature)
}

/// Abbreviated display form of an identity, e.g. `B99peTzS...`.
pub fn short_identity(identity: &Identity) -> String {
    let full = identity.to_string();
    let prefix: String = full.chars().take(8).collect();
    format!("{}...", prefix)
}
