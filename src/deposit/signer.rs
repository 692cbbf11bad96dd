//! Signing authority contract.
//!
//! The orchestrator never sees key material; it hands an [`UnsignedTransfer`]
//! to whatever wallet is connected and waits for it to come back signed or
//! rejected.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::deposit::types::{SignedTransfer, SigningError, UnsignedTransfer};
use crate::types::Identity;

/// An external wallet able to approve transfers on the user's behalf.
#[async_trait]
pub trait SigningAuthority: Send + Sync {
    /// Identity of the connected wallet, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Watch-only wallets expose an identity but cannot sign.
    fn can_sign(&self) -> bool {
        true
    }

    /// Sign `transfer`. May suspend indefinitely while the user decides.
    async fn sign(&self, transfer: UnsignedTransfer) -> Result<SignedTransfer, SigningError>;
}

/// User-facing approval step placed in front of a signer.
#[async_trait]
pub trait TransferApproval: Send + Sync {
    /// Returns `true` if the user accepted the transfer.
    async fn approve(&self, transfer: &UnsignedTransfer) -> bool;
}

/// Signs with a local keypair, without asking anyone.
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Load a keypair from a Solana CLI JSON keypair file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let keypair = read_keypair_file(path)
            .map_err(|e| anyhow!("Failed to read keypair {}: {}", path.display(), e))?;
        Ok(Self::new(keypair))
    }

    pub fn identity(&self) -> Identity {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl SigningAuthority for KeypairSigner {
    fn current_identity(&self) -> Option<Identity> {
        Some(self.keypair.pubkey())
    }

    #[instrument(skip(self, transfer), fields(lamports = transfer.lamports()))]
    async fn sign(&self, transfer: UnsignedTransfer) -> Result<SignedTransfer, SigningError> {
        if transfer.source() != &self.keypair.pubkey() {
            return Err(SigningError::Unavailable(format!(
                "transfer source {} is not this wallet ({})",
                transfer.source(),
                self.keypair.pubkey()
            )));
        }

        let mut transaction = transfer.to_transaction();
        transaction
            .try_sign(&[&self.keypair], *transfer.recent_blockhash())
            .map_err(|e| SigningError::Unavailable(e.to_string()))?;

        debug!("Signed transfer with local keypair");
        SignedTransfer::new(transfer, transaction)
    }
}

/// Wraps a signer so every transfer must pass an approval step first.
pub struct ApprovingSigner<S, A> {
    inner: S,
    approval: A,
}

impl<S, A> ApprovingSigner<S, A> {
    pub fn new(inner: S, approval: A) -> Self {
        Self { inner, approval }
    }
}

#[async_trait]
impl<S, A> SigningAuthority for ApprovingSigner<S, A>
where
    S: SigningAuthority,
    A: TransferApproval,
{
    fn current_identity(&self) -> Option<Identity> {
        self.inner.current_identity()
    }

    fn can_sign(&self) -> bool {
        self.inner.can_sign()
    }

    async fn sign(&self, transfer: UnsignedTransfer) -> Result<SignedTransfer, SigningError> {
        if !self.approval.approve(&transfer).await {
            info!("Transfer of {} lamports declined", transfer.lamports());
            return Err(SigningError::Rejected("transfer declined".to_string()));
        }
        self.inner.sign(transfer).await
    }
}
