//! The `WalletProvider` trait and the transfer call payload.

use async_trait::async_trait;
use tokio::sync::broadcast;

use chainvote_types::{Address, ChainId, NativeAmount, NetworkDescriptor, TxHash};

use crate::error::ProviderError;
use crate::event::ProviderEvent;

/// Gas allowance for a plain native-currency transfer.
pub const TRANSFER_GAS: u64 = 21_000;

/// A native-currency transfer as handed to the provider for signing.
///
/// `value` and `gas` cross the wire as exact `0x…` hex built from integers;
/// nothing here ever passes through a float.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferCall {
    pub from: Address,
    pub to: Address,
    pub value: NativeAmount,
    pub gas: u64,
}

impl TransferCall {
    /// A plain transfer carrying the fixed 21000 gas allowance.
    pub fn transfer(from: Address, to: Address, value: NativeAmount) -> Self {
        Self {
            from,
            to,
            value,
            gas: TRANSFER_GAS,
        }
    }

    /// The `0x…` hex encoding of the gas allowance.
    pub fn gas_hex(&self) -> String {
        format!("{:#x}", self.gas)
    }
}

/// Async interface to an injected wallet provider.
///
/// Implementations must be shareable across tasks: the session calls the
/// provider from background pollers as well as foreground operations, so the
/// trait object lives behind an `Arc`.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Interactive account request; may prompt the user for authorisation.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Quiet account query; returns only accounts already authorised.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// The chain the wallet is currently on.
    async fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// Native-currency balance of `address` in smallest units.
    async fn balance_of(&self, address: &Address) -> Result<NativeAmount, ProviderError>;

    /// Ask the wallet to switch to `chain`.
    ///
    /// Fails with [`ProviderError::UnrecognizedChain`] when the wallet has no
    /// entry for the chain; callers fall back to [`add_chain`].
    ///
    /// [`add_chain`]: WalletProvider::add_chain
    async fn switch_chain(&self, chain: &ChainId) -> Result<(), ProviderError>;

    /// Register a chain the wallet does not know and switch to it.
    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> Result<(), ProviderError>;

    /// Submit a transfer for signing and broadcast.
    ///
    /// Fails with [`ProviderError::UserRejected`] when the user declines the
    /// wallet's confirmation prompt. Success means the provider accepted the
    /// transaction, not that it confirmed on chain.
    async fn send_transaction(&self, call: &TransferCall) -> Result<TxHash, ProviderError>;

    /// Subscribe to account and chain change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
