//! The injected wallet provider boundary.
//!
//! Everything the rest of the workspace knows about a wallet goes through the
//! [`WalletProvider`] trait: account access, chain queries, chain switching,
//! and transaction submission. The wallet holds the keys and does the signing;
//! this crate only relays requests and maps the provider's distinguished error
//! codes onto typed variants.

pub mod error;
pub mod event;
pub mod http;
pub mod port;

pub use error::ProviderError;
pub use event::ProviderEvent;
pub use http::HttpProvider;
pub use port::{TransferCall, WalletProvider, TRANSFER_GAS};
