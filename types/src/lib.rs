//! Core wire types for chainvote.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, chain identifiers, native-currency amounts, transaction
//! hashes, and the network descriptor a wallet needs to register a chain.

pub mod address;
pub mod amount;
pub mod chain;
pub mod error;
pub mod hash;
pub mod network;

pub use address::Address;
pub use amount::NativeAmount;
pub use chain::ChainId;
pub use error::TypeError;
pub use hash::TxHash;
pub use network::{NativeCurrency, NetworkDescriptor};
