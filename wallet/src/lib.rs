//! Wallet session management and transaction submission.
//!
//! This crate turns a raw [`chainvote_provider::WalletProvider`] into a
//! stateful session: connect and resume flows, network negotiation,
//! periodic balance refresh, and provider event handling, plus a
//! [`TransactionSubmitter`] that runs the connected-and-on-network
//! preflight before every transfer.

pub mod config;
pub mod connection;
pub mod error;
pub mod events;
pub mod session;
pub mod submit;

pub use config::SessionConfig;
pub use connection::{ConnectionPhase, WalletConnection};
pub use error::SessionError;
pub use events::{Notice, SessionEvent, Severity};
pub use session::WalletSession;
pub use submit::TransactionSubmitter;
