//! Validation errors for the core wire types.

use thiserror::Error;

/// Error raised when provider-supplied text fails to parse into a typed value.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
