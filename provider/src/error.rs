//! Provider error taxonomy.

use thiserror::Error;

/// Error code a provider reports when the user declines a prompt.
pub const CODE_USER_REJECTED: i64 = 4001;

/// Error code a provider reports for a chain it has no entry for.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

/// Failures surfaced by a wallet provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The user declined the wallet's confirmation prompt (code 4001).
    #[error("request rejected by the user")]
    UserRejected,

    /// The wallet does not recognise the requested chain (code 4902).
    #[error("chain not recognised by the wallet")]
    UnrecognizedChain,

    /// Any other provider-reported error.
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request never reached the provider.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider responded with something this crate cannot interpret.
    #[error("invalid provider payload: {0}")]
    InvalidPayload(String),
}

impl ProviderError {
    /// Map a provider-reported error code onto the distinguished variants.
    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        match code {
            CODE_USER_REJECTED => Self::UserRejected,
            CODE_UNRECOGNIZED_CHAIN => Self::UnrecognizedChain,
            _ => Self::Rpc {
                code,
                message: message.into(),
            },
        }
    }

    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        matches!(self, Self::UnrecognizedChain)
    }
}

impl From<chainvote_types::TypeError> for ProviderError {
    fn from(e: chainvote_types::TypeError) -> Self {
        Self::InvalidPayload(e.to_string())
    }
}
