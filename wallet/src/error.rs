use thiserror::Error;

/// Failures surfaced by session operations and transaction submission.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no wallet provider available")]
    ProviderUnavailable,

    #[error("wallet connection rejected")]
    ConnectionRejected,

    #[error("wallet is not connected")]
    NotConnected,

    #[error("network switch rejected or failed")]
    NetworkSwitchFailed,

    #[error("network registration rejected or failed")]
    NetworkAddFailed,

    #[error("wallet is on the wrong network")]
    WrongNetwork,

    #[error("transaction rejected by the user")]
    TransactionRejected,

    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("config error: {0}")]
    Config(String),
}
