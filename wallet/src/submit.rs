//! Native-currency transfer submission on top of a [`WalletSession`].

use std::sync::Arc;

use chainvote_provider::TransferCall;
use chainvote_types::{Address, NativeAmount, TxHash};

use crate::error::SessionError;
use crate::events::Notice;
use crate::session::WalletSession;

/// Submits value transfers through the session's wallet provider.
///
/// Every submission runs the same preflight: the session must be
/// connected, and the wallet must end up on the configured network
/// (switching it if needed) before the transaction is offered for
/// signing.
pub struct TransactionSubmitter {
    session: Arc<WalletSession>,
}

impl TransactionSubmitter {
    pub fn new(session: Arc<WalletSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    /// Sends `value` from the active account to `destination`.
    ///
    /// `Ok` means the wallet accepted and broadcast the transaction; it
    /// says nothing about eventual confirmation. On success a notice is
    /// emitted and a balance refresh is kicked off in the background.
    pub async fn submit(
        &self,
        destination: &Address,
        value: NativeAmount,
    ) -> Result<TxHash, SessionError> {
        let session = &self.session;

        let Some(from) = session.active_address().await else {
            session.notify(Notice::error("Connect a wallet before sending a transaction."));
            return Err(SessionError::NotConnected);
        };

        if !session.is_on_target_network().await && !session.switch_network().await {
            session.notify(Notice::error(format!(
                "Please switch to {} to continue.",
                session.network_name()
            )));
            return Err(SessionError::WrongNetwork);
        }

        let provider = session.provider_handle()?;
        let call = TransferCall::transfer(from, destination.clone(), value);

        match provider.send_transaction(&call).await {
            Ok(tx) => {
                tracing::info!(tx = %tx, to = %destination, value = %value, "transaction submitted");
                session.notify(Notice::info(format!("Transaction submitted: {}.", tx.short())));
                session.spawn_balance_refresh();
                Ok(tx)
            }
            Err(e) if e.is_user_rejected() => {
                tracing::info!("transaction rejected in the wallet");
                session.notify(Notice::error("Transaction was rejected in the wallet."));
                Err(SessionError::TransactionRejected)
            }
            Err(e) => {
                tracing::warn!(error = %e, "transaction submission failed");
                session.notify(Notice::error("Transaction failed to send."));
                Err(SessionError::TransactionFailed(e.to_string()))
            }
        }
    }
}
