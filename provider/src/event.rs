//! Push notifications from the wallet.

use chainvote_types::{Address, ChainId};

/// An unsolicited notification a provider pushes to its subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The authorised account list changed. Empty means access was revoked.
    AccountsChanged(Vec<Address>),

    /// The wallet moved to a different chain.
    ChainChanged(ChainId),
}
