//! Snapshot of the wallet connection as the session currently sees it.

use chainvote_types::{Address, ChainId, NativeAmount};

/// Lifecycle phase of the wallet connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    /// A connect request is in flight and the wallet may be prompting the user.
    Connecting,
    Connected,
}

/// Point-in-time view of the session state.
///
/// `address` is `Some` exactly while the session is connected; `chain`
/// survives a disconnect because the wallet itself stays on that chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConnection {
    pub address: Option<Address>,
    pub balance: NativeAmount,
    pub chain: Option<ChainId>,
    pub phase: ConnectionPhase,
}

impl Default for WalletConnection {
    fn default() -> Self {
        Self {
            address: None,
            balance: NativeAmount::ZERO,
            chain: None,
            phase: ConnectionPhase::Disconnected,
        }
    }
}

impl WalletConnection {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn is_connecting(&self) -> bool {
        self.phase == ConnectionPhase::Connecting
    }

    pub fn is_on_network(&self, target: &ChainId) -> bool {
        self.chain.as_ref() == Some(target)
    }

    /// Balance as a decimal string in whole units, for display.
    pub fn balance_display(&self) -> String {
        self.balance.to_display_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_disconnected() {
        let state = WalletConnection::default();
        assert!(!state.is_connected());
        assert!(!state.is_connecting());
        assert_eq!(state.phase, ConnectionPhase::Disconnected);
        assert_eq!(state.balance, NativeAmount::ZERO);
        assert!(state.chain.is_none());
    }

    #[test]
    fn connected_tracks_address_presence() {
        let mut state = WalletConnection::default();
        state.address = Some(Address::parse("0x1111111111111111111111111111111111111111").unwrap());
        state.phase = ConnectionPhase::Connected;
        assert!(state.is_connected());
    }

    #[test]
    fn balance_display_renders_whole_units() {
        let mut state = WalletConnection::default();
        assert_eq!(state.balance_display(), "0");
        state.balance = NativeAmount::new(1_500_000_000_000_000_000);
        assert_eq!(state.balance_display(), "1.5");
    }

    #[test]
    fn network_match_requires_known_chain() {
        let target = ChainId::monad_testnet();
        let mut state = WalletConnection::default();
        assert!(!state.is_on_network(&target));
        state.chain = Some(ChainId::parse("0x1").unwrap());
        assert!(!state.is_on_network(&target));
        state.chain = Some(target.clone());
        assert!(state.is_on_network(&target));
    }
}
