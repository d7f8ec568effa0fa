//! Wallet session state machine.
//!
//! A [`WalletSession`] owns the connection lifecycle against a
//! [`WalletProvider`]: explicit connects, silent resumes, network
//! negotiation toward the configured chain, a background balance
//! poller, and reactions to provider-side account and chain changes.
//! Hosts observe it through [`WalletSession::snapshot`] and the event
//! stream from [`WalletSession::subscribe_events`].

use std::sync::{Arc, Mutex, PoisonError};

use chainvote_provider::{ProviderEvent, WalletProvider};
use chainvote_types::{Address, ChainId, NativeAmount, NetworkDescriptor};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::connection::{ConnectionPhase, WalletConnection};
use crate::error::SessionError;
use crate::events::{Notice, SessionEvent};

type TaskSlot = Mutex<Option<JoinHandle<()>>>;

fn lock_slot(slot: &TaskSlot) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    config: SessionConfig,
    state: Arc<RwLock<WalletConnection>>,
    events: broadcast::Sender<SessionEvent>,
    poller: TaskSlot,
    pump: TaskSlot,
}

impl WalletSession {
    /// Builds a session over `provider`. Pass `None` when no wallet is
    /// installed; operations then fail with [`SessionError::ProviderUnavailable`].
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, config: SessionConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Arc::new(Self {
            provider,
            config,
            state: Arc::new(RwLock::new(WalletConnection::default())),
            events,
            poller: Mutex::new(None),
            pump: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.config.network
    }

    pub fn target_chain(&self) -> &ChainId {
        self.config.target_chain()
    }

    pub async fn snapshot(&self) -> WalletConnection {
        self.state.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_connected()
    }

    pub async fn is_on_target_network(&self) -> bool {
        self.state.read().await.is_on_network(self.target_chain())
    }

    /// New receiver for notices and invalidation events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ── Connection lifecycle ─────────────────────────────────────────────

    /// Requests account access from the wallet, prompting the user if
    /// needed. On success the first account becomes the active address,
    /// the balance poller starts, and the session steers the wallet
    /// toward the configured network. A failed network switch leaves the
    /// session connected and emits a warning notice.
    ///
    /// Callers are expected to serialize connect attempts; concurrent
    /// calls each prompt the wallet independently.
    pub async fn connect(&self) -> Result<Address, SessionError> {
        let provider = match self.provider.as_ref() {
            Some(p) => Arc::clone(p),
            None => {
                self.notify(Notice::error(
                    "No wallet provider found. Install a web3 wallet to continue.",
                ));
                return Err(SessionError::ProviderUnavailable);
            }
        };

        self.state.write().await.phase = ConnectionPhase::Connecting;

        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "wallet connection rejected");
                self.settle_phase().await;
                self.notify(Notice::error("Wallet connection was rejected."));
                return Err(SessionError::ConnectionRejected);
            }
        };
        let Some(address) = accounts.into_iter().next() else {
            self.settle_phase().await;
            self.notify(Notice::error("Wallet returned no accounts."));
            return Err(SessionError::ConnectionRejected);
        };

        self.adopt_account(address.clone()).await;
        tracing::info!(address = %address, "wallet connected");

        match provider.chain_id().await {
            Ok(chain) => {
                let on_target = &chain == self.target_chain();
                self.state.write().await.chain = Some(chain);
                if !on_target && !self.switch_network().await {
                    self.notify(Notice::warning(format!(
                        "Connected, but could not switch to {}.",
                        self.network_name()
                    )));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read chain id after connect");
            }
        }

        Ok(address)
    }

    /// Restores a previously authorized session without prompting the
    /// user. Returns the adopted address, or `None` when no provider is
    /// present, no account is authorized, or the query fails. Emits no
    /// notices.
    pub async fn resume(&self) -> Option<Address> {
        let provider = Arc::clone(self.provider.as_ref()?);

        let accounts = match provider.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::debug!(error = %e, "silent session resume failed");
                return None;
            }
        };
        let address = accounts.into_iter().next()?;

        self.adopt_account(address.clone()).await;

        match provider.chain_id().await {
            Ok(chain) => self.state.write().await.chain = Some(chain),
            Err(e) => {
                tracing::debug!(error = %e, "failed to read chain id during resume");
            }
        }

        tracing::info!(address = %address, "wallet session resumed");
        Some(address)
    }

    /// Drops the active account and stops the balance poller. The chain
    /// is kept: the wallet itself is still on it.
    pub async fn disconnect(&self) {
        self.stop_poller();
        let mut state = self.state.write().await;
        state.address = None;
        state.balance = NativeAmount::ZERO;
        state.phase = ConnectionPhase::Disconnected;
        tracing::info!("wallet disconnected");
    }

    // ── Network negotiation ──────────────────────────────────────────────

    /// Steers the wallet to the configured network. Returns `true` when
    /// the wallet is on the target afterwards, including the no-op case
    /// where it already was. Failures emit an error notice and return
    /// `false`; they never propagate as `Err`.
    pub async fn switch_network(&self) -> bool {
        match self.try_switch().await {
            Ok(()) => true,
            Err(e) => {
                self.notify_switch_failure(&e);
                false
            }
        }
    }

    async fn try_switch(&self) -> Result<(), SessionError> {
        let provider = self.provider_handle()?;
        let target = self.target_chain().clone();

        if self.state.read().await.is_on_network(&target) {
            return Ok(());
        }

        match provider.switch_chain(&target).await {
            Ok(()) => {
                self.state.write().await.chain = Some(target.clone());
                tracing::info!(chain = %target, "switched wallet to target network");
                Ok(())
            }
            Err(e) if e.is_unrecognized_chain() => {
                tracing::info!(chain = %target, "chain unknown to wallet, registering it");
                match provider.add_chain(self.network()).await {
                    Ok(()) => {
                        self.state.write().await.chain = Some(target.clone());
                        tracing::info!(chain = %target, "network registered and adopted");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "wallet refused to add the network");
                        Err(SessionError::NetworkAddFailed)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "network switch failed");
                Err(SessionError::NetworkSwitchFailed)
            }
        }
    }

    fn notify_switch_failure(&self, err: &SessionError) {
        match err {
            SessionError::NetworkSwitchFailed => {
                self.notify(Notice::error(format!(
                    "Could not switch to {}.",
                    self.network_name()
                )));
            }
            SessionError::NetworkAddFailed => {
                self.notify(Notice::error(format!(
                    "Could not add {} to the wallet.",
                    self.network_name()
                )));
            }
            _ => {}
        }
    }

    // ── Balance ──────────────────────────────────────────────────────────

    /// Refreshes the balance of the active address once, immediately.
    /// Fetch failures are logged and leave the previous value in place;
    /// disconnected sessions do nothing.
    pub async fn refresh_balance(&self) {
        let Some(provider) = self.provider.as_ref() else {
            return;
        };
        let Some(address) = self.active_address().await else {
            return;
        };
        refresh_balance_once(provider.as_ref(), &self.state, &address).await;
    }

    /// Refreshes the balance in the background without blocking the
    /// caller.
    pub(crate) fn spawn_balance_refresh(&self) {
        let Some(provider) = self.provider.clone() else {
            return;
        };
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let address = state.read().await.address.clone();
            let Some(address) = address else { return };
            refresh_balance_once(provider.as_ref(), &state, &address).await;
        });
    }

    // ── Provider events ──────────────────────────────────────────────────

    /// Applies one provider-side event to the session. [`Self::start`]
    /// feeds these from the provider's event stream; hosts embedding
    /// their own event loop may call this directly.
    pub async fn apply_provider_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                None => {
                    tracing::info!("wallet revoked account access, disconnecting");
                    self.disconnect().await;
                }
                Some(address) => {
                    tracing::info!(address = %address, "wallet switched accounts");
                    self.adopt_account(address).await;
                }
            },
            ProviderEvent::ChainChanged(chain) => {
                tracing::info!(chain = %chain, "wallet switched chains, session invalidated");
                self.state.write().await.chain = Some(chain.clone());
                if let Some(address) = self.active_address().await {
                    // Restart the poller so the balance reflects the new
                    // chain right away rather than on the next tick.
                    self.restart_poller(address);
                }
                let _ = self.events.send(SessionEvent::Invalidated { chain });
            }
        }
    }

    /// Spawns the event pump that forwards provider events into
    /// [`Self::apply_provider_event`]. Idempotent; a second call replaces
    /// the previous pump.
    pub fn start(self: &Arc<Self>) {
        let Some(provider) = self.provider.as_ref() else {
            return;
        };
        let mut rx = provider.subscribe();
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => session.apply_provider_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "provider event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        if let Some(old) = lock_slot(&self.pump).replace(handle) {
            old.abort();
        }
    }

    /// Stops the event pump and the balance poller.
    pub fn shutdown(&self) {
        if let Some(pump) = lock_slot(&self.pump).take() {
            pump.abort();
        }
        self.stop_poller();
        tracing::debug!("wallet session shut down");
    }

    // ── Internals ────────────────────────────────────────────────────────

    pub(crate) fn provider_handle(&self) -> Result<Arc<dyn WalletProvider>, SessionError> {
        self.provider.clone().ok_or(SessionError::ProviderUnavailable)
    }

    pub(crate) async fn active_address(&self) -> Option<Address> {
        self.state.read().await.address.clone()
    }

    pub(crate) fn network_name(&self) -> &str {
        &self.config.network.chain_name
    }

    pub(crate) fn notify(&self, notice: Notice) {
        tracing::debug!(severity = ?notice.severity, text = %notice.text, "session notice");
        let _ = self.events.send(SessionEvent::Notice(notice));
    }

    /// Makes `address` the active account and (re)starts its poller. The
    /// previous balance stays on display until the first refresh lands.
    async fn adopt_account(&self, address: Address) {
        {
            let mut state = self.state.write().await;
            state.address = Some(address.clone());
            state.phase = ConnectionPhase::Connected;
        }
        self.restart_poller(address);
    }

    /// Re-derives the phase from the address, for failure paths that may
    /// have left it at `Connecting`.
    async fn settle_phase(&self) {
        let mut state = self.state.write().await;
        state.phase = if state.address.is_some() {
            ConnectionPhase::Connected
        } else {
            ConnectionPhase::Disconnected
        };
    }

    /// Spawns the balance poller for `address`, replacing any previous
    /// poller. The interval fires immediately, so adoption always comes
    /// with a prompt balance refresh.
    fn restart_poller(&self, address: Address) {
        let Some(provider) = self.provider.clone() else {
            return;
        };
        let state = Arc::clone(&self.state);
        let every = self.config.poll_interval();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                if !refresh_balance_once(provider.as_ref(), &state, &address).await {
                    // The session moved to another account; this poller
                    // is obsolete.
                    break;
                }
            }
        });
        if let Some(old) = lock_slot(&self.poller).replace(handle) {
            old.abort();
        }
    }

    fn stop_poller(&self) {
        if let Some(handle) = lock_slot(&self.poller).take() {
            handle.abort();
        }
    }
}

impl Drop for WalletSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Fetches the balance of `address` and stores it, unless the session
/// adopted a different account while the query was in flight. Returns
/// `false` once `address` is no longer active.
async fn refresh_balance_once(
    provider: &dyn WalletProvider,
    state: &RwLock<WalletConnection>,
    address: &Address,
) -> bool {
    match provider.balance_of(address).await {
        Ok(balance) => {
            let mut guard = state.write().await;
            if guard.address.as_ref() != Some(address) {
                return false;
            }
            guard.balance = balance;
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, address = %address, "balance refresh failed");
            true
        }
    }
}
