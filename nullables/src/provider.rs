//! Nullable wallet provider — scripted answers, recorded calls.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::broadcast;

use chainvote_provider::{ProviderError, ProviderEvent, TransferCall, WalletProvider};
use chainvote_types::{Address, ChainId, NativeAmount, NetworkDescriptor, TxHash};

const EVENT_CAPACITY: usize = 32;

/// What the provider answers with.
struct Script {
    accounts: Vec<Address>,
    authorized: bool,
    chain: ChainId,
    balances: HashMap<Address, NativeAmount>,
    reject_connect: bool,
    unknown_chain: bool,
    fail_switch: bool,
    fail_add_chain: bool,
    reject_transaction: bool,
    fail_transaction: bool,
    fail_balance: bool,
    next_tx: u64,
}

/// What the provider was asked.
#[derive(Default)]
struct Log {
    connect_calls: u32,
    quiet_account_calls: u32,
    switch_calls: Vec<ChainId>,
    add_chain_calls: Vec<NetworkDescriptor>,
    sent_transactions: Vec<TransferCall>,
    balance_queries: Vec<Address>,
}

/// A deterministic wallet provider for tests.
///
/// Answers come from a programmable script, every call is recorded for
/// assertions, and change events fire only via the `emit_*` methods. State
/// sits behind mutexes so the double can be driven from the session's
/// background tasks like a real provider.
pub struct NullProvider {
    script: Mutex<Script>,
    log: Mutex<Log>,
    events: broadcast::Sender<ProviderEvent>,
}

impl NullProvider {
    /// A provider with no accounts, chain `0x1`, and empty balances.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            script: Mutex::new(Script {
                accounts: Vec::new(),
                authorized: false,
                chain: ChainId::parse("0x1").expect("literal chain id"),
                balances: HashMap::new(),
                reject_connect: false,
                unknown_chain: false,
                fail_switch: false,
                fail_add_chain: false,
                reject_transaction: false,
                fail_transaction: false,
                fail_balance: false,
                next_tx: 1,
            }),
            log: Mutex::new(Log::default()),
            events,
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("provider script lock poisoned")
    }

    fn log(&self) -> MutexGuard<'_, Log> {
        self.log.lock().expect("provider log lock poisoned")
    }

    // ── Scripting ───────────────────────────────────────────────────────

    /// Set the accounts an interactive request will grant.
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.script().accounts = accounts;
    }

    /// Mark the accounts as already authorised, as after a past session.
    pub fn pre_authorize(&self) {
        self.script().authorized = true;
    }

    /// Set the chain the wallet reports.
    pub fn set_chain(&self, chain: ChainId) {
        self.script().chain = chain;
    }

    /// Set the balance returned for `address`.
    pub fn set_balance(&self, address: Address, balance: NativeAmount) {
        self.script().balances.insert(address, balance);
    }

    /// Decline interactive account requests (code 4001).
    pub fn reject_connect(&self) {
        self.script().reject_connect = true;
    }

    /// Answer switch requests with "unrecognised chain" (code 4902).
    pub fn refuse_unknown_chain(&self) {
        self.script().unknown_chain = true;
    }

    /// Fail switch requests with a generic provider error.
    pub fn fail_switch(&self) {
        self.script().fail_switch = true;
    }

    /// Fail add-chain requests with a generic provider error.
    pub fn fail_add_chain(&self) {
        self.script().fail_add_chain = true;
    }

    /// Decline transaction prompts (code 4001).
    pub fn reject_transaction(&self) {
        self.script().reject_transaction = true;
    }

    /// Fail transaction submission with a generic provider error.
    pub fn fail_transaction(&self) {
        self.script().fail_transaction = true;
    }

    /// Fail balance queries with a transport error.
    pub fn fail_balance(&self) {
        self.script().fail_balance = true;
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Push an accounts-changed notification and adopt the new list.
    pub fn emit_accounts_changed(&self, accounts: Vec<Address>) {
        {
            let mut script = self.script();
            script.accounts = accounts.clone();
            script.authorized = !accounts.is_empty();
        }
        let _ = self.events.send(ProviderEvent::AccountsChanged(accounts));
    }

    /// Push a chain-changed notification and adopt the new chain.
    pub fn emit_chain_changed(&self, chain: ChainId) {
        self.script().chain = chain.clone();
        let _ = self.events.send(ProviderEvent::ChainChanged(chain));
    }

    // ── Assertions ──────────────────────────────────────────────────────

    /// Number of interactive account requests received.
    pub fn connect_calls(&self) -> u32 {
        self.log().connect_calls
    }

    /// Number of quiet account queries received.
    pub fn quiet_account_calls(&self) -> u32 {
        self.log().quiet_account_calls
    }

    /// Every chain id a switch was requested for, in order.
    pub fn switch_calls(&self) -> Vec<ChainId> {
        self.log().switch_calls.clone()
    }

    /// Every descriptor an add-chain was requested for, in order.
    pub fn add_chain_calls(&self) -> Vec<NetworkDescriptor> {
        self.log().add_chain_calls.clone()
    }

    /// Every transfer handed over for signing, in order.
    pub fn sent_transactions(&self) -> Vec<TransferCall> {
        self.log().sent_transactions.clone()
    }

    /// Every address whose balance was queried, in order.
    pub fn balance_queries(&self) -> Vec<Address> {
        self.log().balance_queries.clone()
    }

    /// The chain the wallet currently reports.
    pub fn current_chain(&self) -> ChainId {
        self.script().chain.clone()
    }

    /// Clear the call log.
    pub fn reset_log(&self) {
        *self.log() = Log::default();
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for NullProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log().connect_calls += 1;
        let mut script = self.script();
        if script.reject_connect {
            return Err(ProviderError::UserRejected);
        }
        script.authorized = true;
        Ok(script.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log().quiet_account_calls += 1;
        let script = self.script();
        if script.authorized {
            Ok(script.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        Ok(self.script().chain.clone())
    }

    async fn balance_of(&self, address: &Address) -> Result<NativeAmount, ProviderError> {
        self.log().balance_queries.push(address.clone());
        let script = self.script();
        if script.fail_balance {
            return Err(ProviderError::Transport("scripted balance failure".into()));
        }
        Ok(script
            .balances
            .get(address)
            .copied()
            .unwrap_or(NativeAmount::ZERO))
    }

    async fn switch_chain(&self, chain: &ChainId) -> Result<(), ProviderError> {
        self.log().switch_calls.push(chain.clone());
        let mut script = self.script();
        if script.unknown_chain {
            return Err(ProviderError::UnrecognizedChain);
        }
        if script.fail_switch {
            return Err(ProviderError::Rpc {
                code: -32002,
                message: "scripted switch failure".into(),
            });
        }
        script.chain = chain.clone();
        Ok(())
    }

    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> Result<(), ProviderError> {
        self.log().add_chain_calls.push(descriptor.clone());
        let mut script = self.script();
        if script.fail_add_chain {
            return Err(ProviderError::Rpc {
                code: -32602,
                message: "scripted add-chain failure".into(),
            });
        }
        // A successful add also switches, and the chain is known from now on.
        script.unknown_chain = false;
        script.chain = descriptor.chain_id.clone();
        Ok(())
    }

    async fn send_transaction(&self, call: &TransferCall) -> Result<TxHash, ProviderError> {
        self.log().sent_transactions.push(call.clone());
        let mut script = self.script();
        if script.reject_transaction {
            return Err(ProviderError::UserRejected);
        }
        if script.fail_transaction {
            return Err(ProviderError::Rpc {
                code: -32603,
                message: "scripted transaction failure".into(),
            });
        }
        let seq = script.next_tx;
        script.next_tx += 1;
        Ok(TxHash::new(format!("0x{seq:064x}")))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tail: &str) -> Address {
        Address::parse(&format!("0x{tail:0>40}")).unwrap()
    }

    #[tokio::test]
    async fn grants_scripted_accounts_and_records_calls() {
        let provider = NullProvider::new();
        provider.set_accounts(vec![addr("a1")]);

        let accounts = provider.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![addr("a1")]);
        assert_eq!(provider.connect_calls(), 1);
    }

    #[tokio::test]
    async fn quiet_query_is_empty_until_authorized() {
        let provider = NullProvider::new();
        provider.set_accounts(vec![addr("a1")]);

        assert!(provider.accounts().await.unwrap().is_empty());
        provider.request_accounts().await.unwrap();
        assert_eq!(provider.accounts().await.unwrap(), vec![addr("a1")]);
    }

    #[tokio::test]
    async fn rejecting_connect_returns_user_rejected() {
        let provider = NullProvider::new();
        provider.reject_connect();
        let err = provider.request_accounts().await.unwrap_err();
        assert!(err.is_user_rejected());
    }

    #[tokio::test]
    async fn switch_updates_reported_chain() {
        let provider = NullProvider::new();
        let target = ChainId::monad_testnet();
        provider.switch_chain(&target).await.unwrap();
        assert_eq!(provider.current_chain(), target);
        assert_eq!(provider.switch_calls(), vec![target]);
    }

    #[tokio::test]
    async fn unknown_chain_until_added() {
        let provider = NullProvider::new();
        provider.refuse_unknown_chain();
        let target = ChainId::monad_testnet();

        let err = provider.switch_chain(&target).await.unwrap_err();
        assert!(err.is_unrecognized_chain());

        let descriptor = NetworkDescriptor::monad_testnet();
        provider.add_chain(&descriptor).await.unwrap();
        assert_eq!(provider.current_chain(), target);

        // Known now, so a plain switch succeeds.
        provider.switch_chain(&target).await.unwrap();
    }

    #[tokio::test]
    async fn transactions_get_sequential_hashes() {
        let provider = NullProvider::new();
        let call = TransferCall::transfer(addr("a1"), addr("dead"), NativeAmount::new(5));

        let first = provider.send_transaction(&call).await.unwrap();
        let second = provider.send_transaction(&call).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(provider.sent_transactions().len(), 2);
    }

    #[tokio::test]
    async fn emitted_events_reach_subscribers() {
        let provider = NullProvider::new();
        let mut rx = provider.subscribe();

        provider.emit_chain_changed(ChainId::monad_testnet());
        match rx.recv().await.unwrap() {
            ProviderEvent::ChainChanged(chain) => assert_eq!(chain, ChainId::monad_testnet()),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
