//! End-to-end session flows against a scripted provider.

use std::sync::Arc;
use std::time::Duration;

use chainvote_nullables::NullProvider;
use chainvote_provider::port::WalletProvider;
use chainvote_provider::{ProviderEvent, TRANSFER_GAS};
use chainvote_types::{Address, ChainId, NativeAmount};
use chainvote_wallet::{
    ConnectionPhase, Notice, SessionConfig, SessionError, SessionEvent, Severity,
    TransactionSubmitter, WalletSession,
};
use tokio::sync::broadcast;

fn addr(tail: u8) -> Address {
    Address::parse(&format!("0x{tail:0>40}")).unwrap()
}

fn mon(whole: u128) -> NativeAmount {
    NativeAmount::new(whole * 1_000_000_000_000_000_000)
}

fn target() -> ChainId {
    ChainId::monad_testnet()
}

fn other_chain() -> ChainId {
    ChainId::parse("0x1").unwrap()
}

fn session_over(provider: &Arc<NullProvider>) -> Arc<WalletSession> {
    WalletSession::new(
        Some(Arc::clone(provider) as Arc<dyn WalletProvider>),
        SessionConfig::default(),
    )
}

fn drain_notices(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::Notice(notice) = event {
            notices.push(notice);
        }
    }
    notices
}

async fn wait_for_balance(session: &WalletSession, expected: NativeAmount) {
    for _ in 0..500 {
        if session.snapshot().await.balance == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("balance never reached {expected}");
}

// ── Connect ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_adopts_first_account_and_refreshes_balance() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(1), addr(2)]);
    provider.set_chain(target());
    provider.set_balance(addr(1), mon(5));
    let session = session_over(&provider);

    let adopted = session.connect().await.unwrap();

    assert_eq!(adopted, addr(1));
    assert_eq!(provider.connect_calls(), 1);
    let state = session.snapshot().await;
    assert!(state.is_connected());
    assert_eq!(state.phase, ConnectionPhase::Connected);
    assert_eq!(state.address, Some(addr(1)));
    // Already on the target chain, so no switch should have been attempted.
    assert!(session.is_on_target_network().await);
    assert!(provider.switch_calls().is_empty());
    wait_for_balance(&session, mon(5)).await;
}

#[tokio::test]
async fn connect_without_provider_reports_unavailable() {
    let session = WalletSession::new(None, SessionConfig::default());
    let mut rx = session.subscribe_events();

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, SessionError::ProviderUnavailable));
    let notices = drain_notices(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
    assert!(!session.is_connected().await);
}

#[tokio::test]
async fn connect_rejected_by_user_emits_a_notice() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(1)]);
    provider.reject_connect();
    let session = session_over(&provider);
    let mut rx = session.subscribe_events();

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, SessionError::ConnectionRejected));
    let notices = drain_notices(&mut rx);
    assert!(notices.iter().any(|n| n.text.contains("rejected")));
    assert!(!session.is_connected().await);
}

#[tokio::test]
async fn connect_with_no_accounts_is_rejected() {
    let provider = Arc::new(NullProvider::new());
    let session = session_over(&provider);

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, SessionError::ConnectionRejected));
    assert_eq!(session.snapshot().await.phase, ConnectionPhase::Disconnected);
}

#[tokio::test]
async fn connect_auto_switches_to_the_target_network() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(3)]);
    provider.set_chain(other_chain());
    let session = session_over(&provider);

    session.connect().await.unwrap();

    assert_eq!(provider.switch_calls(), vec![target()]);
    assert!(session.is_on_target_network().await);
    assert_eq!(provider.current_chain(), target());
}

#[tokio::test]
async fn connect_survives_a_failed_network_switch() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(3)]);
    provider.set_chain(other_chain());
    provider.fail_switch();
    let session = session_over(&provider);
    let mut rx = session.subscribe_events();

    let adopted = session.connect().await.unwrap();

    assert_eq!(adopted, addr(3));
    assert!(session.is_connected().await);
    assert!(!session.is_on_target_network().await);
    assert_eq!(session.snapshot().await.chain, Some(other_chain()));

    let notices = drain_notices(&mut rx);
    assert!(notices.iter().any(|n| n.severity == Severity::Error));
    assert!(notices
        .iter()
        .any(|n| n.severity == Severity::Warning && n.text.contains("Connected")));
}

// ── Resume ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn resume_adopts_an_authorized_account_quietly() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(4)]);
    provider.pre_authorize();
    provider.set_chain(target());
    let session = session_over(&provider);
    let mut rx = session.subscribe_events();

    let adopted = session.resume().await;

    assert_eq!(adopted, Some(addr(4)));
    assert_eq!(provider.quiet_account_calls(), 1);
    assert_eq!(provider.connect_calls(), 0);
    assert!(session.is_connected().await);
    assert!(session.is_on_target_network().await);
    assert!(drain_notices(&mut rx).is_empty());
}

#[tokio::test]
async fn resume_without_authorization_stays_disconnected() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(4)]);
    let session = session_over(&provider);

    assert_eq!(session.resume().await, None);
    assert!(!session.is_connected().await);
    assert_eq!(provider.connect_calls(), 0);
}

// ── Network switching ────────────────────────────────────────────────────

#[tokio::test]
async fn switch_network_is_idempotent_on_target() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(5)]);
    provider.pre_authorize();
    provider.set_chain(target());
    let session = session_over(&provider);
    session.resume().await;
    provider.reset_log();

    assert!(session.switch_network().await);

    assert!(provider.switch_calls().is_empty());
    assert!(provider.add_chain_calls().is_empty());
}

#[tokio::test]
async fn unknown_chain_falls_back_to_registration() {
    let provider = Arc::new(NullProvider::new());
    provider.set_chain(other_chain());
    provider.refuse_unknown_chain();
    let session = session_over(&provider);

    assert!(session.switch_network().await);

    assert_eq!(provider.switch_calls(), vec![target()]);
    let added = provider.add_chain_calls();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].chain_id, target());
    assert!(session.is_on_target_network().await);
}

#[tokio::test]
async fn refused_registration_reports_failure() {
    let provider = Arc::new(NullProvider::new());
    provider.set_chain(other_chain());
    provider.refuse_unknown_chain();
    provider.fail_add_chain();
    let session = session_over(&provider);
    let mut rx = session.subscribe_events();

    assert!(!session.switch_network().await);

    assert!(!session.is_on_target_network().await);
    let notices = drain_notices(&mut rx);
    assert!(notices.iter().any(|n| n.text.contains("add")));
}

// ── Provider events ──────────────────────────────────────────────────────

#[tokio::test]
async fn empty_accounts_event_disconnects() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(6)]);
    provider.set_chain(target());
    provider.set_balance(addr(6), mon(3));
    let session = session_over(&provider);
    session.connect().await.unwrap();
    wait_for_balance(&session, mon(3)).await;

    session
        .apply_provider_event(ProviderEvent::AccountsChanged(vec![]))
        .await;

    let state = session.snapshot().await;
    assert!(!state.is_connected());
    assert_eq!(state.balance, NativeAmount::ZERO);
    assert_eq!(state.phase, ConnectionPhase::Disconnected);
}

#[tokio::test]
async fn account_change_event_adopts_the_new_account() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(7)]);
    provider.set_chain(target());
    provider.set_balance(addr(7), mon(1));
    provider.set_balance(addr(8), mon(7));
    let session = session_over(&provider);
    session.connect().await.unwrap();
    wait_for_balance(&session, mon(1)).await;

    session
        .apply_provider_event(ProviderEvent::AccountsChanged(vec![addr(8)]))
        .await;

    assert_eq!(session.snapshot().await.address, Some(addr(8)));
    wait_for_balance(&session, mon(7)).await;
}

#[tokio::test]
async fn chain_change_event_invalidates_the_session() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(9)]);
    provider.set_chain(target());
    let session = session_over(&provider);
    session.connect().await.unwrap();
    let mut rx = session.subscribe_events();

    session
        .apply_provider_event(ProviderEvent::ChainChanged(other_chain()))
        .await;

    assert_eq!(session.snapshot().await.chain, Some(other_chain()));
    assert!(!session.is_on_target_network().await);

    let mut invalidated = false;
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::Invalidated { chain } = event {
            assert_eq!(chain, other_chain());
            invalidated = true;
        }
    }
    assert!(invalidated, "no invalidation event was published");
}

#[tokio::test]
async fn started_session_pumps_provider_events() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(10)]);
    provider.set_chain(target());
    let session = session_over(&provider);
    session.connect().await.unwrap();
    session.start();

    provider.emit_chain_changed(other_chain());

    for _ in 0..500 {
        if session.snapshot().await.chain == Some(other_chain()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(session.snapshot().await.chain, Some(other_chain()));
    session.shutdown();
}

#[tokio::test]
async fn shutdown_stops_the_event_pump() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(10)]);
    provider.set_chain(target());
    let session = session_over(&provider);
    session.connect().await.unwrap();
    session.start();
    session.shutdown();

    provider.emit_chain_changed(other_chain());
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(session.snapshot().await.chain, Some(target()));
}

// ── Balance polling ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn poller_refreshes_on_the_configured_interval() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(11)]);
    provider.set_chain(target());
    provider.set_balance(addr(11), mon(1));
    let session = session_over(&provider);

    session.connect().await.unwrap();
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert_eq!(session.snapshot().await.balance, mon(1));

    provider.set_balance(addr(11), mon(2));
    tokio::time::advance(Duration::from_secs(30)).await;
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert_eq!(session.snapshot().await.balance, mon(2));
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_balance() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(12)]);
    provider.set_chain(target());
    provider.set_balance(addr(12), mon(4));
    let session = session_over(&provider);
    session.connect().await.unwrap();
    wait_for_balance(&session, mon(4)).await;

    provider.fail_balance();
    session.refresh_balance().await;

    assert_eq!(session.snapshot().await.balance, mon(4));
}

// ── Transaction submission ───────────────────────────────────────────────

#[tokio::test]
async fn submit_requires_a_connection() {
    let provider = Arc::new(NullProvider::new());
    let session = session_over(&provider);
    let submitter = TransactionSubmitter::new(Arc::clone(&session));

    let err = submitter.submit(&addr(20), mon(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::NotConnected));
    assert!(provider.sent_transactions().is_empty());
}

#[tokio::test]
async fn submit_switches_network_before_sending() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(13)]);
    provider.set_chain(target());
    let session = session_over(&provider);
    session.connect().await.unwrap();
    // The wallet drifts off-network afterwards.
    session
        .apply_provider_event(ProviderEvent::ChainChanged(other_chain()))
        .await;
    provider.reset_log();

    let submitter = TransactionSubmitter::new(Arc::clone(&session));
    let value = NativeAmount::parse_display("0.0001").unwrap();
    let tx = submitter.submit(&addr(20), value).await.unwrap();

    assert!(!tx.as_str().is_empty());
    assert_eq!(provider.switch_calls(), vec![target()]);
    let sent = provider.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, addr(13));
    assert_eq!(sent[0].to, addr(20));
    assert_eq!(sent[0].value, value);
    assert_eq!(sent[0].gas, TRANSFER_GAS);
}

#[tokio::test]
async fn submit_fails_before_sending_when_the_network_is_stuck() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(14)]);
    provider.set_chain(other_chain());
    provider.fail_switch();
    let session = session_over(&provider);
    session.connect().await.unwrap();
    provider.reset_log();
    let mut rx = session.subscribe_events();

    let submitter = TransactionSubmitter::new(Arc::clone(&session));
    let err = submitter.submit(&addr(20), mon(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::WrongNetwork));
    assert!(provider.sent_transactions().is_empty());
    let notices = drain_notices(&mut rx);
    assert!(notices.iter().any(|n| n.text.contains("switch")));
}

#[tokio::test]
async fn submit_maps_a_user_rejection() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(15)]);
    provider.set_chain(target());
    provider.reject_transaction();
    let session = session_over(&provider);
    session.connect().await.unwrap();
    let mut rx = session.subscribe_events();

    let submitter = TransactionSubmitter::new(Arc::clone(&session));
    let err = submitter.submit(&addr(20), mon(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::TransactionRejected));
    let notices = drain_notices(&mut rx);
    assert!(notices
        .iter()
        .any(|n| n.severity == Severity::Error && n.text.contains("rejected")));
}

#[tokio::test]
async fn submit_wraps_other_provider_failures() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(16)]);
    provider.set_chain(target());
    provider.fail_transaction();
    let session = session_over(&provider);
    session.connect().await.unwrap();

    let submitter = TransactionSubmitter::new(Arc::clone(&session));
    let err = submitter.submit(&addr(20), mon(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::TransactionFailed(_)));
}

#[tokio::test]
async fn successful_submit_announces_and_refreshes_the_balance() {
    let provider = Arc::new(NullProvider::new());
    provider.set_accounts(vec![addr(17)]);
    provider.set_chain(target());
    provider.set_balance(addr(17), mon(10));
    let session = session_over(&provider);
    session.connect().await.unwrap();
    wait_for_balance(&session, mon(10)).await;
    let mut rx = session.subscribe_events();

    provider.set_balance(addr(17), mon(9));
    let submitter = TransactionSubmitter::new(Arc::clone(&session));
    let tx = submitter.submit(&addr(20), mon(1)).await.unwrap();

    let notices = drain_notices(&mut rx);
    assert!(notices
        .iter()
        .any(|n| n.severity == Severity::Info && n.text.contains(&tx.short())));
    wait_for_balance(&session, mon(9)).await;
}
