//! Session events published to hosts over a broadcast channel.
//!
//! A [`Notice`] is a user-facing message the host is expected to show
//! (a toast, a console line); how it is rendered is up to the host.
//! [`SessionEvent::Invalidated`] signals that the wallet moved to a
//! different chain and any chain-derived host state should be rebuilt.

use chainvote_types::ChainId;

/// How prominently a notice should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-facing message emitted by the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { severity: Severity::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { severity: Severity::Error, text: text.into() }
    }
}

/// Events delivered to [`crate::WalletSession::subscribe_events`] receivers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A message for the user.
    Notice(Notice),
    /// The wallet switched to `chain`; cached chain-derived state is stale.
    Invalidated { chain: ChainId },
}
