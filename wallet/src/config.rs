//! Session configuration.
//!
//! All fields have defaults targeting the Monad testnet, so an empty
//! TOML file (or no file at all) yields a working configuration.

use std::path::Path;
use std::time::Duration;

use chainvote_types::{ChainId, NetworkDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds between background balance refreshes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Capacity of the session event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Network the session drives the wallet toward.
    #[serde(default = "default_network")]
    pub network: NetworkDescriptor,
}

// ── Serde default helpers ────────────────────────────────────────────────

fn default_network() -> NetworkDescriptor {
    NetworkDescriptor::monad_testnet()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_event_capacity() -> usize {
    64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            poll_interval_secs: default_poll_interval_secs(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SessionError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, SessionError> {
        toml::from_str(raw).map_err(|e| SessionError::Config(format!("failed to parse config: {e}")))
    }

    pub fn to_toml_string(&self) -> Result<String, SessionError> {
        toml::to_string_pretty(self)
            .map_err(|e| SessionError::Config(format!("failed to serialize config: {e}")))
    }

    pub fn target_chain(&self) -> &ChainId {
        &self.network.chain_id
    }

    pub fn poll_interval(&self) -> Duration {
        // tokio::time::interval panics on a zero period.
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
