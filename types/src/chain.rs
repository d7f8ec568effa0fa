//! Chain identifier as relayed by wallet providers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// The hexadecimal chain identifier a provider reports, e.g. `0x27af`.
///
/// The value is never derived locally. It is parsed from provider responses,
/// lowercased, and compared against the configured target. Comparisons are
/// on the canonical string so `0X27AF` and `0x27af` are the same chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    /// Parse and normalise a provider-supplied chain id string.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let s = raw.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidChainId(format!("missing 0x prefix: {s}")))?;
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidChainId(s.to_string()));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// The Monad testnet chain id, `0x27af` (decimal 10143).
    pub fn monad_testnet() -> Self {
        Self("0x27af".to_string())
    }

    /// Return the canonical lowercase `0x…` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decimal value, when it fits in 64 bits.
    pub fn as_u64(&self) -> Option<u64> {
        u64::from_str_radix(&self.0[2..], 16).ok()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
