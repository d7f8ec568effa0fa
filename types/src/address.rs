//! EVM-style account address with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// An EVM-style account address: `0x` followed by 40 hex characters.
///
/// Wallets report addresses in assorted checksum casings, so the string is
/// lowercased on parse. Equality and hashing therefore never depend on the
/// casing a particular provider happens to emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The prefix every address carries on the wire.
    pub const PREFIX: &'static str = "0x";

    /// Parse and normalise a provider-supplied address string.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let s = raw.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidAddress(format!("missing 0x prefix: {s}")))?;
        let bytes = hex::decode(body)
            .map_err(|_| TypeError::InvalidAddress(format!("non-hex characters: {s}")))?;
        if bytes.len() != 20 {
            return Err(TypeError::InvalidAddress(format!(
                "expected 20 bytes, got {}: {s}",
                bytes.len()
            )));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Return the canonical lowercase address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated form for display: first 6 and last 4 characters.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lowercases_checksummed_input() {
        let addr = Address::parse("0x000000000000000000000000000000000000dEaD").unwrap();
        assert_eq!(addr.as_str(), "0x000000000000000000000000000000000000dead");
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = Address::parse("000000000000000000000000000000000000dead").unwrap_err();
        assert!(matches!(err, TypeError::InvalidAddress(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Address::parse("0xdead").is_err());
        assert!(Address::parse("0x000000000000000000000000000000000000dead00").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(Address::parse("0x00000000000000000000000000000000000000zz").is_err());
    }

    #[test]
    fn short_form_keeps_prefix_and_tail() {
        let addr = Address::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        assert_eq!(addr.short(), "0x1234...5678");
    }
}
