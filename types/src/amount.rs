//! Native-currency amounts in smallest units.
//!
//! Amounts are fixed-point integers (u128 of smallest units, 18 decimals) so
//! that costs and balances are exact. No floating point is used anywhere in
//! the conversions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// Smallest units per whole token at 18 decimals.
const UNITS_PER_WHOLE: u128 = 1_000_000_000_000_000_000;

/// A native-currency amount in smallest units (the wei analog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NativeAmount(u128);

impl NativeAmount {
    pub const ZERO: Self = Self(0);

    /// Decimal places of the native currency.
    pub const DECIMALS: u32 = 18;

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse a provider-supplied `0x…` hex quantity.
    pub fn from_hex_str(raw: &str) -> Result<Self, TypeError> {
        let s = raw.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidAmount(format!("missing 0x prefix: {s}")))?;
        u128::from_str_radix(body, 16)
            .map(Self)
            .map_err(|_| TypeError::InvalidAmount(s.to_string()))
    }

    /// Minimal `0x…` hex encoding for the wire (`0x0` for zero).
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parse an exact decimal string such as `"0.0001"` into smallest units.
    ///
    /// At most 18 fractional digits are accepted. The conversion is pure
    /// integer arithmetic, so `"0.0001"` is exactly 100_000_000_000_000.
    pub fn parse_display(raw: &str) -> Result<Self, TypeError> {
        let s = raw.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(TypeError::InvalidAmount(format!("empty amount: {raw:?}")));
        }
        // u128::from_str tolerates a leading `+`; only bare digits are
        // acceptable here.
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(TypeError::InvalidAmount(s.to_string()));
        }
        if frac_part.len() > Self::DECIMALS as usize {
            return Err(TypeError::InvalidAmount(format!(
                "more than {} fractional digits: {s}",
                Self::DECIMALS
            )));
        }
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| TypeError::InvalidAmount(s.to_string()))?
        };
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            format!("{frac_part:0<18}")
                .parse()
                .map_err(|_| TypeError::InvalidAmount(s.to_string()))?
        };
        whole
            .checked_mul(UNITS_PER_WHOLE)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or_else(|| TypeError::InvalidAmount(format!("amount out of range: {s}")))
    }

    /// Exact decimal rendering with trailing fractional zeros trimmed.
    pub fn to_display_string(&self) -> String {
        let whole = self.0 / UNITS_PER_WHOLE;
        let frac = self.0 % UNITS_PER_WHOLE;
        if frac == 0 {
            whole.to_string()
        } else {
            let digits = format!("{frac:018}");
            format!("{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}
