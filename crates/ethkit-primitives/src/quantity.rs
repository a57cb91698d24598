//! `0x` hex helpers for JSON-RPC quantities and data.
//!
//! Quantities are big-endian integers without leading zeros (`0x0`, `0x1a`).
//! Data is an even-length byte string (`0x`, `0xdeadbeef`).

use crate::U256;
use thiserror::Error;

/// Hex quantity / data error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity with no digits
    #[error("empty hex quantity")]
    Empty,
    /// Non-hex characters or odd-length data
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    /// More than 256 bits of significant digits
    #[error("hex quantity exceeds 256 bits")]
    Overflow,
}

/// Parse a hex quantity into a `U256`.
///
/// The `0x` prefix is optional and redundant leading zeros are tolerated,
/// since several nodes emit them for `v`.
pub fn parse_u256(s: &str) -> Result<U256, QuantityError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err(QuantityError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidHex(s.to_string()));
    }
    let significant = digits.trim_start_matches('0');
    if significant.len() > 64 {
        return Err(QuantityError::Overflow);
    }
    if significant.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(significant, 16).map_err(|_| QuantityError::InvalidHex(s.to_string()))
}

/// Parse a hex quantity that must fit in a `u64`.
pub fn parse_u64(s: &str) -> Result<u64, QuantityError> {
    let value = parse_u256(s)?;
    if value.bits() > 64 {
        return Err(QuantityError::Overflow);
    }
    Ok(value.low_u64())
}

/// Format a `U256` as a minimal hex quantity.
pub fn format_u256(value: &U256) -> String {
    format!("0x{:x}", value)
}

/// Format a `u64` as a minimal hex quantity.
pub fn format_u64(value: u64) -> String {
    format!("0x{:x}", value)
}

/// Parse hex data into bytes. `0x` alone is the empty byte string.
pub fn parse_bytes(s: &str) -> Result<Vec<u8>, QuantityError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| QuantityError::InvalidHex(e.to_string()))
}

/// Format bytes as `0x` lowercase hex.
pub fn format_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
