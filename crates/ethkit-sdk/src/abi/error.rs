//! ABI errors

use thiserror::Error;

/// ABI type parsing, encoding and decoding error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Type string outside the supported grammar
    #[error("invalid parameter type: {0:?}")]
    InvalidParameterType(String),

    /// Value does not fit the declared type
    #[error("encoding type mismatch: {0}")]
    EncodingTypeMismatch(String),

    /// Encoded data is truncated or not canonical
    #[error("malformed ABI data: {0}")]
    MalformedInput(String),

    /// Typed accessor used on the wrong token variant
    #[error("token mismatch: expected {expected}, found {found}")]
    TokenMismatch {
        /// Requested variant
        expected: &'static str,
        /// Actual variant
        found: &'static str,
    },
}
