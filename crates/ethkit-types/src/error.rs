//! Transaction errors

use ethkit_crypto::CryptoError;
use ethkit_rlp::RlpError;
use thiserror::Error;

/// Transaction encoding, decoding and signing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxError {
    /// Raw bytes are not valid RLP
    #[error("malformed transaction encoding: {0}")]
    Rlp(#[from] RlpError),

    /// Broadcast form must be a 9-item list
    #[error("expected 9 transaction fields, got {0}")]
    FieldCount(usize),

    /// A field holds a value the transaction model cannot represent
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Key or signing failure
    #[error("signing failed: {0}")]
    Signing(CryptoError),

    /// Signature does not yield a public key
    #[error("sender recovery failed: {0}")]
    Recovery(CryptoError),
}
