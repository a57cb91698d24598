//! SDK error types

use thiserror::Error;

use crate::abi::{AbiError, ParsingError};

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// ABI type, encoding or decoding error
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// ABI JSON error
    #[error("ABI JSON error: {0}")]
    AbiJson(#[from] ParsingError),

    /// Transaction encoding, decoding or signing error
    #[error("Transaction error: {0}")]
    Transaction(#[from] ethkit_types::TxError),

    /// Key or signature error
    #[error("Crypto error: {0}")]
    Crypto(#[from] ethkit_crypto::CryptoError),

    /// Malformed address, hash or quantity
    #[error("Invalid value: {0}")]
    Primitive(#[from] ethkit_primitives::PrimitiveError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error payload returned by a node
    #[error("RPC error: {code} - {message}")]
    Node {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid chain ID
    #[error("Invalid chain ID: {0}")]
    InvalidChainId(String),

    /// Configuration could not be read or written
    #[error("Config error: {0}")]
    Config(String),

    /// Contract has no function or event with this name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<ethkit_primitives::QuantityError> for SdkError {
    fn from(e: ethkit_primitives::QuantityError) -> Self {
        SdkError::Primitive(e.into())
    }
}

impl From<ethkit_primitives::AddressError> for SdkError {
    fn from(e: ethkit_primitives::AddressError) -> Self {
        SdkError::Primitive(e.into())
    }
}

impl From<ethkit_primitives::HashError> for SdkError {
    fn from(e: ethkit_primitives::HashError) -> Self {
        SdkError::Primitive(e.into())
    }
}
