//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// r or s is zero or not below the curve order
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Recovery id other than 0 or 1
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Recovery failed
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// Private key is not a valid secp256k1 scalar
    #[error("invalid private key")]
    InvalidPrivateKey,
}
