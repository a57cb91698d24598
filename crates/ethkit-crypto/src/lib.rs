//! # ethkit-crypto
//!
//! Cryptographic primitives for ethkit.
//!
//! - Keccak-256 hashing
//! - ECDSA signing/verification over secp256k1 (RFC 6979 nonces, low-s)
//! - Public key recovery
//! - Address derivation and EIP-55 checksums

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod error;
mod hash;
mod signature;

pub use checksum::{is_valid_checksum, to_checksum_address};
pub use error::CryptoError;
pub use hash::{hash_personal_message, keccak256};
pub use signature::{
    private_key_from_bytes, public_key_to_address, recover_address, recover_public_key, sign,
    verify, PrivateKey, PublicKey, Signature,
};
