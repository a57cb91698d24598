//! Keccak-256 hashing

use ethkit_primitives::H256;
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data.
///
/// This is the original Keccak padding used by Ethereum, not NIST SHA3-256.
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// EIP-191 personal message hash:
/// `keccak256("\x19Ethereum Signed Message:\n" ++ len(message) ++ message)`.
pub fn hash_personal_message(message: &[u8]) -> H256 {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    H256::from_bytes(hasher.finalize().into())
}
