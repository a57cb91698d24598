//! ECDSA signature operations using secp256k1

use crate::{keccak256, CryptoError};
use ethkit_primitives::{Address, H256};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};

/// Half of the secp256k1 curve order (n/2), big-endian
const SECP256K1_N_DIV_2: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D,
    0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Public key
pub type PublicKey = VerifyingKey;

/// Private key (32-byte scalar)
pub type PrivateKey = SigningKey;

/// Recoverable ECDSA signature.
///
/// `recovery_id` is the raw curve recovery id (0 or 1). Mapping it onto a
/// transaction `v` value is the caller's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component, big-endian
    pub r: [u8; 32],
    /// s component, big-endian
    pub s: [u8; 32],
    /// Recovery id (0 or 1)
    pub recovery_id: u8,
}

impl Signature {
    /// Create signature from components
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Self {
        Signature { r, s, recovery_id }
    }

    /// 65-byte `r || s || v` form with `v = 27 + recovery_id`
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.recovery_id + 27;
        bytes
    }

    /// Parse the 65-byte `r || s || v` form; `v` may be 0/1 or 27/28.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let recovery_id = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            other => return Err(CryptoError::InvalidRecoveryId(other)),
        };
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Signature { r, s, recovery_id })
    }

    /// Check if signature has low-s value (EIP-2)
    pub fn is_low_s(&self) -> bool {
        // Lexicographic order on equal-length big-endian arrays is numeric order.
        self.s <= SECP256K1_N_DIV_2
    }

    fn to_k256(self) -> Result<K256Signature, CryptoError> {
        K256Signature::from_scalars(k256::FieldBytes::from(self.r), k256::FieldBytes::from(self.s))
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }
}

/// Load a private key from its 32-byte big-endian scalar.
pub fn private_key_from_bytes(bytes: &[u8]) -> Result<PrivateKey, CryptoError> {
    SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Sign a 32-byte prehash.
///
/// Nonces are derived deterministically (RFC 6979) and `s` is normalized to
/// the lower half of the curve order, flipping the recovery id to match.
pub fn sign(message_hash: &H256, private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let (signature, recovery_id) = private_key
        .sign_prehash_recoverable(message_hash.as_bytes())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    let (signature, recovery_id) = match signature.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::try_from(recovery_id.to_byte() ^ 1).map_err(|_| {
                CryptoError::SigningFailed("invalid recovery id after normalization".to_string())
            })?;
            (normalized, flipped)
        }
        None => (signature, recovery_id),
    };

    Ok(Signature {
        r: signature.r().to_bytes().into(),
        s: signature.s().to_bytes().into(),
        recovery_id: recovery_id.to_byte(),
    })
}

/// Verify a signature against a prehash and public key. High-s signatures
/// are rejected.
pub fn verify(
    message_hash: &H256,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    if !signature.is_low_s() {
        return Ok(false);
    }
    let k256_sig = signature.to_k256()?;
    Ok(public_key
        .verify_prehash(message_hash.as_bytes(), &k256_sig)
        .is_ok())
}

/// Recover the signer's public key from a prehash and signature.
pub fn recover_public_key(
    message_hash: &H256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    if signature.recovery_id > 1 {
        return Err(CryptoError::InvalidRecoveryId(signature.recovery_id));
    }
    let recovery_id = RecoveryId::try_from(signature.recovery_id)
        .map_err(|_| CryptoError::InvalidRecoveryId(signature.recovery_id))?;
    let k256_sig = signature.to_k256()?;

    VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &k256_sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Recover the signer's address from a prehash and signature.
pub fn recover_address(message_hash: &H256, signature: &Signature) -> Result<Address, CryptoError> {
    recover_public_key(message_hash, signature).map(|key| public_key_to_address(&key))
}

/// Derive the account address: the low 20 bytes of Keccak-256 over the
/// uncompressed public key without its `0x04` prefix.
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(addr_bytes)
}
