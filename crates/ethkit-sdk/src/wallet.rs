//! Wallet and account management

use ethkit_crypto::{
    hash_personal_message, private_key_from_bytes, public_key_to_address, sign, PrivateKey,
    PublicKey, Signature,
};
use ethkit_primitives::{Address, H256};
use ethkit_types::Transaction;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::SdkError;

/// Wallet for managing a private key and signing with it
///
/// Not `Clone`: use `from_private_key` to create a second wallet with the
/// same key if needed.
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
}

impl Wallet {
    /// Create a new random wallet from the OS random number generator
    pub fn new_random() -> Self {
        let private_key = SigningKey::random(&mut OsRng);
        let address = public_key_to_address(private_key.verifying_key());

        Self {
            private_key,
            address,
        }
    }

    /// Create a wallet from a 32-byte private key
    pub fn from_private_key(key: &[u8; 32]) -> Result<Self, SdkError> {
        let private_key = private_key_from_bytes(key)?;
        let address = public_key_to_address(private_key.verifying_key());

        Ok(Self {
            private_key,
            address,
        })
    }

    /// Create a wallet from a hex-encoded private key
    ///
    /// Accepts both with and without "0x" prefix.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, SdkError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = hex::decode(hex)?;
        if bytes.len() != 32 {
            tracing::debug!(len = bytes.len(), "rejected private key of wrong length");
            bytes.zeroize();
            return Err(ethkit_crypto::CryptoError::InvalidPrivateKey.into());
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        bytes.zeroize();

        let result = Self::from_private_key(&key);
        key.zeroize();
        result
    }

    /// Get the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the wallet's public key
    pub fn public_key(&self) -> &PublicKey {
        self.private_key.verifying_key()
    }

    /// Sign a message hash (32 bytes)
    pub fn sign_hash(&self, hash: &H256) -> Result<Signature, SdkError> {
        Ok(sign(hash, &self.private_key)?)
    }

    /// Sign a message with the Ethereum personal sign prefix
    ///
    /// Prefixes the message with "\x19Ethereum Signed Message:\n{len}"
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, SdkError> {
        self.sign_hash(&hash_personal_message(message))
    }

    /// Sign `tx`, returning the signed copy
    pub fn sign_transaction(&self, tx: &Transaction) -> Result<Transaction, SdkError> {
        Ok(tx.sign(&self.private_key)?)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
