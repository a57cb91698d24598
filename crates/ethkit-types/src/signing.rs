//! Transaction signing and sender recovery

use crate::transaction::invalid;
use crate::{Transaction, TxError};
use ethkit_crypto::{recover_address, sign, PrivateKey, Signature};
use ethkit_primitives::{Address, U256};

impl Transaction {
    /// Sign with `private_key`, returning the signed copy.
    ///
    /// The signature commits to the effective chain id. With a chain id,
    /// `v = recovery_id + 2 * chain_id + 35` (EIP-155); without one,
    /// `v = recovery_id + 27`. The chain id used is stored in `chain_id`.
    pub fn sign(&self, private_key: &PrivateKey) -> Result<Transaction, TxError> {
        let chain_id = self.effective_chain_id();
        let signing_hash = self.signing_hash(chain_id);
        let signature = sign(&signing_hash, private_key).map_err(TxError::Signing)?;
        let recovery_id = U256::from(signature.recovery_id);

        let v = match chain_id {
            Some(chain_id) => chain_id
                .checked_mul(U256::from(2))
                .and_then(|doubled| doubled.checked_add(U256::from(35) + recovery_id))
                .ok_or_else(|| invalid("chain_id", "too large to fold into v"))?,
            None => recovery_id + 27,
        };

        let mut signed = self.clone();
        signed.v = v;
        signed.r = U256::from_big_endian(&signature.r);
        signed.s = U256::from_big_endian(&signature.s);
        signed.chain_id = chain_id;

        tracing::debug!(
            nonce = %signed.nonce,
            chain_id = ?chain_id.map(|c| c.to_string()),
            hash = %signed.hash(),
            "signed transaction"
        );
        Ok(signed)
    }

    /// Recover the sender address from the signature.
    ///
    /// Returns `Ok(None)` for an unsigned transaction (`r = s = 0`).
    pub fn recover_sender(&self) -> Result<Option<Address>, TxError> {
        if self.is_unsigned() {
            return Ok(None);
        }

        let chain_id = self.signature_chain_id()?;
        let offset = match chain_id {
            Some(chain_id) => chain_id
                .checked_mul(U256::from(2))
                .and_then(|doubled| doubled.checked_add(U256::from(35))),
            None => Some(U256::from(27)),
        };
        let recovery_id = offset
            .and_then(|offset| self.v.checked_sub(offset))
            .filter(|id| *id <= U256::one())
            .ok_or_else(|| invalid("v", format!("{} is not a valid recovery value", self.v)))?;

        let signature = Signature::new(
            word(self.r),
            word(self.s),
            recovery_id.low_u64() as u8,
        );
        let sender = recover_address(&self.signing_hash(chain_id), &signature)
            .map_err(TxError::Recovery)?;
        Ok(Some(sender))
    }

    /// Sender address, or `None` if unsigned or unrecoverable
    pub fn sender(&self) -> Option<Address> {
        self.recover_sender().ok().flatten()
    }

    /// `0x` hex transaction hash, present only when a sender can be recovered
    pub fn txid(&self) -> Option<String> {
        self.sender().map(|_| self.hash().to_hex())
    }

    /// Chain id a signed transaction's `v` commits to.
    ///
    /// An explicit chain id that disagrees with `v` is an error rather than
    /// silently overriding it.
    fn signature_chain_id(&self) -> Result<Option<U256>, TxError> {
        let from_v = if self.v == U256::from(27) || self.v == U256::from(28) {
            None
        } else {
            Some(self.inferred_chain_id().ok_or_else(|| {
                invalid("v", format!("{} is not a valid recovery value", self.v))
            })?)
        };
        match self.chain_id {
            Some(explicit) if Some(explicit) != from_v => Err(invalid(
                "chain_id",
                format!("{} does not match the chain id encoded in v", explicit),
            )),
            _ => Ok(from_v),
        }
    }
}

fn word(value: U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}
