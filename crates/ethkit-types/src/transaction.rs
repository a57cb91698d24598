//! Legacy transaction with EIP-155 replay protection

use crate::TxError;
use bytes::Bytes;
use ethkit_crypto::keccak256;
use ethkit_primitives::{Address, H256, U256};
use ethkit_rlp::{decode_exact, encode_list, RlpItem};
use std::fmt;

/// Destination of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TxTarget {
    /// Message call to an account
    Address(Address),
    /// Contract deployment; `data` carries the init code
    #[default]
    ContractCreation,
}

impl TxTarget {
    /// The called address, if any
    pub fn address(&self) -> Option<Address> {
        match self {
            TxTarget::Address(address) => Some(*address),
            TxTarget::ContractCreation => None,
        }
    }

    /// Whether this target deploys a contract
    pub fn is_creation(&self) -> bool {
        matches!(self, TxTarget::ContractCreation)
    }

    fn to_rlp(self) -> RlpItem {
        match self {
            TxTarget::Address(address) => RlpItem::from(address),
            TxTarget::ContractCreation => RlpItem::empty(),
        }
    }

    fn from_rlp(item: &RlpItem) -> Result<Self, TxError> {
        let bytes = item.as_bytes()?;
        match bytes.len() {
            0 => Ok(TxTarget::ContractCreation),
            Address::LEN => Ok(TxTarget::Address(Address::from_bytes(
                bytes.try_into().map_err(|_| invalid("to", "not 20 bytes"))?,
            ))),
            n => Err(invalid("to", format!("expected 0 or 20 bytes, got {}", n))),
        }
    }
}

impl From<Address> for TxTarget {
    fn from(address: Address) -> Self {
        TxTarget::Address(address)
    }
}

impl From<Option<Address>> for TxTarget {
    fn from(address: Option<Address>) -> Self {
        address.map_or(TxTarget::ContractCreation, TxTarget::Address)
    }
}

/// Field overrides applied before signing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Replacement gas price
    pub gas_price: Option<U256>,
    /// Replacement gas limit
    pub gas_limit: Option<U256>,
    /// Replacement value
    pub value: Option<U256>,
    /// Replacement destination address
    pub to: Option<Address>,
}

/// Legacy transaction.
///
/// Unsigned transactions have `v = r = s = 0`. After [`Transaction::sign`]
/// the signature fields are populated and `chain_id` records the chain the
/// signature commits to, if any.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Transaction {
    /// Sender nonce
    pub nonce: U256,
    /// Gas price in wei
    pub gas_price: U256,
    /// Gas limit
    pub gas_limit: U256,
    /// Destination
    pub to: TxTarget,
    /// Value to transfer in wei
    pub value: U256,
    /// Calldata or init code
    pub data: Bytes,
    /// Signature `v` (recovery id, optionally folded with the chain id)
    pub v: U256,
    /// Signature `r`
    pub r: U256,
    /// Signature `s`
    pub s: U256,
    /// Explicit chain id used for signing
    pub chain_id: Option<U256>,
}

impl Transaction {
    /// Create an unsigned transaction
    pub fn new(
        nonce: U256,
        gas_price: U256,
        gas_limit: U256,
        to: TxTarget,
        value: U256,
        data: Bytes,
    ) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            ..Default::default()
        }
    }

    /// Attach an explicit chain id
    pub fn with_chain_id(mut self, chain_id: U256) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Whether `r` and `s` are both unset
    pub fn is_unsigned(&self) -> bool {
        self.r.is_zero() && self.s.is_zero()
    }

    /// Chain id implied by the signature fields.
    ///
    /// - `r = s = 0`: `v` itself carries the chain id (`v = 0` means none)
    /// - `v` is 27 or 28: pre-EIP-155 signature, no chain id
    /// - otherwise `(v - 1) / 2 - 17`, or `None` if that underflows
    pub fn inferred_chain_id(&self) -> Option<U256> {
        if self.is_unsigned() {
            return (!self.v.is_zero()).then_some(self.v);
        }
        if self.v == U256::from(27) || self.v == U256::from(28) {
            return None;
        }
        let half = self.v.checked_sub(U256::one())? / 2;
        half.checked_sub(U256::from(17))
    }

    /// The explicit chain id, falling back to the inferred one
    pub fn effective_chain_id(&self) -> Option<U256> {
        self.chain_id.or_else(|| self.inferred_chain_id())
    }

    fn payload_items(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::from_uint(self.nonce),
            RlpItem::from_uint(self.gas_price),
            RlpItem::from_uint(self.gas_limit),
            self.to.to_rlp(),
            RlpItem::from_uint(self.value),
            RlpItem::Bytes(self.data.to_vec()),
        ]
    }

    /// RLP pre-image committed to by the signature.
    ///
    /// With a chain id this is the EIP-155 list
    /// `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`,
    /// otherwise the six payload fields alone.
    pub fn encode_for_signing(&self, chain_id: Option<U256>) -> Vec<u8> {
        let mut items = self.payload_items();
        if let Some(chain_id) = chain_id {
            items.push(RlpItem::from_uint(chain_id));
            items.push(RlpItem::empty());
            items.push(RlpItem::empty());
        }
        encode_list(&items)
    }

    /// Keccak-256 of the signing pre-image
    pub fn signing_hash(&self, chain_id: Option<U256>) -> H256 {
        keccak256(&self.encode_for_signing(chain_id))
    }

    /// Broadcast encoding: always the 9-field list ending in `v, r, s`.
    pub fn encode(&self) -> Vec<u8> {
        let mut items = self.payload_items();
        items.push(RlpItem::from_uint(self.v));
        items.push(RlpItem::from_uint(self.r));
        items.push(RlpItem::from_uint(self.s));
        encode_list(&items)
    }

    /// Broadcast encoding as `0x` lowercase hex
    pub fn to_raw_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    /// Transaction hash: Keccak-256 of the broadcast encoding
    pub fn hash(&self) -> H256 {
        keccak256(&self.encode())
    }

    /// Decode the 9-field broadcast form.
    ///
    /// The explicit chain id is set from `v` only when `v >= 37`.
    pub fn decode(raw: &[u8]) -> Result<Self, TxError> {
        let item = decode_exact(raw)?;
        let fields = item.as_list()?;
        if fields.len() != 9 {
            return Err(TxError::FieldCount(fields.len()));
        }

        let mut tx = Self {
            nonce: fields[0].to_uint()?,
            gas_price: fields[1].to_uint()?,
            gas_limit: fields[2].to_uint()?,
            to: TxTarget::from_rlp(&fields[3])?,
            value: fields[4].to_uint()?,
            data: Bytes::copy_from_slice(fields[5].as_bytes()?),
            v: fields[6].to_uint()?,
            r: fields[7].to_uint()?,
            s: fields[8].to_uint()?,
            chain_id: None,
        };
        if tx.v >= U256::from(37) {
            tx.chain_id = tx.inferred_chain_id();
        }
        Ok(tx)
    }

    /// Decode the broadcast form from hex (with or without `0x`)
    pub fn from_raw_hex(raw: &str) -> Result<Self, TxError> {
        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        let bytes = hex::decode(digits).map_err(|e| invalid("raw", e.to_string()))?;
        Self::decode(&bytes)
    }

    /// Copy with the given overrides applied
    pub fn merged_with(&self, options: &TxOptions) -> Self {
        let mut tx = self.clone();
        if let Some(gas_price) = options.gas_price {
            tx.gas_price = gas_price;
        }
        if let Some(gas_limit) = options.gas_limit {
            tx.gas_limit = gas_limit;
        }
        if let Some(value) = options.value {
            tx.value = value;
        }
        if let Some(to) = options.to {
            tx.to = TxTarget::Address(to);
        }
        tx
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction")?;
        writeln!(f, "  nonce: {}", self.nonce)?;
        writeln!(f, "  gas price: {}", self.gas_price)?;
        writeln!(f, "  gas limit: {}", self.gas_limit)?;
        match self.to {
            TxTarget::Address(address) => writeln!(f, "  to: {}", address)?,
            TxTarget::ContractCreation => writeln!(f, "  to: contract creation")?,
        }
        writeln!(f, "  value: {}", self.value)?;
        writeln!(f, "  data: 0x{}", hex::encode(&self.data))?;
        writeln!(f, "  v: {}", self.v)?;
        writeln!(f, "  r: {}", self.r)?;
        writeln!(f, "  s: {}", self.s)?;
        writeln!(f, "  intrinsic chain id: {}", display_opt(self.chain_id))?;
        writeln!(f, "  inferred chain id: {}", display_opt(self.inferred_chain_id()))?;
        match self.sender() {
            Some(sender) => writeln!(f, "  sender: {}", sender)?,
            None => writeln!(f, "  sender: none")?,
        }
        write!(f, "  hash: {}", self.hash())
    }
}

fn display_opt(value: Option<U256>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> TxError {
    TxError::InvalidField {
        field,
        reason: reason.into(),
    }
}
