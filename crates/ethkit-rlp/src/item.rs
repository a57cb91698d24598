//! The RLP value model

use crate::RlpError;
use ethkit_primitives::{Address, U256};

/// A decoded or to-be-encoded RLP value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RlpItem {
    /// Byte string
    Bytes(Vec<u8>),
    /// Ordered list of items
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// The empty byte string (`0x80`)
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    /// Integer as minimal big-endian bytes; zero is the empty string.
    pub fn from_uint(value: U256) -> Self {
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        let start = buf.iter().position(|&b| b != 0).unwrap_or(32);
        RlpItem::Bytes(buf[start..].to_vec())
    }

    /// Integer as minimal big-endian bytes; zero is the empty string.
    pub fn from_u64(value: u64) -> Self {
        Self::from_uint(U256::from(value))
    }

    /// Borrow the payload of a byte string item.
    pub fn as_bytes(&self) -> Result<&[u8], RlpError> {
        match self {
            RlpItem::Bytes(bytes) => Ok(bytes),
            RlpItem::List(_) => Err(RlpError::UnexpectedItem {
                expected: "byte string",
            }),
        }
    }

    /// Borrow the children of a list item.
    pub fn as_list(&self) -> Result<&[RlpItem], RlpError> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(RlpError::UnexpectedItem { expected: "list" }),
        }
    }

    /// Whether this item is a list
    pub fn is_list(&self) -> bool {
        matches!(self, RlpItem::List(_))
    }

    /// Interpret a byte string as a canonical unsigned integer.
    ///
    /// Leading zero bytes and values wider than 256 bits are rejected.
    pub fn to_uint(&self) -> Result<U256, RlpError> {
        let bytes = self.as_bytes()?;
        if bytes.len() > 32 {
            return Err(RlpError::MalformedInput("integer wider than 256 bits"));
        }
        if bytes.first() == Some(&0) {
            return Err(RlpError::MalformedInput("integer with leading zero bytes"));
        }
        Ok(U256::from_big_endian(bytes))
    }

    /// Interpret a byte string as a canonical `u64`.
    pub fn to_u64(&self) -> Result<u64, RlpError> {
        let value = self.to_uint()?;
        if value.bits() > 64 {
            return Err(RlpError::MalformedInput("integer wider than 64 bits"));
        }
        Ok(value.low_u64())
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(bytes: Vec<u8>) -> Self {
        RlpItem::Bytes(bytes)
    }
}

impl From<&[u8]> for RlpItem {
    fn from(bytes: &[u8]) -> Self {
        RlpItem::Bytes(bytes.to_vec())
    }
}

impl From<&str> for RlpItem {
    fn from(s: &str) -> Self {
        RlpItem::Bytes(s.as_bytes().to_vec())
    }
}

impl From<Address> for RlpItem {
    fn from(address: Address) -> Self {
        RlpItem::Bytes(address.as_bytes().to_vec())
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}
