//! ABI type and value model

use super::AbiError;
use ethkit_primitives::{Address, H256, U256};
use std::fmt;

/// Layout class of a type, decidable from the type alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Fixed 32-byte slot: address, uint, int, bool, bytesN, function
    StaticScalar,
    /// Fixed-length array of static elements, inlined in the head
    StaticComposite,
    /// Length-prefixed bytes or string
    DynamicScalar,
    /// Dynamic array, or fixed-length array of dynamic elements
    DynamicComposite,
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size (8, 16, ..., 256)
    Int(usize),
    /// Boolean
    Bool,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// External function reference: address followed by selector, 24 bytes
    Function,
    /// Dynamic bytes
    Bytes,
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    /// Layout class of this type
    pub fn kind(&self) -> TypeKind {
        match self {
            ParamType::Address
            | ParamType::Uint(_)
            | ParamType::Int(_)
            | ParamType::Bool
            | ParamType::FixedBytes(_)
            | ParamType::Function => TypeKind::StaticScalar,
            ParamType::Bytes | ParamType::String => TypeKind::DynamicScalar,
            ParamType::Array(_) => TypeKind::DynamicComposite,
            ParamType::FixedArray(inner, _) => {
                if inner.is_dynamic() {
                    TypeKind::DynamicComposite
                } else {
                    TypeKind::StaticComposite
                }
            }
        }
    }

    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        let mut current = self;
        loop {
            match current {
                ParamType::Bytes | ParamType::String | ParamType::Array(_) => return true,
                ParamType::FixedArray(inner, _) => current = &**inner,
                _ => return false,
            }
        }
    }

    /// Bytes occupied in the head: the full inline size for static types,
    /// one offset word for dynamic ones.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        let mut size = 32usize;
        let mut current = self;
        while let ParamType::FixedArray(inner, len) = current {
            size = size.saturating_mul(*len);
            current = &**inner;
        }
        size
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Function => write!(f, "function"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
        }
    }
}

/// Signed 256-bit integer in sign/magnitude form.
///
/// Zero is never negative, so equal values compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Smallest representable value, -2^255
    pub fn min_value() -> Self {
        Self {
            abs: U256::one() << 255,
            negative: true,
        }
    }

    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Magnitude
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value fits `int<bits>`
    pub fn fits_bits(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// 256-bit two's complement representation
    pub fn to_twos_complement(&self) -> U256 {
        if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        }
    }

    /// Interpret a 256-bit word as two's complement
    pub fn from_twos_complement(word: U256) -> Self {
        if word.bit(255) {
            Self::new((!word).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(word, false)
        }
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// External function reference (address ++ selector)
    Function([u8; 24]),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
}

impl Token {
    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Variant name, used in mismatch errors
    pub fn variant_name(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Bytes(_) => "bytes",
            Token::String(_) => "string",
            Token::Function(_) => "function",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
        }
    }

    fn mismatch(&self, expected: &'static str) -> AbiError {
        AbiError::TokenMismatch {
            expected,
            found: self.variant_name(),
        }
    }

    /// Address value
    pub fn as_address(&self) -> Result<Address, AbiError> {
        match self {
            Token::Address(address) => Ok(*address),
            other => Err(other.mismatch("address")),
        }
    }

    /// Unsigned integer value
    pub fn as_uint(&self) -> Result<U256, AbiError> {
        match self {
            Token::Uint(value) => Ok(*value),
            other => Err(other.mismatch("uint")),
        }
    }

    /// Signed integer value
    pub fn as_int(&self) -> Result<I256, AbiError> {
        match self {
            Token::Int(value) => Ok(*value),
            other => Err(other.mismatch("int")),
        }
    }

    /// Boolean value
    pub fn as_bool(&self) -> Result<bool, AbiError> {
        match self {
            Token::Bool(value) => Ok(*value),
            other => Err(other.mismatch("bool")),
        }
    }

    /// Contents of a `bytes` or `bytesN` value
    pub fn as_bytes(&self) -> Result<&[u8], AbiError> {
        match self {
            Token::Bytes(bytes) | Token::FixedBytes(bytes) => Ok(bytes),
            other => Err(other.mismatch("bytes")),
        }
    }

    /// String value
    pub fn as_str(&self) -> Result<&str, AbiError> {
        match self {
            Token::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    /// Function reference value
    pub fn as_function(&self) -> Result<[u8; 24], AbiError> {
        match self {
            Token::Function(f) => Ok(*f),
            other => Err(other.mismatch("function")),
        }
    }

    /// Elements of a dynamic or fixed-size array
    pub fn as_array(&self) -> Result<&[Token], AbiError> {
        match self {
            Token::Array(items) | Token::FixedArray(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }
}

impl From<Address> for Token {
    fn from(address: Address) -> Self {
        Token::Address(address)
    }
}

impl From<U256> for Token {
    fn from(value: U256) -> Self {
        Token::Uint(value)
    }
}

impl From<I256> for Token {
    fn from(value: I256) -> Self {
        Token::Int(value)
    }
}

impl From<bool> for Token {
    fn from(value: bool) -> Self {
        Token::Bool(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::String(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::String(value)
    }
}
