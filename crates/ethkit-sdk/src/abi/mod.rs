//! ABI encoding and decoding for Solidity contracts
//!
//! This module provides functionality for:
//! - Parsing Solidity type strings
//! - Encoding function calls and decoding return values
//! - Computing function selectors and event topics
//! - Reading ABI JSON interface descriptions
//!
//! # Example
//!
//! ```rust
//! use ethkit_sdk::abi::{decode, encode_function_call, function_selector, parse_type, Token};
//! use ethkit_primitives::{Address, U256};
//!
//! // Encode a transfer call
//! let types = [parse_type("address").unwrap(), parse_type("uint256").unwrap()];
//! let selector = function_selector("transfer(address,uint256)");
//! let data = encode_function_call(
//!     selector,
//!     &types,
//!     &[Token::Address(Address::ZERO), Token::Uint(U256::from(1000))],
//! )
//! .unwrap();
//! assert_eq!(data.len(), 68);
//!
//! // Decode a balance response
//! let return_data = [0u8; 32]; // From eth_call
//! let balance = decode(&[parse_type("uint256").unwrap()], &return_data).unwrap();
//! assert_eq!(balance, vec![Token::Uint(U256::zero())]);
//! ```

mod decode;
mod element;
mod encode;
mod error;
mod json;
mod parse;
mod types;

pub use decode::decode;
pub use element::{AbiElement, Constructor, Event, Fallback, Function, Param};
pub use encode::{encode, encode_function_call, function_selector};
pub use error::AbiError;
pub use json::{parse_abi_json, ParsingError};
pub use parse::{parse_type, MAX_TYPE_DEPTH};
pub use types::{ParamType, Token, TypeKind, I256};
