//! # ethkit-sdk
//!
//! Client-side toolkit for Ethereum-style chains.
//!
//! ## Features
//!
//! - **ABI**: Solidity type parsing, value encoding and decoding, ABI JSON
//! - **Contract**: Encoding calls and decoding results from an interface
//! - **Wallet**: Key management and signing
//! - **TxBuilder**: Fluent API for building EIP-155 transactions
//! - **rpc**: JSON-RPC request payloads and response decoding
//! - **Config**: Defaults read from `~/.ethkit/config.toml`
//!
//! ## Quick Start
//!
//! ```rust
//! use ethkit_sdk::{TxBuilder, Wallet};
//! use ethkit_sdk::rpc::JsonRpcRequest;
//! use ethkit_primitives::Address;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let wallet = Wallet::new_random();
//!
//! let to = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//! let tx = TxBuilder::new(1)
//!     .nonce(0u64)
//!     .gas_limit(21000u64)
//!     .gas_price(1_000_000_000u64)
//!     .to(to)
//!     .value(1_000_000_000_000_000_000u128) // 1 ETH
//!     .sign(&wallet)?;
//!
//! assert_eq!(tx.sender(), Some(*wallet.address()));
//! let payload = serde_json::to_string(&JsonRpcRequest::send_raw_transaction(1, &tx)?)?;
//! # let _ = payload;
//! # Ok(())
//! # }
//! ```
//!
//! ## Contract Interaction
//!
//! ```rust
//! use ethkit_sdk::{contract, abi::Token};
//! use ethkit_primitives::{Address, U256};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let token = Address::from_hex("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")?;
//! let contract = contract::erc20(token);
//!
//! let owner = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//! let data = contract.encode_call("balanceOf", &[Token::Address(owner)])?;
//! assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
//!
//! // Result of an eth_call with `data`
//! let result = [0u8; 32];
//! let tokens = contract.decode_output("balanceOf", &result)?;
//! assert_eq!(tokens[0].as_uint()?, U256::zero());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod config;
pub mod contract;
mod error;
pub mod rpc;
mod tx_builder;
mod wallet;

pub use config::Config;
pub use contract::{Contract, TokenMetadata, TokenMetadataCache};
pub use error::SdkError;
pub use tx_builder::TxBuilder;
pub use wallet::Wallet;

// Re-export primitives for convenience
pub use ethkit_primitives::{Address, H256, U256};
pub use ethkit_types::{Transaction, TxOptions, TxTarget};
