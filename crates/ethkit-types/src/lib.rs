//! # ethkit-types
//!
//! Transaction model for ethkit.
//!
//! This crate provides:
//! - [`Transaction`]: legacy transaction with optional EIP-155 chain id
//! - RLP signing pre-image and broadcast encodings, hashing and raw decoding
//! - Signing with secp256k1 and signature-based sender recovery

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod signing;
pub mod transaction;

pub use error::TxError;
pub use transaction::{Transaction, TxOptions, TxTarget};
