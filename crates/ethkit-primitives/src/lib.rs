//! # ethkit-primitives
//!
//! Primitive value types shared by every ethkit crate.
//!
//! - [`Address`]: 20-byte account identifier
//! - [`H256`]: 32-byte hash
//! - [`U256`]: 256-bit unsigned integer (re-exported from `primitive-types`)
//! - [`quantity`]: `0x`-prefixed hex helpers used on the JSON-RPC boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
pub mod quantity;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, H256};
pub use quantity::QuantityError;

// Re-export primitive-types for U256
pub use primitive_types::U256;
