//! # ethkit-rlp
//!
//! RLP (Recursive Length Prefix) encoding/decoding for ethkit.
//!
//! Values are modelled as [`RlpItem`], either a byte string or a list of
//! items. Decoding is strict: every logical value has exactly one accepted
//! encoding and anything else is rejected.
//!
//! ## RLP Encoding Rules
//!
//! - Single byte `[0x00, 0x7f]`: itself
//! - Short string (0-55 bytes): `0x80 + len` + data
//! - Long string (>55 bytes): `0xb7 + len_of_len` + len + data
//! - Short list (0-55 bytes payload): `0xc0 + len` + items
//! - Long list (>55 bytes payload): `0xf7 + len_of_len` + len + items
//! - Integers: minimal big-endian bytes, zero is the empty string

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
mod encode;
mod error;
mod item;

pub use decode::{decode, decode_exact, MAX_DEPTH};
pub use encode::{encode, encode_list, list_header, string_header};
pub use error::RlpError;
pub use item::RlpItem;
