//! Solidity type-string parsing

use super::{AbiError, ParamType};

/// Maximum number of array bracket groups in a type string.
pub const MAX_TYPE_DEPTH: usize = 32;

/// Parse a Solidity type string such as `uint256`, `bytes4[]` or
/// `string[2][]`.
///
/// Trailing bracket groups wrap the element type from the inside out, so
/// `uint8[2][]` is a dynamic array of `uint8[2]`.
pub fn parse_type(s: &str) -> Result<ParamType, AbiError> {
    let invalid = || AbiError::InvalidParameterType(s.to_string());

    // outermost group first
    let mut dims = Vec::new();
    let mut rest = s;
    while let Some(prefix) = rest.strip_suffix(']') {
        if dims.len() == MAX_TYPE_DEPTH {
            return Err(invalid());
        }
        let open = prefix.rfind('[').ok_or_else(invalid)?;
        let len = &prefix[open + 1..];
        dims.push(if len.is_empty() {
            None
        } else {
            Some(parse_size(len).ok_or_else(invalid)?)
        });
        rest = &prefix[..open];
    }

    let mut param_type = parse_base(rest).ok_or_else(invalid)?;
    for len in dims.into_iter().rev() {
        param_type = match len {
            None => ParamType::Array(Box::new(param_type)),
            Some(len) => ParamType::FixedArray(Box::new(param_type), len),
        };
    }
    Ok(param_type)
}

/// Elementary type with optional bit or byte width
fn parse_base(s: &str) -> Option<ParamType> {
    let split = s
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(s.len());
    let (base, digits) = s.split_at(split);
    let size = if digits.is_empty() {
        None
    } else {
        Some(parse_size(digits)?)
    };

    match (base, size) {
        ("address", None) => Some(ParamType::Address),
        ("bool", None) => Some(ParamType::Bool),
        ("string", None) => Some(ParamType::String),
        ("function", None) => Some(ParamType::Function),
        ("bytes", None) => Some(ParamType::Bytes),
        ("bytes", Some(len)) if len <= 32 => Some(ParamType::FixedBytes(len)),
        ("uint", None) => Some(ParamType::Uint(256)),
        ("int", None) => Some(ParamType::Int(256)),
        ("uint", Some(bits)) if valid_int_width(bits) => Some(ParamType::Uint(bits)),
        ("int", Some(bits)) if valid_int_width(bits) => Some(ParamType::Int(bits)),
        _ => None,
    }
}

/// `[1-9][0-9]*`
fn parse_size(digits: &str) -> Option<usize> {
    if digits.is_empty()
        || digits.starts_with('0')
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

fn valid_int_width(bits: usize) -> bool {
    bits % 8 == 0 && (8..=256).contains(&bits)
}
