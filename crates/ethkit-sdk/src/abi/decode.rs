//! ABI decoding

use ethkit_primitives::{Address, U256};

use super::types::{ParamType, Token, I256};
use super::AbiError;

/// Decode tokens from ABI-encoded data.
///
/// Offsets and lengths are bounds-checked, padding must be zero and integers
/// must fit their declared width. Bytes after the last value are ignored.
///
/// Every decoded value costs one 32-byte word of input, so offsets pointing
/// at a shared tail cannot produce more values than the data holds.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut budget = data.len() / 32;
    decode_params(types, data, &mut budget)
}

/// Decode a block of parameters. Offsets are relative to `block`.
fn decode_params(
    types: &[ParamType],
    block: &[u8],
    budget: &mut usize,
) -> Result<Vec<Token>, AbiError> {
    let mut head_offset = 0usize;
    let mut tokens = Vec::with_capacity(types.len());

    for param_type in types {
        let token = if param_type.is_dynamic() {
            let offset = read_usize(block, head_offset)?;
            let tail = block.get(offset..).ok_or_else(|| {
                malformed(format!(
                    "offset {} points past the end of {} bytes",
                    offset,
                    block.len()
                ))
            })?;
            decode_token(param_type, tail, budget)?
        } else {
            let start = block
                .get(head_offset..)
                .ok_or_else(|| malformed("head exceeds data".to_string()))?;
            decode_token(param_type, start, budget)?
        };
        tokens.push(token);
        head_offset = head_offset
            .checked_add(param_type.head_size())
            .ok_or_else(|| malformed("head size overflow".to_string()))?;
    }

    Ok(tokens)
}

/// Decode a single value whose encoding starts at `data[0]`
fn decode_token(
    param_type: &ParamType,
    data: &[u8],
    budget: &mut usize,
) -> Result<Token, AbiError> {
    // fixed arrays own no word of their own; their elements are charged
    if !matches!(param_type, ParamType::FixedArray(..)) {
        *budget = budget
            .checked_sub(1)
            .ok_or_else(|| malformed("decoded values exceed the input size".to_string()))?;
    }

    match param_type {
        ParamType::Address => {
            let word = read_word(data, 0)?;
            check_zero(&word[..12], "address")?;
            let mut addr_bytes = [0u8; 20];
            addr_bytes.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(addr_bytes)))
        }
        ParamType::Uint(bits) => {
            let value = U256::from_big_endian(read_word(data, 0)?);
            if value.bits() > *bits {
                return Err(malformed(format!("{} does not fit {}", value, param_type)));
            }
            Ok(Token::Uint(value))
        }
        ParamType::Int(bits) => {
            let value = I256::from_twos_complement(U256::from_big_endian(read_word(data, 0)?));
            if !value.fits_bits(*bits) {
                return Err(malformed(format!("{} does not fit {}", value, param_type)));
            }
            Ok(Token::Int(value))
        }
        ParamType::Bool => {
            let word = read_word(data, 0)?;
            check_zero(&word[..31], "bool")?;
            match word[31] {
                0 => Ok(Token::Bool(false)),
                1 => Ok(Token::Bool(true)),
                other => Err(malformed(format!("invalid bool value {}", other))),
            }
        }
        ParamType::FixedBytes(size) => {
            if *size > 32 {
                return Err(malformed(format!("unsupported type {}", param_type)));
            }
            let word = read_word(data, 0)?;
            check_zero(&word[*size..], "fixed bytes")?;
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        ParamType::Function => {
            let word = read_word(data, 0)?;
            check_zero(&word[24..], "function")?;
            let mut reference = [0u8; 24];
            reference.copy_from_slice(&word[..24]);
            Ok(Token::Function(reference))
        }
        ParamType::Bytes => decode_bytes(data).map(|bytes| Token::Bytes(bytes.to_vec())),
        ParamType::String => {
            let bytes = decode_bytes(data)?;
            let s = String::from_utf8(bytes.to_vec())
                .map_err(|e| malformed(format!("invalid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, 0)?;
            let elements = decode_elements(inner, len, &data[32..], budget)?;
            Ok(Token::Array(elements))
        }
        ParamType::FixedArray(inner, len) => {
            decode_elements(inner, *len, data, budget).map(Token::FixedArray)
        }
    }
}

/// Decode `len` elements laid out as a parameter block.
///
/// Rejects element counts the remaining data cannot hold before allocating.
fn decode_elements(
    inner: &ParamType,
    len: usize,
    block: &[u8],
    budget: &mut usize,
) -> Result<Vec<Token>, AbiError> {
    let needed = len.checked_mul(inner.head_size().max(32));
    if needed.map_or(true, |needed| needed > block.len()) {
        return Err(malformed(format!(
            "{} elements of {} exceed the remaining {} bytes",
            len,
            inner,
            block.len()
        )));
    }
    let types = vec![inner.clone(); len];
    decode_params(&types, block, budget)
}

/// Length-prefixed byte string at `data[0]`
fn decode_bytes(data: &[u8]) -> Result<&[u8], AbiError> {
    let len = read_usize(data, 0)?;
    let content = &data[32..];
    if len > content.len() {
        return Err(malformed(format!(
            "length {} exceeds the remaining {} bytes",
            len,
            content.len()
        )));
    }
    Ok(&content[..len])
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8; 32], AbiError> {
    at.checked_add(32)
        .and_then(|end| data.get(at..end))
        .and_then(|word| word.try_into().ok())
        .ok_or_else(|| {
            malformed(format!(
                "insufficient data: need 32 bytes at {}, have {}",
                at,
                data.len()
            ))
        })
}

/// Read an offset or length word
fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, at)?);
    if value > U256::from(usize::MAX) {
        return Err(malformed(format!("offset or length {} is too large", value)));
    }
    Ok(value.as_usize())
}

fn check_zero(padding: &[u8], what: &str) -> Result<(), AbiError> {
    if padding.iter().any(|b| *b != 0) {
        return Err(malformed(format!("non-zero padding in {}", what)));
    }
    Ok(())
}

fn malformed(message: String) -> AbiError {
    AbiError::MalformedInput(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode, parse_type};

    fn types(list: &[&str]) -> Vec<ParamType> {
        list.iter().map(|t| parse_type(t).unwrap()).collect()
    }

    fn word(value: u64) -> String {
        format!("{:064x}", value)
    }

    fn words(parts: &[String]) -> Vec<u8> {
        hex::decode(parts.concat()).unwrap()
    }

    fn uint(value: u64) -> Token {
        Token::Uint(U256::from(value))
    }

    // ==================== Well-formed data ====================

    #[test]
    fn test_decode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let mut encoded = [0u8; 32];
        encoded[12..32].copy_from_slice(addr.as_bytes());

        let tokens = decode(&[ParamType::Address], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Address(addr)]);
    }

    #[test]
    fn test_decode_negative_int() {
        let tokens = decode(&[ParamType::Int(8)], &[0xff; 32]).unwrap();
        assert_eq!(tokens, vec![Token::Int(I256::from(-1i64))]);

        let min = words(&[format!("8{:063x}", 0)]);
        let tokens = decode(&[ParamType::Int(256)], &min).unwrap();
        assert_eq!(tokens, vec![Token::Int(I256::min_value())]);
    }

    #[test]
    fn test_decode_nested_dynamic() {
        let t = types(&["uint256[][]", "string[]"]);
        let values = vec![
            Token::Array(vec![
                Token::Array(vec![uint(1), uint(2)]),
                Token::Array(vec![uint(3)]),
            ]),
            Token::Array(vec!["one".into(), "two".into(), "three".into()]),
        ];
        let encoded = encode(&t, &values).unwrap();
        assert_eq!(decode(&t, &encoded).unwrap(), values);
    }

    #[test]
    fn test_decode_fixed_array_of_strings() {
        let t = types(&["string[2]", "uint8"]);
        let values = vec![
            Token::FixedArray(vec!["a".into(), "bc".into()]),
            uint(7),
        ];
        let encoded = encode(&t, &values).unwrap();
        assert_eq!(decode(&t, &encoded).unwrap(), values);
    }

    #[test]
    fn test_decode_static_fixed_array_inline() {
        let data = words(&[word(1), word(2), word(3)]);
        let tokens = decode(&types(&["uint8[2]", "bool"]), &data);
        assert_eq!(
            tokens,
            Err(AbiError::MalformedInput("invalid bool value 3".to_string()))
        );
        let data = words(&[word(1), word(2), word(1)]);
        assert_eq!(
            decode(&types(&["uint8[2]", "bool"]), &data).unwrap(),
            vec![Token::FixedArray(vec![uint(1), uint(2)]), Token::Bool(true)]
        );
    }

    #[test]
    fn test_decode_ignores_trailing_data() {
        let data = words(&[word(5), word(0xdead)]);
        assert_eq!(decode(&[ParamType::Uint(256)], &data).unwrap(), vec![uint(5)]);
    }

    #[test]
    fn test_decode_empty_dynamic_values() {
        let data = words(&[word(0x40), word(0x60), word(0), word(0)]);
        assert_eq!(
            decode(&types(&["bytes", "uint256[]"]), &data).unwrap(),
            vec![Token::Bytes(Vec::new()), Token::Array(Vec::new())]
        );
    }

    // ==================== Malformed data ====================

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode(&[ParamType::Uint(256)], &[0u8; 31]),
            Err(AbiError::MalformedInput(_))
        ));
        assert!(decode(&types(&["uint256", "uint256"]), &[0u8; 32]).is_err());
    }

    #[test]
    fn test_decode_offset_out_of_bounds() {
        let data = words(&[word(0x1000)]);
        assert!(matches!(
            decode(&[ParamType::Bytes], &data),
            Err(AbiError::MalformedInput(_))
        ));
        let data = words(&[format!("{:064x}", u128::MAX), word(0)]);
        assert!(decode(&[ParamType::String], &data).is_err());
        let data = words(&[format!("{}{}", "f".repeat(32), "0".repeat(32))]);
        assert!(decode(&[ParamType::String], &data).is_err());
    }

    #[test]
    fn test_decode_length_exceeds_data() {
        let data = words(&[word(0x20), word(100), word(0)]);
        assert!(decode(&[ParamType::Bytes], &data).is_err());
    }

    #[test]
    fn test_decode_huge_array_length_rejected_before_allocation() {
        let data = words(&[word(0x20), word(u64::MAX)]);
        assert!(matches!(
            decode(&types(&["uint256[]"]), &data),
            Err(AbiError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_decode_rejects_dirty_padding() {
        let mut address = [0u8; 32];
        address[0] = 1;
        assert!(decode(&[ParamType::Address], &address).is_err());

        let mut fixed = [0u8; 32];
        fixed[2] = 1;
        assert!(decode(&[ParamType::FixedBytes(2)], &fixed).is_err());
        assert!(decode(&[ParamType::FixedBytes(3)], &fixed).is_ok());

        let mut function = [0u8; 32];
        function[24] = 1;
        assert!(decode(&[ParamType::Function], &function).is_err());
    }

    #[test]
    fn test_decode_rejects_out_of_range_integers() {
        let data = words(&[word(256)]);
        assert!(decode(&[ParamType::Uint(8)], &data).is_err());
        assert!(decode(&[ParamType::Uint(16)], &data).is_ok());

        // 0x80 positive does not fit int8; a negative int8 needs full sign extension
        assert!(decode(&[ParamType::Int(8)], &words(&[word(0x80)])).is_err());
        let mut partial = [0u8; 32];
        partial[31] = 0xff;
        assert!(decode(&[ParamType::Int(8)], &partial).is_err());
    }

    #[test]
    fn test_decode_rejects_aliased_offsets() {
        // every outer element points at one middle array, every middle
        // element at one inner array
        let n = 20u64;
        let mut parts = vec![word(0x20)];
        for _ in 0..2 {
            parts.push(word(n));
            parts.extend((0..n).map(|_| word(n * 32)));
        }
        parts.push(word(n));
        parts.extend((0..n).map(word));
        let data = words(&parts);
        assert_eq!(data.len(), (3 * n as usize + 4) * 32);

        assert!(matches!(
            decode(&types(&["uint256[][][]"]), &data),
            Err(AbiError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_decode_budget_admits_canonical_encodings() {
        let t = types(&["uint8[2][2]", "bytes[]", "uint256[][]"]);
        let values = vec![
            Token::FixedArray(vec![
                Token::FixedArray(vec![uint(1), uint(2)]),
                Token::FixedArray(vec![uint(3), uint(4)]),
            ]),
            Token::Array(vec![Token::Bytes(Vec::new()), Token::Bytes(vec![0xab; 40])]),
            Token::Array(vec![Token::Array(Vec::new()), Token::Array(vec![uint(9)])]),
        ];
        let encoded = encode(&t, &values).unwrap();
        assert_eq!(decode(&t, &encoded).unwrap(), values);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let data = words(&[word(0x20), word(2), format!("{:0<64}", "fffe")]);
        assert!(matches!(
            decode(&[ParamType::String], &data),
            Err(AbiError::MalformedInput(_))
        ));
        assert!(decode(&[ParamType::Bytes], &data).is_ok());
    }
}
