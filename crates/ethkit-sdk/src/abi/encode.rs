//! ABI encoding

use ethkit_primitives::U256;

use super::types::{ParamType, Token, I256};
use super::AbiError;

/// Encode `tokens` against `types` using the head/tail layout.
///
/// Every token is checked against its declared type first, including
/// integer ranges, `bytesN` lengths and fixed array lengths.
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::EncodingTypeMismatch(format!(
            "expected {} values, got {}",
            types.len(),
            tokens.len()
        )));
    }
    let encoded = encode_params(types, tokens)?;
    tracing::trace!(params = types.len(), bytes = encoded.len(), "encoded ABI parameters");
    Ok(encoded)
}

/// Encode function call (selector + params)
pub fn encode_function_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, AbiError> {
    let mut result = selector.to_vec();
    result.extend(encode(types, tokens)?);
    Ok(result)
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = ethkit_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Encode a block of parameters. Offsets are relative to the block start.
fn encode_params(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let head_size = types.iter().map(ParamType::head_size).sum::<usize>();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend(encode_u256(&U256::from(offset)));
            tail.extend(encode_token(param_type, token)?);
        } else {
            head.extend(encode_token(param_type, token)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn mismatch(param_type: &ParamType, token: &Token) -> AbiError {
    AbiError::EncodingTypeMismatch(format!(
        "cannot encode {} as {}",
        token.variant_name(),
        param_type
    ))
}

fn out_of_range(param_type: &ParamType, value: impl std::fmt::Display) -> AbiError {
    AbiError::EncodingTypeMismatch(format!("{} is out of range for {}", value, param_type))
}

/// Encode a single token
fn encode_token(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, AbiError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut buf = [0u8; 32];
            buf[12..32].copy_from_slice(addr.as_bytes());
            Ok(buf.to_vec())
        }
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(out_of_range(param_type, value));
            }
            Ok(encode_u256(value))
        }
        (ParamType::Uint(bits), Token::Int(value)) => {
            if value.is_negative() || value.abs().bits() > *bits {
                return Err(out_of_range(param_type, value));
            }
            Ok(encode_u256(&value.abs()))
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            if !value.fits_bits(*bits) {
                return Err(out_of_range(param_type, value));
            }
            Ok(encode_u256(&value.to_twos_complement()))
        }
        (ParamType::Int(bits), Token::Uint(value)) => {
            let value = I256::new(*value, false);
            if !value.fits_bits(*bits) {
                return Err(out_of_range(param_type, value));
            }
            Ok(encode_u256(&value.abs()))
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            Ok(buf.to_vec())
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() > (*size).min(32) {
                return Err(AbiError::EncodingTypeMismatch(format!(
                    "{} bytes do not fit {}",
                    data.len(),
                    param_type
                )));
            }
            Ok(left_aligned(data))
        }
        (ParamType::Function, Token::Function(reference)) => Ok(left_aligned(reference)),
        (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(tokens) | Token::FixedArray(tokens)) => {
            let mut result = encode_u256(&U256::from(tokens.len()));
            result.extend(encode_elements(inner, tokens)?);
            Ok(result)
        }
        (ParamType::FixedArray(inner, len), Token::Array(tokens) | Token::FixedArray(tokens)) => {
            if tokens.len() != *len {
                return Err(AbiError::EncodingTypeMismatch(format!(
                    "expected {} elements for {}, got {}",
                    len,
                    param_type,
                    tokens.len()
                )));
            }
            encode_elements(inner, tokens)
        }
        _ => Err(mismatch(param_type, token)),
    }
}

fn encode_elements(inner: &ParamType, tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let types = vec![inner.clone(); tokens.len()];
    encode_params(&types, tokens)
}

/// Convert U256 to 32-byte big-endian array
fn u256_to_bytes(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Encode a U256 as 32 bytes
fn encode_u256(value: &U256) -> Vec<u8> {
    u256_to_bytes(value).to_vec()
}

fn left_aligned(data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 32];
    buf[..data.len()].copy_from_slice(data);
    buf
}

/// Encode dynamic bytes
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_u256(&U256::from(data.len()));

    // Pad to 32 bytes
    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::parse_type;
    use ethkit_primitives::Address;

    fn types(list: &[&str]) -> Vec<ParamType> {
        list.iter().map(|t| parse_type(t).unwrap()).collect()
    }

    fn uint(value: u64) -> Token {
        Token::Uint(U256::from(value))
    }

    fn word(value: u64) -> String {
        format!("{:064x}", value)
    }

    fn padded(text: &str) -> String {
        format!("{:0<64}", hex::encode(text))
    }

    // ==================== Static values ====================

    #[test]
    fn test_encode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[ParamType::Address], &[Token::Address(addr)]).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..32], addr.as_bytes());
    }

    #[test]
    fn test_encode_negative_int_sign_extends() {
        let encoded = encode(&[ParamType::Int(8)], &[Token::Int(I256::from(-1i64))]).unwrap();
        assert_eq!(encoded, vec![0xff; 32]);

        let encoded = encode(&[ParamType::Int(256)], &[Token::Int(I256::from(-2i64))]).unwrap();
        assert_eq!(encoded[31], 0xfe);
        assert!(encoded[..31].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_encode_bool() {
        let encoded = encode(&types(&["bool", "bool"]), &[Token::Bool(true), Token::Bool(false)])
            .unwrap();
        assert_eq!(encoded[31], 1);
        assert_eq!(encoded[63], 0);
    }

    #[test]
    fn test_encode_short_fixed_bytes_is_right_padded() {
        let encoded = encode(&[ParamType::FixedBytes(4)], &[Token::FixedBytes(vec![0xab, 0xcd])])
            .unwrap();
        assert_eq!(&encoded[..2], &[0xab, 0xcd]);
        assert!(encoded[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_function_reference() {
        let mut reference = [0u8; 24];
        reference[..20].copy_from_slice(&[0x11; 20]);
        reference[20..].copy_from_slice(&[0xa9, 0x05, 0x9c, 0xbb]);
        let encoded = encode(&[ParamType::Function], &[Token::Function(reference)]).unwrap();
        assert_eq!(&encoded[..24], &reference);
        assert_eq!(&encoded[24..], &[0u8; 8]);
    }

    // ==================== Reference layouts ====================

    #[test]
    fn test_encode_static_call() {
        let encoded = encode_function_call(
            function_selector("baz(uint32,bool)"),
            &types(&["uint32", "bool"]),
            &[uint(69), Token::Bool(true)],
        )
        .unwrap();
        assert_eq!(hex::encode(encoded), format!("cdcd77c0{}{}", word(69), word(1)));
    }

    #[test]
    fn test_encode_fixed_array_of_bytes3() {
        let encoded = encode_function_call(
            function_selector("bar(bytes3[2])"),
            &types(&["bytes3[2]"]),
            &[Token::FixedArray(vec![
                Token::FixedBytes(b"abc".to_vec()),
                Token::FixedBytes(b"def".to_vec()),
            ])],
        )
        .unwrap();
        assert_eq!(
            hex::encode(encoded),
            format!("fce353f6{}{}", padded("abc"), padded("def"))
        );
    }

    #[test]
    fn test_encode_mixed_dynamic_call() {
        let encoded = encode_function_call(
            function_selector("sam(bytes,bool,uint256[])"),
            &types(&["bytes", "bool", "uint256[]"]),
            &[
                Token::Bytes(b"dave".to_vec()),
                Token::Bool(true),
                Token::Array(vec![uint(1), uint(2), uint(3)]),
            ],
        )
        .unwrap();
        let expected = [
            "a5643bf2".to_string(),
            word(0x60),
            word(1),
            word(0xa0),
            word(4),
            padded("dave"),
            word(3),
            word(1),
            word(2),
            word(3),
        ]
        .concat();
        assert_eq!(hex::encode(encoded), expected);
    }

    #[test]
    fn test_encode_static_and_dynamic_interleaved() {
        let encoded = encode_function_call(
            function_selector("f(uint256,uint32[],bytes10,bytes)"),
            &types(&["uint256", "uint32[]", "bytes10", "bytes"]),
            &[
                uint(0x123),
                Token::Array(vec![uint(0x456), uint(0x789)]),
                Token::FixedBytes(b"1234567890".to_vec()),
                Token::Bytes(b"Hello, world!".to_vec()),
            ],
        )
        .unwrap();
        let expected = [
            "8be65246".to_string(),
            word(0x123),
            word(0x80),
            padded("1234567890"),
            word(0xe0),
            word(2),
            word(0x456),
            word(0x789),
            word(13),
            padded("Hello, world!"),
        ]
        .concat();
        assert_eq!(hex::encode(encoded), expected);
    }

    #[test]
    fn test_encode_nested_dynamic_offsets_are_block_relative() {
        let encoded = encode_function_call(
            function_selector("g(uint256[][],string[])"),
            &types(&["uint256[][]", "string[]"]),
            &[
                Token::Array(vec![
                    Token::Array(vec![uint(1), uint(2)]),
                    Token::Array(vec![uint(3)]),
                ]),
                Token::Array(vec!["one".into(), "two".into(), "three".into()]),
            ],
        )
        .unwrap();
        let expected = [
            "2289b18c".to_string(),
            word(0x40),
            word(0x140),
            word(2),
            word(0x40),
            word(0xa0),
            word(2),
            word(1),
            word(2),
            word(1),
            word(3),
            word(3),
            word(0x60),
            word(0xa0),
            word(0xe0),
            word(3),
            padded("one"),
            word(3),
            padded("two"),
            word(5),
            padded("three"),
        ]
        .concat();
        assert_eq!(hex::encode(encoded), expected);
    }

    #[test]
    fn test_encode_empty_inputs() {
        assert!(encode(&[], &[]).unwrap().is_empty());
        assert_eq!(
            encode(&[ParamType::String], &["".into()]).unwrap(),
            hex::decode(format!("{}{}", word(0x20), word(0))).unwrap()
        );
    }

    #[test]
    fn test_function_selector() {
        assert_eq!(function_selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(function_selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    // ==================== Validation ====================

    #[test]
    fn test_encode_rejects_count_mismatch() {
        assert!(matches!(
            encode(&types(&["uint256", "bool"]), &[uint(1)]),
            Err(AbiError::EncodingTypeMismatch(_))
        ));
    }

    #[test]
    fn test_encode_rejects_wrong_variant() {
        assert!(matches!(
            encode(&[ParamType::Address], &[uint(1)]),
            Err(AbiError::EncodingTypeMismatch(_))
        ));
        assert!(encode(&[ParamType::Bytes], &["text".into()]).is_err());
    }

    #[test]
    fn test_encode_integer_ranges() {
        assert!(encode(&[ParamType::Uint(8)], &[uint(255)]).is_ok());
        assert!(encode(&[ParamType::Uint(8)], &[uint(256)]).is_err());
        assert!(encode(&[ParamType::Uint(256)], &[Token::Uint(U256::MAX)]).is_ok());
        assert!(encode(&[ParamType::Uint(256)], &[Token::Int(I256::from(-1i64))]).is_err());
        assert!(encode(&[ParamType::Uint(16)], &[Token::Int(I256::from(7i64))]).is_ok());
        assert!(encode(&[ParamType::Int(8)], &[Token::Int(I256::from(-128i64))]).is_ok());
        assert!(encode(&[ParamType::Int(8)], &[Token::Int(I256::from(128i64))]).is_err());
        assert!(encode(&[ParamType::Int(8)], &[uint(127)]).is_ok());
        assert!(encode(&[ParamType::Int(256)], &[Token::Uint(U256::MAX)]).is_err());
    }

    #[test]
    fn test_encode_rejects_oversized_fixed_bytes() {
        assert!(encode(&[ParamType::FixedBytes(2)], &[Token::FixedBytes(vec![1, 2, 3])]).is_err());
    }

    #[test]
    fn test_encode_checks_fixed_array_length_and_elements() {
        let t = types(&["uint8[2]"]);
        assert!(encode(&t, &[Token::FixedArray(vec![uint(1)])]).is_err());
        assert!(encode(&t, &[Token::FixedArray(vec![uint(1), uint(300)])]).is_err());
        assert!(encode(&t, &[Token::FixedArray(vec![uint(1), uint(2)])]).is_ok());
    }
}
