//! Strict RLP decoding

use crate::{RlpError, RlpItem};

/// Maximum list nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 1024;

/// Decode one item from the front of `data`.
///
/// Returns the item and the number of bytes it occupied; trailing bytes are
/// left to the caller.
pub fn decode(data: &[u8]) -> Result<(RlpItem, usize), RlpError> {
    decode_item(data, 0)
}

/// Decode `data` as exactly one item with nothing after it.
pub fn decode_exact(data: &[u8]) -> Result<RlpItem, RlpError> {
    let (item, consumed) = decode(data)?;
    if consumed != data.len() {
        return Err(RlpError::MalformedInput("trailing bytes after item"));
    }
    Ok(item)
}

fn decode_item(data: &[u8], depth: usize) -> Result<(RlpItem, usize), RlpError> {
    let prefix = *data
        .first()
        .ok_or(RlpError::MalformedInput("empty input"))?;

    match prefix {
        0x00..=0x7f => Ok((RlpItem::Bytes(vec![prefix]), 1)),
        0x80..=0xb7 => {
            let len = (prefix - 0x80) as usize;
            let payload = payload(data, 1, len)?;
            if len == 1 && payload[0] < 0x80 {
                return Err(RlpError::MalformedInput(
                    "single byte below 0x80 must encode as itself",
                ));
            }
            Ok((RlpItem::Bytes(payload.to_vec()), 1 + len))
        }
        0xb8..=0xbf => {
            let len_of_len = (prefix - 0xb7) as usize;
            let len = long_length(data, len_of_len)?;
            let payload = payload(data, 1 + len_of_len, len)?;
            Ok((RlpItem::Bytes(payload.to_vec()), 1 + len_of_len + len))
        }
        0xc0..=0xf7 => {
            let len = (prefix - 0xc0) as usize;
            let payload = payload(data, 1, len)?;
            let items = decode_children(payload, depth)?;
            Ok((RlpItem::List(items), 1 + len))
        }
        0xf8..=0xff => {
            let len_of_len = (prefix - 0xf7) as usize;
            let len = long_length(data, len_of_len)?;
            let payload = payload(data, 1 + len_of_len, len)?;
            let items = decode_children(payload, depth)?;
            Ok((RlpItem::List(items), 1 + len_of_len + len))
        }
    }
}

fn decode_children(mut payload: &[u8], depth: usize) -> Result<Vec<RlpItem>, RlpError> {
    if depth >= MAX_DEPTH {
        return Err(RlpError::MalformedInput("list nesting too deep"));
    }
    let mut items = Vec::new();
    while !payload.is_empty() {
        // A child overrunning the slice surfaces as truncation, so the
        // children always consume the declared payload exactly.
        let (item, consumed) = decode_item(payload, depth + 1)?;
        items.push(item);
        payload = &payload[consumed..];
    }
    Ok(items)
}

/// Slice `len` payload bytes starting at `offset`.
fn payload(data: &[u8], offset: usize, len: usize) -> Result<&[u8], RlpError> {
    let end = offset
        .checked_add(len)
        .ok_or(RlpError::MalformedInput("length overflows"))?;
    data.get(offset..end)
        .ok_or(RlpError::MalformedInput("payload runs past end of input"))
}

/// Read a long-form length field of `len_of_len` bytes following the prefix.
fn long_length(data: &[u8], len_of_len: usize) -> Result<usize, RlpError> {
    let bytes = payload(data, 1, len_of_len)?;
    if bytes[0] == 0 {
        return Err(RlpError::MalformedInput("length with leading zero bytes"));
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::MalformedInput("length does not fit in memory"));
    }
    let len = bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if len < 56 {
        return Err(RlpError::MalformedInput("long form used for short payload"));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    fn malformed(data: &[u8]) -> bool {
        matches!(decode(data), Err(RlpError::MalformedInput(_)))
    }

    // ==================== Well-formed input ====================

    #[test]
    fn test_decode_dog() {
        let (item, consumed) = decode(&[0x83, b'd', b'o', b'g']).unwrap();
        assert_eq!(item, RlpItem::from("dog"));
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_decode_reports_consumed_with_trailing_bytes() {
        let (item, consumed) = decode(&[0x82, 0x04, 0x00, 0xff, 0xff]).unwrap();
        assert_eq!(item.to_u64().unwrap(), 1024);
        assert_eq!(consumed, 3);
        assert_eq!(
            decode_exact(&[0x82, 0x04, 0x00, 0xff]),
            Err(RlpError::MalformedInput("trailing bytes after item"))
        );
    }

    #[test]
    fn test_decode_cat_dog() {
        let item = decode_exact(&[0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']).unwrap();
        assert_eq!(
            item,
            RlpItem::List(vec![RlpItem::from("cat"), RlpItem::from("dog")])
        );
    }

    #[test]
    fn test_decode_long_string() {
        let data = vec![0x61; 60];
        let encoded = encode(&RlpItem::Bytes(data.clone()));
        assert_eq!(decode_exact(&encoded).unwrap(), RlpItem::Bytes(data));
    }

    #[test]
    fn test_decode_long_list() {
        let item = RlpItem::List(vec![RlpItem::from("abcdefghij"); 6]);
        let encoded = encode(&item);
        assert_eq!(encoded[0], 0xf8);
        assert_eq!(decode_exact(&encoded).unwrap(), item);
    }

    #[test]
    fn test_decode_empty_values() {
        assert_eq!(decode_exact(&[0x80]).unwrap(), RlpItem::empty());
        assert_eq!(decode_exact(&[0xc0]).unwrap(), RlpItem::List(vec![]));
        assert_eq!(decode_exact(&[0x00]).unwrap(), RlpItem::Bytes(vec![0x00]));
    }

    // ==================== Malformed input ====================

    #[test]
    fn test_reject_empty_input() {
        assert_eq!(decode(&[]), Err(RlpError::MalformedInput("empty input")));
    }

    #[test]
    fn test_reject_truncated_string() {
        assert!(malformed(&[0x83, b'd', b'o']));
        assert!(malformed(&[0xb7, 0x01, 0x02]));
        assert!(malformed(&[0xb8]));
        assert!(malformed(&[0xb8, 0x38, 0x00]));
    }

    #[test]
    fn test_reject_truncated_list() {
        assert!(malformed(&[0xc2, 0x01]));
        assert!(malformed(&[0xf8, 0x38]));
    }

    #[test]
    fn test_reject_child_overrunning_list() {
        // List declares 2 bytes of payload but its child claims 3
        assert!(malformed(&[0xc2, 0x83, b'a', b'b', b'c']));
    }

    #[test]
    fn test_reject_wrapped_single_byte() {
        assert!(malformed(&[0x81, 0x00]));
        assert!(malformed(&[0x81, 0x7f]));
        assert!(decode(&[0x81, 0x80]).is_ok());
    }

    #[test]
    fn test_reject_non_minimal_long_form() {
        let mut data = vec![0xb8, 0x05];
        data.extend_from_slice(b"hello");
        assert!(malformed(&data));

        assert!(malformed(&[0xf8, 0x00]));
    }

    #[test]
    fn test_reject_length_with_leading_zero() {
        let mut data = vec![0xb9, 0x00, 0x38];
        data.extend_from_slice(&[0x61; 56]);
        assert!(malformed(&data));
    }

    #[test]
    fn test_reject_huge_length_claim() {
        assert!(malformed(&[0xbf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]));
        assert!(malformed(&[0xff, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_reject_excessive_nesting() {
        let mut item = RlpItem::List(vec![]);
        for _ in 0..MAX_DEPTH + 1 {
            item = RlpItem::List(vec![item]);
        }
        let encoded = encode(&item);
        assert_eq!(
            decode(&encoded),
            Err(RlpError::MalformedInput("list nesting too deep"))
        );
    }

    #[test]
    fn test_accept_nesting_at_limit() {
        let mut item = RlpItem::List(vec![]);
        for _ in 0..MAX_DEPTH - 1 {
            item = RlpItem::List(vec![item]);
        }
        let encoded = encode(&item);
        assert_eq!(decode_exact(&encoded).unwrap(), item);
    }
}
