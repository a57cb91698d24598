//! RLP encoding

use crate::RlpItem;
use bytes::{BufMut, BytesMut};

/// Encode an item to RLP bytes.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(encoded_len(item));
    encode_into(item, &mut buf);
    buf.to_vec()
}

/// Encode a sequence of items as an RLP list.
pub fn encode_list(items: &[RlpItem]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(encoded_len).sum();
    let mut buf = BytesMut::with_capacity(payload_len + 9);
    buf.put_slice(&list_header(payload_len));
    for item in items {
        encode_into(item, &mut buf);
    }
    buf.to_vec()
}

fn encode_into(item: &RlpItem, buf: &mut BytesMut) {
    match item {
        RlpItem::Bytes(bytes) => {
            if bytes.len() == 1 && bytes[0] < 0x80 {
                buf.put_u8(bytes[0]);
            } else {
                buf.put_slice(&string_header(bytes.len()));
                buf.put_slice(bytes);
            }
        }
        RlpItem::List(items) => {
            let payload_len: usize = items.iter().map(encoded_len).sum();
            buf.put_slice(&list_header(payload_len));
            for child in items {
                encode_into(child, buf);
            }
        }
    }
}

fn encoded_len(item: &RlpItem) -> usize {
    match item {
        RlpItem::Bytes(bytes) if bytes.len() == 1 && bytes[0] < 0x80 => 1,
        RlpItem::Bytes(bytes) => header_len(bytes.len()) + bytes.len(),
        RlpItem::List(items) => {
            let payload: usize = items.iter().map(encoded_len).sum();
            header_len(payload) + payload
        }
    }
}

fn header_len(payload_len: usize) -> usize {
    if payload_len < 56 {
        1
    } else {
        1 + length_bytes(payload_len).len()
    }
}

/// Header for a byte string payload of `len` bytes (not used for the
/// single-byte self-encoding case).
pub fn string_header(len: usize) -> Vec<u8> {
    header(0x80, 0xb7, len)
}

/// Header for a list whose children encode to `payload_len` bytes.
pub fn list_header(payload_len: usize) -> Vec<u8> {
    header(0xc0, 0xf7, payload_len)
}

fn header(short_base: u8, long_base: u8, len: usize) -> Vec<u8> {
    if len < 56 {
        vec![short_base + len as u8]
    } else {
        let len_bytes = length_bytes(len);
        let mut header = Vec::with_capacity(1 + len_bytes.len());
        header.push(long_base + len_bytes.len() as u8);
        header.extend_from_slice(&len_bytes);
        header
    }
}

/// Length as minimal big-endian bytes
fn length_bytes(len: usize) -> Vec<u8> {
    let bytes = (len as u64).to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethkit_primitives::U256;

    // ==================== Byte strings ====================

    #[test]
    fn test_single_byte_values() {
        assert_eq!(encode(&RlpItem::Bytes(vec![0x00])), vec![0x00]);
        assert_eq!(encode(&RlpItem::Bytes(vec![0x7f])), vec![0x7f]);
        assert_eq!(encode(&RlpItem::Bytes(vec![0x80])), vec![0x81, 0x80]);
    }

    #[test]
    fn test_short_string_encoding() {
        assert_eq!(encode(&RlpItem::empty()), vec![0x80]);
        assert_eq!(encode(&RlpItem::from("dog")), vec![0x83, b'd', b'o', b'g']);
    }

    #[test]
    fn test_string_length_boundary() {
        let encoded = encode(&RlpItem::Bytes(vec![0x42; 55]));
        assert_eq!(encoded[0], 0xb7);
        assert_eq!(encoded.len(), 56);

        let encoded = encode(&RlpItem::Bytes(vec![0x42; 56]));
        assert_eq!(&encoded[..2], &[0xb8, 56]);
        assert_eq!(encoded.len(), 58);
    }

    #[test]
    fn test_long_string_1024_bytes() {
        let encoded = encode(&RlpItem::Bytes(vec![0x42; 1024]));
        assert_eq!(&encoded[..3], &[0xb9, 0x04, 0x00]);
        assert_eq!(encoded.len(), 1027);
    }

    // ==================== Lists ====================

    #[test]
    fn test_empty_list() {
        assert_eq!(encode(&RlpItem::List(vec![])), vec![0xc0]);
        assert_eq!(encode_list(&[]), vec![0xc0]);
    }

    #[test]
    fn test_cat_dog() {
        let expected = vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g'];
        let items = vec![RlpItem::from("cat"), RlpItem::from("dog")];
        assert_eq!(encode_list(&items), expected);
        assert_eq!(encode(&RlpItem::List(items)), expected);
    }

    #[test]
    fn test_set_theoretical_representation() {
        // [ [], [[]], [ [], [[]] ] ]
        let empty = RlpItem::List(vec![]);
        let one = RlpItem::List(vec![empty.clone()]);
        let two = RlpItem::List(vec![empty.clone(), one.clone()]);
        let item = RlpItem::List(vec![empty, one, two]);
        assert_eq!(
            encode(&item),
            vec![0xc7, 0xc0, 0xc1, 0xc0, 0xc3, 0xc0, 0xc1, 0xc0]
        );
    }

    #[test]
    fn test_list_payload_boundary() {
        let short = RlpItem::List(vec![RlpItem::from_u64(1); 55]);
        assert_eq!(encode(&short)[0], 0xf7);

        let long = RlpItem::List(vec![RlpItem::from_u64(1); 56]);
        assert_eq!(&encode(&long)[..2], &[0xf8, 56]);
    }

    #[test]
    fn test_list_header_large() {
        assert_eq!(list_header(256), vec![0xf9, 0x01, 0x00]);
        assert_eq!(list_header(65536), vec![0xfa, 0x01, 0x00, 0x00]);
        assert_eq!(string_header(0), vec![0x80]);
    }

    // ==================== Integers ====================

    #[test]
    fn test_integer_encoding() {
        assert_eq!(encode(&RlpItem::from_u64(0)), vec![0x80]);
        assert_eq!(encode(&RlpItem::from_u64(15)), vec![0x0f]);
        assert_eq!(encode(&RlpItem::from_u64(127)), vec![0x7f]);
        assert_eq!(encode(&RlpItem::from_u64(128)), vec![0x81, 0x80]);
        assert_eq!(encode(&RlpItem::from_u64(1024)), vec![0x82, 0x04, 0x00]);
        assert_eq!(encode(&RlpItem::from_u64(21000)), vec![0x82, 0x52, 0x08]);
    }

    #[test]
    fn test_u256_max_encoding() {
        let encoded = encode(&RlpItem::from_uint(U256::MAX));
        assert_eq!(encoded[0], 0xa0);
        assert_eq!(encoded.len(), 33);
    }
}
