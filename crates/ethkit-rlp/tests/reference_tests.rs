//! Cross-checks against the `rlp` crate and canonical-form properties.

use ethkit_primitives::U256;
use ethkit_rlp::{decode, decode_exact, encode, RlpItem};
use proptest::prelude::*;
use rlp::{Rlp, RlpStream};

fn reference_append(item: &RlpItem, stream: &mut RlpStream) {
    match item {
        RlpItem::Bytes(bytes) => {
            stream.append(bytes);
        }
        RlpItem::List(items) => {
            stream.begin_list(items.len());
            for child in items {
                reference_append(child, stream);
            }
        }
    }
}

fn reference_encode(item: &RlpItem) -> Vec<u8> {
    let mut stream = RlpStream::new();
    reference_append(item, &mut stream);
    stream.out().to_vec()
}

fn from_reference(rlp: &Rlp) -> RlpItem {
    if rlp.is_list() {
        RlpItem::List(rlp.iter().map(|child| from_reference(&child)).collect())
    } else {
        RlpItem::Bytes(rlp.data().unwrap().to_vec())
    }
}

fn arb_item() -> impl Strategy<Value = RlpItem> {
    let leaf = prop::collection::vec(any::<u8>(), 0..80).prop_map(RlpItem::Bytes);
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(RlpItem::List)
    })
}

// ==================== Fixed vectors ====================

#[test]
fn test_transaction_shaped_list_matches_reference() {
    let item = RlpItem::List(vec![
        RlpItem::from_u64(9),
        RlpItem::from_u64(20_000_000_000),
        RlpItem::from_u64(21000),
        RlpItem::Bytes(vec![0x35; 20]),
        RlpItem::from_uint(U256::exp10(18)),
        RlpItem::empty(),
        RlpItem::from_u64(1),
        RlpItem::empty(),
        RlpItem::empty(),
    ]);
    let encoded = encode(&item);
    assert_eq!(encoded, reference_encode(&item));
    assert_eq!(
        hex::encode(&encoded),
        "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
    );
}

#[test]
fn test_decode_matches_reference_for_nested_list() {
    let encoded = hex::decode("c7c0c1c0c3c0c1c0").unwrap();
    let ours = decode_exact(&encoded).unwrap();
    assert_eq!(ours, from_reference(&Rlp::new(&encoded)));
}

// ==================== Properties ====================

proptest! {
    #[test]
    fn prop_encode_matches_reference(item in arb_item()) {
        prop_assert_eq!(encode(&item), reference_encode(&item));
    }

    #[test]
    fn prop_decode_inverts_encode(item in arb_item()) {
        let encoded = encode(&item);
        prop_assert_eq!(decode(&encoded).unwrap(), (item, encoded.len()));
    }

    #[test]
    fn prop_accepted_input_is_canonical(data in prop::collection::vec(any::<u8>(), 0..128)) {
        // Whatever the decoder accepts re-encodes to exactly the bytes it consumed.
        if let Ok((item, consumed)) = decode(&data) {
            prop_assert_eq!(encode(&item), data[..consumed].to_vec());
        }
    }

    #[test]
    fn prop_integer_encoding_matches_reference(value in any::<u64>()) {
        let ours = encode(&RlpItem::from_u64(value));
        prop_assert_eq!(ours.clone(), rlp::encode(&value).to_vec());
        prop_assert_eq!(decode_exact(&ours).unwrap().to_u64().unwrap(), value);
    }
}
