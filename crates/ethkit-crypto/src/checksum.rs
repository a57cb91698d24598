//! EIP-55 mixed-case address checksums

use crate::keccak256;
use ethkit_primitives::Address;

/// Render an address in EIP-55 checksum form.
///
/// A hex letter is uppercased when the matching nibble of
/// `keccak256(lowercase_hex)` is 8 or above.
pub fn to_checksum_address(address: &Address) -> String {
    let addr_hex = hex::encode(address.as_bytes());
    let hash = keccak256(addr_hex.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in addr_hex.chars().enumerate() {
        let byte = hash.as_bytes()[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Check a `0x`-prefixed address string against its EIP-55 checksum.
///
/// All-lowercase and all-uppercase strings carry no checksum and are accepted
/// when they are otherwise valid.
pub fn is_valid_checksum(s: &str) -> bool {
    let Ok(address) = Address::from_hex(s) else {
        return false;
    };
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits == digits.to_ascii_lowercase() || digits == digits.to_ascii_uppercase() {
        return true;
    }
    &to_checksum_address(&address)[2..] == digits
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vectors from EIP-55
    const VECTORS: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_vectors() {
        for expected in VECTORS {
            let address = Address::from_hex(expected).unwrap();
            assert_eq!(to_checksum_address(&address), expected);
        }
    }

    #[test]
    fn test_valid_checksum() {
        for expected in VECTORS {
            assert!(is_valid_checksum(expected));
        }
        assert!(is_valid_checksum("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn test_invalid_checksum() {
        assert!(!is_valid_checksum("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
        assert!(!is_valid_checksum("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA"));
        assert!(!is_valid_checksum("not an address"));
    }
}
