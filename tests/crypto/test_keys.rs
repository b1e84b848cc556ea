//! Identity Key Tests

use secure_messenger::crypto::{CryptoError, KeyPair, PrivateKey, PublicKey};

#[test]
fn test_generated_keys_are_distinct() {
    let a = KeyPair::generate();
    let b = KeyPair::generate();
    assert_ne!(a.public_key(), b.public_key());
    assert_ne!(a.private_key().to_hex(), b.private_key().to_hex());
}

#[test]
fn test_private_key_hex_roundtrip() {
    let pair = KeyPair::generate();
    let hex = pair.private_key().to_hex();
    assert_eq!(hex.len(), 64);

    let restored = KeyPair::from_private_hex(&hex).unwrap();
    assert_eq!(restored.public_key(), pair.public_key());
}

#[test]
fn test_hex_prefix_and_case_are_normalised() {
    let pair = KeyPair::generate();
    let public_hex = pair.public_key().to_hex();

    let variants = [
        public_hex.clone(),
        format!("0x{}", public_hex),
        format!("0X{}", public_hex.to_uppercase()),
        format!("  0x{}\n", public_hex),
    ];

    for variant in variants {
        let parsed = PublicKey::from_hex(&variant).unwrap();
        assert_eq!(&parsed, pair.public_key(), "variant {:?}", variant);
        assert_eq!(parsed.to_hex(), public_hex);
    }

    let private_hex = pair.private_key().to_hex();
    let parsed = PrivateKey::from_hex(&format!("0x{}", private_hex.to_uppercase())).unwrap();
    assert_eq!(parsed.to_hex(), private_hex);
}

#[test]
fn test_uncompressed_hex_normalises_to_compressed() {
    let pair = KeyPair::generate();
    let uncompressed = hex::encode(pair.public_key().to_uncompressed_bytes());
    assert_eq!(uncompressed.len(), 130);

    let parsed = PublicKey::from_hex(&uncompressed).unwrap();
    assert_eq!(parsed.to_hex(), pair.public_key().to_hex());
}

#[test]
fn test_malformed_private_keys() {
    let cases = [
        "",
        "0x",
        "1234",
        "zz34567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef00",
    ];

    for case in cases {
        let result = PrivateKey::from_hex(case);
        assert!(
            matches!(result, Err(CryptoError::InvalidKey { .. })),
            "expected InvalidKey for {:?}",
            case
        );
    }
}

#[test]
fn test_malformed_public_keys() {
    let pair = KeyPair::generate();
    let valid = pair.public_key().to_hex();

    let cases = [
        String::new(),
        "0x02".to_string(),
        valid[..64].to_string(),
        format!("{}00", valid),
        format!("04{}", &valid[2..]),
        format!("02{}", "ff".repeat(32)),
        "g".repeat(66),
    ];

    for case in cases {
        let result = PublicKey::from_hex(&case);
        assert!(
            matches!(result, Err(CryptoError::InvalidKey { .. })),
            "expected InvalidKey for {:?}",
            case
        );
    }
}

#[test]
fn test_address_matches_known_vector() {
    // Private key 1 maps to the secp256k1 generator point
    let private =
        PrivateKey::from_hex("0x0000000000000000000000000000000000000000000000000000000000000001")
            .unwrap();
    let public = private.public_key();

    assert_eq!(
        public.to_hex(),
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );
    assert_eq!(public.address(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
}
