//! ECDH Key Agreement Tests

use secure_messenger::crypto::{
    derive_shared_secret, derive_shared_secret_from_bytes, CryptoError, KeyPair,
};
use sha2::{Digest, Sha256};

fn raw_private(pair: &KeyPair) -> Vec<u8> {
    hex::decode(pair.private_key().to_hex()).unwrap()
}

#[test]
fn test_shared_secret_symmetry_many_pairs() {
    for _ in 0..16 {
        let a = KeyPair::generate();
        let b = KeyPair::generate();

        assert_eq!(
            derive_shared_secret(a.private_key(), b.public_key()),
            derive_shared_secret(b.private_key(), a.public_key()),
            "ECDH must be symmetric"
        );
    }
}

#[test]
fn test_derivation_is_deterministic() {
    let a = KeyPair::generate();
    let b = KeyPair::generate();

    let first = derive_shared_secret(a.private_key(), b.public_key());
    let second = derive_shared_secret(a.private_key(), b.public_key());
    assert_eq!(first, second);
}

#[test]
fn test_different_counterparties_give_different_secrets() {
    let a = KeyPair::generate();
    let b = KeyPair::generate();
    let c = KeyPair::generate();

    assert_ne!(
        derive_shared_secret(a.private_key(), b.public_key()),
        derive_shared_secret(a.private_key(), c.public_key())
    );
}

#[test]
fn test_secret_is_sha256_of_x_coordinate() {
    let a = KeyPair::generate();
    let b = KeyPair::generate();

    let a_secret = k256::SecretKey::from_slice(&raw_private(&a)).unwrap();
    let b_point = k256::PublicKey::from_sec1_bytes(&b.public_key().to_bytes()).unwrap();
    let shared = k256::ecdh::diffie_hellman(a_secret.to_nonzero_scalar(), b_point.as_affine());
    let expected = Sha256::digest(shared.raw_secret_bytes());

    let derived = derive_shared_secret(a.private_key(), b.public_key());
    assert_eq!(derived.as_bytes().as_slice(), expected.as_slice());
}

#[test]
fn test_compressed_and_uncompressed_inputs_agree() {
    let a = KeyPair::generate();
    let b = KeyPair::generate();
    let a_priv = raw_private(&a);

    let compressed = derive_shared_secret_from_bytes(&a_priv, &b.public_key().to_bytes()).unwrap();
    let uncompressed =
        derive_shared_secret_from_bytes(&a_priv, &b.public_key().to_uncompressed_bytes()).unwrap();
    assert_eq!(compressed, uncompressed);
}

#[test]
fn test_zero_private_scalar_rejected() {
    let b = KeyPair::generate();
    let result = derive_shared_secret_from_bytes(&[0u8; 32], &b.public_key().to_bytes());
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));
}

#[test]
fn test_scalar_above_curve_order_rejected() {
    let b = KeyPair::generate();
    let result = derive_shared_secret_from_bytes(&[0xffu8; 32], &b.public_key().to_bytes());
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));
}

#[test]
fn test_invalid_public_key_malformed() {
    let a = KeyPair::generate();
    let b = KeyPair::generate();

    // Correct length, invalid SEC1 tag byte
    let mut bad = b.public_key().to_bytes();
    bad[0] = 0x05;
    let result = derive_shared_secret_from_bytes(&raw_private(&a), &bad);
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));
}
