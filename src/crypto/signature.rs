// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDSA Message Signatures
//!
//! Signs and verifies UTF-8 messages with secp256k1 ECDSA. The signature is
//! always computed over `SHA-256(message)`, never the raw message, and the
//! nonce is derived deterministically (RFC 6979), so signing the same message
//! with the same key twice yields identical bytes.
//!
//! Signatures are 64-byte compact `r || s`, low-S normalised.

use crate::crypto::error::CryptoError;
use crate::crypto::keys::{normalize_hex, PrivateKey, PublicKey};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a compact signature in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Compact secp256k1 ECDSA signature
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Wrap exactly 64 raw bytes
    ///
    /// Only the length is checked here; whether `r` and `s` are in range is
    /// decided by verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature {
                reason: format!(
                    "expected {} bytes, got {}",
                    SIGNATURE_LEN,
                    bytes.len()
                ),
            }
        })?;
        Ok(Self(array))
    }

    /// Parse 128 hex characters (optionally `0x`-prefixed)
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(normalize_hex(input)).map_err(|e| CryptoError::InvalidSignature {
            reason: format!("invalid hex: {}", e),
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// SHA-256 digest of the UTF-8 message bytes
pub fn message_digest(message: &str) -> [u8; 32] {
    Sha256::digest(message.as_bytes()).into()
}

/// Sign `message` with `private_key`
///
/// Deterministic: identical inputs always produce identical signatures.
pub fn sign_message(message: &str, private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let signing_key = SigningKey::from(private_key.as_secret());
    let digest = message_digest(message);

    let signature: k256::ecdsa::Signature = signing_key
        .sign_prehash(&digest)
        .map_err(|e| CryptoError::Other(format!("ECDSA signing failed: {}", e)))?;
    let signature = signature.normalize_s().unwrap_or(signature);

    let mut bytes = [0u8; SIGNATURE_LEN];
    bytes.copy_from_slice(&signature.to_bytes());

    tracing::trace!(message_len = message.len(), "signature: message signed");

    Ok(Signature(bytes))
}

/// Verify `signature` over `message` against `public_key`
///
/// Returns `false` for malformed signatures, wrong-length input, or a
/// signature made by a different key. Never errors.
pub fn verify_message(message: &str, signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(signature) = k256::ecdsa::Signature::from_slice(signature) else {
        return false;
    };

    let verifying_key = VerifyingKey::from(public_key.as_point());
    let digest = message_digest(message);

    verifying_key.verify_prehash(&digest, &signature).is_ok()
}
