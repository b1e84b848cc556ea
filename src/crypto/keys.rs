// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Identity Keys (secp256k1)
//!
//! Private keys, public keys and key pairs for messaging identities.
//!
//! ## Encoding
//!
//! - Private keys: 32-byte scalar, 64 hex characters
//! - Public keys: SEC1 **compressed** point (33 bytes, 66 hex characters) on
//!   output; compressed or uncompressed (65 bytes) accepted on input
//! - Hex input may carry a `0x` prefix and upper-case digits; both are
//!   normalised away
//!
//! ## Security Considerations
//!
//! - `PrivateKey` has a redacting `Debug` impl and no `Serialize` impl
//! - The underlying `k256::SecretKey` zeroises its memory on drop
//! - Key material is NEVER logged; loaders log only success/failure

use crate::crypto::error::CryptoError;
use anyhow::{anyhow, Result};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use std::env;
use std::fmt;
use tiny_keccak::{Hasher, Keccak};
use tracing::info;

/// Length of a raw private scalar in bytes
pub const PRIVATE_KEY_LEN: usize = 32;
/// Length of a compressed SEC1 public key in bytes
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;
/// Length of an uncompressed SEC1 public key in bytes
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// Environment variable holding the local identity's private key
pub const PRIVATE_KEY_ENV: &str = "MESSENGER_PRIVATE_KEY";

/// Strip whitespace and an optional `0x` prefix, and lowercase the digits
pub fn normalize_hex(input: &str) -> String {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    stripped.to_ascii_lowercase()
}

/// A secp256k1 private scalar
#[derive(Clone)]
pub struct PrivateKey {
    inner: k256::SecretKey,
}

impl PrivateKey {
    /// Parse a private key from exactly 32 raw bytes
    ///
    /// Rejects the zero scalar and scalars not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        // SecretKey::from_slice left-pads short input, so length is checked here
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CryptoError::invalid_key(
                "private_key",
                format!(
                    "expected {} bytes, got {}",
                    PRIVATE_KEY_LEN,
                    bytes.len()
                ),
            ));
        }

        let inner = k256::SecretKey::from_slice(bytes).map_err(|_| {
            CryptoError::invalid_key("private_key", "scalar is zero or out of range")
        })?;

        Ok(Self { inner })
    }

    /// Parse a private key from hex (optionally `0x`-prefixed)
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let normalized = normalize_hex(input);
        if normalized.len() != PRIVATE_KEY_LEN * 2 {
            return Err(CryptoError::invalid_key(
                "private_key",
                format!(
                    "expected {} hex characters, got {}",
                    PRIVATE_KEY_LEN * 2,
                    normalized.len()
                ),
            ));
        }

        let bytes = hex::decode(&normalized)
            .map_err(|e| CryptoError::invalid_key("private_key", format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Lowercase hex without prefix
    ///
    /// Callers are responsible for keeping the result out of logs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.public_key(),
        }
    }

    pub(crate) fn as_secret(&self) -> &k256::SecretKey {
        &self.inner
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A secp256k1 public point
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parse a SEC1 encoded point (33 bytes compressed or 65 bytes uncompressed)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_LEN && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_LEN {
            return Err(CryptoError::invalid_key(
                "public_key",
                format!(
                    "expected {} or {} bytes, got {}",
                    COMPRESSED_PUBLIC_KEY_LEN,
                    UNCOMPRESSED_PUBLIC_KEY_LEN,
                    bytes.len()
                ),
            ));
        }

        let inner = k256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| CryptoError::invalid_key("public_key", "point is not on secp256k1"))?;

        Ok(Self { inner })
    }

    /// Parse a public key from hex (optionally `0x`-prefixed)
    pub fn from_hex(input: &str) -> Result<Self, CryptoError> {
        let normalized = normalize_hex(input);
        let bytes = hex::decode(&normalized)
            .map_err(|e| CryptoError::invalid_key("public_key", format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Compressed SEC1 encoding (33 bytes)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Uncompressed SEC1 encoding (65 bytes, `0x04 || x || y`)
    pub fn to_uncompressed_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Canonical identity encoding: compressed, lowercase hex, no prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Ethereum-style address of this key
    ///
    /// `0x` followed by the last 20 bytes of Keccak-256 over the uncompressed
    /// point without its `0x04` prefix.
    pub fn address(&self) -> String {
        let uncompressed = self.to_uncompressed_bytes();

        let mut hasher = Keccak::v256();
        let mut hash = [0u8; 32];
        hasher.update(&uncompressed[1..]);
        hasher.finalize(&mut hash);

        format!("0x{}", hex::encode(&hash[12..]))
    }

    pub(crate) fn as_point(&self) -> &k256::PublicKey {
        &self.inner
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A messaging identity: private scalar plus its public point
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a fresh identity from the operating system RNG
    pub fn generate() -> Self {
        let secret = k256::SecretKey::random(&mut OsRng);
        Self::from_private(PrivateKey { inner: secret })
    }

    /// Build a key pair from an existing private key
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    /// Build a key pair from a hex private key
    pub fn from_private_hex(input: &str) -> Result<Self, CryptoError> {
        Ok(Self::from_private(PrivateKey::from_hex(input)?))
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn address(&self) -> String {
        self.public.address()
    }
}

/// Load the local identity's private key from an environment variable
///
/// Accepts the key with or without `0x` prefix.
///
/// # Security
///
/// - The actual key is NEVER logged
/// - Only logs whether the key was successfully loaded or not
///
/// # Errors
///
/// - Variable not set or empty
/// - Value is not a valid 32-byte secp256k1 scalar
pub fn load_private_key_from_env(var: &str) -> Result<PrivateKey> {
    let key_str = env::var(var).map_err(|_| anyhow!("{} environment variable not set", var))?;

    if key_str.trim().is_empty() {
        return Err(anyhow!("{} is empty", var));
    }

    let key = PrivateKey::from_hex(&key_str).map_err(|e| anyhow!("{} is invalid: {}", var, e))?;

    info!("✅ Private key loaded from {} (32 bytes)", var);

    Ok(key)
}
