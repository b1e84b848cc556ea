// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encrypted Package Wire Format
//!
//! The only artifact that crosses the trust boundary.
//!
//! ```text
//! base64( version (1 byte) | nonce (12 bytes) | ciphertext | tag (16 bytes) )
//! ```
//!
//! Standard base64 alphabet with padding, so the text is safe to paste into
//! a message body or clipboard. The version byte is authenticated as
//! AES-GCM associated data.

use crate::crypto::aes_gcm::{decrypt_aes_gcm, encrypt_aes_gcm, NONCE_LEN, TAG_LEN};
use crate::crypto::{CryptoError, SharedSecret};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// Current wire format version
pub const PACKAGE_VERSION: u8 = 1;

/// Smallest possible decoded package: version + nonce + tag
pub const MIN_PACKAGE_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// Length of the package text produced for `plaintext_len` bytes
pub fn encoded_len(plaintext_len: usize) -> usize {
    let blob_len = plaintext_len.saturating_add(MIN_PACKAGE_LEN);
    blob_len.div_ceil(3).saturating_mul(4)
}

/// Base64 text of an encrypted envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPackage(String);

impl EncryptedPackage {
    /// Encrypt `plaintext` under `secret` and encode for the wire
    pub fn seal(plaintext: &[u8], secret: &SharedSecret) -> Result<Self, CryptoError> {
        let encrypted = encrypt_aes_gcm(plaintext, secret.as_bytes(), &[PACKAGE_VERSION])?;

        let mut blob = Vec::with_capacity(1 + encrypted.len());
        blob.push(PACKAGE_VERSION);
        blob.extend_from_slice(&encrypted);

        Ok(Self(STANDARD.encode(blob)))
    }

    /// Decode and decrypt a package
    ///
    /// # Errors
    ///
    /// `CryptoError::DecryptionFailed` if the text is longer than `max_len`,
    /// is not valid base64, is too short, carries an unknown version, or
    /// fails authentication.
    pub fn open(text: &str, secret: &SharedSecret, max_len: usize) -> Result<Vec<u8>, CryptoError> {
        let text = text.trim();
        if text.len() > max_len {
            return Err(CryptoError::decryption(format!(
                "package of {} bytes exceeds limit of {} bytes",
                text.len(),
                max_len
            )));
        }

        let blob = STANDARD
            .decode(text)
            .map_err(|e| CryptoError::decryption(format!("invalid base64: {}", e)))?;

        if blob.len() < MIN_PACKAGE_LEN {
            return Err(CryptoError::decryption(format!(
                "package too short: expected at least {} bytes, got {}",
                MIN_PACKAGE_LEN,
                blob.len()
            )));
        }

        let version = blob[0];
        if version != PACKAGE_VERSION {
            return Err(CryptoError::decryption(format!(
                "unsupported package version {}",
                version
            )));
        }

        decrypt_aes_gcm(&blob[1..], secret.as_bytes(), &[version])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncryptedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncryptedPackage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
