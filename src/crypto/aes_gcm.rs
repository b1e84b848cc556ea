// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-256-GCM Authenticated Encryption
//!
//! **Encryption Format**:
//! ```text
//! [nonce (12 bytes) | ciphertext+tag (variable length)]
//! ```
//!
//! - Nonce: 12 bytes (96 bits) - random per encryption, drawn from `OsRng`
//! - Ciphertext+Tag: Encrypted data + 16-byte authentication tag
//! - Algorithm: AES-256-GCM
//! - Associated data is supplied by the caller and authenticated, not encrypted

use crate::crypto::error::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};

/// AES-GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;
/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// Encrypt `plaintext` under a 32-byte key with a fresh random nonce
///
/// # Returns
///
/// `nonce || ciphertext || tag`
///
/// # Errors
///
/// Returns error if the key is not 32 bytes.
pub fn encrypt_aes_gcm(plaintext: &[u8], key: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::invalid_key(
            "symmetric_key",
            format!("expected {} bytes, got {}", KEY_LEN, key.len()),
        ));
    }

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::Other(format!("Failed to create AES-GCM cipher: {}", e)))?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CryptoError::Other("AES-GCM encryption failed".to_string()))?;

    let mut encrypted = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    encrypted.extend_from_slice(&nonce_bytes);
    encrypted.extend_from_slice(&ciphertext);

    Ok(encrypted)
}

/// Decrypt `nonce || ciphertext || tag` produced by [`encrypt_aes_gcm`]
///
/// # Errors
///
/// Returns `DecryptionFailed` if:
/// - Encrypted data is shorter than nonce + tag
/// - Authentication tag verification fails (wrong key, wrong AAD, or tampered data)
///
/// Returns `InvalidKey` if the key is not 32 bytes.
pub fn decrypt_aes_gcm(encrypted: &[u8], key: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if encrypted.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::decryption(format!(
            "encrypted data too short: expected at least {} bytes, got {}",
            NONCE_LEN + TAG_LEN,
            encrypted.len()
        )));
    }

    if key.len() != KEY_LEN {
        return Err(CryptoError::invalid_key(
            "symmetric_key",
            format!("expected {} bytes, got {}", KEY_LEN, key.len()),
        ));
    }

    let nonce = Nonce::from_slice(extract_nonce(encrypted)?);
    let ciphertext = &encrypted[NONCE_LEN..];

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::Other(format!("Failed to create AES-GCM cipher: {}", e)))?;

    let plaintext = cipher.decrypt(
        nonce,
        Payload {
            msg: ciphertext,
            aad,
        },
    )?;

    Ok(plaintext)
}

/// Extract the 12-byte nonce prefix from encrypted data
pub fn extract_nonce(encrypted: &[u8]) -> Result<&[u8], CryptoError> {
    if encrypted.len() < NONCE_LEN {
        return Err(CryptoError::decryption(format!(
            "cannot extract nonce: data too short (expected at least {} bytes, got {})",
            NONCE_LEN,
            encrypted.len()
        )));
    }

    Ok(&encrypted[..NONCE_LEN])
}
