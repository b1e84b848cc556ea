// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error taxonomy for the key agreement, signing, envelope and channel layers.
//!
//! ## Error Variants
//!
//! - **InvalidKey**: malformed key material (wrong size, point not on curve, zero scalar)
//! - **DecryptionFailed**: AEAD authentication failed or the package is malformed
//! - **MalformedEnvelope**: decrypted plaintext is not a well-formed envelope
//! - **InvalidSignature**: signature does not verify against the claimed sender
//! - **MessageTooLarge**: outgoing message exceeds the configured limit
//! - **Other**: generic error for library errors or unexpected failures
//!
//! `MalformedEnvelope` and `InvalidSignature` are deliberately separate kinds:
//! the first means corrupted data, the second means forged data.

use thiserror::Error;

/// Error type for all cryptographic and protocol operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid cryptographic key
    ///
    /// This error occurs when:
    /// - Key has wrong length
    /// - Key is not valid hex
    /// - Public key is not a point on secp256k1
    /// - Private scalar is zero or not below the curve order
    #[error("Invalid key ({key_type}): {reason}")]
    InvalidKey {
        /// Type of key that failed (e.g., "private_key", "receiver_public_key")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// AEAD decryption failed
    ///
    /// Expected under tampering or when the wrong key pair is used.
    #[error("Decryption failed: {reason}")]
    DecryptionFailed { reason: String },

    /// Decrypted plaintext does not parse to a valid envelope
    #[error("Malformed envelope: {reason}")]
    MalformedEnvelope { reason: String },

    /// Signature does not verify against the claimed sender key
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// Outgoing message exceeds the configured size limit
    #[error("Message too large: {size} bytes exceeds limit of {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    /// Generic error for library errors or unexpected failures
    #[error("Crypto error: {0}")]
    Other(String),
}

impl CryptoError {
    pub(crate) fn invalid_key(key_type: &str, reason: impl Into<String>) -> Self {
        CryptoError::InvalidKey {
            key_type: key_type.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decryption(reason: impl Into<String>) -> Self {
        CryptoError::DecryptionFailed {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CryptoError::MalformedEnvelope {
            reason: reason.into(),
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for CryptoError {
    fn from(err: anyhow::Error) -> Self {
        CryptoError::Other(err.to_string())
    }
}

// Conversion from hex decode errors
impl From<hex::FromHexError> for CryptoError {
    fn from(err: hex::FromHexError) -> Self {
        CryptoError::InvalidKey {
            key_type: "hex_field".to_string(),
            reason: format!("hex decode error: {}", err),
        }
    }
}

// Conversion from k256 errors (elliptic curve operations)
impl From<k256::elliptic_curve::Error> for CryptoError {
    fn from(err: k256::elliptic_curve::Error) -> Self {
        CryptoError::InvalidKey {
            key_type: "unknown".to_string(),
            reason: format!("k256 error: {}", err),
        }
    }
}

// Conversion from AES-GCM errors
impl From<aes_gcm::Error> for CryptoError {
    fn from(_: aes_gcm::Error) -> Self {
        CryptoError::DecryptionFailed {
            reason: "AES-GCM authentication failed".to_string(),
        }
    }
}
