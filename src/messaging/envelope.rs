// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signed Envelope
//!
//! The signed, not-yet-encrypted unit exchanged between two identities.
//!
//! ## Canonical Form
//!
//! Compact JSON with a fixed field order:
//!
//! ```text
//! {"message":"...","signature":"<128 hex>","timestamp":"<RFC 3339 UTC>","senderIdentity":"<66 hex>"}
//! ```
//!
//! - `signature`: compact ECDSA `r || s` over `SHA-256(message)`, lowercase hex
//! - `timestamp`: RFC 3339 with millisecond precision and `Z` suffix
//! - `senderIdentity`: compressed SEC1 public key, lowercase hex
//!
//! Parsing rejects missing fields, unknown fields, and malformed values with
//! `CryptoError::MalformedEnvelope`, never `InvalidSignature`.

use crate::crypto::{CryptoError, PublicKey, Signature};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on canonical JSON bytes other than the escaped message
///
/// Field names and punctuation, 128 hex signature chars, a 24-char
/// timestamp and 66 hex identity chars come to 282 bytes.
pub const MAX_ENVELOPE_OVERHEAD: usize = 512;

/// Worst-case JSON escape expansion per message byte (`\u0001`)
pub const MAX_ESCAPE_EXPANSION: usize = 6;

/// Upper bound on the canonical length of an envelope carrying
/// `message_len` bytes of message text
pub fn max_canonical_len(message_len: usize) -> usize {
    message_len
        .saturating_mul(MAX_ESCAPE_EXPANSION)
        .saturating_add(MAX_ENVELOPE_OVERHEAD)
}

/// Field order here is the canonical serialization order.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EnvelopeJson {
    message: String,
    signature: String,
    timestamp: String,
    sender_identity: String,
}

/// Signed plaintext: message, signature, timestamp and sender identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    message: String,
    signature: Signature,
    timestamp: String,
    sender_identity: PublicKey,
}

impl Envelope {
    /// Package a signed message, stamped with the current UTC time
    pub fn build(message: &str, signature: Signature, sender: &PublicKey) -> Self {
        Self::build_at(message, signature, sender, Utc::now())
    }

    /// Package a signed message with an explicit timestamp
    pub fn build_at(
        message: &str,
        signature: Signature,
        sender: &PublicKey,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message: message.to_string(),
            signature,
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            sender_identity: sender.clone(),
        }
    }

    /// Serialize to the canonical JSON form
    ///
    /// # Errors
    ///
    /// `CryptoError::Other` if JSON serialization fails.
    pub fn to_canonical(&self) -> Result<String, CryptoError> {
        let json = EnvelopeJson {
            message: self.message.clone(),
            signature: self.signature.to_hex(),
            timestamp: self.timestamp.clone(),
            sender_identity: self.sender_identity.to_hex(),
        };

        serde_json::to_string(&json)
            .map_err(|e| CryptoError::Other(format!("envelope serialization failed: {}", e)))
    }

    /// Parse the canonical JSON form
    ///
    /// # Errors
    ///
    /// `CryptoError::MalformedEnvelope` if:
    /// - The input is not JSON, or a field is missing or unknown
    /// - `signature` is not 64 bytes of hex
    /// - `timestamp` is not RFC 3339
    /// - `senderIdentity` is not a valid secp256k1 public key
    pub fn parse(serialized: &str) -> Result<Self, CryptoError> {
        let json: EnvelopeJson = serde_json::from_str(serialized)
            .map_err(|e| CryptoError::malformed(format!("invalid envelope JSON: {}", e)))?;

        let signature = Signature::from_hex(&json.signature)
            .map_err(|e| CryptoError::malformed(format!("signature field: {}", e)))?;

        DateTime::parse_from_rfc3339(&json.timestamp)
            .map_err(|e| CryptoError::malformed(format!("timestamp field: {}", e)))?;

        let sender_identity = PublicKey::from_hex(&json.sender_identity)
            .map_err(|e| CryptoError::malformed(format!("senderIdentity field: {}", e)))?;

        Ok(Self {
            message: json.message,
            signature,
            timestamp: json.timestamp,
            sender_identity,
        })
    }

    /// The signed message text
    ///
    /// Unverified until the signature has been checked against the expected
    /// sender; the channel never exposes it before that.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn sender_identity(&self) -> &PublicKey {
        &self.sender_identity
    }
}
