// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Secure Channel
//!
//! Sign-then-encrypt on the way out, decrypt-then-verify on the way in.
//!
//! ## Send
//!
//! 1. Sign `SHA-256(message)` with the sender's private key
//! 2. Build the envelope (message, signature, timestamp, sender identity)
//! 3. ECDH(sender private, receiver public) → shared secret
//! 4. AES-256-GCM encrypt the canonical envelope → `EncryptedPackage`
//!
//! ## Receive
//!
//! 1. ECDH(receiver private, sender public) → shared secret
//! 2. Decrypt; failure → `verified: false` (`Decryption`)
//! 3. Parse envelope; failure → `verified: false` (`MalformedEnvelope`)
//! 4. Verify the signature against the expected sender, and check the
//!    envelope names that sender; failure → `verified: false` (`SignatureInvalid`)
//! 5. Only now is the message released
//!
//! The channel holds no protocol state. It is `Clone + Send + Sync` and every
//! call is independent, so any number of sends and receives may run in
//! parallel, including for the same key pair.

use crate::crypto::{
    derive_shared_secret, sign_message, verify_message, CryptoError, KeyPair, PrivateKey,
    PublicKey,
};
use crate::messaging::envelope::{max_canonical_len, Envelope};
use crate::messaging::package::{encoded_len, EncryptedPackage};
use thiserror::Error;
use tracing::{debug, warn};

/// Generic text shown to users for any rejected message
pub const UNVERIFIED_NOTICE: &str = "message could not be verified";

/// Default message limit in UTF-8 bytes
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Size limits applied by the channel
///
/// `send` refuses anything whose package would exceed `max_package_bytes`,
/// so a package produced under a config always opens under the same config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Largest message accepted by `send`, in UTF-8 bytes
    pub max_message_bytes: usize,
    /// Largest package text accepted by `send` and `receive`, in bytes
    pub max_package_bytes: usize,
}

impl ChannelConfig {
    /// Limits for `max_message_bytes`, with the package limit sized so that
    /// any message up to that length fits
    pub fn for_message_limit(max_message_bytes: usize) -> Self {
        Self {
            max_message_bytes,
            max_package_bytes: max_package_len(max_message_bytes),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::for_message_limit(DEFAULT_MAX_MESSAGE_BYTES)
    }
}

/// Worst-case package length for a message of `message_len` bytes
pub fn max_package_len(message_len: usize) -> usize {
    encoded_len(max_canonical_len(message_len))
}

/// Why a received package was rejected
///
/// The detail string is for diagnostics only. Show users
/// [`VerificationFailure::user_message`] so the reason does not leak.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),
}

impl VerificationFailure {
    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationFailure::InvalidKey(_) => "invalid_key",
            VerificationFailure::Decryption(_) => "decryption",
            VerificationFailure::MalformedEnvelope(_) => "malformed_envelope",
            VerificationFailure::SignatureInvalid(_) => "signature_invalid",
        }
    }

    /// Same text for every kind
    pub fn user_message(&self) -> &'static str {
        UNVERIFIED_NOTICE
    }
}

impl From<CryptoError> for VerificationFailure {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKey { key_type, reason } => {
                VerificationFailure::InvalidKey(format!("{}: {}", key_type, reason))
            }
            CryptoError::DecryptionFailed { reason } => VerificationFailure::Decryption(reason),
            CryptoError::MalformedEnvelope { reason } => {
                VerificationFailure::MalformedEnvelope(reason)
            }
            CryptoError::InvalidSignature { reason } => {
                VerificationFailure::SignatureInvalid(reason)
            }
            other => VerificationFailure::Decryption(other.to_string()),
        }
    }
}

/// Outcome of [`SecureChannel::receive`]
///
/// `message()` is `Some` only when `is_verified()` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    message: Option<String>,
    verified: bool,
    timestamp: Option<String>,
    from: Option<String>,
    error: Option<VerificationFailure>,
}

impl VerificationResult {
    fn verified(envelope: Envelope) -> Self {
        Self {
            timestamp: Some(envelope.timestamp().to_string()),
            from: Some(envelope.sender_identity().to_hex()),
            message: Some(envelope.message().to_string()),
            verified: true,
            error: None,
        }
    }

    fn rejected(failure: VerificationFailure, envelope: Option<&Envelope>) -> Self {
        Self {
            message: None,
            verified: false,
            timestamp: envelope.map(|e| e.timestamp().to_string()),
            from: envelope.map(|e| e.sender_identity().to_hex()),
            error: Some(failure),
        }
    }

    /// The verified message text
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn into_message(self) -> Option<String> {
        self.message
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Sender timestamp, if the envelope could be parsed
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Sender identity claimed by the envelope, if it could be parsed
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn error(&self) -> Option<&VerificationFailure> {
        self.error.as_ref()
    }
}

/// Stateless sign-then-encrypt messaging between secp256k1 identities
#[derive(Debug, Clone, Default)]
pub struct SecureChannel {
    config: ChannelConfig,
}

impl SecureChannel {
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Sign, envelope and encrypt `message` from `sender` to `receiver`
    ///
    /// The sender's public identity is taken from the key pair so it cannot
    /// disagree with the signing key.
    ///
    /// # Errors
    ///
    /// - `MessageTooLarge` if the message exceeds `max_message_bytes`, or its
    ///   package would exceed `max_package_bytes`
    /// - `Other` if serialization or the cipher fails, which indicates a bug
    ///   rather than bad input
    pub fn send(
        &self,
        message: &str,
        sender: &KeyPair,
        receiver: &PublicKey,
    ) -> Result<EncryptedPackage, CryptoError> {
        if message.len() > self.config.max_message_bytes {
            return Err(CryptoError::MessageTooLarge {
                size: message.len(),
                max: self.config.max_message_bytes,
            });
        }

        let signature = sign_message(message, sender.private_key())?;
        let envelope = Envelope::build(message, signature, sender.public_key());
        let canonical = envelope.to_canonical()?;

        let package_len = encoded_len(canonical.len());
        if package_len > self.config.max_package_bytes {
            return Err(CryptoError::MessageTooLarge {
                size: package_len,
                max: self.config.max_package_bytes,
            });
        }

        let secret = derive_shared_secret(sender.private_key(), receiver);
        let package = EncryptedPackage::seal(canonical.as_bytes(), &secret)?;

        debug!(
            operation = "send",
            package_len = package.as_str().len(),
            "🔐 Message sealed"
        );

        Ok(package)
    }

    /// Hex-key form of [`send`](Self::send)
    ///
    /// # Errors
    ///
    /// `InvalidKey` if either key is malformed, plus everything `send` returns.
    pub fn send_encoded(
        &self,
        message: &str,
        sender_private_key: &str,
        receiver_public_key: &str,
    ) -> Result<EncryptedPackage, CryptoError> {
        let sender = KeyPair::from_private_hex(sender_private_key)?;
        let receiver = PublicKey::from_hex(receiver_public_key).map_err(|e| match e {
            CryptoError::InvalidKey { reason, .. } => {
                CryptoError::invalid_key("receiver_public_key", reason)
            }
            other => other,
        })?;
        self.send(message, &sender, &receiver)
    }

    /// Decrypt, parse and verify a package from `sender`
    ///
    /// Never fails: every protocol failure is reported as
    /// `verified: false` with an error kind.
    pub fn receive(
        &self,
        package: &str,
        receiver: &PrivateKey,
        sender: &PublicKey,
    ) -> VerificationResult {
        let secret = derive_shared_secret(receiver, sender);

        let plaintext =
            match EncryptedPackage::open(package, &secret, self.config.max_package_bytes) {
                Ok(plaintext) => plaintext,
                Err(e) => return Self::reject(VerificationFailure::from(e), None),
            };

        let envelope = match String::from_utf8(plaintext)
            .map_err(|e| CryptoError::malformed(format!("plaintext is not UTF-8: {}", e)))
            .and_then(|text| Envelope::parse(&text))
        {
            Ok(envelope) => envelope,
            Err(e) => return Self::reject(VerificationFailure::from(e), None),
        };

        if envelope.sender_identity() != sender {
            return Self::reject(
                VerificationFailure::SignatureInvalid(
                    "envelope sender does not match expected sender".to_string(),
                ),
                Some(&envelope),
            );
        }

        if !verify_message(envelope.message(), envelope.signature().as_bytes(), sender) {
            return Self::reject(
                VerificationFailure::SignatureInvalid("signature verification failed".to_string()),
                Some(&envelope),
            );
        }

        debug!(operation = "receive", "✅ Message verified");

        VerificationResult::verified(envelope)
    }

    /// Hex-key form of [`receive`](Self::receive)
    ///
    /// # Errors
    ///
    /// Only when the caller's own private key is malformed, which is a
    /// programming error. A malformed sender key is reported in the result.
    pub fn receive_encoded(
        &self,
        package: &str,
        receiver_private_key: &str,
        sender_public_key: &str,
    ) -> Result<VerificationResult, CryptoError> {
        let receiver = PrivateKey::from_hex(receiver_private_key)?;

        let sender = match PublicKey::from_hex(sender_public_key) {
            Ok(sender) => sender,
            Err(e) => {
                let failure = match e {
                    CryptoError::InvalidKey { reason, .. } => {
                        VerificationFailure::InvalidKey(format!("sender_public_key: {}", reason))
                    }
                    other => VerificationFailure::from(other),
                };
                return Ok(Self::reject(failure, None));
            }
        };

        Ok(self.receive(package, &receiver, &sender))
    }

    fn reject(failure: VerificationFailure, envelope: Option<&Envelope>) -> VerificationResult {
        warn!(operation = "receive", kind = failure.kind(), "❌ Message rejected");
        debug!(operation = "receive", detail = %failure, "rejection detail");
        VerificationResult::rejected(failure, envelope)
    }
}
