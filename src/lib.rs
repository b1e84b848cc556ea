// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sign-then-encrypt messaging between secp256k1 identities.
//!
//! ```no_run
//! use secure_messenger::{KeyPair, SecureChannel};
//!
//! let alice = KeyPair::generate();
//! let bob = KeyPair::generate();
//! let channel = SecureChannel::default();
//!
//! let package = channel.send("Meet at midnight", &alice, bob.public_key())?;
//! let result = channel.receive(package.as_str(), bob.private_key(), alice.public_key());
//!
//! assert!(result.is_verified());
//! assert_eq!(result.message(), Some("Meet at midnight"));
//! # Ok::<(), secure_messenger::CryptoError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod messaging;
pub mod version;

pub use config::MessengerConfig;
pub use crypto::{
    derive_shared_secret, sign_message, verify_message, CryptoError, KeyPair, PrivateKey,
    PublicKey, SharedSecret, Signature,
};
pub use messaging::{
    ChannelConfig, EncryptedPackage, Envelope, SecureChannel, VerificationFailure,
    VerificationResult,
};
