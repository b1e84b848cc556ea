// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cryptographic Primitives
//!
//! The leaves of the messaging protocol:
//!
//! - **Keys**: secp256k1 identities, hex encoding, environment loading
//! - **ECDH**: static-static key agreement, `SHA-256(x-coordinate)` key derivation
//! - **Signature**: deterministic ECDSA over SHA-256 message digests
//! - **AES-GCM**: AES-256-GCM authenticated encryption with random nonces
//!
//! ## Security Considerations
//!
//! - Private keys and shared secrets are never logged, persisted, or printed by `Debug`
//! - Signatures are computed over digests, never raw messages
//! - Verification failure is a normal `false`, not an error

pub mod aes_gcm;
pub mod ecdh;
pub mod error;
pub mod keys;
pub mod signature;

pub use aes_gcm::{decrypt_aes_gcm, encrypt_aes_gcm, extract_nonce};
pub use ecdh::{derive_shared_secret, derive_shared_secret_from_bytes, SharedSecret};
pub use error::CryptoError;
pub use keys::{load_private_key_from_env, normalize_hex, KeyPair, PrivateKey, PublicKey};
pub use signature::{message_digest, sign_message, verify_message, Signature};
