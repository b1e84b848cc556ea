// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDH Key Agreement
//!
//! Derives a 32-byte symmetric key from one party's secp256k1 private key
//! and the counterparty's public key. The shared point's x-coordinate is
//! hashed with SHA-256, so the key is uniform and independent of the point
//! encoding used on the wire.
//!
//! `derive(A.priv, B.pub) == derive(B.priv, A.pub)` for any two identities.

use crate::crypto::error::CryptoError;
use crate::crypto::keys::{PrivateKey, PublicKey};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a derived shared secret in bytes
pub const SHARED_SECRET_LEN: usize = 32;

/// Symmetric key shared by two identities
///
/// Never persisted. Zeroised on drop, redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_LEN]);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Derive the shared secret between `private` and `counterparty`
///
/// Computes `counterparty * private` on secp256k1 and returns
/// `SHA-256(x-coordinate)`. Typed keys are already validated, so this cannot fail.
pub fn derive_shared_secret(private: &PrivateKey, counterparty: &PublicKey) -> SharedSecret {
    let shared_point = k256::ecdh::diffie_hellman(
        private.as_secret().to_nonzero_scalar(),
        counterparty.as_point().as_affine(),
    );

    let digest = Sha256::digest(shared_point.raw_secret_bytes());
    let mut key = [0u8; SHARED_SECRET_LEN];
    key.copy_from_slice(&digest);

    tracing::trace!("ecdh: shared secret derived");

    SharedSecret(key)
}

/// Derive the shared secret from raw key bytes
///
/// # Arguments
///
/// * `private_key` - 32-byte secp256k1 scalar
/// * `counterparty_public_key` - 33 bytes compressed or 65 bytes uncompressed
///
/// # Errors
///
/// `CryptoError::InvalidKey` if either key has the wrong length, the point is
/// not on the curve, or the scalar is zero or out of range.
pub fn derive_shared_secret_from_bytes(
    private_key: &[u8],
    counterparty_public_key: &[u8],
) -> Result<SharedSecret, CryptoError> {
    let private = PrivateKey::from_bytes(private_key)?;
    let counterparty = PublicKey::from_bytes(counterparty_public_key).map_err(|e| match e {
        CryptoError::InvalidKey { reason, .. } => {
            CryptoError::invalid_key("counterparty_public_key", reason)
        }
        other => other,
    })?;

    Ok(derive_shared_secret(&private, &counterparty))
}
