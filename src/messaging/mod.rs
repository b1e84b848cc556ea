// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authenticated Messaging
//!
//! - **Envelope**: canonical signed plaintext
//! - **Package**: base64 wire form of the encrypted envelope
//! - **Channel**: the send/receive protocol
//!
//! A received message is only ever exposed after its signature has been
//! verified against the expected sender.

pub mod channel;
pub mod envelope;
pub mod package;

pub use channel::{
    max_package_len, ChannelConfig, SecureChannel, VerificationFailure, VerificationResult,
    DEFAULT_MAX_MESSAGE_BYTES, UNVERIFIED_NOTICE,
};
pub use envelope::Envelope;
pub use package::{EncryptedPackage, PACKAGE_VERSION};
