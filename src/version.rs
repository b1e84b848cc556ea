// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the secure messenger

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-sign-then-encrypt";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "secp256k1-identities",
    "ecdh-key-agreement",
    "ecdsa-rfc6979-signatures",
    "aes-256-gcm",
    "sign-then-encrypt",
    "canonical-json-envelope",
    "base64-wire-packages",
];

/// Wire format version written into every package
pub const WIRE_VERSION: u8 = crate::messaging::PACKAGE_VERSION;

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("secure-messenger {} (wire v{})", VERSION, WIRE_VERSION)
}

/// Get full version info for `--json` output
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "wire_version": WIRE_VERSION,
        "features": FEATURES,
    })
}
