// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Messenger Configuration
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML file, `[messenger]` table
//! 3. Environment variables
//!
//! Private keys are never read from the config file; see
//! [`crate::crypto::load_private_key_from_env`].

use crate::messaging::{ChannelConfig, DEFAULT_MAX_MESSAGE_BYTES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Messenger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// Largest message accepted for sending, in bytes
    pub max_message_bytes: usize,
    /// Largest package text, in bytes; derived from `max_message_bytes`
    /// when unset
    pub max_package_bytes: Option<usize>,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            max_package_bytes: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    messenger: MessengerConfig,
}

impl MessengerConfig {
    /// Load configuration from a TOML file
    ///
    /// A file without a `[messenger]` table yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(file.messenger)
    }

    /// Defaults overridden by environment variables
    ///
    /// Environment variables:
    /// - `MESSENGER_MAX_MESSAGE_BYTES`
    /// - `MESSENGER_MAX_PACKAGE_BYTES`
    /// - `MESSENGER_LOG_LEVEL`
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of `self`
    ///
    /// Unparseable numeric values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("MESSENGER_MAX_MESSAGE_BYTES") {
            if let Ok(num) = val.parse() {
                self.max_message_bytes = num;
            }
        }

        if let Ok(val) = std::env::var("MESSENGER_MAX_PACKAGE_BYTES") {
            if let Ok(num) = val.parse() {
                self.max_package_bytes = Some(num);
            }
        }

        if let Ok(val) = std::env::var("MESSENGER_LOG_LEVEL") {
            if !val.trim().is_empty() {
                self.log_level = val.trim().to_string();
            }
        }

        self
    }

    /// File (if given) then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn channel_config(&self) -> ChannelConfig {
        let mut config = ChannelConfig::for_message_limit(self.max_message_bytes);
        if let Some(max) = self.max_package_bytes {
            config.max_package_bytes = max;
        }
        config
    }
}
