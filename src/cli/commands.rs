// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::io::{Read, Write};
use tracing::info;

use crate::config::MessengerConfig;
use crate::crypto::keys::PRIVATE_KEY_ENV;
use crate::crypto::{load_private_key_from_env, KeyPair, PrivateKey, PublicKey};
use crate::messaging::{SecureChannel, UNVERIFIED_NOTICE};
use crate::version;

/// Exit status for a successful command
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status for a package that failed verification
pub const EXIT_UNVERIFIED: u8 = 2;

/// Arguments for keygen command
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for pubkey command
#[derive(Args, Debug)]
pub struct PubkeyArgs {
    /// Private key hex (defaults to MESSENGER_PRIVATE_KEY env var)
    #[arg(long)]
    pub private_key: Option<String>,
}

/// Arguments for send command
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient public key hex
    #[arg(long)]
    pub to: String,

    /// Message text (read from stdin when omitted)
    #[arg(long)]
    pub message: Option<String>,

    /// Sender private key hex (defaults to MESSENGER_PRIVATE_KEY env var)
    #[arg(long)]
    pub private_key: Option<String>,
}

/// Arguments for receive command
#[derive(Args, Debug)]
pub struct ReceiveArgs {
    /// Sender public key hex
    #[arg(long)]
    pub from: String,

    /// Encrypted package (read from stdin when omitted)
    #[arg(long)]
    pub package: Option<String>,

    /// Receiver private key hex (defaults to MESSENGER_PRIVATE_KEY env var)
    #[arg(long)]
    pub private_key: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generate and print a new identity
pub fn keygen(args: KeygenArgs, out: &mut dyn Write) -> Result<u8> {
    let pair = KeyPair::generate();

    if args.json {
        let value = serde_json::json!({
            "private_key": format!("0x{}", pair.private_key().to_hex()),
            "public_key": pair.public_key().to_hex(),
            "address": pair.address(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "🔑 New identity")?;
        writeln!(out, "  Private key: 0x{}", pair.private_key().to_hex())?;
        writeln!(out, "  Public key:  {}", pair.public_key().to_hex())?;
        writeln!(out, "  Address:     {}", pair.address())?;
        writeln!(out, "\nKeep the private key secret. Share only the public key.")?;
    }

    info!("Generated new identity");
    Ok(EXIT_SUCCESS)
}

/// Print the public half of a private key
pub fn pubkey(args: PubkeyArgs, out: &mut dyn Write) -> Result<u8> {
    let pair = KeyPair::from_private(resolve_private_key(args.private_key)?);

    writeln!(out, "Public key: {}", pair.public_key().to_hex())?;
    writeln!(out, "Address:    {}", pair.address())?;
    Ok(EXIT_SUCCESS)
}

/// Sign and encrypt a message, printing the package
pub fn send(args: SendArgs, config: &MessengerConfig, out: &mut dyn Write) -> Result<u8> {
    let sender = KeyPair::from_private(resolve_private_key(args.private_key)?);
    let receiver = PublicKey::from_hex(&args.to).context("Invalid recipient public key")?;
    let message = read_input(args.message, std::io::stdin())?;

    let channel = SecureChannel::new(config.channel_config());
    let package = channel.send(&message, &sender, &receiver)?;

    writeln!(out, "{}", package)?;
    Ok(EXIT_SUCCESS)
}

/// Decrypt and verify a package
///
/// Prints the message only if verified; otherwise prints the generic notice
/// and returns [`EXIT_UNVERIFIED`]. A malformed `--from` key is an
/// unverified package, not a command error.
pub fn receive(
    args: ReceiveArgs,
    config: &MessengerConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let receiver = resolve_private_key(args.private_key)?;
    let package = read_input(args.package, std::io::stdin())?;

    let channel = SecureChannel::new(config.channel_config());
    let result = channel.receive_encoded(&package, &receiver.to_hex(), &args.from)?;

    if args.json {
        let value = if result.is_verified() {
            serde_json::json!({
                "verified": true,
                "message": result.message(),
                "timestamp": result.timestamp(),
                "from": result.from(),
            })
        } else {
            serde_json::json!({
                "verified": false,
                "error": UNVERIFIED_NOTICE,
            })
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else if let Some(message) = result.message() {
        writeln!(
            out,
            "✅ Verified message from {} at {}",
            result.from().unwrap_or_default(),
            result.timestamp().unwrap_or_default()
        )?;
        writeln!(out, "{}", message)?;
    } else {
        writeln!(out, "⚠️  {}", UNVERIFIED_NOTICE)?;
    }

    if result.is_verified() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_UNVERIFIED)
    }
}

/// Print version information
pub fn version(args: VersionArgs, out: &mut dyn Write) -> Result<u8> {
    if args.json {
        writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&version::get_version_info())?
        )?;
    } else {
        writeln!(out, "{}", version::get_version_string())?;
    }
    Ok(EXIT_SUCCESS)
}

/// `--private-key` if given, otherwise the environment
fn resolve_private_key(arg: Option<String>) -> Result<PrivateKey> {
    match arg {
        Some(hex) => PrivateKey::from_hex(&hex).map_err(|e| anyhow!("Invalid private key: {}", e)),
        None => load_private_key_from_env(PRIVATE_KEY_ENV).map_err(|e| {
            anyhow!(
                "Private key required. Use --private-key or set {} env var ({})",
                PRIVATE_KEY_ENV,
                e
            )
        }),
    }
}

/// Use `value` if given, otherwise read all of `reader` minus one trailing newline
fn read_input(value: Option<String>, mut reader: impl Read) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;

    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}
