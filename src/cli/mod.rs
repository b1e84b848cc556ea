// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use crate::config::MessengerConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Secure Messenger CLI
#[derive(Parser, Debug)]
#[command(name = "messenger-cli")]
#[command(version)]
#[command(about = "Sign-then-encrypt messaging between secp256k1 identities", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "MESSENGER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new identity key pair
    Keygen(commands::KeygenArgs),

    /// Print the public key and address for a private key
    Pubkey(commands::PubkeyArgs),

    /// Sign and encrypt a message for a recipient
    Send(commands::SendArgs),

    /// Decrypt and verify a package from a sender
    Receive(commands::ReceiveArgs),

    /// Print version information
    Version(commands::VersionArgs),
}

impl Cli {
    /// Config file (if any) with environment overrides
    pub fn load_config(&self) -> Result<MessengerConfig> {
        MessengerConfig::load(self.config.as_deref())
    }
}

/// Execute CLI command
///
/// Exit code 2 means a package was received but could not be verified.
pub fn execute(cli: Cli, config: &MessengerConfig) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let status = match cli.command {
        Commands::Keygen(args) => commands::keygen(args, &mut out),
        Commands::Pubkey(args) => commands::pubkey(args, &mut out),
        Commands::Send(args) => commands::send(args, config, &mut out),
        Commands::Receive(args) => commands::receive(args, config, &mut out),
        Commands::Version(args) => commands::version(args, &mut out),
    }?;

    Ok(ExitCode::from(status))
}
