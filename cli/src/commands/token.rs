// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Download token commands
//!
//! Commands: mint, verify. Both use the configured download secret, so a
//! token minted here is redeemable at the running server.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use kubetrap_core::domain::download_token::DOWNLOAD_TOKEN_TTL;
use kubetrap_core::infrastructure::crypto::DownloadTokenSigner;

use super::load_config;

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Mint a download token and print its link
    Mint {
        /// Lifetime in seconds
        #[arg(long, default_value_t = DOWNLOAD_TOKEN_TTL.as_secs())]
        ttl: u64,
    },

    /// Check a download token against the configured secret
    Verify {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

pub async fn handle_command(command: TokenCommand, config_override: Option<PathBuf>) -> Result<()> {
    let (_, config) = load_config(config_override)?;
    let signer = DownloadTokenSigner::new(&config.download_secret);

    match command {
        TokenCommand::Mint { ttl } => {
            let minted = signer
                .mint(Duration::from_secs(ttl))
                .context("Failed to mint token")?;
            println!("{}", minted.token);
            println!("  URL: {}", config.download_url(&minted.token));
            println!("  Expires: {}", minted.expires_at_utc().to_rfc3339());
            Ok(())
        }
        TokenCommand::Verify { token } => {
            match signer.decode_at(token.trim(), Utc::now().timestamp()) {
                Ok(payload) => {
                    println!("{}", "✓ Token is valid".green());
                    if let Some(expires) = chrono::DateTime::from_timestamp(payload.exp, 0) {
                        println!("  Expires: {}", expires.to_rfc3339());
                    }
                    Ok(())
                }
                Err(reason) => {
                    println!("{}", format!("✗ Token rejected: {}", reason).red());
                    anyhow::bail!("invalid token")
                }
            }
        }
    }
}
