// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for kubetrap CLI

pub mod config;
pub mod fingerprint;
pub mod serve;
pub mod token;

pub use self::config::ConfigCommand;
pub use self::token::TokenCommand;

use anyhow::{Context, Result};
use kubetrap_core::domain::config::{TrapConfig, TrapConfigManifest};
use std::path::PathBuf;

/// Discover, validate and resolve the configuration.
pub(crate) fn load_config(
    config_override: Option<PathBuf>,
) -> Result<(TrapConfigManifest, TrapConfig)> {
    let manifest = TrapConfigManifest::load_or_default(config_override)
        .context("Failed to load configuration")?;
    manifest
        .validate()
        .context("Configuration validation failed")?;
    let config = manifest
        .resolve()
        .context("Failed to resolve configuration secrets")?;
    Ok((manifest, config))
}
