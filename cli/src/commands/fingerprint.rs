// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `kubetrap fingerprint` - reproduce a telemetry fingerprint so detections
//! can be matched against known cluster and namespace names.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use kubetrap_core::infrastructure::crypto::fingerprint;

use super::load_config;

#[derive(Debug, Args)]
pub struct FingerprintArgs {
    /// Cluster or namespace name
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Salt to use instead of the configured telemetry secret
    #[arg(long, env = "KUBETRAP_FINGERPRINT_SALT", hide_env_values = true)]
    pub salt: Option<String>,
}

pub async fn run(args: FingerprintArgs, config_override: Option<PathBuf>) -> Result<()> {
    let salt = match args.salt {
        Some(salt) => salt,
        None => load_config(config_override)?.1.telemetry_secret,
    };
    println!("{}", fingerprint(&args.value, &salt));
    Ok(())
}
