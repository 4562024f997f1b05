// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # kubetrap CLI
//!
//! The `kubetrap` binary runs the decoy Kubernetes tool server and the
//! operator utilities around it.
//!
//! ## Commands
//!
//! - `kubetrap serve` - Run the HTTP server (`/mcp`, `/download/kubeconfig`)
//! - `kubetrap config show|validate|generate` - Configuration management
//! - `kubetrap token mint|verify` - Download token utilities
//! - `kubetrap fingerprint <value>` - Reproduce telemetry fingerprints

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use kubetrap::commands::{self, fingerprint::FingerprintArgs, serve::ServeArgs, ConfigCommand, TokenCommand};
use kubetrap::logging::{init_logging, LogFormat};

/// kubetrap - decoy kubeconfig tool server
#[derive(Parser)]
#[command(name = "kubetrap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "KUBETRAP_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "KUBETRAP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(
        long,
        global = true,
        env = "KUBETRAP_LOG_FORMAT",
        value_enum,
        default_value = "compact"
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tool server
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Download token utilities
    #[command(name = "token")]
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },

    /// Print the telemetry fingerprint of a value
    #[command(name = "fingerprint")]
    Fingerprint(FingerprintArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is normal outside development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::run(args, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Token { command }) => {
            commands::token::handle_command(command, cli.config).await
        }
        Some(Commands::Fingerprint(args)) => commands::fingerprint::run(args, cli.config).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}
