// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use kubetrap_core::domain::config::{ArtifactBackendConfig, TrapConfigManifest};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration (secrets redacted)
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./kubetrap-config.yaml)
        #[arg(short, long, default_value = "./kubetrap-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let manifest = TrapConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. KUBETRAP_CONFIG_PATH: {}",
            std::env::var("KUBETRAP_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./kubetrap-config.yaml");
        println!("  4. ~/.kubetrap/config.yaml");
        println!("  5. /etc/kubetrap/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    println!("  Name: {}", manifest.metadata.name);
    println!();

    let trap = &manifest.spec.trap;
    println!("{}", "Trap:".bold());
    println!("  Mode: {}", trap.mode);
    println!("  Access key: {}", redacted(trap.access_key.as_deref()));
    println!("  Public base URL: {}", trap.public_base_url);
    println!("  Alert URL: {}", redacted(trap.alert_url.as_deref()));
    println!();

    let secrets = &manifest.spec.secrets;
    println!("{}", "Secrets:".bold());
    println!(
        "  Telemetry secret: {}",
        redacted(Some(secrets.telemetry_secret.as_str()).filter(|s| !s.is_empty()))
    );
    println!(
        "  Download secret: {}",
        match &secrets.download_secret {
            Some(raw) => describe_secret(raw),
            None => "(telemetry secret)".dimmed().to_string(),
        }
    );
    println!();

    let artifact = &manifest.spec.artifact;
    println!("{}", "Artifact:".bold());
    println!("  Key: {}", artifact.key);
    match &artifact.backend {
        ArtifactBackendConfig::Local { path } => {
            println!("  Backend: local ({})", path.display())
        }
        ArtifactBackendConfig::Http { base_url, .. } => println!("  Backend: http ({})", base_url),
        ArtifactBackendConfig::Memory { content } => println!(
            "  Backend: memory ({})",
            if content.is_some() { "seeded" } else { "empty" }
        ),
    }
    println!();

    let server = &manifest.spec.server;
    let observability = &manifest.spec.observability;
    println!("{}", "Server:".bold());
    println!("  Listen: {}:{}", server.bind_address, server.port);
    println!("  Log level: {}", observability.log_level);
    match observability.metrics_port {
        Some(port) => println!("  Metrics port: {}", port),
        None => println!("  Metrics port: {}", "(disabled)".dimmed()),
    }

    Ok(())
}

fn redacted(value: Option<&str>) -> String {
    match value {
        Some(raw) => describe_secret(raw),
        None => "(not set)".dimmed().to_string(),
    }
}

/// Names the source of an `env:` reference, hides literal values.
fn describe_secret(raw: &str) -> String {
    match raw.strip_prefix("env:") {
        Some(var) => format!("${}", var),
        None => "<redacted>".to_string(),
    }
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let manifest = TrapConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    manifest
        .validate()
        .context("Configuration validation failed")?;
    manifest
        .resolve()
        .context("Configuration secrets could not be resolved")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    std::fs::write(output, sample(with_examples))
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn sample(with_examples: bool) -> &'static str {
    if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid_manifests() {
        for with_examples in [false, true] {
            let manifest = TrapConfigManifest::from_yaml_str(sample(with_examples)).unwrap();
            manifest.validate().unwrap();
        }
    }

    #[test]
    fn test_secret_description_hides_literals() {
        assert_eq!(describe_secret("env:KUBETRAP_ACCESS_KEY"), "$KUBETRAP_ACCESS_KEY");
        assert_eq!(describe_secret("hunter2"), "<redacted>");
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("kubetrap-config.yaml");
        generate(&output, false).await.unwrap();

        let manifest = TrapConfigManifest::from_yaml_file(&output).unwrap();
        assert_eq!(manifest.metadata.name, "kubetrap");
    }
}
