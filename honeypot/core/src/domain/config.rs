// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Trap Configuration Types
//
// Defines the configuration schema for a kubetrap node:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Trap issuance policy (mode, access gate, public base URL, alert hook)
// - Signing secrets for telemetry fingerprints and download tokens
// - Decoy artifact store backend
// - Server and observability settings
//
// The manifest is loaded once at process start, resolved into a `TrapConfig`
// and shared read-only (behind `Arc`) with every component that needs it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::trap::TrapMode;

pub const API_VERSION: &str = "kubetrap.io/v1";
pub const KIND: &str = "TrapConfig";

/// Lookup key of the decoy kubeconfig in the artifact store.
pub const DEFAULT_ARTIFACT_KEY: &str = "decoy_kubeconfig";

/// Top-level Kubernetes-style configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapConfigManifest {
    /// API version (must be "kubetrap.io/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "TrapConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: TrapConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable deployment name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrapConfigSpec {
    #[serde(default)]
    pub trap: TrapSettings,

    #[serde(default)]
    pub secrets: SecretSettings,

    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapSettings {
    /// Issuance policy: open or gated
    #[serde(default)]
    pub mode: TrapMode,

    /// Shared access key required in gated mode (supports "env:VAR_NAME")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Absolute base URL used to build download links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Optional out-of-band alert endpoint hit on every trap invocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretSettings {
    /// Salt for telemetry fingerprints (supports "env:VAR_NAME")
    #[serde(default)]
    pub telemetry_secret: String,

    /// HMAC key for download tokens; falls back to `telemetry_secret`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Lookup key of the decoy blob
    #[serde(default = "default_artifact_key")]
    pub key: String,

    #[serde(default)]
    pub backend: ArtifactBackendConfig,
}

/// Where the decoy artifact is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactBackendConfig {
    /// One file per key under `path`
    Local { path: PathBuf },
    /// Key-value HTTP endpoint: GET {base_url}/{key}
    Http {
        base_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bearer_token: Option<String>,
    },
    /// Inline content (development only)
    Memory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Prometheus exporter port; disabled when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8787".to_string()
}

fn default_artifact_key() -> String {
    DEFAULT_ARTIFACT_KEY.to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for TrapSettings {
    fn default() -> Self {
        Self {
            mode: TrapMode::Open,
            access_key: None,
            public_base_url: default_public_base_url(),
            alert_url: None,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            key: default_artifact_key(),
            backend: ArtifactBackendConfig::default(),
        }
    }
}

impl Default for ArtifactBackendConfig {
    fn default() -> Self {
        Self::Local {
            path: PathBuf::from("./artifacts"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_port: None,
        }
    }
}

impl Default for TrapConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "kubetrap".to_string(),
                labels: None,
            },
            spec: TrapConfigSpec::default(),
        }
    }
}

/// Runtime configuration resolved from a manifest.
///
/// Secrets are dereferenced, the download secret fallback is applied and the
/// base URL is normalised. Immutable for the lifetime of the process.
#[derive(Clone)]
pub struct TrapConfig {
    pub mode: TrapMode,
    pub telemetry_secret: String,
    pub download_secret: String,
    pub access_key: Option<String>,
    pub alert_url: Option<String>,
    pub public_base_url: String,
    pub artifact_key: String,
}

impl std::fmt::Debug for TrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrapConfig")
            .field("mode", &self.mode)
            .field("telemetry_secret", &"<redacted>")
            .field("download_secret", &"<redacted>")
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("alert_url", &self.alert_url.as_ref().map(|_| "<redacted>"))
            .field("public_base_url", &self.public_base_url)
            .field("artifact_key", &self.artifact_key)
            .finish()
    }
}

impl TrapConfig {
    /// Absolute link at which `token` can be redeemed.
    pub fn download_url(&self, token: &str) -> String {
        format!("{}/download/kubeconfig?t={}", self.public_base_url, token)
    }
}

impl TrapConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. KUBETRAP_CONFIG_PATH environment variable
    /// 2. ./kubetrap-config.yaml (working directory)
    /// 3. ~/.kubetrap/config.yaml (user home)
    /// 4. /etc/kubetrap/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("KUBETRAP_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./kubetrap-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".kubetrap").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/kubetrap/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path fails if missing or invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    /// This allows container deployments to inject secrets and flags
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override source is injectable so tests do not touch process env.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("KUBETRAP_TELEMETRY_SECRET") {
            tracing::info!("Environment override: KUBETRAP_TELEMETRY_SECRET");
            self.spec.secrets.telemetry_secret = val;
        }
        if let Some(val) = lookup("KUBETRAP_DOWNLOAD_SECRET") {
            tracing::info!("Environment override: KUBETRAP_DOWNLOAD_SECRET");
            self.spec.secrets.download_secret = Some(val);
        }
        if let Some(val) = lookup("KUBETRAP_ALERT_URL") {
            tracing::info!("Environment override: KUBETRAP_ALERT_URL");
            self.spec.trap.alert_url = Some(val).filter(|v| !v.trim().is_empty());
        }
        if let Some(val) = lookup("KUBETRAP_MODE") {
            match val.parse::<TrapMode>() {
                Ok(mode) => {
                    tracing::info!("Environment override: KUBETRAP_MODE={}", mode);
                    self.spec.trap.mode = mode;
                }
                Err(e) => {
                    tracing::warn!("Invalid value for KUBETRAP_MODE: {}. Ignoring.", e);
                }
            }
        }
        if let Some(val) = lookup("KUBETRAP_ACCESS_KEY") {
            tracing::info!("Environment override: KUBETRAP_ACCESS_KEY");
            self.spec.trap.access_key = Some(val).filter(|v| !v.is_empty());
        }
        if let Some(val) = lookup("KUBETRAP_PUBLIC_BASE_URL") {
            tracing::info!("Environment override: KUBETRAP_PUBLIC_BASE_URL={}", val);
            self.spec.trap.public_base_url = val;
        }
        if let Some(val) = lookup("KUBETRAP_ARTIFACT_KEY") {
            tracing::info!("Environment override: KUBETRAP_ARTIFACT_KEY={}", val);
            self.spec.artifact.key = val;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.secrets.telemetry_secret.trim().is_empty() {
            anyhow::bail!("spec.secrets.telemetry_secret cannot be empty");
        }

        let base = url::Url::parse(&self.spec.trap.public_base_url).map_err(|e| {
            anyhow::anyhow!(
                "spec.trap.public_base_url '{}' is not a valid URL: {}",
                self.spec.trap.public_base_url,
                e
            )
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("spec.trap.public_base_url must use http or https");
        }

        if let Some(alert_url) = &self.spec.trap.alert_url {
            url::Url::parse(alert_url)
                .map_err(|e| anyhow::anyhow!("spec.trap.alert_url is not a valid URL: {}", e))?;
        }

        if self.spec.artifact.key.trim().is_empty() {
            anyhow::bail!("spec.artifact.key cannot be empty");
        }

        if let ArtifactBackendConfig::Http { base_url, .. } = &self.spec.artifact.backend {
            url::Url::parse(base_url).map_err(|e| {
                anyhow::anyhow!("spec.artifact.backend.base_url is not a valid URL: {}", e)
            })?;
        }

        if self.gate_key_missing_with(|name| std::env::var(name).ok()) {
            tracing::warn!(
                "Gated mode without spec.trap.access_key: every kubeconfig_get call will be refused"
            );
        }

        Ok(())
    }

    /// `true` when gated mode has no usable access key once secrets are
    /// dereferenced: absent, empty, or an `env:` reference that is unset or empty.
    pub fn gate_key_missing_with<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.spec.trap.mode != TrapMode::Gated {
            return false;
        }
        match self.spec.trap.access_key.as_deref() {
            Some(raw) => resolve_secret(raw, &lookup).map_or(true, |key| key.is_empty()),
            None => true,
        }
    }

    /// Resolve secrets and defaults into the runtime configuration.
    pub fn resolve(&self) -> anyhow::Result<TrapConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(&self, lookup: F) -> anyhow::Result<TrapConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telemetry_secret = resolve_secret(&self.spec.secrets.telemetry_secret, &lookup)?;
        let download_secret = match &self.spec.secrets.download_secret {
            Some(raw) if !raw.trim().is_empty() => resolve_secret(raw, &lookup)?,
            _ => telemetry_secret.clone(),
        };
        let access_key = self
            .spec
            .trap
            .access_key
            .as_deref()
            .map(|raw| resolve_secret(raw, &lookup))
            .transpose()?
            .filter(|key| !key.is_empty());

        Ok(TrapConfig {
            mode: self.spec.trap.mode,
            telemetry_secret,
            download_secret,
            access_key,
            alert_url: self.spec.trap.alert_url.clone(),
            public_base_url: self.spec.trap.public_base_url.trim_end_matches('/').to_string(),
            artifact_key: self.spec.artifact.key.clone(),
        })
    }

    /// Artifact backend with its credentials dereferenced.
    pub fn resolve_artifact_backend(&self) -> anyhow::Result<ArtifactBackendConfig> {
        self.resolve_artifact_backend_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_artifact_backend_with<F>(&self, lookup: F) -> anyhow::Result<ArtifactBackendConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut backend = self.spec.artifact.backend.clone();
        if let ArtifactBackendConfig::Http { bearer_token, .. } = &mut backend {
            *bearer_token = bearer_token
                .as_deref()
                .map(|raw| resolve_secret(raw, &lookup))
                .transpose()?;
        }
        Ok(backend)
    }
}

/// Dereference "env:VAR_NAME" values; anything else is taken literally.
pub fn resolve_secret<F>(raw: &str, lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match raw.strip_prefix("env:") {
        Some(var) => lookup(var)
            .ok_or_else(|| anyhow::anyhow!("Secret references unset environment variable {}", var)),
        None => Ok(raw.to_string()),
    }
}
