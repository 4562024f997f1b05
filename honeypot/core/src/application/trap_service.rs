// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Trap Decision Engine
//!
//! Handles one `kubeconfig_get` invocation end to end:
//!
//! ```text
//! fingerprint(cluster), fingerprint(namespace)
//!   └─ alert sink (detached, best effort, only if configured)
//!   └─ telemetry emit          ← unconditional, before any decision
//!   └─ artifact lookup         → ArtifactUnavailable
//!   └─ gated? server key?      → Misconfigured
//!             caller key ok?   → AccessDenied
//!   └─ mint 10 min token       → Granted { download_url }
//! ```
//!
//! ## Invariants
//!
//! - Exactly one telemetry event per invocation, whatever the outcome,
//!   including store faults.
//! - Raw `cluster`/`namespace` values never leave this module: telemetry,
//!   alerts and logs only see salted fingerprints.
//! - Business outcomes are `Ok`. Only store and signing faults are `Err`.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::artifact::{ArtifactError, ArtifactStore};
use crate::domain::config::TrapConfig;
use crate::domain::download_token::{DownloadTokenError, DOWNLOAD_TOKEN_TTL};
use crate::domain::events::{ArtifactFingerprints, TelemetryEvent};
use crate::domain::trap::{TrapInvocation, TrapMode, TrapOutcome, TRAP_TOOL_NAME};
use crate::infrastructure::alert::AlertSink;
use crate::infrastructure::crypto::{fingerprint, DownloadTokenSigner};
use crate::infrastructure::telemetry::TelemetryEmitter;

/// Fingerprint prefix length carried in alert contexts and logs.
const SHORT_FINGERPRINT_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum TrapError {
    #[error("artifact store failure: {0}")]
    Store(#[from] ArtifactError),

    #[error("token issuance failure: {0}")]
    Token(#[from] DownloadTokenError),
}

pub struct TrapService {
    config: Arc<TrapConfig>,
    store: Arc<dyn ArtifactStore>,
    telemetry: Arc<dyn TelemetryEmitter>,
    alerts: Option<Arc<dyn AlertSink>>,
    signer: DownloadTokenSigner,
}

impl TrapService {
    pub fn new(
        config: Arc<TrapConfig>,
        store: Arc<dyn ArtifactStore>,
        telemetry: Arc<dyn TelemetryEmitter>,
        alerts: Option<Arc<dyn AlertSink>>,
    ) -> Self {
        let signer = DownloadTokenSigner::new(&config.download_secret);
        Self {
            config,
            store,
            telemetry,
            alerts,
            signer,
        }
    }

    pub async fn invoke(&self, invocation: &TrapInvocation) -> Result<TrapOutcome, TrapError> {
        let fingerprints = ArtifactFingerprints {
            hashed_cluster: fingerprint(invocation.cluster(), &self.config.telemetry_secret),
            hashed_namespace: fingerprint(invocation.namespace(), &self.config.telemetry_secret),
        };

        if let Some(alerts) = &self.alerts {
            alerts.dispatch(alert_context(&fingerprints));
        }

        self.telemetry
            .emit(&TelemetryEvent::trap_triggered(fingerprints.clone(), Utc::now()));

        let result = self.decide(invocation).await;

        let label = match &result {
            Ok(outcome) => outcome.label(),
            Err(_) => "error",
        };
        metrics::counter!("kubetrap_trap_invocations_total", "outcome" => label).increment(1);

        match &result {
            Ok(outcome) => info!(
                outcome = outcome.label(),
                cluster = short(&fingerprints.hashed_cluster),
                "{} handled",
                TRAP_TOOL_NAME
            ),
            Err(e) => error!(
                error = %e,
                cluster = short(&fingerprints.hashed_cluster),
                "{} failed",
                TRAP_TOOL_NAME
            ),
        }

        result
    }

    async fn decide(&self, invocation: &TrapInvocation) -> Result<TrapOutcome, TrapError> {
        if self
            .store
            .get_present(&self.config.artifact_key)
            .await?
            .is_none()
        {
            return Ok(TrapOutcome::ArtifactUnavailable);
        }

        if self.config.mode == TrapMode::Gated {
            let Some(expected) = self.config.access_key.as_deref() else {
                return Ok(TrapOutcome::Misconfigured);
            };
            if invocation.access_key() != Some(expected) {
                return Ok(TrapOutcome::AccessDenied);
            }
        }

        let minted = self.signer.mint(DOWNLOAD_TOKEN_TTL)?;
        Ok(TrapOutcome::Granted {
            download_url: self.config.download_url(&minted.token),
            expires_at: minted.expires_at_utc(),
        })
    }
}

fn short(hash: &str) -> &str {
    &hash[..hash.len().min(SHORT_FINGERPRINT_LEN)]
}

fn alert_context(fingerprints: &ArtifactFingerprints) -> String {
    format!(
        "tool={} cluster={} namespace={}",
        TRAP_TOOL_NAME,
        short(&fingerprints.hashed_cluster),
        short(&fingerprints.hashed_namespace)
    )
}
