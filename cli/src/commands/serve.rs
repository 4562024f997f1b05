// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `kubetrap serve` - run the HTTP tool server
//!
//! Loads configuration once, wires adapters into the router and serves until
//! Ctrl+C / SIGTERM. In-flight alerts get a bounded window to finish before
//! the process exits.

use anyhow::{Context, Result};
use clap::Args;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use kubetrap_core::domain::trap::TrapMode;
use kubetrap_core::infrastructure::alert::{AlertSink, WebhookAlertDispatcher};
use kubetrap_core::infrastructure::storage::create_artifact_store;
use kubetrap_core::infrastructure::telemetry::TracingTelemetryEmitter;
use kubetrap_core::presentation::{app, AppState};

use super::load_config;

const ALERT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides spec.server.bind_address)
    #[arg(long, env = "KUBETRAP_HOST")]
    pub host: Option<String>,

    /// Listen port (overrides spec.server.port)
    #[arg(long, env = "KUBETRAP_PORT")]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs, config_override: Option<PathBuf>) -> Result<()> {
    let (manifest, config) = load_config(config_override)?;

    if config.mode == TrapMode::Gated && config.access_key.is_none() {
        warn!("Gated mode without an access key: kubeconfig_get will report misconfiguration");
    }

    let host = args
        .host
        .unwrap_or_else(|| manifest.spec.server.bind_address.clone());

    if let Some(port) = manifest.spec.observability.metrics_port {
        let addr = metrics_addr(&host, port)?;
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Prometheus metrics on {}", addr);
    }

    let backend = manifest
        .resolve_artifact_backend()
        .context("Failed to resolve artifact backend credentials")?;
    let store = create_artifact_store(&backend, &config.artifact_key)
        .context("Failed to create artifact store")?;

    let tracker = TaskTracker::new();
    let dispatcher = match &config.alert_url {
        Some(url) => Some(Arc::new(
            WebhookAlertDispatcher::new(url.clone(), tracker.clone())
                .context("Failed to create alert dispatcher")?,
        )),
        None => None,
    };
    let alerts = dispatcher
        .clone()
        .map(|d| d as Arc<dyn AlertSink>);

    info!(
        mode = %config.mode,
        alerts = alerts.is_some(),
        "Trap configured"
    );

    let state = AppState::new(
        Arc::new(config),
        store,
        Arc::new(TracingTelemetryEmitter::new()),
        alerts,
    );
    let router = app(Arc::new(state));

    let port = args.port.unwrap_or(manifest.spec.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("kubetrap listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    if let Some(dispatcher) = dispatcher {
        dispatcher.drain(ALERT_DRAIN_TIMEOUT).await;
    }

    info!("kubetrap shut down");

    Ok(())
}

/// The metrics listener shares the server's bind host on its own port.
fn metrics_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("Invalid metrics bind address {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for metrics host {}", host))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
