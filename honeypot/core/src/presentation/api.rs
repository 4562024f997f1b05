// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    body::Body,
    extract::State,
    http::Request,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::download::download_kubeconfig;
use super::mcp::handle_mcp;
use crate::application::tool_invocation_service::ToolInvocationService;
use crate::application::trap_service::TrapService;
use crate::domain::artifact::ArtifactStore;
use crate::domain::config::TrapConfig;
use crate::infrastructure::alert::AlertSink;
use crate::infrastructure::crypto::DownloadTokenSigner;
use crate::infrastructure::telemetry::TelemetryEmitter;

const BANNER: &str = "k8s platform tools\n";

pub struct AppState {
    pub config: Arc<TrapConfig>,
    pub store: Arc<dyn ArtifactStore>,
    pub signer: DownloadTokenSigner,
    pub tools: ToolInvocationService,
}

impl AppState {
    pub fn new(
        config: Arc<TrapConfig>,
        store: Arc<dyn ArtifactStore>,
        telemetry: Arc<dyn TelemetryEmitter>,
        alerts: Option<Arc<dyn AlertSink>>,
    ) -> Self {
        let trap = Arc::new(TrapService::new(
            config.clone(),
            store.clone(),
            telemetry,
            alerts,
        ));
        Self {
            signer: DownloadTokenSigner::new(&config.download_secret),
            tools: ToolInvocationService::new(trap),
            config,
            store,
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/mcp", post(handle_mcp))
        .route("/download/kubeconfig", get(download_kubeconfig))
        .layer(
            // Path only: the query string carries download tokens.
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

async fn banner() -> &'static str {
    BANNER
}

async fn health(State(_state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
