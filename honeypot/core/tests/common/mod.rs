// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use kubetrap_core::domain::config::TrapConfig;
use kubetrap_core::domain::trap::TrapMode;
use kubetrap_core::infrastructure::alert::RecordingAlertSink;
use kubetrap_core::infrastructure::storage::InMemoryArtifactStore;
use kubetrap_core::infrastructure::telemetry::RecordingTelemetryEmitter;
use kubetrap_core::presentation::{app, AppState};

pub const DOWNLOAD_SECRET: &str = "download-secret";
pub const TELEMETRY_SECRET: &str = "telemetry-salt";
pub const ARTIFACT_KEY: &str = "decoy_kubeconfig";
pub const BASE_URL: &str = "https://trap.example.com";

pub struct Harness {
    pub router: Router,
    pub store: InMemoryArtifactStore,
    pub telemetry: RecordingTelemetryEmitter,
    pub alerts: RecordingAlertSink,
}

pub fn config(mode: TrapMode, access_key: Option<&str>) -> TrapConfig {
    TrapConfig {
        mode,
        telemetry_secret: TELEMETRY_SECRET.to_string(),
        download_secret: DOWNLOAD_SECRET.to_string(),
        access_key: access_key.map(str::to_string),
        alert_url: None,
        public_base_url: BASE_URL.to_string(),
        artifact_key: ARTIFACT_KEY.to_string(),
    }
}

pub fn harness(config: TrapConfig, artifact: Option<&str>) -> Harness {
    let store = InMemoryArtifactStore::new();
    if let Some(content) = artifact {
        store.put(ARTIFACT_KEY, content);
    }
    let telemetry = RecordingTelemetryEmitter::new();
    let alerts = RecordingAlertSink::new();
    let state = AppState::new(
        Arc::new(config),
        Arc::new(store.clone()),
        Arc::new(telemetry.clone()),
        Some(Arc::new(alerts.clone())),
    );
    Harness {
        router: app(Arc::new(state)),
        store,
        telemetry,
        alerts,
    }
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_raw(router: &Router, body: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Send a JSON-RPC request and return the decoded response envelope.
pub async fn rpc(router: &Router, method: &str, params: Value) -> Value {
    let request = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
    let response = post_raw(router, &request.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub async fn call_tool(router: &Router, name: &str, arguments: Value) -> Value {
    rpc(router, "tools/call", json!({ "name": name, "arguments": arguments })).await
}

/// Text of the first content item of a successful tool call.
pub fn tool_text(response: &Value) -> String {
    assert_eq!(response["result"]["isError"], false, "{response}");
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Pull the download path (`/download/kubeconfig?t=...`) out of a granted result.
pub fn download_path(text: &str) -> String {
    let start = text.find("/download/kubeconfig?t=").expect("no download link");
    let rest = &text[start..];
    let end = rest.find('"').unwrap_or(rest.len());
    rest[..end].to_string()
}
