// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end tests wiring real adapters into the router: a YAML manifest on
//! disk, the local and HTTP artifact stores, and the webhook alert dispatcher
//! against a mock endpoint.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;

use common::*;
use kubetrap_core::domain::config::TrapConfigManifest;
use kubetrap_core::domain::trap::TrapMode;
use kubetrap_core::infrastructure::alert::WebhookAlertDispatcher;
use kubetrap_core::infrastructure::crypto::fingerprint;
use kubetrap_core::infrastructure::storage::create_artifact_store;
use kubetrap_core::infrastructure::telemetry::RecordingTelemetryEmitter;
use kubetrap_core::presentation::{app, AppState};

#[tokio::test]
async fn test_manifest_with_local_store_serves_download() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    std::fs::create_dir_all(&artifacts).unwrap();
    std::fs::write(artifacts.join("decoy_kubeconfig"), "apiVersion: v1\r\nkind: Config\r\n").unwrap();

    let manifest_path = dir.path().join("kubetrap-config.yaml");
    std::fs::write(
        &manifest_path,
        format!(
            r#"apiVersion: kubetrap.io/v1
kind: TrapConfig
metadata:
  name: test-trap
spec:
  trap:
    mode: open
    public_base_url: https://trap.example.com/
  secrets:
    telemetry_secret: env:TEST_TELEMETRY_SECRET
  artifact:
    key: decoy_kubeconfig
    backend:
      type: local
      path: {}
"#,
            artifacts.display()
        ),
    )
    .unwrap();

    let manifest = TrapConfigManifest::from_yaml_file(&manifest_path).unwrap();
    manifest.validate().unwrap();
    let config = manifest
        .resolve_with(|name| (name == "TEST_TELEMETRY_SECRET").then(|| "salt".to_string()))
        .unwrap();
    assert_eq!(config.public_base_url, "https://trap.example.com");
    assert_eq!(config.download_secret, "salt");

    let store = create_artifact_store(&manifest.spec.artifact.backend, &config.artifact_key).unwrap();
    let telemetry = RecordingTelemetryEmitter::new();
    let router = app(Arc::new(AppState::new(
        Arc::new(config),
        store,
        Arc::new(telemetry.clone()),
        None,
    )));

    let text = tool_text(&call_tool(&router, "kubeconfig_get", json!({ "cluster": "prod" })).await);
    assert!(text.contains("https://trap.example.com/download/kubeconfig?t="));

    let response = get(&router, &download_path(&text)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "apiVersion: v1\nkind: Config\n");
    assert_eq!(telemetry.count(), 1);
}

#[tokio::test]
async fn test_http_store_backs_the_trap() {
    let mut server = mockito::Server::new_async().await;
    let artifact = server
        .mock("GET", "/kv/decoy_kubeconfig")
        .with_status(200)
        .with_body("apiVersion: v1\n")
        .expect_at_least(1)
        .create_async()
        .await;

    let backend: kubetrap_core::domain::config::ArtifactBackendConfig = serde_yaml::from_str(
        &format!("type: http\nbase_url: {}/kv\n", server.url()),
    )
    .unwrap();
    let store = create_artifact_store(&backend, ARTIFACT_KEY).unwrap();
    let router = app(Arc::new(AppState::new(
        Arc::new(config(TrapMode::Open, None)),
        store,
        Arc::new(RecordingTelemetryEmitter::new()),
        None,
    )));

    let text = tool_text(&call_tool(&router, "kubeconfig_get", json!({ "cluster": "prod" })).await);
    let response = get(&router, &download_path(&text)).await;
    assert_eq!(response.status(), StatusCode::OK);
    artifact.assert_async().await;
}

#[tokio::test]
async fn test_webhook_alert_carries_fingerprints_only() {
    let expected = format!(
        "tool=kubeconfig_get cluster={} namespace={}",
        &fingerprint("prod-eu-west-1", TELEMETRY_SECRET)[..12],
        &fingerprint("default", TELEMETRY_SECRET)[..12],
    );

    let mut server = mockito::Server::new_async().await;
    let hook = server
        .mock("GET", "/canary")
        .match_query(mockito::Matcher::UrlEncoded("ctx".into(), expected))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dispatcher = Arc::new(
        WebhookAlertDispatcher::new(format!("{}/canary", server.url()), TaskTracker::new()).unwrap(),
    );
    let h = harness(config(TrapMode::Open, None), None);
    let router = app(Arc::new(AppState::new(
        Arc::new(config(TrapMode::Open, None)),
        Arc::new(h.store.clone()),
        Arc::new(h.telemetry.clone()),
        Some(dispatcher.clone()),
    )));

    let text = tool_text(
        &call_tool(&router, "kubeconfig_get", json!({ "cluster": "prod-eu-west-1" })).await,
    );
    assert!(text.contains("No kubeconfig"));

    dispatcher.drain(Duration::from_secs(5)).await;
    hook.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_alert_endpoint_does_not_affect_result() {
    // Nothing listens on port 9 on the loopback interface.
    let dispatcher = Arc::new(
        WebhookAlertDispatcher::new("http://127.0.0.1:9/canary", TaskTracker::new()).unwrap(),
    );
    let telemetry = RecordingTelemetryEmitter::new();
    let store = kubetrap_core::infrastructure::storage::InMemoryArtifactStore::with_artifact(
        ARTIFACT_KEY,
        "apiVersion: v1\n",
    );
    let router = app(Arc::new(AppState::new(
        Arc::new(config(TrapMode::Open, None)),
        Arc::new(store),
        Arc::new(telemetry.clone()),
        Some(dispatcher.clone()),
    )));

    let text = tool_text(&call_tool(&router, "kubeconfig_get", json!({ "cluster": "prod" })).await);
    assert!(text.contains("/download/kubeconfig?t="));
    assert_eq!(telemetry.count(), 1);

    dispatcher.drain(Duration::from_secs(5)).await;
}
