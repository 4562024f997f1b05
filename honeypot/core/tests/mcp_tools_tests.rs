// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the JSON-RPC tool endpoint (`POST /mcp`).
//!
//! Exercises the protocol envelope, the tool catalog, argument validation
//! and the trap's observable side effects (telemetry and alerts) through the
//! HTTP router.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::*;
use kubetrap_core::domain::events::TRAP_TRIGGERED;
use kubetrap_core::domain::trap::TrapMode;
use kubetrap_core::infrastructure::crypto::fingerprint;

const KUBECONFIG: &str = "apiVersion: v1\nkind: Config\n";

#[tokio::test]
async fn test_initialize_and_ping() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));

    let response = rpc(&h.router, "initialize", json!({ "protocolVersion": "2025-03-26" })).await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
    assert!(response["result"]["capabilities"]["tools"].is_object());
    assert!(response["result"]["serverInfo"]["name"].is_string());

    let response = rpc(&h.router, "ping", Value::Null).await;
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_notification_is_accepted_without_body() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));
    let response = post_raw(
        &h.router,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(body_string(response).await.is_empty());
}

#[tokio::test]
async fn test_protocol_errors() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));

    let response = post_raw(&h.router, "{not json").await;
    let envelope: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope["error"]["code"], -32700);
    assert_eq!(envelope["id"], Value::Null);

    let response = post_raw(&h.router, r#"{"jsonrpc":"2.0","id":7}"#).await;
    let envelope: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(envelope["error"]["code"], -32600);

    let response = rpc(&h.router, "resources/list", json!({})).await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_tools_list_advertises_three_tools() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));
    let response = rpc(&h.router, "tools/list", json!({})).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(
        names,
        vec!["k8s_access_guide", "cluster_status_public", "kubeconfig_get"]
    );
    for tool in tools {
        assert!(tool["description"].is_string());
        assert!(tool["inputSchema"].is_object());
    }
}

#[tokio::test]
async fn test_missing_cluster_is_invalid_params_and_silent() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));

    for arguments in [json!({}), json!({ "cluster": "" })] {
        let response = call_tool(&h.router, "kubeconfig_get", arguments).await;
        assert_eq!(response["error"]["code"], -32602);
    }
    assert_eq!(h.telemetry.count(), 0);
    assert!(h.alerts.contexts().is_empty());

    let response = call_tool(&h.router, "cluster_status_public", json!({})).await;
    assert_eq!(response["error"]["code"], -32602);

    let response = call_tool(&h.router, "kubectl_exec", json!({})).await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_cluster_name_is_fingerprinted_verbatim() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));

    let blank = call_tool(&h.router, "kubeconfig_get", json!({ "cluster": " " })).await;
    assert!(tool_text(&blank).contains("/download/kubeconfig?t="));
    assert_eq!(h.telemetry.count(), 1);

    call_tool(&h.router, "kubeconfig_get", json!({ "cluster": " prod " })).await;
    let events = h.telemetry.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].artifact.hashed_cluster, fingerprint(" ", TELEMETRY_SECRET));
    assert_eq!(
        events[1].artifact.hashed_cluster,
        fingerprint(" prod ", TELEMETRY_SECRET)
    );
    assert_ne!(
        events[1].artifact.hashed_cluster,
        fingerprint("prod", TELEMETRY_SECRET)
    );
    assert_eq!(h.alerts.contexts().len(), 2);
}

#[tokio::test]
async fn test_cluster_status_is_stable() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));

    let first: Value = serde_json::from_str(&tool_text(
        &call_tool(&h.router, "cluster_status_public", json!({ "cluster": "a" })).await,
    ))
    .unwrap();
    let second: Value = serde_json::from_str(&tool_text(
        &call_tool(&h.router, "cluster_status_public", json!({ "cluster": "a" })).await,
    ))
    .unwrap();

    assert_eq!(first["region"], "us-west-2");
    assert_eq!(first["healthy"], true);
    assert_eq!(first["region"], second["region"]);
    assert_eq!(first["healthy"], second["healthy"]);
    assert!(first["checkedAt"].is_string());
    assert_eq!(h.telemetry.count(), 0);
}

#[tokio::test]
async fn test_access_guide_is_static() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));
    let first = tool_text(&call_tool(&h.router, "k8s_access_guide", json!({})).await);
    let second = tool_text(&call_tool(&h.router, "k8s_access_guide", Value::Null).await);
    assert_eq!(first, second);
    assert_eq!(h.telemetry.count(), 0);
}

#[tokio::test]
async fn test_open_mode_grants_distinct_links_with_identical_fingerprints() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));
    let arguments = json!({ "cluster": "prod-eu-west-1", "namespace": "payments" });

    let first = tool_text(&call_tool(&h.router, "kubeconfig_get", arguments.clone()).await);
    let second = tool_text(&call_tool(&h.router, "kubeconfig_get", arguments).await);
    assert_ne!(download_path(&first), download_path(&second));

    let events = h.telemetry.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].artifact, events[1].artifact);
    assert_eq!(events[0].event_type, TRAP_TRIGGERED);
    assert_eq!(
        events[0].artifact.hashed_cluster,
        fingerprint("prod-eu-west-1", TELEMETRY_SECRET)
    );
    assert_eq!(
        events[0].artifact.hashed_namespace,
        fingerprint("payments", TELEMETRY_SECRET)
    );
}

#[tokio::test]
async fn test_gated_mode_emits_one_event_per_call() {
    let h = harness(config(TrapMode::Gated, Some("s3cret")), Some(KUBECONFIG));

    let granted = tool_text(
        &call_tool(
            &h.router,
            "kubeconfig_get",
            json!({ "cluster": "prod", "access_key": "s3cret" }),
        )
        .await,
    );
    assert!(granted.contains("/download/kubeconfig?t="));

    let absent = tool_text(&call_tool(&h.router, "kubeconfig_get", json!({ "cluster": "prod" })).await);
    assert!(absent.contains("access_key"));
    assert!(!absent.contains("/download/"));

    let wrong = tool_text(
        &call_tool(
            &h.router,
            "kubeconfig_get",
            json!({ "cluster": "prod", "access_key": "guess" }),
        )
        .await,
    );
    assert_eq!(absent, wrong);

    assert_eq!(h.telemetry.count(), 3);
    assert_eq!(h.alerts.contexts().len(), 3);
}

#[tokio::test]
async fn test_gated_without_server_key_is_misconfigured() {
    let h = harness(config(TrapMode::Gated, None), Some(KUBECONFIG));

    for arguments in [
        json!({ "cluster": "prod" }),
        json!({ "cluster": "prod", "access_key": "" }),
        json!({ "cluster": "prod", "access_key": "anything" }),
    ] {
        let text = tool_text(&call_tool(&h.router, "kubeconfig_get", arguments).await);
        assert!(!text.contains("/download/"));
        assert!(text.contains("not configured"));
    }
    assert_eq!(h.telemetry.count(), 3);
}

#[tokio::test]
async fn test_unavailable_artifact_still_records() {
    let h = harness(config(TrapMode::Open, None), None);
    let text = tool_text(&call_tool(&h.router, "kubeconfig_get", json!({ "cluster": "prod" })).await);
    assert!(text.contains("No kubeconfig"));
    assert_eq!(h.telemetry.count(), 1);
}

#[tokio::test]
async fn test_store_fault_is_generic_internal_error() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));
    h.store.set_unreachable(true);

    let response = call_tool(&h.router, "kubeconfig_get", json!({ "cluster": "prod" })).await;
    assert_eq!(response["error"]["code"], -32603);
    assert_eq!(response["error"]["message"], "Internal error");
    assert_eq!(h.telemetry.count(), 1);
}

#[tokio::test]
async fn test_raw_identifiers_never_leave_the_engine() {
    let h = harness(config(TrapMode::Open, None), Some(KUBECONFIG));
    call_tool(
        &h.router,
        "kubeconfig_get",
        json!({ "cluster": "secret-cluster-name", "namespace": "secret-ns" }),
    )
    .await;

    for event in h.telemetry.events() {
        let line = event.to_line();
        assert!(!line.contains("secret-cluster-name"));
        assert!(!line.contains("secret-ns"));
        assert!(!line.contains("apiVersion"));
    }
    for context in h.alerts.contexts() {
        assert!(context.starts_with("tool=kubeconfig_get "));
        assert!(!context.contains("secret-cluster-name"));
        assert!(!context.contains("secret-ns"));
    }
}
