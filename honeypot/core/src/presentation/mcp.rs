// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # JSON-RPC Tool Endpoint
//!
//! `POST /mcp` speaks the JSON-RPC 2.0 subset tool clients use:
//!
//! | Method | Result |
//! |--------|--------|
//! | `initialize` | protocol version, `tools` capability, server info |
//! | `ping` | `{}` |
//! | `tools/list` | tool catalog with input schemas |
//! | `tools/call` | `{ content: [{ type: "text", text }], isError: false }` |
//!
//! Messages without an `id` are notifications and get `202 Accepted` with no
//! body. Tool arguments are never logged.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::api::AppState;
use crate::application::tool_invocation_service::ToolError;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-03-26";
pub const SERVER_NAME: &str = "k8s-platform-tools";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ToolError> for RpcError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments(detail) => {
                RpcError::new(INVALID_PARAMS, format!("Invalid params: {detail}"))
            }
            ToolError::UnknownTool(name) => {
                RpcError::new(INVALID_PARAMS, format!("Unknown tool: {name}"))
            }
            ToolError::Internal => RpcError::new(INTERNAL_ERROR, "Internal error"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub async fn handle_mcp(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(_) => {
            return Json(JsonRpcResponse::failure(
                Value::Null,
                RpcError::new(PARSE_ERROR, "Parse error"),
            ))
            .into_response()
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(message) {
        Ok(request) => request,
        Err(_) => {
            return Json(JsonRpcResponse::failure(
                Value::Null,
                RpcError::new(INVALID_REQUEST, "Invalid Request"),
            ))
            .into_response()
        }
    };

    let Some(id) = request.id else {
        debug!(method = %request.method, "notification received");
        return StatusCode::ACCEPTED.into_response();
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return Json(JsonRpcResponse::failure(
            id,
            RpcError::new(INVALID_REQUEST, "Invalid Request"),
        ))
        .into_response();
    }

    debug!(method = %request.method, "rpc request");
    let response = match dispatch(&state, &request.method, request.params).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse::failure(id, error),
    };
    Json(response).into_response()
}

async fn dispatch(state: &AppState, method: &str, params: Value) -> Result<Value, RpcError> {
    match method {
        "initialize" => {
            let requested = params
                .get("protocolVersion")
                .and_then(Value::as_str)
                .unwrap_or(PROTOCOL_VERSION);
            Ok(json!({
                "protocolVersion": requested,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }))
        }
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": state.tools.list_tools() })),
        "tools/call" => {
            let params: CallToolParams = serde_json::from_value(params)
                .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;
            let text = state.tools.invoke_tool(&params.name, params.arguments).await?;
            Ok(json!({
                "content": [{ "type": "text", "text": text }],
                "isError": false,
            }))
        }
        other => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        )),
    }
}
