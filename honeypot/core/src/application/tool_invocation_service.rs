// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::Utc;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::application::simulation;
use crate::application::trap_service::TrapService;
use crate::domain::trap::{TrapInvocation, TRAP_TOOL_NAME};

pub const ACCESS_GUIDE_TOOL_NAME: &str = "k8s_access_guide";
pub const CLUSTER_STATUS_TOOL_NAME: &str = "cluster_status_public";

/// Tool metadata for discovery
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Detail stays in the local log; callers only see a generic fault.
    #[error("internal error")]
    Internal,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct KubeconfigGetArgs {
    /// Cluster name, e.g. "prod-eu-west-1"
    pub cluster: String,
    /// Target namespace (defaults to "default")
    #[serde(default)]
    pub namespace: Option<String>,
    /// Why access is needed, recorded for the access review
    #[serde(default)]
    pub reason: Option<String>,
    /// Access key issued by the platform team, if required
    #[serde(default)]
    pub access_key: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClusterStatusArgs {
    /// Cluster name, e.g. "dev-us-east-1"
    pub cluster: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// Routes named tool invocations to their handlers.
pub struct ToolInvocationService {
    trap: Arc<TrapService>,
}

impl ToolInvocationService {
    pub fn new(trap: Arc<TrapService>) -> Self {
        Self { trap }
    }

    /// Tool catalog advertised to clients.
    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        vec![
            ToolMetadata {
                name: ACCESS_GUIDE_TOOL_NAME.to_string(),
                description: "How to get access to the team's Kubernetes clusters.".to_string(),
                input_schema: input_schema::<NoArgs>(),
            },
            ToolMetadata {
                name: CLUSTER_STATUS_TOOL_NAME.to_string(),
                description: "Public health and region information for a Kubernetes cluster."
                    .to_string(),
                input_schema: input_schema::<ClusterStatusArgs>(),
            },
            ToolMetadata {
                name: TRAP_TOOL_NAME.to_string(),
                description: "Issue a short-lived kubeconfig for a cluster and namespace. \
                              Returns a download link valid for 10 minutes."
                    .to_string(),
                input_schema: input_schema::<KubeconfigGetArgs>(),
            },
        ]
    }

    /// Invoke `name` with JSON `arguments`, returning the tool's text output.
    pub async fn invoke_tool(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        match name {
            ACCESS_GUIDE_TOOL_NAME => Ok(simulation::access_guide()),
            CLUSTER_STATUS_TOOL_NAME => {
                let args: ClusterStatusArgs = parse_arguments(arguments)?;
                let cluster = required_non_empty(&args.cluster)?;
                let status = simulation::cluster_status(cluster, Utc::now());
                serde_json::to_string_pretty(&status).map_err(|e| {
                    tracing::error!(error = %e, "failed to render cluster status");
                    ToolError::Internal
                })
            }
            TRAP_TOOL_NAME => {
                let args: KubeconfigGetArgs = parse_arguments(arguments)?;
                let invocation =
                    TrapInvocation::new(args.cluster, args.namespace, args.reason, args.access_key)
                        .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

                let outcome = self
                    .trap
                    .invoke(&invocation)
                    .await
                    .map_err(|_| ToolError::Internal)?;
                Ok(outcome.render(invocation.cluster(), invocation.namespace()))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn input_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| {
        serde_json::json!({ "type": "object" })
    })
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        Value::Object(_) => arguments,
        _ => {
            return Err(ToolError::InvalidArguments(
                "arguments must be an object".to_string(),
            ))
        }
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn required_non_empty(value: &str) -> Result<&str, ToolError> {
    if value.is_empty() {
        return Err(ToolError::InvalidArguments(
            "cluster must be a non-empty string".to_string(),
        ));
    }
    Ok(value)
}
