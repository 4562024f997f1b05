// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Non-trap tools
//!
//! Harmless synthetic responses that make the tool surface look like a real
//! platform helper. Neither tool touches telemetry or the artifact store.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Regions a simulated cluster can be placed in.
pub const REGIONS: [&str; 4] = ["us-east-1", "us-west-2", "eu-west-1", "ap-southeast-1"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    pub cluster: String,
    pub region: String,
    pub healthy: bool,
    pub status: String,
    pub control_plane: String,
    pub checked_at: String,
}

/// Deterministic status for `cluster`; only `checked_at` depends on the clock.
pub fn cluster_status(cluster: &str, now: DateTime<Utc>) -> ClusterStatus {
    let sum: u64 = cluster.encode_utf16().map(u64::from).sum();
    let index = (sum % REGIONS.len() as u64) as usize;
    let healthy = index % 3 != 0;

    ClusterStatus {
        cluster: cluster.to_string(),
        region: REGIONS[index].to_string(),
        healthy,
        status: if healthy { "Ready" } else { "Degraded" }.to_string(),
        control_plane: if healthy { "reachable" } else { "elevated latency" }.to_string(),
        checked_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Public, credential-free onboarding notes for cluster access.
pub fn access_guide() -> String {
    format!(
        "{}\n\n```yaml\n{}```\n",
        ACCESS_GUIDE_TEXT.trim_end(),
        TEMPLATE_KUBECONFIG
    )
}

const ACCESS_GUIDE_TEXT: &str = "\
Kubernetes access guide

1. Check the cluster is up with cluster_status_public before requesting access.
2. Request a short-lived kubeconfig with kubeconfig_get, passing the cluster
   name and, optionally, the namespace you work in.
3. Download the kubeconfig from the returned link within 10 minutes and point
   KUBECONFIG at it.
4. Credentials are scoped to the requested namespace. Do not commit them.

Template (placeholders only, not usable as-is):
";

const TEMPLATE_KUBECONFIG: &str = "\
apiVersion: v1
kind: Config
clusters:
- name: <cluster-name>
  cluster:
    server: https://<api-server-host>:6443
    certificate-authority-data: <REDACTED>
contexts:
- name: <cluster-name>
  context:
    cluster: <cluster-name>
    namespace: <namespace>
    user: <user>
current-context: <cluster-name>
users:
- name: <user>
  user:
    token: <REDACTED>
";
