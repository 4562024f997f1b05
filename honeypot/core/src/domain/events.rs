// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::trap::TRAP_TOOL_NAME;

/// Version of the telemetry line format.
pub const TELEMETRY_SCHEMA_VERSION: u32 = 1;

/// Fixed event-type tag for trap detections.
pub const TRAP_TRIGGERED: &str = "trap_triggered";

/// Salted fingerprints of the identifiers the caller supplied.
///
/// Never holds raw cluster or namespace values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFingerprints {
    pub hashed_cluster: String,
    pub hashed_namespace: String,
}

/// Detection record emitted once per trap invocation, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub schema_version: u32,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub tool: String,
    pub artifact: ArtifactFingerprints,
}

impl TelemetryEvent {
    pub fn trap_triggered(artifact: ArtifactFingerprints, timestamp: DateTime<Utc>) -> Self {
        Self {
            schema_version: TELEMETRY_SCHEMA_VERSION,
            event_type: TRAP_TRIGGERED.to_string(),
            timestamp,
            tool: TRAP_TOOL_NAME.to_string(),
            artifact,
        }
    }

    /// Single-line JSON rendering written to the observability sink.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
