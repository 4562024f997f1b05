// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Trap Telemetry
//!
//! Writes one structured line per trap invocation to the process's tracing
//! subscriber under the [`TELEMETRY_TARGET`] target, so operators can route
//! detections (stdout JSON, Loki, a SIEM shipper) independently of ordinary
//! service logs.
//!
//! Emission is fire-and-forget: subscriber failures are not visible to the
//! caller. Callers must only hand over fingerprints, never raw identifiers or
//! artifact content.

use std::sync::{Arc, Mutex};

use crate::domain::events::TelemetryEvent;

/// Tracing target carrying detection events.
pub const TELEMETRY_TARGET: &str = "kubetrap::telemetry";

pub trait TelemetryEmitter: Send + Sync {
    fn emit(&self, event: &TelemetryEvent);
}

/// Emits events through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct TracingTelemetryEmitter;

impl TracingTelemetryEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryEmitter for TracingTelemetryEmitter {
    fn emit(&self, event: &TelemetryEvent) {
        tracing::info!(target: TELEMETRY_TARGET, "{}", event.to_line());
    }
}

/// Keeps emitted events in memory for assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordingTelemetryEmitter {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl RecordingTelemetryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }
}

impl TelemetryEmitter for RecordingTelemetryEmitter {
    fn emit(&self, event: &TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
