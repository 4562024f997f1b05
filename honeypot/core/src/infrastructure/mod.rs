// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod alert;
pub mod crypto;
pub mod storage;
pub mod telemetry;

pub use alert::{AlertSink, WebhookAlertDispatcher};
pub use telemetry::{TelemetryEmitter, TracingTelemetryEmitter};
