// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Out-of-band Alert Dispatcher
//!
//! Fires a best-effort HTTP request at an operator-supplied endpoint (for
//! example a canary-token web bug) every time the trap tool is invoked.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Detached, non-retried alert delivery
//! - **Integration:** Trap engine → `TaskTracker` task → alert endpoint
//!
//! The request runs on a task owned by a [`TaskTracker`] so the tool response
//! never waits on it, while shutdown can still drain in-flight alerts.
//! Failures are logged at `debug` and counted, then discarded.

use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tracing::debug;

const ALERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination for best-effort alert signals.
pub trait AlertSink: Send + Sync {
    /// Schedule delivery of `context`. Must not block and must not fail.
    fn dispatch(&self, context: String);
}

pub struct WebhookAlertDispatcher {
    client: Client,
    url: String,
    tracker: TaskTracker,
}

impl WebhookAlertDispatcher {
    pub fn new(url: impl Into<String>, tracker: TaskTracker) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(ALERT_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            tracker,
        })
    }

    /// Deliver `context` and wait for the response.
    pub async fn send(&self, context: &str) -> Result<(), reqwest::Error> {
        deliver(&self.client, &self.url, context).await
    }

    /// Stop accepting alerts and wait up to `timeout` for in-flight ones.
    pub async fn drain(&self, timeout: Duration) {
        self.tracker.close();
        if tokio::time::timeout(timeout, self.tracker.wait()).await.is_err() {
            debug!(pending = self.tracker.len(), "alert drain timed out");
        }
    }
}

impl AlertSink for WebhookAlertDispatcher {
    fn dispatch(&self, context: String) {
        let client = self.client.clone();
        let url = self.url.clone();
        self.tracker.spawn(async move {
            let _ = deliver(&client, &url, &context).await;
        });
    }
}

async fn deliver(client: &Client, url: &str, context: &str) -> Result<(), reqwest::Error> {
    let result = client
        .get(url)
        .query(&[("ctx", context)])
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map(|_| ());

    match &result {
        Ok(()) => {
            metrics::counter!("kubetrap_alerts_total", "result" => "sent").increment(1);
        }
        Err(e) => {
            metrics::counter!("kubetrap_alerts_total", "result" => "failed").increment(1);
            debug!(error = %e, "alert dispatch failed");
        }
    }
    result
}

/// Collects dispatched contexts instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct RecordingAlertSink {
    contexts: Arc<Mutex<Vec<String>>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts
            .lock()
            .map(|contexts| contexts.clone())
            .unwrap_or_default()
    }
}

impl AlertSink for RecordingAlertSink {
    fn dispatch(&self, context: String) {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(context);
        }
    }
}
