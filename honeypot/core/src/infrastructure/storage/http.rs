// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP Key-Value Artifact Store
//!
//! Reads the decoy artifact from a key-value service exposing
//! `GET {base_url}/{key}`, such as an edge KV REST API or a filer.
//!
//! # API Contract
//!
//! - `200` - body is the artifact text
//! - `404` - no value stored under the key
//! - anything else - store fault

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::validate_key;
use crate::domain::artifact::{ArtifactBlob, ArtifactError, ArtifactStore};

pub struct HttpArtifactStore {
    client: Client,

    /// Base URL (e.g., "https://kv.example.com/values")
    base_url: String,

    bearer_token: Option<String>,
}

impl HttpArtifactStore {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: Option<String>,
    ) -> Result<Self, ArtifactError> {
        Self::with_timeout(base_url, bearer_token, Duration::from_secs(10))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ArtifactError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArtifactError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token,
        })
    }

    fn build_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn get(&self, key: &str) -> Result<Option<ArtifactBlob>, ArtifactError> {
        validate_key(key)?;

        let mut request = self.client.get(self.build_url(key));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ArtifactError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let content = response
                    .text()
                    .await
                    .map_err(|e| ArtifactError::Network(e.to_string()))?;
                Ok(Some(ArtifactBlob(content)))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(ArtifactError::UnexpectedResponse(format!(
                "GET {} returned HTTP {}",
                key, status
            ))),
        }
    }
}
