// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::artifact::{ArtifactBlob, ArtifactError, ArtifactStore};

/// In-memory artifact store for development and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryArtifactStore {
    blobs: Arc<RwLock<HashMap<String, String>>>,
    fail: Arc<RwLock<bool>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(key: &str, content: impl Into<String>) -> Self {
        let store = Self::new();
        store.put(key, content);
        store
    }

    /// Operator-side write; this service never calls it on a live store.
    pub fn put(&self, key: &str, content: impl Into<String>) {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(key.to_string(), content.into());
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.remove(key);
        }
    }

    /// Make every subsequent read fail as if the store were unreachable.
    pub fn set_unreachable(&self, unreachable: bool) {
        if let Ok(mut fail) = self.fail.write() {
            *fail = unreachable;
        }
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn get(&self, key: &str) -> Result<Option<ArtifactBlob>, ArtifactError> {
        if self.fail.read().map(|fail| *fail).unwrap_or(false) {
            return Err(ArtifactError::Network("store unreachable".to_string()));
        }
        let blobs = self
            .blobs
            .read()
            .map_err(|_| ArtifactError::Io("store lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned().map(ArtifactBlob))
    }
}
