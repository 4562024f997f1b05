// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Artifact Storage Module
//!
//! Concrete implementations of the [`ArtifactStore`] trait for the backends
//! an operator can keep the decoy kubeconfig in.

pub mod http;
pub mod local;
pub mod memory;

pub use http::HttpArtifactStore;
pub use local::LocalArtifactStore;
pub use memory::InMemoryArtifactStore;

use std::sync::Arc;

use crate::domain::artifact::{ArtifactError, ArtifactStore};
use crate::domain::config::ArtifactBackendConfig;

/// Build the artifact store selected by configuration.
///
/// `key` is the fixed lookup key, needed to seed the in-memory backend.
pub fn create_artifact_store(
    backend: &ArtifactBackendConfig,
    key: &str,
) -> Result<Arc<dyn ArtifactStore>, ArtifactError> {
    match backend {
        ArtifactBackendConfig::Local { path } => Ok(Arc::new(LocalArtifactStore::new(path.clone()))),
        ArtifactBackendConfig::Http {
            base_url,
            bearer_token,
        } => Ok(Arc::new(HttpArtifactStore::new(
            base_url.clone(),
            bearer_token.clone(),
        )?)),
        ArtifactBackendConfig::Memory { content } => {
            let store = InMemoryArtifactStore::new();
            if let Some(content) = content {
                store.put(key, content.clone());
            }
            Ok(Arc::new(store))
        }
    }
}

/// Keys are plain names: no path separators, no traversal.
pub(crate) fn validate_key(key: &str) -> Result<(), ArtifactError> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ArtifactError::InvalidKey(key.to_string()))
    }
}
