// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local Filesystem Artifact Store
//!
//! Reads the decoy artifact from `<base_path>/<key>`. Suitable for single-node
//! deployments where the operator drops the decoy kubeconfig on disk (for
//! example a mounted Kubernetes Secret).
//!
//! The file is read on every request, so operator edits take effect without a
//! restart.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::validate_key;
use crate::domain::artifact::{ArtifactBlob, ArtifactError, ArtifactStore};

pub struct LocalArtifactStore {
    /// Directory holding one file per key (e.g., "/var/lib/kubetrap/artifacts")
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn get(&self, key: &str) -> Result<Option<ArtifactBlob>, ArtifactError> {
        validate_key(key)?;
        let path = self.resolve_path(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(ArtifactBlob(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtifactError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
