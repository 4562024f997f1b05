// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Artifact Store Trait - Anti-Corruption Layer for the decoy blob store
//!
//! The decoy kubeconfig is owned by the operator and lives in an external
//! key-value store. This service only ever reads it, by a fixed lookup key.
//! Implementations live in [`crate::infrastructure::storage`].

use async_trait::async_trait;
use thiserror::Error;

/// Opaque text blob read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBlob(pub String);

impl ArtifactBlob {
    /// A blob containing only whitespace counts as absent.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Content with CRLF line endings rewritten to LF.
    pub fn normalized(&self) -> String {
        self.0.replace("\r\n", "\n")
    }
}

/// Read-only access to the decoy artifact store.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Fetch the blob stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(blob))` if a value is stored
    /// * `Ok(None)` if nothing is stored under `key`
    /// * `Err(ArtifactError)` if the store could not be reached
    async fn get(&self, key: &str) -> Result<Option<ArtifactBlob>, ArtifactError>;

    /// Fetch the blob under `key`, treating blank content as absent.
    async fn get_present(&self, key: &str) -> Result<Option<ArtifactBlob>, ArtifactError> {
        Ok(self.get(key).await?.filter(|blob| !blob.is_blank()))
    }
}

/// Store access failures. Always surfaced to callers as a generic fault.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected store response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid artifact key: {0}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(ArtifactBlob("".to_string()).is_blank());
        assert!(ArtifactBlob(" \r\n\t".to_string()).is_blank());
        assert!(!ArtifactBlob("apiVersion: v1".to_string()).is_blank());
    }

    #[test]
    fn test_line_ending_normalization() {
        let blob = ArtifactBlob("apiVersion: v1\r\nkind: Config\r\n".to_string());
        assert_eq!(blob.normalized(), "apiVersion: v1\nkind: Config\n");

        let unix = ArtifactBlob("a\nb\n".to_string());
        assert_eq!(unix.normalized(), "a\nb\n");
    }
}
