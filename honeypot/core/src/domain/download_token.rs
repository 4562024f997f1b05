// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Download Token (capability token)
//!
//! A download token is a self-contained bearer credential proving that the
//! holder was granted the decoy artifact before an expiry instant. No server
//! side state is kept: the token is
//!
//! ```text
//! base64url(payload-json) "." base64url(hmac-sha256(encoded-payload))
//! ```
//!
//! ## Invariants
//!
//! - `v` must equal [`TOKEN_VERSION`] exactly.
//! - `nonce` is at least [`MIN_NONCE_LEN`] characters after decoding the JSON.
//! - A token is valid only while `exp > now` (strictly).
//! - Tokens are not single-use and cannot be revoked before `exp`.
//!
//! The HMAC implementation lives in
//! [`crate::infrastructure::crypto::download_token`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current payload version.
pub const TOKEN_VERSION: u32 = 1;

/// Lifetime of tokens minted by the trap engine.
pub const DOWNLOAD_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Random bytes drawn per token.
pub const NONCE_BYTES: usize = 16;

/// Shortest nonce text accepted when decoding.
pub const MIN_NONCE_LEN: usize = 16;

/// Joins encoded payload and signature. Not part of the base64url alphabet.
pub const TOKEN_SEPARATOR: char = '.';

/// Signed content of a download token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTokenPayload {
    pub v: u32,
    /// Absolute expiry, unix seconds.
    pub exp: i64,
    pub nonce: String,
}

/// Why a token was rejected or could not be issued.
///
/// Only used for local diagnostics: callers of the delivery endpoint see a
/// single undifferentiated rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadTokenError {
    #[error("token must have exactly two parts")]
    Structure,
    #[error("payload is not valid base64url")]
    PayloadEncoding,
    #[error("payload is not well-formed: {0}")]
    PayloadFormat(String),
    #[error("unsupported token version {0}")]
    Version(u32),
    #[error("nonce missing or too short")]
    Nonce,
    #[error("token expired")]
    Expired,
    #[error("signature mismatch")]
    Signature,
    #[error("signing key rejected: {0}")]
    Key(String),
}
