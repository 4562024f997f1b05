// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Download Token Codec
//!
//! HMAC-SHA256 implementation of the capability token described in
//! [`crate::domain::download_token`]. Payload and signature are both encoded
//! with unpadded URL-safe base64 so the token can be dropped straight into a
//! query string.
//!
//! Verification order: structure, payload encoding, payload JSON, version,
//! nonce, expiry, then signature. [`DownloadTokenSigner::verify`] collapses
//! every failure into `false`; [`DownloadTokenSigner::decode_at`] keeps the
//! reason for local logging.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use std::time::Duration;

use crate::domain::download_token::{
    DownloadTokenError, DownloadTokenPayload, MIN_NONCE_LEN, NONCE_BYTES, TOKEN_SEPARATOR,
    TOKEN_VERSION,
};

type HmacSha256 = Hmac<Sha256>;

/// A freshly minted token and the instant it stops being redeemable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token: String,
    /// Unix seconds.
    pub expires_at: i64,
}

impl MintedToken {
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_at, 0).unwrap_or_default()
    }
}

/// Mints and verifies download tokens with a server-held secret.
#[derive(Clone)]
pub struct DownloadTokenSigner {
    secret: Vec<u8>,
}

impl DownloadTokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Mint a token valid for `ttl` from now.
    pub fn mint(&self, ttl: Duration) -> Result<MintedToken, DownloadTokenError> {
        self.mint_at(ttl, Utc::now().timestamp())
    }

    /// Mint a token as if the current time were `now` (unix seconds).
    pub fn mint_at(&self, ttl: Duration, now: i64) -> Result<MintedToken, DownloadTokenError> {
        let nonce: [u8; NONCE_BYTES] = rand::random();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let payload = DownloadTokenPayload {
            v: TOKEN_VERSION,
            exp: now.saturating_add(ttl_secs),
            nonce: URL_SAFE_NO_PAD.encode(nonce),
        };

        let json = serde_json::to_vec(&payload)
            .map_err(|e| DownloadTokenError::PayloadFormat(e.to_string()))?;
        let encoded_payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.sign(&encoded_payload)?;

        Ok(MintedToken {
            token: format!("{}{}{}", encoded_payload, TOKEN_SEPARATOR, signature),
            expires_at: payload.exp,
        })
    }

    /// `true` iff `token` is well-formed, unexpired and signed with this secret.
    pub fn verify(&self, token: &str) -> bool {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> bool {
        match self.decode_at(token, now) {
            Ok(_) => true,
            Err(reason) => {
                tracing::debug!(%reason, "download token rejected");
                false
            }
        }
    }

    /// Full check returning the payload or the first failed rule.
    pub fn decode_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<DownloadTokenPayload, DownloadTokenError> {
        let parts: Vec<&str> = token.split(TOKEN_SEPARATOR).collect();
        let [encoded_payload, supplied_signature] = parts.as_slice() else {
            return Err(DownloadTokenError::Structure);
        };

        let payload = decode_payload(encoded_payload)?;

        if payload.exp <= now {
            return Err(DownloadTokenError::Expired);
        }

        let expected_signature = self.sign(encoded_payload)?;
        if !signatures_match(&expected_signature, supplied_signature) {
            return Err(DownloadTokenError::Signature);
        }

        Ok(payload)
    }

    fn sign(&self, encoded_payload: &str) -> Result<String, DownloadTokenError> {
        if self.secret.is_empty() {
            return Err(DownloadTokenError::Key("empty signing secret".to_string()));
        }
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| DownloadTokenError::Key(e.to_string()))?;
        mac.update(encoded_payload.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}

fn decode_payload(encoded: &str) -> Result<DownloadTokenPayload, DownloadTokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| DownloadTokenError::PayloadEncoding)?;
    let payload: DownloadTokenPayload = serde_json::from_slice(&bytes)
        .map_err(|e| DownloadTokenError::PayloadFormat(e.to_string()))?;

    if payload.v != TOKEN_VERSION {
        return Err(DownloadTokenError::Version(payload.v));
    }
    if payload.nonce.len() < MIN_NONCE_LEN {
        return Err(DownloadTokenError::Nonce);
    }
    Ok(payload)
}

// Length is checked first: token length is fixed and public.
fn signatures_match(expected: &str, supplied: &str) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
