// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP error mapping for the plain (non JSON-RPC) endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// `t` query parameter absent or empty.
    #[error("missing download token")]
    MissingToken,

    /// Malformed, expired or forged token. Deliberately one variant.
    #[error("invalid download token")]
    InvalidToken,

    #[error("artifact unavailable")]
    ArtifactUnavailable,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::ArtifactUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for the `kubetrap_downloads_total` counter.
    pub const fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::ArtifactUnavailable => "unavailable",
            Self::Internal(_) => "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Bodies are fixed strings; token and store details stay in the logs.
        let body = match &self {
            Self::MissingToken => "Missing token",
            Self::InvalidToken => "Forbidden",
            Self::ArtifactUnavailable => "Artifact unavailable",
            Self::Internal(_) => "Internal server error",
        };
        (self.status_code(), body).into_response()
    }
}
