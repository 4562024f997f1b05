// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Artifact Delivery Endpoint
//!
//! `GET /download/kubeconfig?t=<token>` redeems a download token for the
//! decoy kubeconfig. Every rejection is a fixed response; a token that is
//! malformed, expired or forged always yields the same 403.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use super::api::AppState;
use super::error::ApiError;

pub const KUBECONFIG_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const KUBECONFIG_DISPOSITION: &str = "attachment; filename=\"kubeconfig\"";

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub t: Option<String>,
}

pub async fn download_kubeconfig(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let result = redeem(&state, query.t.as_deref()).await;
    let label = match &result {
        Ok(_) => "served",
        Err(e) => e.metric_label(),
    };
    metrics::counter!("kubetrap_downloads_total", "result" => label).increment(1);

    match result {
        Ok(body) => {
            info!("decoy kubeconfig served");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, KUBECONFIG_CONTENT_TYPE),
                    (header::CONTENT_DISPOSITION, KUBECONFIG_DISPOSITION),
                    (header::CACHE_CONTROL, "no-store"),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            info!(result = label, "download rejected");
            e.into_response()
        }
    }
}

async fn redeem(state: &AppState, token: Option<&str>) -> Result<String, ApiError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingToken)?;

    if !state.signer.verify(token) {
        return Err(ApiError::InvalidToken);
    }

    let blob = state
        .store
        .get_present(&state.config.artifact_key)
        .await
        .map_err(|e| {
            error!(error = %e, "artifact store failure during download");
            ApiError::Internal(e.to_string())
        })?
        .ok_or(ApiError::ArtifactUnavailable)?;

    Ok(blob.normalized())
}
