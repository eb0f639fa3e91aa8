// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    compat::{CompatibilityModule, MediaTarget, ESSENTIAL_ADDONS},
    error::{ApiError, ErrorResponse},
    models::{AssetUrlRequest, AssetUrlResponse, AssetsRemovedRequest},
    settings::{current_mode, remote_host},
    state::AppState,
    storage::Scope,
};

#[utoipa::path(
    get,
    path = "/v1/compat/modules",
    tag = "Compatibility",
    responses((status = 200, body = [CompatibilityModule]))
)]
pub async fn list_modules() -> Json<Vec<CompatibilityModule>> {
    Json(vec![ESSENTIAL_ADDONS])
}

/// URL the addon should use for one of its bundles.
///
/// The module is inactive in modes it does not support: the URL comes back
/// unchanged and nothing is queued.
#[utoipa::path(
    post,
    path = "/v1/compat/eael/asset-url",
    request_body = AssetUrlRequest,
    tag = "Compatibility",
    responses(
        (status = 200, body = AssetUrlResponse),
        (status = 500, description = "Option store failure", body = ErrorResponse)
    )
)]
pub async fn eael_asset_url(
    State(state): State<AppState>,
    Json(request): Json<AssetUrlRequest>,
) -> Result<Json<AssetUrlResponse>, ApiError> {
    let target = site_target(&state).await?;
    if !ESSENTIAL_ADDONS.is_supported(target.mode) {
        tracing::debug!(mode = %target.mode, "Essential Addons module inactive");
        return Ok(Json(AssetUrlResponse { url: request.url }));
    }

    let url = state
        .asset_filter
        .rewrite(&request.url, &request.asset_id, request.is_forced(), &target);
    Ok(Json(AssetUrlResponse { url }))
}

/// Queue removed bundles for deletion. Ignored while the module is inactive.
#[utoipa::path(
    post,
    path = "/v1/compat/eael/assets-removed",
    request_body = AssetsRemovedRequest,
    tag = "Compatibility",
    responses(
        (status = 204),
        (status = 500, description = "Option store failure", body = ErrorResponse)
    )
)]
pub async fn eael_assets_removed(
    State(state): State<AppState>,
    Json(request): Json<AssetsRemovedRequest>,
) -> Result<StatusCode, ApiError> {
    let target = site_target(&state).await?;
    if !ESSENTIAL_ADDONS.is_supported(target.mode) {
        tracing::debug!(mode = %target.mode, "Essential Addons module inactive");
        return Ok(StatusCode::NO_CONTENT);
    }

    state
        .asset_filter
        .on_assets_removed(&request.asset_id, &request.paths);
    Ok(StatusCode::NO_CONTENT)
}

async fn site_target(state: &AppState) -> Result<MediaTarget, ApiError> {
    let store = state.options.read().await;
    Ok(MediaTarget {
        mode: current_mode(&**store, Scope::Site)?,
        remote_host: remote_host(&**store, Scope::Site, state.custom_domain.as_deref())?,
    })
}
