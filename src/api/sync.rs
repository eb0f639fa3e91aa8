// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use crate::{
    error::{ApiError, ErrorResponse},
    models::{SyncClassesResponse, SyncRunResponse, SyncStateResponse},
    state::AppState,
    sync::{SyncEngine, SyncParams},
};

#[utoipa::path(
    get,
    path = "/v1/sync/stats",
    tag = "Sync",
    responses((status = 200, body = SyncClassesResponse))
)]
pub async fn sync_get_stats(State(state): State<AppState>) -> Json<SyncClassesResponse> {
    Json(SyncClassesResponse {
        ok: true,
        data: state.sync_classes.available(),
    })
}

/// Progress of running syncs. Runs are not tracked yet, so always empty.
#[utoipa::path(
    get,
    path = "/v1/sync/state",
    tag = "Sync",
    responses((status = 200, body = SyncStateResponse))
)]
pub async fn sync_get_state() -> Json<SyncStateResponse> {
    Json(SyncStateResponse {
        ok: true,
        data: Vec::new(),
    })
}

/// Queue a sync run. Query parameters and a JSON object body are merged,
/// body keys winning.
#[utoipa::path(
    post,
    path = "/v1/sync/run",
    tag = "Sync",
    request_body(content = HashMap<String, Value>, description = "Run parameters such as `type` and `limit`"),
    responses(
        (status = 200, body = SyncRunResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 500, description = "Sync pipeline is not running", body = ErrorResponse)
    )
)]
pub async fn sync_run(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<SyncRunResponse>, ApiError> {
    let params = run_params(query, &body)?;

    let job_id = state.sync.start(params.clone())?;
    tracing::info!(job_id = %job_id, "Sync run queued");

    Ok(Json(SyncRunResponse {
        ok: true,
        data: params,
    }))
}

fn run_params(query: HashMap<String, String>, body: &[u8]) -> Result<SyncParams, ApiError> {
    let mut params: SyncParams = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(params);
    }

    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => params.extend(fields),
        Ok(Value::Null) => {}
        Ok(_) => return Err(ApiError::bad_request("Sync parameters must be a JSON object")),
        Err(e) => return Err(ApiError::bad_request(format!("Request body is not valid JSON: {e}"))),
    }
    Ok(params)
}
