// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::models::StatusResponse;

/// Liveness endpoint. No authentication, no dependencies checked.
#[utoipa::path(
    get,
    path = "/v1/status",
    tag = "Status",
    responses((status = 200, body = StatusResponse))
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::ok("API up."))
}
