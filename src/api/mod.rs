// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    compat::{AssetHook, CompatibilityModule},
    error::ErrorResponse,
    models::{
        AssetUrlRequest, AssetUrlResponse, AssetsRemovedRequest, StatusResponse,
        SyncClassesResponse, SyncRunResponse, SyncStateResponse,
    },
    settings::{Mode, SettingsPayload},
    state::AppState,
    sync::{SyncClassInfo, SyncClassKind},
};

pub mod compat;
pub mod settings;
pub mod status;
pub mod sync;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/status", get(status::status))
        .route(
            "/settings",
            get(settings::get_settings).post(settings::update_settings),
        )
        .route("/sync/stats", get(sync::sync_get_stats))
        .route("/sync/state", get(sync::sync_get_state))
        .route("/sync/run", post(sync::sync_run))
        .route("/compat/modules", get(compat::list_modules))
        .route("/compat/eael/asset-url", post(compat::eael_asset_url))
        .route(
            "/compat/eael/assets-removed",
            post(compat::eael_assets_removed),
        )
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        status::status,
        settings::get_settings,
        settings::update_settings,
        sync::sync_get_stats,
        sync::sync_get_state,
        sync::sync_run,
        compat::list_modules,
        compat::eael_asset_url,
        compat::eael_assets_removed
    ),
    components(
        schemas(
            StatusResponse,
            SettingsPayload,
            ErrorResponse,
            SyncClassesResponse,
            SyncClassInfo,
            SyncClassKind,
            SyncStateResponse,
            SyncRunResponse,
            CompatibilityModule,
            Mode,
            AssetHook,
            AssetUrlRequest,
            AssetUrlResponse,
            AssetsRemovedRequest
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Status", description = "Liveness"),
        (name = "Settings", description = "Bucket credentials and offload mode"),
        (name = "Sync", description = "Media sync classes and run trigger"),
        (name = "Compatibility", description = "Third-party plugin asset handling")
    )
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::{JwtVerifier, Role, RoleDirectory};
    use crate::settings::{current_mode, BUCKET_KEY};
    use crate::storage::{OptionStore, Scope};

    const SECRET: &str = "router-secret";

    fn state() -> AppState {
        AppState::for_tests()
            .0
            .with_verifier(JwtVerifier::with_secret(SECRET))
            .with_permissions(RoleDirectory::new().with_user("7", Role::Administrator))
    }

    fn bearer(user_id: u64, is_network: bool) -> String {
        let token = encode(
            &Header::default(),
            &json!({"user_id": user_id, "is_network": is_network}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    fn post_settings(authorization: Option<String>, body: Value) -> Request<Body> {
        let mut builder = Request::post("/v1/settings").header("content-type", "application/json");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn settings_body() -> Value {
        json!({"bucket_name": "media", "private_key_data": "a2V5LWJ5dGVz"})
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/status",
            "/v1/settings",
            "/v1/sync/stats",
            "/v1/sync/state",
            "/v1/sync/run",
            "/v1/compat/modules",
            "/v1/compat/eael/asset-url",
            "/v1/compat/eael/assets-removed",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn status_is_public() {
        let request = Request::get("/v1/status").body(Body::empty()).unwrap();
        let (status, body) = send(router(state()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "message": "API up."}));
    }

    #[tokio::test]
    async fn get_settings_returns_501() {
        let request = Request::get("/v1/settings").body(Body::empty()).unwrap();
        let (status, body) = send(router(state()), request).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["error_code"], "not_implemented");
    }

    #[tokio::test]
    async fn settings_without_header_is_unauthorized() {
        let (status, body) = send(router(state()), post_settings(None, settings_body())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "unauthorized");
        assert_eq!(body["error"], "Auth token looks incorrect");
    }

    #[tokio::test]
    async fn malformed_token_fails_auth_and_writes_nothing() {
        let state = state();
        let request = post_settings(Some("Bearer not-a-token".into()), settings_body());
        let (status, body) = send(router(state.clone()), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "auth_failed");
        assert_eq!(state.options.read().await.get(Scope::Site, BUCKET_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn empty_payload_is_bad_request() {
        let request = post_settings(Some(bearer(7, false)), json!({}));
        let (status, body) = send(router(state()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query is empty");
    }

    #[tokio::test]
    async fn network_update_without_capability_is_forbidden() {
        let state = state();
        let request = post_settings(Some(bearer(7, true)), settings_body());
        let (status, body) = send(router(state.clone()), request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "forbidden");
        assert_eq!(
            state.options.read().await.get(Scope::Network, BUCKET_KEY).unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn site_update_succeeds() {
        let state = state();
        let request = post_settings(Some(bearer(7, false)), settings_body());
        let (status, body) = send(router(state.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "message": "Settings updated successfully"}));

        let store = state.options.read().await;
        assert_eq!(current_mode(&**store, Scope::Site).unwrap(), crate::settings::Mode::Cdn);
    }

    #[tokio::test]
    async fn sync_run_merges_query_and_body() {
        let (state, mut rx) = AppState::for_tests();
        let request = Request::post("/v1/sync/run?type=images")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"limit": 20}"#))
            .unwrap();
        let (status, body) = send(router(state), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "data": {"type": "images", "limit": 20}}));
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let request = Request::get("/v1/status").body(Body::empty()).unwrap();
        let response = router(state()).oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
