// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Bytes, extract::State, Json};

use crate::{
    auth::TokenContext,
    error::{ApiError, ErrorResponse},
    models::StatusResponse,
    settings::{authorize_update, reconcile, AuthorizedUpdate, ScopedOptions, SettingsPayload},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/settings",
    tag = "Settings",
    responses((status = 501, description = "Reading settings is not supported", body = ErrorResponse))
)]
pub async fn get_settings() -> Result<Json<StatusResponse>, ApiError> {
    Err(ApiError::not_implemented("Method not implemented"))
}

/// Store bucket credentials for the caller's scope and reconcile the mode.
///
/// The body is read raw so an empty or non-object body gets the same
/// `bad_request` as a missing field.
#[utoipa::path(
    post,
    path = "/v1/settings",
    request_body = SettingsPayload,
    tag = "Settings",
    security(("bearer" = [])),
    responses(
        (status = 200, body = StatusResponse),
        (status = 400, description = "Empty or incomplete payload", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller lacks the scope capability", body = ErrorResponse),
        (status = 500, description = "Option store failure", body = ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    token: TokenContext,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let AuthorizedUpdate {
        user_id,
        scope,
        credentials,
    } = authorize_update(&token, &body, state.permissions.as_ref())?;

    // The uploads dir write check and the option document rewrites both touch
    // the filesystem.
    let options = state.options.clone();
    let environment = state.environment.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let env = environment.probe();
        let mut store = options.blocking_write();
        let mut scoped = ScopedOptions::new(&mut **store, scope);
        reconcile(&mut scoped, env, credentials)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Settings update task failed: {e}")))??;

    tracing::info!(
        user_id = %user_id,
        scope = %outcome.scope,
        mode = %outcome.mode,
        "Settings updated"
    );
    Ok(Json(StatusResponse::ok("Settings updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::auth::{Role, RoleDirectory, TokenData};
    use crate::settings::{
        current_mode, EnvironmentProbe, EnvironmentSignals, Mode, BUCKET_KEY, KEY_MATERIAL_KEY,
        MODULES_KEY,
    };
    use crate::storage::{OptionStore, OptionValue, Scope};

    const KEY_B64: &str = "c2VjcmV0LWtleQ==";

    fn state() -> AppState {
        AppState::for_tests().0.with_permissions(
            RoleDirectory::new()
                .with_user("1", Role::SuperAdmin)
                .with_user("2", Role::Administrator),
        )
    }

    fn token(user_id: &str, is_network: bool) -> TokenContext {
        TokenContext(Some(TokenData {
            user_id: user_id.into(),
            is_network,
        }))
    }

    fn body() -> Bytes {
        Bytes::from(
            serde_json::to_vec(&json!({"bucket_name": "media", "private_key_data": KEY_B64})).unwrap(),
        )
    }

    #[tokio::test]
    async fn get_settings_is_not_implemented() {
        let err = get_settings().await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(err.message, "Method not implemented");
    }

    #[tokio::test]
    async fn site_update_writes_site_scope() {
        let state = state();

        let Json(response) = update_settings(State(state.clone()), token("2", false), body())
            .await
            .unwrap();
        assert_eq!(response, StatusResponse::ok("Settings updated successfully"));

        let store = state.options.read().await;
        assert_eq!(current_mode(&**store, Scope::Site).unwrap(), Mode::Cdn);
        assert_eq!(
            store.get_text(Scope::Site, BUCKET_KEY).unwrap().as_deref(),
            Some("media")
        );
        assert_eq!(
            store.get(Scope::Site, KEY_MATERIAL_KEY).unwrap(),
            Some(OptionValue::Bytes(b"secret-key".to_vec()))
        );
        assert_eq!(store.get(Scope::Network, BUCKET_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn network_update_without_capability_writes_nothing() {
        let state = state();

        let err = update_settings(State(state.clone()), token("2", true), body())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, "forbidden");

        let store = state.options.read().await;
        for scope in [Scope::Network, Scope::Site] {
            assert_eq!(store.get(scope, BUCKET_KEY).unwrap(), None);
        }
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let err = update_settings(State(state()), TokenContext(None), body())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "unauthorized");
    }

    #[tokio::test]
    async fn managed_hosting_forces_stateless_on_network_scope() {
        let state = state().with_environment(EnvironmentSignals {
            managed_hosting: true,
            uploads_writable: true,
        });

        update_settings(State(state.clone()), token("1", true), body())
            .await
            .unwrap();

        let store = state.options.read().await;
        assert_eq!(current_mode(&**store, Scope::Network).unwrap(), Mode::Stateless);
        assert_eq!(
            store
                .get_flags(Scope::Network, MODULES_KEY)
                .unwrap()
                .get("google-app-engine")
                .map(String::as_str),
            Some("true")
        );
    }

    /// Environment check that blocks the calling thread on the runtime.
    struct BlockingEnvironment;

    impl EnvironmentProbe for BlockingEnvironment {
        fn probe(&self) -> EnvironmentSignals {
            tokio::runtime::Handle::current().block_on(async {
                EnvironmentSignals {
                    managed_hosting: false,
                    uploads_writable: false,
                }
            })
        }
    }

    #[tokio::test]
    async fn blocking_environment_check_runs_off_the_runtime() {
        let state = state().with_environment(BlockingEnvironment);

        update_settings(State(state.clone()), token("2", false), body())
            .await
            .unwrap();

        let store = state.options.read().await;
        assert_eq!(current_mode(&**store, Scope::Site).unwrap(), Mode::Stateless);
    }
}
