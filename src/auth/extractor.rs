// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the per-request token context.
//!
//! ```rust,ignore
//! async fn my_handler(TokenContext(token): TokenContext) -> impl IntoResponse {
//!     // token is Option<TokenData>
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, TokenData};
use crate::state::AppState;

/// Token data of the current request, if the caller sent one.
///
/// - No `Authorization` header: `TokenContext(None)`, the request continues
///   unauthenticated
/// - Header present but invalid: rejected with [`AuthError::AuthFailed`]
/// - Header valid: `TokenContext(Some(data))`
///
/// The value lives in the request, so concurrent requests never observe each
/// other's tokens.
#[derive(Debug, Clone)]
pub struct TokenContext(pub Option<TokenData>);

impl TokenContext {
    /// Token data that carries a user, or `Unauthorized`.
    pub fn require_user(&self) -> Result<&TokenData, AuthError> {
        match &self.0 {
            Some(data) if data.has_user() => Ok(data),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

impl FromRequestParts<AppState> for TokenContext {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(TokenContext(None));
        };

        let header = header
            .to_str()
            .map_err(|_| AuthError::AuthFailed("Authorization header is not valid text".to_string()))?;

        // The bearer prefix is optional; some clients send the raw token.
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        match state.verifier.verify(token) {
            Ok(data) => Ok(TokenContext(Some(data))),
            Err(err) => {
                tracing::warn!(error = %err, "Bearer token rejected");
                Err(err)
            }
        }
    }
}
