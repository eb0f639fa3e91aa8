// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validation and authorization of settings updates.
//!
//! Everything here runs before the option store is touched, so a rejected
//! request never writes a single key.

use base64ct::{Base64, Base64Unpadded, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{required_capability, Credentials};
use crate::auth::{AuthError, PermissionChecker, TokenContext};
use crate::error::ApiError;
use crate::storage::Scope;

const EMPTY_QUERY: &str = "Query is empty";
const MISSING_FIELDS: &str = "bucket_name and private_key_data are required";

/// Settings update request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsPayload {
    /// Target bucket name.
    pub bucket_name: String,
    /// Base64 encoded service account key.
    pub private_key_data: String,
}

impl SettingsPayload {
    /// Parse a request body.
    ///
    /// Empty bodies, non-object JSON and empty objects are all "empty";
    /// missing or blank fields are reported separately.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::bad_request(EMPTY_QUERY));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("Request body is not valid JSON: {e}")))?;

        let params = match value {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(ApiError::bad_request(EMPTY_QUERY)),
        };

        match (text_field(&params, "bucket_name"), text_field(&params, "private_key_data")) {
            (Some(bucket_name), Some(private_key_data)) => Ok(Self {
                bucket_name,
                private_key_data,
            }),
            _ => Err(ApiError::bad_request(MISSING_FIELDS)),
        }
    }

    /// Decode `private_key_data`. Embedded whitespace (line wrapping) is
    /// ignored and padding is optional.
    pub fn decode_key_material(&self) -> Result<Vec<u8>, ApiError> {
        let compact: String = self
            .private_key_data
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        Base64::decode_vec(&compact)
            .or_else(|_| Base64Unpadded::decode_vec(&compact))
            .map_err(|_| ApiError::bad_request("private_key_data is not valid base64"))
    }
}

fn text_field(params: &Map<String, Value>, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A settings update that passed every check and may now be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUpdate {
    pub user_id: String,
    pub scope: Scope,
    pub credentials: Credentials,
}

/// Run every pre-write check of a settings update, in order:
///
/// 1. token data with a user id (`Unauthorized`)
/// 2. payload shape and key encoding (`BadRequest`)
/// 3. capability for the token's scope (`Forbidden`)
pub fn authorize_update(
    token: &TokenContext,
    body: &[u8],
    permissions: &dyn PermissionChecker,
) -> Result<AuthorizedUpdate, ApiError> {
    let token = token.require_user()?;

    let payload = SettingsPayload::from_body(body)?;
    let key_material = payload.decode_key_material()?;

    let scope = Scope::from_network_flag(token.is_network);
    let capability = required_capability(scope);
    if !permissions.user_can(&token.user_id, capability) {
        tracing::warn!(
            user_id = %token.user_id,
            scope = %scope,
            capability = %capability,
            "Settings update denied"
        );
        return Err(AuthError::Forbidden.into());
    }

    Ok(AuthorizedUpdate {
        user_id: token.user_id.clone(),
        scope,
        credentials: Credentials {
            bucket: payload.bucket_name,
            key_material,
        },
    })
}
