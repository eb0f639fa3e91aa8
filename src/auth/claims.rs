// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the per-request token data derived from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The `user_id` claim, which issuers emit either as a number or a string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserIdClaim {
    Number(u64),
    Text(String),
}

impl UserIdClaim {
    fn into_string(self) -> String {
        match self {
            UserIdClaim::Number(n) => n.to_string(),
            UserIdClaim::Text(s) => s,
        }
    }
}

/// Claims carried by a settings bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Site user the token was issued for
    #[serde(default)]
    pub user_id: Option<UserIdClaim>,

    /// Whether the token grants network-wide (multisite) scope
    #[serde(default)]
    pub is_network: bool,

    /// Expiration timestamp (optional)
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Verified token data for a single request.
///
/// Produced by the [`TokenContext`](super::TokenContext) extractor and passed
/// to the handler as a value; it never outlives the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenData {
    /// Site user id; empty if the token did not carry one
    pub user_id: String,
    /// Network-wide scope when true, single-site scope otherwise
    pub is_network: bool,
}

impl TokenData {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id.map(UserIdClaim::into_string).unwrap_or_default(),
            is_network: claims.is_network,
        }
    }

    /// A token without a user id cannot authorize anything.
    pub fn has_user(&self) -> bool {
        !self.user_id.trim().is_empty()
    }
}
