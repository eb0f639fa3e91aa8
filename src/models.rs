// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::compat::AssetHook;
use crate::sync::SyncClassInfo;

/// `{ok, message}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub ok: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SyncClassesResponse {
    pub ok: bool,
    pub data: Vec<SyncClassInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SyncStateResponse {
    pub ok: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SyncRunResponse {
    pub ok: bool,
    /// Parameters as received, before defaults were applied
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetUrlRequest {
    pub url: String,
    pub asset_id: String,
    /// Hook the request comes from. The generation hook forces the upload.
    #[serde(default)]
    pub hook: Option<AssetHook>,
    #[serde(default)]
    pub forced: bool,
}

impl AssetUrlRequest {
    pub fn is_forced(&self) -> bool {
        self.forced || self.hook.is_some_and(|hook| hook.is_forced())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetUrlResponse {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetsRemovedRequest {
    pub asset_id: String,
    pub paths: Vec<String>,
}
