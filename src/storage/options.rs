// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Option scopes, values and the store trait.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{StorageError, StorageResult};

/// Administrative tier an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Shared by every site of a multisite network
    Network,
    /// A single site
    Site,
}

impl Scope {
    /// Scope selected by a token's `is_network` claim.
    pub fn from_network_flag(is_network: bool) -> Self {
        if is_network {
            Scope::Network
        } else {
            Scope::Site
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Network => "network",
            Scope::Site => "site",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    Text(String),
    /// Raw bytes, persisted base64 encoded
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    /// Named `"true"`/`"false"` string flags
    Flags(BTreeMap<String, String>),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Text(_) => "text",
            OptionValue::Bytes(_) => "bytes",
            OptionValue::Flags(_) => "flags",
        }
    }
}

/// Scoped key-value option store.
///
/// Writes are last-writer-wins; there is no multi-key transaction.
pub trait OptionStore: Send + Sync {
    fn get(&self, scope: Scope, key: &str) -> StorageResult<Option<OptionValue>>;

    fn set(&mut self, scope: Scope, key: &str, value: OptionValue) -> StorageResult<()>;

    /// Text option, `None` when unset.
    fn get_text(&self, scope: Scope, key: &str) -> StorageResult<Option<String>> {
        match self.get(scope, key)? {
            None => Ok(None),
            Some(OptionValue::Text(text)) => Ok(Some(text)),
            Some(_) => Err(StorageError::TypeMismatch {
                key: key.to_string(),
                expected: "text",
            }),
        }
    }

    /// Flag map option, empty when unset.
    fn get_flags(&self, scope: Scope, key: &str) -> StorageResult<BTreeMap<String, String>> {
        match self.get(scope, key)? {
            None => Ok(BTreeMap::new()),
            Some(OptionValue::Flags(flags)) => Ok(flags),
            Some(other) => {
                tracing::debug!(key, found = other.type_name(), "Option is not a flag map");
                Err(StorageError::TypeMismatch {
                    key: key.to_string(),
                    expected: "flags",
                })
            }
        }
    }
}

mod base64_bytes {
    use base64ct::{Base64, Encoding};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64::encode_string(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Base64::decode_vec(&encoded).map_err(serde::de::Error::custom)
    }
}
