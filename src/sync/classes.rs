// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Available sync classes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncClassKind {
    /// Attachments of the media library
    Library,
    /// Files outside the media library (plugin generated assets, etc.)
    NonLibrary,
}

/// A class of files that can be synchronized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SyncClassInfo {
    /// Identifier accepted as `type` by the sync run endpoint.
    pub id: String,
    /// Display name.
    pub name: String,
    pub kind: SyncClassKind,
}

impl SyncClassInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SyncClassKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Lists the sync classes the server can run.
pub trait SyncClassEnumerator: Send + Sync {
    fn available(&self) -> Vec<SyncClassInfo>;
}

/// Image and other-media classes, plus any registered non-library classes.
#[derive(Debug, Clone, Default)]
pub struct BuiltinSyncClasses {
    extra: Vec<SyncClassInfo>,
}

impl BuiltinSyncClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional class (builder style). Duplicate ids are
    /// ignored.
    pub fn with_class(mut self, class: SyncClassInfo) -> Self {
        let taken = Self::library().iter().chain(&self.extra).any(|c| c.id == class.id);
        if !taken {
            self.extra.push(class);
        }
        self
    }

    fn library() -> [SyncClassInfo; 2] {
        [
            SyncClassInfo::new("images", "Images", SyncClassKind::Library),
            SyncClassInfo::new("other", "Other media", SyncClassKind::Library),
        ]
    }
}

impl SyncClassEnumerator for BuiltinSyncClasses {
    fn available(&self) -> Vec<SyncClassInfo> {
        let mut classes = Self::library().to_vec();
        classes.extend(self.extra.iter().cloned());
        classes
    }
}
