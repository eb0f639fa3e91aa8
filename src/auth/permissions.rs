// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability checks for authenticated users.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::roles::{Capability, Role};
use crate::storage::StorageResult;

/// Answers whether a user holds a capability.
pub trait PermissionChecker: Send + Sync {
    fn user_can(&self, user_id: &str, capability: Capability) -> bool;
}

/// In-memory user → role directory.
///
/// Users that are not listed hold no capability.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    roles: HashMap<String, Role>,
}

impl RoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a directory from a JSON object of `user_id → role`.
    ///
    /// ```json
    /// { "1": "super_admin", "12": "administrator" }
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let roles: HashMap<String, Role> = serde_json::from_reader(reader)?;
        Ok(Self { roles })
    }

    pub fn with_user(mut self, user_id: impl Into<String>, role: Role) -> Self {
        self.roles.insert(user_id.into(), role);
        self
    }

    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.roles.get(user_id).copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl PermissionChecker for RoleDirectory {
    fn user_can(&self, user_id: &str, capability: Capability) -> bool {
        self.role_of(user_id)
            .map(|role| role.has_capability(capability))
            .unwrap_or(false)
    }
}
