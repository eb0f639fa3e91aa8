// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory option store, used by tests and ephemeral deployments.

use std::collections::HashMap;

use super::{OptionStore, OptionValue, Scope, StorageResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryOptionStore {
    values: HashMap<(Scope, String), OptionValue>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value (builder style).
    pub fn with(mut self, scope: Scope, key: &str, value: OptionValue) -> Self {
        self.values.insert((scope, key.to_string()), value);
        self
    }

    /// Number of keys stored in `scope`.
    pub fn len(&self, scope: Scope) -> usize {
        self.values.keys().filter(|(s, _)| *s == scope).count()
    }
}

impl OptionStore for MemoryOptionStore {
    fn get(&self, scope: Scope, key: &str) -> StorageResult<Option<OptionValue>> {
        Ok(self.values.get(&(scope, key.to_string())).cloned())
    }

    fn set(&mut self, scope: Scope, key: &str, value: OptionValue) -> StorageResult<()> {
        self.values.insert((scope, key.to_string()), value);
        Ok(())
    }
}
