// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Offload Settings
//!
//! The settings gateway validates and authorizes a settings update, then
//! reconciles the `mode`, `bucket`, `key_material` and `modules` options of
//! one scope against the environment.
//!
//! The reconciliation runs once over a [`ScopedOptions`] accessor; network
//! and site updates differ only in the scope the accessor is bound to and
//! the capability it requires.

pub mod environment;
pub mod gateway;
pub mod mode;
pub mod reconcile;

pub use environment::{EnvironmentProbe, EnvironmentSignals, HostEnvironment};
pub use gateway::{authorize_update, AuthorizedUpdate, SettingsPayload};
pub use mode::Mode;
pub use reconcile::{reconcile, Credentials, ReconcileOutcome};

use std::collections::BTreeMap;

use crate::auth::Capability;
use crate::config::GOOGLE_STORAGE_HOST;
use crate::storage::{OptionStore, OptionValue, Scope, StorageResult};

pub const MODE_KEY: &str = "mode";
pub const BUCKET_KEY: &str = "bucket";
pub const KEY_MATERIAL_KEY: &str = "key_material";
pub const MODULES_KEY: &str = "modules";

/// Module flag enabled on managed hosting.
pub const GOOGLE_APP_ENGINE_MODULE: &str = "google-app-engine";

pub const FLAG_TRUE: &str = "true";

/// Capability needed to change options of `scope`.
pub fn required_capability(scope: Scope) -> Capability {
    match scope {
        Scope::Network => Capability::ManageNetworkOptions,
        Scope::Site => Capability::ManageOptions,
    }
}

/// Current mode of `scope`, `Disabled` when unset.
pub fn current_mode<S: OptionStore + ?Sized>(store: &S, scope: Scope) -> StorageResult<Mode> {
    Ok(store
        .get_text(scope, MODE_KEY)?
        .map(|m| Mode::parse(&m))
        .unwrap_or_default())
}

/// Remote host prefix for rewritten URLs, without trailing slash.
///
/// A custom domain wins; otherwise the bucket's public storage URL. `None`
/// when neither is configured.
pub fn remote_host<S: OptionStore + ?Sized>(
    store: &S,
    scope: Scope,
    custom_domain: Option<&str>,
) -> StorageResult<Option<String>> {
    if let Some(domain) = custom_domain.map(|d| d.trim_end_matches('/')).filter(|d| !d.is_empty()) {
        return Ok(Some(domain.to_string()));
    }
    let bucket = store.get_text(scope, BUCKET_KEY)?;
    Ok(bucket
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| format!("{GOOGLE_STORAGE_HOST}/{b}")))
}

/// Option accessor bound to one scope.
pub struct ScopedOptions<'a, S: ?Sized> {
    store: &'a mut S,
    scope: Scope,
}

impl<'a, S: OptionStore + ?Sized> ScopedOptions<'a, S> {
    pub fn new(store: &'a mut S, scope: Scope) -> Self {
        Self { store, scope }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn required_capability(&self) -> Capability {
        required_capability(self.scope)
    }

    /// Stored mode, `None` when the option was never written.
    pub fn mode(&self) -> StorageResult<Option<Mode>> {
        Ok(self
            .store
            .get_text(self.scope, MODE_KEY)?
            .map(|m| Mode::parse(&m)))
    }

    pub fn set_mode(&mut self, mode: Mode) -> StorageResult<()> {
        self.store
            .set(self.scope, MODE_KEY, OptionValue::Text(mode.as_str().to_string()))
    }

    pub fn modules(&self) -> StorageResult<BTreeMap<String, String>> {
        self.store.get_flags(self.scope, MODULES_KEY)
    }

    pub fn set_modules(&mut self, modules: BTreeMap<String, String>) -> StorageResult<()> {
        self.store.set(self.scope, MODULES_KEY, OptionValue::Flags(modules))
    }

    pub fn bucket(&self) -> StorageResult<Option<String>> {
        self.store.get_text(self.scope, BUCKET_KEY)
    }

    pub fn set_bucket(&mut self, bucket: &str) -> StorageResult<()> {
        self.store
            .set(self.scope, BUCKET_KEY, OptionValue::Text(bucket.to_string()))
    }

    pub fn set_key_material(&mut self, key_material: Vec<u8>) -> StorageResult<()> {
        self.store
            .set(self.scope, KEY_MATERIAL_KEY, OptionValue::Bytes(key_material))
    }
}
