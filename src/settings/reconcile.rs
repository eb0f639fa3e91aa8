// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reconciliation of offload options against the environment.

use super::{EnvironmentSignals, Mode, ScopedOptions, FLAG_TRUE, GOOGLE_APP_ENGINE_MODULE};
use crate::storage::{OptionStore, Scope, StorageResult};

/// Bucket credentials from a validated settings payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub bucket: String,
    /// Decoded private key material
    pub key_material: Vec<u8>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bucket", &self.bucket)
            .field("key_material", &format_args!("<{} bytes>", self.key_material.len()))
            .finish()
    }
}

/// What a reconciliation wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub scope: Scope,
    /// Mode in effect after the update
    pub mode: Mode,
    pub mode_written: bool,
    pub modules_written: bool,
}

/// Apply a settings update to one scope.
///
/// 1. Managed hosting or an unwritable uploads dir forces `stateless`; on
///    managed hosting the `google-app-engine` module flag is merged into the
///    existing module map.
/// 2. Otherwise an unset or `disabled` mode becomes `cdn`; any other mode is
///    kept.
/// 3. `bucket` and `key_material` are always overwritten.
pub fn reconcile<S: OptionStore + ?Sized>(
    options: &mut ScopedOptions<'_, S>,
    env: EnvironmentSignals,
    credentials: Credentials,
) -> StorageResult<ReconcileOutcome> {
    let mut mode_written = false;
    let mut modules_written = false;

    let mode = if env.forces_stateless() {
        options.set_mode(Mode::Stateless)?;
        mode_written = true;

        if env.managed_hosting {
            let mut modules = options.modules()?;
            if modules.get(GOOGLE_APP_ENGINE_MODULE).map(String::as_str) != Some(FLAG_TRUE) {
                modules.insert(GOOGLE_APP_ENGINE_MODULE.to_string(), FLAG_TRUE.to_string());
                options.set_modules(modules)?;
                modules_written = true;
            }
        }
        Mode::Stateless
    } else {
        match options.mode()? {
            None | Some(Mode::Disabled) => {
                options.set_mode(Mode::Cdn)?;
                mode_written = true;
                Mode::Cdn
            }
            Some(existing) => existing,
        }
    };

    options.set_bucket(&credentials.bucket)?;
    options.set_key_material(credentials.key_material)?;

    tracing::info!(
        scope = %options.scope(),
        mode = %mode,
        mode_written,
        modules_written,
        managed_hosting = env.managed_hosting,
        uploads_writable = env.uploads_writable,
        "Offload settings reconciled"
    );

    Ok(ReconcileOutcome {
        scope: options.scope(),
        mode,
        mode_written,
        modules_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::settings::{BUCKET_KEY, KEY_MATERIAL_KEY, MODE_KEY, MODULES_KEY};
    use crate::storage::{MemoryOptionStore, OptionValue};

    const LOCAL: EnvironmentSignals = EnvironmentSignals {
        managed_hosting: false,
        uploads_writable: true,
    };
    const MANAGED: EnvironmentSignals = EnvironmentSignals {
        managed_hosting: true,
        uploads_writable: true,
    };
    const READ_ONLY: EnvironmentSignals = EnvironmentSignals {
        managed_hosting: false,
        uploads_writable: false,
    };

    fn credentials() -> Credentials {
        Credentials {
            bucket: "media-bucket".into(),
            key_material: br#"{"type":"service_account"}"#.to_vec(),
        }
    }

    fn run(store: &mut MemoryOptionStore, scope: Scope, env: EnvironmentSignals) -> ReconcileOutcome {
        let mut options = ScopedOptions::new(store, scope);
        reconcile(&mut options, env, credentials()).expect("reconcile succeeds")
    }

    fn text(value: &str) -> OptionValue {
        OptionValue::Text(value.into())
    }

    fn flags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn managed_hosting_forces_stateless_and_merges_module_flag() {
        let mut store = MemoryOptionStore::new()
            .with(Scope::Site, MODE_KEY, text("disabled"))
            .with(
                Scope::Site,
                MODULES_KEY,
                OptionValue::Flags(flags(&[("eael", "true"), ("google-app-engine", "false")])),
            );

        let outcome = run(&mut store, Scope::Site, MANAGED);

        assert_eq!(outcome.mode, Mode::Stateless);
        assert!(outcome.mode_written);
        assert!(outcome.modules_written);
        assert_eq!(store.get(Scope::Site, MODE_KEY).unwrap(), Some(text("stateless")));
        assert_eq!(
            store.get_flags(Scope::Site, MODULES_KEY).unwrap(),
            flags(&[("eael", "true"), ("google-app-engine", "true")])
        );
    }

    #[test]
    fn managed_hosting_leaves_enabled_flag_alone() {
        let mut store = MemoryOptionStore::new().with(
            Scope::Network,
            MODULES_KEY,
            OptionValue::Flags(flags(&[("google-app-engine", "true")])),
        );

        let outcome = run(&mut store, Scope::Network, MANAGED);
        assert!(!outcome.modules_written);
        assert_eq!(outcome.mode, Mode::Stateless);
    }

    #[test]
    fn readonly_uploads_force_stateless_without_module_flag() {
        let mut store = MemoryOptionStore::new().with(Scope::Site, MODE_KEY, text("cdn"));

        let outcome = run(&mut store, Scope::Site, READ_ONLY);

        assert_eq!(outcome.mode, Mode::Stateless);
        assert!(!outcome.modules_written);
        assert_eq!(store.get(Scope::Site, MODULES_KEY).unwrap(), None);
    }

    #[test]
    fn disabled_mode_becomes_cdn_locally() {
        let mut store = MemoryOptionStore::new().with(Scope::Site, MODE_KEY, text("disabled"));
        let outcome = run(&mut store, Scope::Site, LOCAL);

        assert_eq!(outcome.mode, Mode::Cdn);
        assert_eq!(store.get(Scope::Site, MODE_KEY).unwrap(), Some(text("cdn")));
    }

    #[test]
    fn unset_mode_becomes_cdn_locally() {
        let mut store = MemoryOptionStore::new();
        let outcome = run(&mut store, Scope::Network, LOCAL);

        assert_eq!(outcome.mode, Mode::Cdn);
        assert!(outcome.mode_written);
    }

    #[test]
    fn explicit_mode_is_preserved_locally() {
        for existing in ["stateless", "backup", "cdn"] {
            let mut store = MemoryOptionStore::new().with(Scope::Site, MODE_KEY, text(existing));
            let outcome = run(&mut store, Scope::Site, LOCAL);

            assert_eq!(outcome.mode, Mode::parse(existing));
            assert!(!outcome.mode_written);
            assert_eq!(store.get(Scope::Site, MODE_KEY).unwrap(), Some(text(existing)));
        }
    }

    #[test]
    fn credentials_are_always_overwritten() {
        for env in [LOCAL, MANAGED, READ_ONLY] {
            let mut store = MemoryOptionStore::new()
                .with(Scope::Site, BUCKET_KEY, text("old-bucket"))
                .with(Scope::Site, KEY_MATERIAL_KEY, OptionValue::Bytes(b"old".to_vec()));

            run(&mut store, Scope::Site, env);

            assert_eq!(store.get(Scope::Site, BUCKET_KEY).unwrap(), Some(text("media-bucket")));
            assert_eq!(
                store.get(Scope::Site, KEY_MATERIAL_KEY).unwrap(),
                Some(OptionValue::Bytes(br#"{"type":"service_account"}"#.to_vec()))
            );
        }
    }

    #[test]
    fn other_scope_is_untouched() {
        let mut store = MemoryOptionStore::new();
        run(&mut store, Scope::Network, MANAGED);
        assert_eq!(store.len(Scope::Site), 0);
    }

    #[test]
    fn debug_hides_key_material() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("media-bucket"));
        assert!(!rendered.contains("service_account"));
    }
}
