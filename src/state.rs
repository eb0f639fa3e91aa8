// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{JwtVerifier, PermissionChecker, RoleDirectory, TokenVerifier};
use crate::compat::{AssetUrlFilter, UploadsNamer};
use crate::config::ServerConfig;
use crate::settings::{EnvironmentProbe, HostEnvironment};
use crate::storage::OptionStore;
use crate::sync::{BuiltinSyncClasses, SyncClassEnumerator, SyncDispatcher};

/// Shared application state. Every collaborator sits behind a trait object
/// so tests can swap it out.
#[derive(Clone)]
pub struct AppState {
    pub options: Arc<RwLock<Box<dyn OptionStore>>>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub environment: Arc<dyn EnvironmentProbe>,
    pub sync: SyncDispatcher,
    pub sync_classes: Arc<dyn SyncClassEnumerator>,
    pub asset_filter: Arc<AssetUrlFilter>,
    /// Public host that replaces the bucket URL, if configured
    pub custom_domain: Option<String>,
}

impl AppState {
    pub fn new(
        options: impl OptionStore + 'static,
        sync: SyncDispatcher,
        config: &ServerConfig,
    ) -> Self {
        let namer = UploadsNamer::new(&config.uploads_url, &config.uploads_dir, &config.root_dir);
        let asset_filter = AssetUrlFilter::new(
            Arc::new(namer),
            Arc::new(sync.clone()),
            config.uploads_dir.clone(),
        );

        let options: Box<dyn OptionStore> = Box::new(options);

        Self {
            options: Arc::new(RwLock::new(options)),
            verifier: Arc::new(JwtVerifier::from_secret(config.jwt_secret.as_deref())),
            permissions: Arc::new(RoleDirectory::new()),
            environment: Arc::new(HostEnvironment::new(&config.uploads_dir)),
            sync,
            sync_classes: Arc::new(BuiltinSyncClasses::new()),
            asset_filter: Arc::new(asset_filter),
            custom_domain: config.custom_domain.clone(),
        }
    }

    pub fn with_verifier(mut self, verifier: impl TokenVerifier + 'static) -> Self {
        self.verifier = Arc::new(verifier);
        self
    }

    pub fn with_permissions(mut self, permissions: impl PermissionChecker + 'static) -> Self {
        self.permissions = Arc::new(permissions);
        self
    }

    pub fn with_environment(mut self, environment: impl EnvironmentProbe + 'static) -> Self {
        self.environment = Arc::new(environment);
        self
    }

    /// In-memory state on a writable local host, plus the receiving end of
    /// its sync channel.
    #[cfg(test)]
    pub fn for_tests() -> (Self, tokio::sync::mpsc::UnboundedReceiver<crate::sync::SyncEvent>) {
        use crate::settings::EnvironmentSignals;
        use crate::storage::MemoryOptionStore;

        let (dispatcher, rx) = SyncDispatcher::channel();
        let config = ServerConfig {
            uploads_url: "https://site.test/uploads".to_string(),
            uploads_dir: "/srv/uploads".into(),
            ..ServerConfig::default()
        };
        let state = Self::new(MemoryOptionStore::new(), dispatcher, &config).with_environment(
            EnvironmentSignals {
                managed_hosting: false,
                uploads_writable: true,
            },
        );
        (state, rx)
    }
}
