// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Essential Addons for Elementor.
//!
//! The addon writes per-page CSS/JS bundles into the uploads directory and
//! asks for their URLs through filters. Every URL request, and every
//! generation event, queues the bundle for upload; outside `disabled` and
//! `backup` modes the URL is pointed at the remote host. Removed bundles are
//! queued for deletion.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CompatibilityModule, FileNameNormalizer};
use crate::settings::Mode;
use crate::sync::{FileSync, SyncPipeline};

pub const ESSENTIAL_ADDONS: CompatibilityModule = CompatibilityModule {
    id: "eael",
    title: "Essential Addons for Elementor",
    description: "Enables support for Essential Addons for Elementor.",
    constant: "WP_STATELESS_COMPATIBILITY_EAEL",
    plugin_files: &["essential-addons-for-elementor-lite/essential_adons_elementor.php"],
    unsupported_modes: &[Mode::Stateless],
};

/// Addon hook the filter was invoked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetHook {
    /// `eael_css_asset_url` filter
    CssAssetUrl,
    /// `eael_js_asset_url` filter
    JsAssetUrl,
    /// `eael_generate_assets` action, fired right after a bundle is written
    GenerateAssets,
}

impl AssetHook {
    /// Freshly generated bundles must be uploaded even if a copy exists.
    pub fn is_forced(&self) -> bool {
        matches!(self, AssetHook::GenerateAssets)
    }
}

/// Plugin state the filter decides against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTarget {
    pub mode: Mode,
    /// Remote host prefix, without trailing slash. `None` until a bucket
    /// is configured.
    pub remote_host: Option<String>,
}

/// URL rewrite and removal notifications for addon assets.
#[derive(Clone)]
pub struct AssetUrlFilter {
    namer: Arc<dyn FileNameNormalizer>,
    pipeline: Arc<dyn SyncPipeline>,
    uploads_root: PathBuf,
}

impl AssetUrlFilter {
    pub fn new(
        namer: Arc<dyn FileNameNormalizer>,
        pipeline: Arc<dyn SyncPipeline>,
        uploads_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            namer,
            pipeline,
            uploads_root: uploads_root.into(),
        }
    }

    /// Queue the asset behind `url` for upload and return the URL to serve.
    ///
    /// URLs that do not name a file inside the uploads root are returned
    /// unchanged and nothing is queued.
    pub fn rewrite(&self, url: &str, asset_id: &str, forced: bool, target: &MediaTarget) -> String {
        let Some(name) = self.namer.normalize(url) else {
            tracing::warn!(asset_id, url, "Asset URL outside the uploads root, left unchanged");
            return url.to_string();
        };

        let file = FileSync {
            name: name.clone(),
            absolute_path: self.uploads_root.join(&name),
            forced,
        };
        if let Err(e) = self.pipeline.sync_file(file) {
            tracing::warn!(asset_id, name = %name, error = %e, "Asset sync notification dropped");
        }

        match &target.remote_host {
            Some(host) if target.mode.serves_remote() => format!("{host}/{name}"),
            _ => url.to_string(),
        }
    }

    /// Queue every removed asset for deletion, in input order.
    pub fn on_assets_removed(&self, asset_id: &str, paths: &[String]) {
        for path in paths {
            let Some(name) = self.namer.normalize(path) else {
                tracing::warn!(asset_id, path = %path, "Removed asset outside the uploads root, skipped");
                continue;
            };
            if let Err(e) = self.pipeline.delete_file(&name) {
                tracing::warn!(asset_id, name = %name, error = %e, "Asset delete notification dropped");
            }
        }
    }
}
