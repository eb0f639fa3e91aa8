// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Third-Party Compatibility
//!
//! Compatibility modules adapt plugins that write their own files into the
//! uploads directory. Each module declares which modes it can run in; the
//! asset filters themselves live in per-plugin submodules.

pub mod essential_addons;
pub mod naming;

pub use essential_addons::{AssetHook, AssetUrlFilter, MediaTarget, ESSENTIAL_ADDONS};
pub use naming::{FileNameNormalizer, UploadsNamer};

use serde::Serialize;
use utoipa::ToSchema;

use crate::settings::Mode;

/// Static description of a compatibility module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CompatibilityModule {
    /// Module id, also its key in the `modules` option.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Constant that force-enables or disables the module.
    pub constant: &'static str,
    /// Plugin entry files the module adapts.
    #[schema(value_type = Vec<String>)]
    pub plugin_files: &'static [&'static str],
    /// Modes in which the module must stay inactive.
    #[schema(value_type = Vec<Mode>)]
    pub unsupported_modes: &'static [Mode],
}

impl CompatibilityModule {
    pub fn is_supported(&self, mode: Mode) -> bool {
        !self.unsupported_modes.contains(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essential_addons_is_unsupported_in_stateless_mode() {
        assert!(!ESSENTIAL_ADDONS.is_supported(Mode::Stateless));
        assert!(ESSENTIAL_ADDONS.is_supported(Mode::Cdn));
        assert!(ESSENTIAL_ADDONS.is_supported(Mode::Backup));
        assert!(ESSENTIAL_ADDONS.is_supported(Mode::Disabled));
    }

    #[test]
    fn module_metadata_is_stable() {
        assert_eq!(ESSENTIAL_ADDONS.id, "eael");
        assert_eq!(ESSENTIAL_ADDONS.constant, "WP_STATELESS_COMPATIBILITY_EAEL");
        assert_eq!(
            ESSENTIAL_ADDONS.plugin_files,
            ["essential-addons-for-elementor-lite/essential_adons_elementor.php"]
        );
    }
}
