// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and the capabilities they grant.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Capabilities checked by the settings API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Change network-wide (multisite) options
    ManageNetworkOptions,
    /// Change options of a single site
    ManageOptions,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::ManageNetworkOptions => write!(f, "manage_network_options"),
            Capability::ManageOptions => write!(f, "manage_options"),
        }
    }
}

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `SuperAdmin` - Network administrator, every capability
/// - `Administrator` - Site administrator, can manage site options
/// - `Editor` - Content only, no option management
/// - `Subscriber` - Read-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Administrator,
    Editor,
    Subscriber,
}

impl Role {
    /// Check if this role grants `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::SuperAdmin, _) => true,
            (Role::Administrator, Capability::ManageOptions) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_has_all_capabilities() {
        assert!(Role::SuperAdmin.has_capability(Capability::ManageNetworkOptions));
        assert!(Role::SuperAdmin.has_capability(Capability::ManageOptions));
    }

    #[test]
    fn administrator_only_manages_site_options() {
        assert!(Role::Administrator.has_capability(Capability::ManageOptions));
        assert!(!Role::Administrator.has_capability(Capability::ManageNetworkOptions));
    }

    #[test]
    fn editor_and_subscriber_manage_nothing() {
        for role in [Role::Editor, Role::Subscriber] {
            assert!(!role.has_capability(Capability::ManageOptions));
            assert!(!role.has_capability(Capability::ManageNetworkOptions));
        }
    }

    #[test]
    fn capability_names_match_option_api() {
        assert_eq!(Capability::ManageNetworkOptions.to_string(), "manage_network_options");
        assert_eq!(Capability::ManageOptions.to_string(), "manage_options");
    }
}
