// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operating mode of the media offload.
///
/// - `Disabled` - media is served locally, nothing is offloaded
/// - `Backup` - files are copied to the bucket, URLs stay local
/// - `Cdn` - files are copied to the bucket and served from it
/// - `Stateless` - the bucket is the only storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Disabled,
    Cdn,
    Stateless,
    Backup,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Disabled => "disabled",
            Mode::Cdn => "cdn",
            Mode::Stateless => "stateless",
            Mode::Backup => "backup",
        }
    }

    /// Parse a stored mode. Unknown values read as `Disabled`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "cdn" => Mode::Cdn,
            "stateless" => Mode::Stateless,
            "backup" => Mode::Backup,
            _ => Mode::Disabled,
        }
    }

    /// Whether asset URLs point at the remote host in this mode.
    pub fn serves_remote(&self) -> bool {
        !matches!(self, Mode::Disabled | Mode::Backup)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
