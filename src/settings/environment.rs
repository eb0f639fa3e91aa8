// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Environment signals that drive the default mode.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MANAGED_HOSTING_ENV;

/// Environment facts sampled once per settings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentSignals {
    /// Running on managed hosting with an ephemeral filesystem
    pub managed_hosting: bool,
    /// The local uploads directory accepts writes
    pub uploads_writable: bool,
}

impl EnvironmentSignals {
    /// Local storage cannot hold media, so the bucket must be the only store.
    pub fn forces_stateless(&self) -> bool {
        self.managed_hosting || !self.uploads_writable
    }
}

/// Source of [`EnvironmentSignals`].
pub trait EnvironmentProbe: Send + Sync {
    fn probe(&self) -> EnvironmentSignals;
}

/// Fixed signals, for tests and for hosts that know their environment.
impl EnvironmentProbe for EnvironmentSignals {
    fn probe(&self) -> EnvironmentSignals {
        *self
    }
}

/// Probe of the real host: reads the managed hosting variable and tries to
/// write into the uploads directory.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    uploads_dir: PathBuf,
}

impl HostEnvironment {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }
}

impl EnvironmentProbe for HostEnvironment {
    fn probe(&self) -> EnvironmentSignals {
        EnvironmentSignals {
            managed_hosting: std::env::var_os(MANAGED_HOSTING_ENV).is_some(),
            uploads_writable: is_writable(&self.uploads_dir),
        }
    }
}

/// Write-then-delete probe. Permission bits alone are not reliable (root,
/// read-only mounts), so an actual write is attempted.
pub fn is_writable(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }

    let probe = dir.join(format!(".sm-write-probe-{}", std::process::id()));
    match fs::write(&probe, b"probe") {
        Ok(()) => {
            if let Err(e) = fs::remove_file(&probe) {
                tracing::warn!(path = %probe.display(), error = %e, "Failed to remove write probe");
            }
            true
        }
        Err(_) => false,
    }
}
