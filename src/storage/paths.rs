// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the option store layout.

use std::path::{Path, PathBuf};

use super::Scope;
use crate::config::DEFAULT_DATA_DIR;

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing one option document per scope.
    pub fn options_dir(&self) -> PathBuf {
        self.root.join("options")
    }

    /// Option document of a scope.
    pub fn options_file(&self, scope: Scope) -> PathBuf {
        self.options_dir().join(format!("{}.json", scope.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("./data"));
    }

    #[test]
    fn option_files_are_per_scope() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.options_dir(), PathBuf::from("/tmp/test-data/options"));
        assert_eq!(
            paths.options_file(Scope::Network),
            PathBuf::from("/tmp/test-data/options/network.json")
        );
        assert_eq!(
            paths.options_file(Scope::Site),
            PathBuf::from("/tmp/test-data/options/site.json")
        );
    }
}
