// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Option Storage Module
//!
//! Key-value option storage with two scopes: network-wide and per-site.
//! Handlers never touch files directly; they go through [`OptionStore`].
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   options/
//!     network.json   # network scope options
//!     site.json      # site scope options
//! ```
//!
//! Each document maps option keys to tagged [`OptionValue`]s:
//!
//! ```json
//! {
//!   "mode":         { "type": "text",  "value": "cdn" },
//!   "key_material": { "type": "bytes", "value": "eyJ0eXBlIjoi..." },
//!   "modules":      { "type": "flags", "value": { "google-app-engine": "true" } }
//! }
//! ```

pub mod file_store;
pub mod memory;
pub mod options;
pub mod paths;

pub use file_store::FileOptionStore;
pub use memory::MemoryOptionStore;
pub use options::{OptionStore, OptionValue, Scope};
pub use paths::StoragePaths;

use thiserror::Error;

/// Error type for option storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Stored value has a different type than the caller expects
    #[error("Option {key} has unexpected type (expected {expected})")]
    TypeMismatch { key: String, expected: &'static str },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
