// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Media Sync Trigger
//!
//! The API never synchronizes files itself. It enumerates the available
//! sync classes, and hands run requests and per-file notifications to a
//! pipeline through a channel. A background worker drains the channel; the
//! uploading itself belongs to whatever consumes those events.

pub mod classes;
pub mod dispatcher;
pub mod worker;

pub use classes::{BuiltinSyncClasses, SyncClassEnumerator, SyncClassInfo, SyncClassKind};
pub use dispatcher::{FileSync, SyncDispatcher, SyncEngine, SyncEvent, SyncParams, SyncPipeline};
pub use worker::run_sync_worker;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The receiving side of the pipeline is gone (worker stopped)
    #[error("Sync pipeline is not running")]
    PipelineClosed,
}
