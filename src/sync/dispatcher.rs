// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Channel-backed sync engine and file pipeline.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::SyncError;

/// Parameters of a sync run, as received from the caller.
pub type SyncParams = Map<String, Value>;

/// Keys every sync run carries, `null` unless the caller set them.
const DEFAULT_PARAM_KEYS: [&str; 2] = ["type", "limit"];

/// Request to upload (or refresh) one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSync {
    /// Object name in the bucket
    pub name: String,
    /// Local file to read
    pub absolute_path: PathBuf,
    /// Upload even if the remote copy looks current
    pub forced: bool,
}

/// Event handed to the sync pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    Run {
        job_id: Uuid,
        params: SyncParams,
        queued_at: DateTime<Utc>,
    },
    SyncFile(FileSync),
    DeleteFile {
        name: String,
    },
}

/// Starts sync runs. Returns once the run is queued, not when it finishes.
pub trait SyncEngine: Send + Sync {
    fn start(&self, params: SyncParams) -> Result<Uuid, SyncError>;
}

/// Receives per-file notifications.
pub trait SyncPipeline: Send + Sync {
    fn sync_file(&self, file: FileSync) -> Result<(), SyncError>;
    fn delete_file(&self, name: &str) -> Result<(), SyncError>;
}

/// Fill in the default run parameters without overriding caller values.
pub fn with_defaults(mut params: SyncParams) -> SyncParams {
    for key in DEFAULT_PARAM_KEYS {
        params.entry(key).or_insert(Value::Null);
    }
    params
}

/// Sends every sync event to one unbounded channel.
#[derive(Debug, Clone)]
pub struct SyncDispatcher {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl SyncDispatcher {
    /// Create a dispatcher and the receiver its events arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SyncEvent) -> Result<(), SyncError> {
        self.tx.send(event).map_err(|_| SyncError::PipelineClosed)
    }
}

impl SyncEngine for SyncDispatcher {
    fn start(&self, params: SyncParams) -> Result<Uuid, SyncError> {
        let job_id = Uuid::new_v4();
        self.send(SyncEvent::Run {
            job_id,
            params: with_defaults(params),
            queued_at: Utc::now(),
        })?;
        Ok(job_id)
    }
}

impl SyncPipeline for SyncDispatcher {
    fn sync_file(&self, file: FileSync) -> Result<(), SyncError> {
        self.send(SyncEvent::SyncFile(file))
    }

    fn delete_file(&self, name: &str) -> Result<(), SyncError> {
        self.send(SyncEvent::DeleteFile {
            name: name.to_string(),
        })
    }
}
