// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Sync Event Worker
//!
//! Background task that drains the sync channel. Uploading and deleting
//! objects is the job of the storage client attached to this stream; the
//! worker records every accepted event so runs can be traced end to end.
//!
//! ## Shutdown
//!
//! Stops when the cancellation token fires or when every dispatcher has
//! been dropped.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::SyncEvent;

/// Run the worker loop. Returns the number of events drained.
///
/// ```rust,ignore
/// tokio::spawn(run_sync_worker(rx, shutdown.clone()));
/// ```
pub async fn run_sync_worker(
    mut rx: mpsc::UnboundedReceiver<SyncEvent>,
    shutdown: CancellationToken,
) -> usize {
    info!("Sync worker starting");
    let mut handled = 0;

    loop {
        let event = tokio::select! {
            event = rx.recv() => event,
            _ = shutdown.cancelled() => {
                info!(handled, "Sync worker shutting down");
                return handled;
            }
        };

        let Some(event) = event else {
            info!(handled, "Sync channel closed, worker exiting");
            return handled;
        };

        handled += 1;
        match &event {
            SyncEvent::Run {
                job_id,
                params,
                queued_at,
            } => {
                info!(
                    job_id = %job_id,
                    sync_type = ?params.get("type"),
                    limit = ?params.get("limit"),
                    queued_at = %queued_at,
                    "Sync run accepted"
                );
            }
            SyncEvent::SyncFile(file) => {
                debug!(
                    name = %file.name,
                    path = %file.absolute_path.display(),
                    forced = file.forced,
                    "File sync requested"
                );
            }
            SyncEvent::DeleteFile { name } => {
                debug!(name = %name, "File delete requested");
            }
        }
    }
}
