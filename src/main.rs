// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::error::Error;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use stateless_media_server::{
    api::router,
    auth::RoleDirectory,
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{FileOptionStore, StoragePaths},
    sync::{run_sync_worker, SyncDispatcher},
};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    let store = FileOptionStore::open(StoragePaths::new(&config.data_dir))?;
    tracing::info!(data_dir = %config.data_dir.display(), "Option store opened");

    let (dispatcher, events) = SyncDispatcher::channel();
    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(run_sync_worker(events, shutdown.clone()));

    let mut state = AppState::new(store, dispatcher, &config);
    if let Some(path) = &config.permissions_file {
        let directory = RoleDirectory::from_file(path)?;
        tracing::info!(path = %path.display(), users = directory.len(), "Role directory loaded");
        state = state.with_permissions(directory);
    }
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET not set, token signatures are NOT verified (development mode)");
    }

    let app = router(state);
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Stateless media server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    // Server is down; stop the worker even if the signal path did not.
    shutdown.cancel();
    let handled = worker.await?;
    tracing::info!(handled, "Sync worker stopped");
    Ok(())
}
