// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless Media Server - Cloud Storage Offload Settings & Sync Trigger
//!
//! Stores the bucket credentials and offload mode of a media library,
//! reconciles the mode against the hosting environment, triggers media sync
//! runs and rewrites page-builder asset URLs to the remote storage host.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token verification and capability checks
//! - `compat` - Third-party plugin asset filters
//! - `settings` - Settings validation and mode reconciliation
//! - `storage` - Scoped option store (JSON files)
//! - `sync` - Sync classes, event dispatch and background worker

pub mod api;
pub mod auth;
pub mod compat;
pub mod config;
pub mod error;
pub mod models;
pub mod settings;
pub mod state;
pub mod storage;
pub mod sync;
