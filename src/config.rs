// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the option store | `./data` |
//! | `UPLOADS_DIR` | Local uploads root | `./uploads` |
//! | `UPLOADS_URL` | Public base URL of the uploads root | `http://localhost/uploads` |
//! | `JWT_SECRET` | HS256 secret for bearer tokens | Unset (development mode) |
//! | `GAE_VERSION` | Managed hosting indicator (presence only) | Unset |
//! | `SM_ROOT_DIR` | Folder prefix for object names in the bucket | Empty |
//! | `SM_CUSTOM_DOMAIN` | Custom remote host for rewritten URLs | Unset |
//! | `PERMISSIONS_FILE` | JSON map of user id to role | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the option store directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the local uploads root.
///
/// Its writability is one of the signals that force `stateless` mode.
pub const UPLOADS_DIR_ENV: &str = "UPLOADS_DIR";
pub const UPLOADS_URL_ENV: &str = "UPLOADS_URL";

/// Shared secret used to verify bearer tokens (HS256).
///
/// When unset the server runs in development mode and only decodes tokens.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Set by Google App Engine on every instance. Only its presence matters.
pub const MANAGED_HOSTING_ENV: &str = "GAE_VERSION";

pub const ROOT_DIR_ENV: &str = "SM_ROOT_DIR";
pub const CUSTOM_DOMAIN_ENV: &str = "SM_CUSTOM_DOMAIN";
pub const PERMISSIONS_FILE_ENV: &str = "PERMISSIONS_FILE";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_UPLOADS_DIR: &str = "./uploads";
pub const DEFAULT_UPLOADS_URL: &str = "http://localhost/uploads";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Default remote host when no custom domain is configured.
pub const GOOGLE_STORAGE_HOST: &str = "https://storage.googleapis.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid port: {value}")]
    InvalidPort { var: &'static str, value: String },
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    /// Public base URL of the uploads root, without trailing slash.
    pub uploads_url: String,
    pub jwt_secret: Option<String>,
    pub root_dir: String,
    /// Custom remote host, without trailing slash.
    pub custom_domain: Option<String>,
    pub permissions_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            uploads_url: DEFAULT_UPLOADS_URL.to_string(),
            jwt_secret: None,
            root_dir: String::new(),
            custom_domain: None,
            permissions_file: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_ENV,
                value,
            })?,
            None => defaults.port,
        };

        let uploads_url = match get(UPLOADS_URL_ENV) {
            Some(value) => validated_url(UPLOADS_URL_ENV, &value)?,
            None => defaults.uploads_url,
        };

        let custom_domain = get(CUSTOM_DOMAIN_ENV)
            .map(|value| validated_url(CUSTOM_DOMAIN_ENV, &value))
            .transpose()?;

        Ok(Self {
            host: get(HOST_ENV).unwrap_or(defaults.host),
            port,
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            uploads_dir: get(UPLOADS_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            uploads_url,
            jwt_secret: get(JWT_SECRET_ENV),
            root_dir: get(ROOT_DIR_ENV)
                .map(|dir| dir.trim_matches('/').to_string())
                .unwrap_or_default(),
            custom_domain,
            permissions_file: get(PERMISSIONS_FILE_ENV).map(PathBuf::from),
            log_format: get(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse `value` as an absolute URL and return it without trailing slash.
fn validated_url(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { var, source })?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
