// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical object names for files under the uploads root.

use std::path::{Path, PathBuf};

/// Maps a URL or local path to the object name used in the bucket.
///
/// `None` when the input does not name a file inside the uploads root.
pub trait FileNameNormalizer: Send + Sync {
    fn normalize(&self, url_or_path: &str) -> Option<String>;
}

/// Strips the uploads base URL (or uploads directory), query string,
/// fragment and leading slashes, then prefixes the configured root dir.
/// Names with `..` segments are rejected; `.` and empty segments are dropped.
///
/// ```text
/// https://site.test/uploads/eael/post-1.css?ver=2 -> [root/]eael/post-1.css
/// /var/www/uploads/eael/post-1.css               -> [root/]eael/post-1.css
/// ```
#[derive(Debug, Clone)]
pub struct UploadsNamer {
    uploads_url: String,
    uploads_dir: PathBuf,
    root_dir: String,
}

impl UploadsNamer {
    pub fn new(uploads_url: &str, uploads_dir: impl Into<PathBuf>, root_dir: &str) -> Self {
        Self {
            uploads_url: uploads_url.trim_end_matches('/').to_string(),
            uploads_dir: uploads_dir.into(),
            root_dir: root_dir.trim_matches('/').to_string(),
        }
    }

    fn strip_base(&self, input: &str) -> String {
        if let Some(rest) = input.strip_prefix(&self.uploads_url) {
            return rest.to_string();
        }
        // Same URL with the other scheme
        if let Some((_, without_scheme)) = self.uploads_url.split_once("://") {
            for scheme in ["http://", "https://", "//"] {
                if let Some(rest) = input
                    .strip_prefix(scheme)
                    .and_then(|i| i.strip_prefix(without_scheme))
                {
                    return rest.to_string();
                }
            }
        }
        if let Ok(rest) = Path::new(input).strip_prefix(&self.uploads_dir) {
            return rest.to_string_lossy().into_owned();
        }
        input.to_string()
    }
}

impl FileNameNormalizer for UploadsNamer {
    fn normalize(&self, url_or_path: &str) -> Option<String> {
        let stripped = self.strip_base(url_or_path.trim());
        let path = stripped.split(['?', '#']).next().unwrap_or_default();

        let mut segments = Vec::new();
        for segment in path.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => return None,
                segment => segments.push(segment),
            }
        }
        if segments.is_empty() {
            return None;
        }
        let name = segments.join("/");

        if self.root_dir.is_empty() || name.starts_with(&format!("{}/", self.root_dir)) {
            Some(name)
        } else {
            Some(format!("{}/{}", self.root_dir, name))
        }
    }
}
