// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed option store.
//!
//! Each scope is one JSON document. Documents are loaded once at open time
//! and rewritten in full on every `set` (write to a temp file, then rename),
//! so a crash never leaves a half-written document behind. The in-memory
//! copy only changes once the write has succeeded.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::{OptionStore, OptionValue, Scope, StoragePaths, StorageResult};

type Document = BTreeMap<String, OptionValue>;

#[derive(Debug)]
pub struct FileOptionStore {
    paths: StoragePaths,
    documents: HashMap<Scope, Document>,
}

impl FileOptionStore {
    /// Open the store, creating the options directory if needed.
    pub fn open(paths: StoragePaths) -> StorageResult<Self> {
        fs::create_dir_all(paths.options_dir())?;

        let mut documents = HashMap::new();
        for scope in [Scope::Network, Scope::Site] {
            documents.insert(scope, read_document(&paths.options_file(scope))?);
        }

        Ok(Self { paths, documents })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }
}

impl OptionStore for FileOptionStore {
    fn get(&self, scope: Scope, key: &str) -> StorageResult<Option<OptionValue>> {
        Ok(self
            .documents
            .get(&scope)
            .and_then(|doc| doc.get(key))
            .cloned())
    }

    fn set(&mut self, scope: Scope, key: &str, value: OptionValue) -> StorageResult<()> {
        let mut document = self.documents.get(&scope).cloned().unwrap_or_default();
        document.insert(key.to_string(), value);

        write_json_atomic(&self.paths.options_file(scope), &document)?;
        self.documents.insert(scope, document);
        Ok(())
    }
}

/// Read a scope document; a missing file is an empty document.
fn read_document(path: &Path) -> StorageResult<Document> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write a JSON file (atomic write via rename).
fn write_json_atomic(path: &Path, document: &Document) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}
