//! JSON file backend.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use less_db_value::json::{tables_from_json, tables_to_json};
use less_db_value::Tables;

use crate::{Storage, StorageError};

/// Persists the dataset as a single JSON document in one file.
///
/// A missing or empty file reads as `None`. Writing a dataset that still
/// contains opaque leaves fails with [`StorageError::Value`]: opaque leaves
/// must be encoded by a serialization layer before they reach a raw JSON
/// backend.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn read(&self) -> Result<Option<Tables>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let json = serde_json::from_slice(&bytes)?;
        Ok(Some(tables_from_json(json)?))
    }

    fn write(&mut self, tables: &Tables) -> Result<(), StorageError> {
        let json = tables_to_json(tables)?;
        fs::write(&self.path, serde_json::to_vec(&json)?)?;
        Ok(())
    }
}
