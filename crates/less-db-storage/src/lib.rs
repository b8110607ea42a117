//! Storage contract and backends for less-db document trees.
//!
//! A storage persists the full `table → record-id → record` structure in one
//! piece. Layers compose by implementing [`Storage`] on top of another
//! [`Storage`]; the serialization middleware uses exactly this seam, which is
//! why [`Storage::write`] takes the dataset by reference - a layer that does
//! not need to transform anything can hand the caller's structure through
//! untouched.

mod json_file;
mod memory;

use std::error::Error;

use thiserror::Error as ThisError;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

pub use less_db_value::{Record, Table, Tables, Value};

/// Contract between a document store and its persistence backend.
pub trait Storage {
    /// Reads the persisted dataset, or `None` when nothing has been
    /// persisted yet.
    fn read(&self) -> Result<Option<Tables>, StorageError>;

    /// Persists the given dataset as-is. No partial-write semantics are
    /// assumed; backends that need an owned copy clone internally.
    fn write(&mut self, tables: &Tables) -> Result<(), StorageError>;
}

/// Errors shared by every layer of a storage stack.
#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("persisted document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Value(#[from] less_db_value::json::JsonError),
    /// A middleware codec rejected a tagged value during read. Carries the
    /// codec's registered name; the codec's own error is the source.
    #[error("codec {codec:?} failed to decode a tagged value")]
    Decode {
        codec: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}
