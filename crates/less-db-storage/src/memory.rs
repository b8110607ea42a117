//! In-memory backend.

use less_db_value::Tables;

use crate::{Storage, StorageError};

/// Keeps the dataset in memory. The default scratch backend for tests and
/// ephemeral stores.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Option<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dataset exactly as the last `write` delegated it, if any.
    pub fn stored(&self) -> Option<&Tables> {
        self.data.as_ref()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<Tables>, StorageError> {
        Ok(self.data.clone())
    }

    fn write(&mut self, tables: &Tables) -> Result<(), StorageError> {
        self.data = Some(tables.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use less_db_value::{Record, Table, Value};

    fn sample() -> Tables {
        let record = Record::from([("answer".to_string(), Value::Int(42))]);
        let table = Table::from([("1".to_string(), record)]);
        Tables::from([("things".to_string(), table)])
    }

    #[test]
    fn reads_none_before_first_write() {
        let storage = MemoryStorage::new();
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut storage = MemoryStorage::new();
        let tables = sample();
        storage.write(&tables).unwrap();
        assert_eq!(storage.read().unwrap(), Some(tables));
    }

    #[test]
    fn stored_exposes_the_delegated_structure() {
        let mut storage = MemoryStorage::new();
        let tables = sample();
        storage.write(&tables).unwrap();
        assert_eq!(storage.stored(), Some(&tables));
    }
}
