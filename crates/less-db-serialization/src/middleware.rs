//! The serialization middleware itself.

use std::borrow::Cow;

use indexmap::IndexMap;
use less_db_storage::{Storage, StorageError};
use less_db_value::Tables;

use crate::codec::Codec;
use crate::tag::{name_is_taggable, tag_for};
use crate::walk::{decode_record, encode_record, record_contains_claimed};

/// Wraps a [`Storage`] and runs every record through the registered codecs:
/// claimed values become tagged strings on write, tagged strings become
/// values again on read.
///
/// The middleware implements [`Storage`] itself, so instances stack and the
/// store above stays agnostic. The codec registry is per-instance state;
/// registration is expected to finish before the first read or write.
pub struct SerializationMiddleware<S> {
    storage: S,
    codecs: IndexMap<String, Box<dyn Codec>>,
}

impl<S> SerializationMiddleware<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            codecs: IndexMap::new(),
        }
    }

    /// Registers a codec under `name`, silently replacing any codec
    /// previously registered under the same name.
    ///
    /// `name` becomes part of the persisted tag strings, so it must stay
    /// stable across program versions for data to remain readable, and it
    /// must not contain `'}'` (asserted in debug builds).
    pub fn register(&mut self, name: impl Into<String>, codec: impl Codec + 'static) {
        let name = name.into();
        debug_assert!(
            name_is_taggable(&name),
            "codec name {name:?} must not contain '}}'"
        );
        self.codecs.insert(name, Box::new(codec));
    }

    /// The wrapped backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Unwraps the middleware, returning the backend.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: Storage> Storage for SerializationMiddleware<S> {
    fn read(&self) -> Result<Option<Tables>, StorageError> {
        let mut tables = match self.storage.read()? {
            Some(tables) => tables,
            None => return Ok(None),
        };

        for (name, codec) in &self.codecs {
            let tag = tag_for(name);
            for table in tables.values_mut() {
                for record in table.values_mut() {
                    decode_record(record, codec.as_ref(), &tag).map_err(|source| {
                        StorageError::Decode {
                            codec: name.clone(),
                            source: Box::new(source),
                        }
                    })?;
                }
            }
        }
        Ok(Some(tables))
    }

    /// Encodes claimed values and delegates to the wrapped backend.
    ///
    /// The caller's dataset is never mutated. Encoding works on a clone of
    /// the whole dataset, taken at most once per call and only after a
    /// record is found to actually contain a claimed value; a dataset no
    /// codec has a claim on reaches the backend by reference, unmodified.
    fn write(&mut self, tables: &Tables) -> Result<(), StorageError> {
        let mut data = Cow::Borrowed(tables);

        for (name, codec) in &self.codecs {
            let tag = tag_for(name);

            // Still borrowed: scan records in order for a claimed value.
            // Once any codec has forced the clone, detection is skipped for
            // the rest of the call.
            if let Cow::Borrowed(original) = &data {
                let must_encode = original
                    .values()
                    .flat_map(|table| table.values())
                    .any(|record| record_contains_claimed(record, codec.as_ref()));
                if must_encode {
                    data = Cow::Owned(tables.clone());
                }
            }

            if let Cow::Owned(owned) = &mut data {
                for table in owned.values_mut() {
                    for record in table.values_mut() {
                        encode_record(record, codec.as_ref(), &tag);
                    }
                }
            }
        }

        self.storage.write(data.as_ref())
    }
}
