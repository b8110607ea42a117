//! Pluggable value serialization for less-db storages.
//!
//! A [`SerializationMiddleware`] wraps any [`Storage`](less_db_storage::Storage)
//! and lets callers register [`Codec`]s for value types the persistence
//! format cannot represent natively. On write, claimed values anywhere in the
//! dataset are replaced by tagged strings (`"{TinyDate}:2000-01-01"`); on
//! read, tagged strings are restored to their original values. The caller's
//! dataset is never mutated: when encoding has work to do, it operates on a
//! clone taken once per write call.
//!
//! ```
//! use less_db_serialization::{DateTimeCodec, SerializationMiddleware};
//! use less_db_storage::{MemoryStorage, Storage};
//! use less_db_value::{Record, Table, Tables, Value};
//!
//! let mut store = SerializationMiddleware::new(MemoryStorage::new());
//! store.register("TinyDate", DateTimeCodec);
//!
//! let when = chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//! let record = Record::from([("date".to_string(), Value::opaque(when))]);
//! let tables = Tables::from([(
//!     "_default".to_string(),
//!     Table::from([("1".to_string(), record)]),
//! )]);
//!
//! store.write(&tables).unwrap();
//! assert_eq!(store.read().unwrap(), Some(tables));
//! ```

pub mod codec;
pub mod middleware;
pub mod tag;
pub mod temporal;

mod walk;

pub use codec::{Codec, DecodeError};
pub use middleware::SerializationMiddleware;
pub use tag::tag_for;
pub use temporal::{DateCodec, DateTimeCodec};
