//! Built-in codecs for temporal values.
//!
//! JSON has no native date or datetime representation, which makes these the
//! codecs almost every store registers first. Both use fixed ISO-8601 style
//! formats so the tagged strings stay readable in the persisted file.

use chrono::{NaiveDate, NaiveDateTime};
use less_db_value::Value;

use crate::codec::{Codec, DecodeError};

/// Seconds precision plus an optional fractional part, so datetimes with
/// sub-second components still round-trip exactly.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Codec for [`chrono::NaiveDateTime`] leaves, e.g. `2000-01-01T12:00:00`.
#[derive(Debug, Default)]
pub struct DateTimeCodec;

impl Codec for DateTimeCodec {
    fn claims(&self, value: &Value) -> bool {
        value.downcast_opaque::<NaiveDateTime>().is_some()
    }

    /// # Panics
    ///
    /// Panics when called with a value this codec does not claim.
    fn encode(&self, value: &Value) -> String {
        match value.downcast_opaque::<NaiveDateTime>() {
            Some(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
            None => panic!("DateTimeCodec::encode called with an unclaimed value"),
        }
    }

    fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(Value::opaque)
            .map_err(|err| DecodeError::new(format!("invalid datetime {text:?}: {err}")))
    }
}

/// Codec for [`chrono::NaiveDate`] leaves, e.g. `2000-01-01`.
#[derive(Debug, Default)]
pub struct DateCodec;

impl Codec for DateCodec {
    fn claims(&self, value: &Value) -> bool {
        value.downcast_opaque::<NaiveDate>().is_some()
    }

    /// # Panics
    ///
    /// Panics when called with a value this codec does not claim.
    fn encode(&self, value: &Value) -> String {
        match value.downcast_opaque::<NaiveDate>() {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => panic!("DateCodec::encode called with an unclaimed value"),
        }
    }

    fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Value::opaque)
            .map_err(|err| DecodeError::new(format!("invalid date {text:?}: {err}")))
    }
}
