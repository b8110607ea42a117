//! The codec capability interface.

use less_db_value::Value;
use thiserror::Error;

/// A type-specific encode/decode capability.
///
/// Each codec handles exactly one runtime value type, announced through
/// [`Codec::claims`]. Implementations are registered by name on a
/// [`SerializationMiddleware`](crate::SerializationMiddleware), which applies
/// them to every record it passes through.
pub trait Codec: Send + Sync {
    /// True iff the value's runtime type is the one this codec handles.
    fn claims(&self, value: &Value) -> bool;

    /// Encodes a claimed value as a string. Total for any value where
    /// [`Codec::claims`] holds; must not fail for such values. Behavior on
    /// unclaimed values is a contract violation (the built-ins panic).
    fn encode(&self, value: &Value) -> String;

    /// Decodes a string previously produced by this codec's `encode`.
    ///
    /// Only defined for such strings; foreign input yields a [`DecodeError`],
    /// which the middleware propagates uncaught to the caller of `read()`.
    fn decode(&self, text: &str) -> Result<Value, DecodeError>;
}

/// A tag-prefixed string whose body a codec rejected.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
