//! Document values for less-db storages.
//!
//! The persisted structure is `table-name → record-id → record`, where a
//! record is an arbitrarily nested composition of ordered mappings and
//! sequences terminating in scalars or opaque leaves. [`Value`] is the closed
//! union over all of these; [`Value::Opaque`] carries values the JSON
//! persistence format cannot represent natively (temporal types being the
//! usual case) so that a serialization layer above the raw storage can
//! claim and encode them.

pub mod json;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A single document: field name to value.
pub type Record = IndexMap<String, Value>;

/// Records of one table, keyed by record id.
pub type Table = IndexMap<String, Record>;

/// The full persisted dataset: table name to table.
pub type Tables = IndexMap<String, Table>;

// ── Value ──────────────────────────────────────────────────────────────────

/// A value stored inside a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Ordered mapping with unique string keys.
    Object(IndexMap<String, Value>),
    /// A type-erased leaf the persistence format cannot represent natively.
    Opaque(Opaque),
}

impl Value {
    /// Wraps an arbitrary Rust value as an opaque leaf.
    pub fn opaque<T: OpaqueValue>(value: T) -> Self {
        Self::Opaque(Opaque::new(value))
    }

    /// Returns `true` if the value is null.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for mappings and sequences.
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is one.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the concrete type behind an opaque leaf.
    ///
    /// `None` when the value is not opaque or holds a different type. This is
    /// the primitive a codec's type predicate is built on.
    pub fn downcast_opaque<T: OpaqueValue>(&self) -> Option<&T> {
        match self {
            Self::Opaque(opaque) => opaque.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Enumerates the (key-or-index, value) entries of a container.
    ///
    /// Mappings yield [`EntryKey::Key`], sequences yield [`EntryKey::Index`];
    /// non-containers yield nothing. Both container kinds are walked through
    /// this one interface.
    pub fn entries(&self) -> Entries<'_> {
        let inner = match self {
            Self::Object(map) => EntriesInner::Object(map.iter()),
            Self::Array(items) => EntriesInner::Array(items.iter().enumerate()),
            _ => EntriesInner::Empty,
        };
        Entries { inner }
    }

    /// Mutable variant of [`Value::entries`]; the yielded `&mut Value` slot
    /// is the write-back position for that key or index.
    pub fn entries_mut(&mut self) -> EntriesMut<'_> {
        let inner = match self {
            Self::Object(map) => EntriesMutInner::Object(map.iter_mut()),
            Self::Array(items) => EntriesMutInner::Array(items.iter_mut().enumerate()),
            _ => EntriesMutInner::Empty,
        };
        EntriesMut { inner }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    #[inline]
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Object(map)
    }
}

// ── Opaque leaves ──────────────────────────────────────────────────────────

/// Capability bound for values carried inside [`Value::Opaque`].
///
/// Implemented automatically for every `'static` type that is `Debug`,
/// `PartialEq`, `Send` and `Sync`; no manual implementation is needed.
pub trait OpaqueValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn OpaqueValue) -> bool;
}

impl<T> OpaqueValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn OpaqueValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| other == self)
    }
}

/// Shared handle over a type-erased leaf value.
///
/// Cloning is cheap (the underlying value is reference counted); leaves are
/// immutable, so a cloned dataset may share them safely. Equality is
/// type-checked: leaves holding different concrete types compare unequal.
#[derive(Clone)]
pub struct Opaque(Arc<dyn OpaqueValue>);

impl Opaque {
    pub fn new<T: OpaqueValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: OpaqueValue>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

// ── Entry enumeration ──────────────────────────────────────────────────────

/// The position of an entry inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'a> {
    /// Mapping key.
    Key(&'a str),
    /// Sequence index.
    Index(usize),
}

pub struct Entries<'a> {
    inner: EntriesInner<'a>,
}

enum EntriesInner<'a> {
    Empty,
    Object(indexmap::map::Iter<'a, String, Value>),
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
}

impl<'a> Iterator for Entries<'a> {
    type Item = (EntryKey<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            EntriesInner::Empty => None,
            EntriesInner::Object(iter) => {
                iter.next().map(|(k, v)| (EntryKey::Key(k.as_str()), v))
            }
            EntriesInner::Array(iter) => iter.next().map(|(i, v)| (EntryKey::Index(i), v)),
        }
    }
}

pub struct EntriesMut<'a> {
    inner: EntriesMutInner<'a>,
}

enum EntriesMutInner<'a> {
    Empty,
    Object(indexmap::map::IterMut<'a, String, Value>),
    Array(std::iter::Enumerate<std::slice::IterMut<'a, Value>>),
}

impl<'a> Iterator for EntriesMut<'a> {
    type Item = (EntryKey<'a>, &'a mut Value);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            EntriesMutInner::Empty => None,
            EntriesMutInner::Object(iter) => {
                iter.next().map(|(k, v)| (EntryKey::Key(k.as_str()), v))
            }
            EntriesMutInner::Array(iter) => iter.next().map(|(i, v)| (EntryKey::Index(i), v)),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
