//! The in-memory value tree.
//!
//! [`Value`] is what the codec encodes from and decodes into. Generic values
//! (null, booleans, strings, arrays, objects) travel through the container
//! format directly; integers, floats, vertices, edges and paths are
//! *extended* kinds and carry their own header tag on the wire.
//!
//! # Example
//!
//! ```
//! use manifoldb_codec::{Value, Vertex};
//!
//! let name: Value = "Alice".into();
//! let age: Value = 30i64.into();
//!
//! assert_eq!(name.as_str(), Some("Alice"));
//! assert_eq!(age.as_int(), Some(30));
//!
//! let alice = Vertex::new(1, "Person").with_property("name", "Alice");
//! let value = Value::from(alice);
//! assert_eq!(value.kind_name(), "vertex");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Edge, Vertex};

/// A value that can be encoded by the codec.
///
/// | Variant | Wire form |
/// |---------|-----------|
/// | `Null`, `Bool`, `String` | generic scalar entry |
/// | `Integer`, `Float` | extended scalar (tag + 8 bytes) |
/// | `Array`, `Object` | generic container |
/// | `Vertex`, `Edge` | extended composite wrapping an object |
/// | `Path` | extended composite wrapping an array |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered list of values
    Array(Vec<Value>),
    /// Ordered key/value pairs with unique keys
    Object(Vec<(String, Value)>),
    /// A graph vertex
    Vertex(Vertex),
    /// A graph edge
    Edge(Edge),
    /// An alternating sequence of vertices and edges.
    ///
    /// Paths stay in array form after decoding; their length varies so
    /// they are never promoted to a fixed struct.
    Path(Vec<Value>),
}

impl Value {
    /// Build an object from key/value pairs.
    ///
    /// A repeated key keeps its first position and its last value.
    pub fn object<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut out: Vec<(String, Value)> = Vec::new();
        for (key, value) in pairs {
            insert_pair(&mut out, key.into(), value.into());
        }
        Self::Object(out)
    }

    /// An object with no pairs.
    #[inline]
    #[must_use]
    pub const fn empty_object() -> Self {
        Self::Object(Vec::new())
    }

    /// Short lowercase name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Vertex(_) => "vertex",
            Self::Edge(_) => "edge",
            Self::Path(_) => "path",
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if the value is an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(elems) => Some(elems),
            _ => None,
        }
    }

    /// Returns the pairs if the value is an object.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Object(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Returns the vertex if the value is one.
    #[inline]
    #[must_use]
    pub const fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            Self::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the edge if the value is one.
    #[inline]
    #[must_use]
    pub const fn as_edge(&self) -> Option<&Edge> {
        match self {
            Self::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the elements if the value is a path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> Option<&[Value]> {
        match self {
            Self::Path(elems) => Some(elems),
            _ => None,
        }
    }

    /// Look up a key if the value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert a pair into an object value.
    ///
    /// Any non-object value is replaced by an empty object first. Returns the
    /// previous value stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        if !matches!(self, Self::Object(_)) {
            *self = Self::empty_object();
        }
        match self {
            Self::Object(pairs) => insert_pair(pairs, key.into(), value.into()),
            _ => None,
        }
    }
}

fn insert_pair(pairs: &mut Vec<(String, Value)>, key: String, value: Value) -> Option<Value> {
    if let Some(slot) = pairs.iter_mut().find(|(k, _)| *k == key) {
        return Some(std::mem::replace(&mut slot.1, value));
    }
    pairs.push((key, value));
    None
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
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Vertex> for Value {
    #[inline]
    fn from(v: Vertex) -> Self {
        Self::Vertex(v)
    }
}

impl From<Edge> for Value {
    #[inline]
    fn from(e: Edge) -> Self {
        Self::Edge(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// Renders the graph text form, e.g. `{"id": 1, "label": "Person", "properties": {}}::vertex`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write_float(f, *x),
            Self::String(s) => write_escaped(f, s),
            Self::Array(elems) => write_list(f, elems),
            Self::Object(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_escaped(f, key)?;
                    write!(f, ": {value}")?;
                }
                f.write_str("}")
            }
            Self::Vertex(v) => write!(f, "{v}"),
            Self::Edge(e) => write!(f, "{e}"),
            Self::Path(elems) => {
                write_list(f, elems)?;
                f.write_str("::path")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, elems: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, elem) in elems.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{elem}")?;
    }
    f.write_str("]")
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("NaN")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

pub(crate) fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if u32::from(c) < 0x20 => write!(f, "\\u{:04x}", u32::from(c))?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
