//! Vertex and edge values.
//!
//! These are the typed forms of the two fixed-shape composites. Their
//! property maps are held as an owned [`Value`] (normally an object).
//!
//! # Example
//!
//! ```
//! use manifoldb_codec::{Edge, Value, Vertex};
//!
//! let alice = Vertex::new(1, "Person").with_property("name", "Alice");
//! let bob = Vertex::new(2, "Person").with_property("name", "Bob");
//!
//! let knows = Edge::new(10, alice.id, bob.id, "KNOWS").with_property("since", 2019i64);
//!
//! assert_eq!(knows.start_id, 1);
//! assert_eq!(knows.end_id, 2);
//! assert_eq!(knows.get_property("since"), Some(&Value::Integer(2019)));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::write_escaped;
use super::Value;

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Graph-wide vertex identifier.
    pub id: i64,
    /// Vertex label.
    pub label: String,
    /// Property map.
    pub properties: Box<Value>,
}

impl Vertex {
    /// Create a vertex with an empty property map.
    #[must_use]
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self { id, label: label.into(), properties: Box::new(Value::empty_object()) }
    }

    /// Replace the whole property value.
    #[must_use]
    pub fn with_properties(mut self, properties: impl Into<Value>) -> Self {
        self.properties = Box::new(properties.into());
        self
    }

    /// Add a property to this vertex.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Get a property value by key.
    #[inline]
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property value.
    #[inline]
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key, value);
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"id\": {}, \"label\": ", self.id)?;
        write_escaped(f, &self.label)?;
        write!(f, ", \"properties\": {}}}::vertex", self.properties)
    }
}

/// A directed graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Graph-wide edge identifier.
    pub id: i64,
    /// Identifier of the vertex the edge leaves.
    pub start_id: i64,
    /// Identifier of the vertex the edge enters.
    pub end_id: i64,
    /// Edge label.
    pub label: String,
    /// Property map.
    pub properties: Box<Value>,
}

impl Edge {
    /// Create an edge with an empty property map.
    #[must_use]
    pub fn new(id: i64, start_id: i64, end_id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            start_id,
            end_id,
            label: label.into(),
            properties: Box::new(Value::empty_object()),
        }
    }

    /// Replace the whole property value.
    #[must_use]
    pub fn with_properties(mut self, properties: impl Into<Value>) -> Self {
        self.properties = Box::new(properties.into());
        self
    }

    /// Add a property to this edge.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Get a property value by key.
    #[inline]
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property value.
    #[inline]
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key, value);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"id\": {}, \"label\": ", self.id)?;
        write_escaped(f, &self.label)?;
        write!(
            f,
            ", \"end_id\": {}, \"start_id\": {}, \"properties\": {}}}::edge",
            self.end_id, self.start_id, self.properties
        )
    }
}
