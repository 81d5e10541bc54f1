//! Value types handled by the codec.
//!
//! This module defines the in-memory tree the codec encodes from and decodes
//! into, including the typed vertex and edge structs.

mod graph;
mod value;

pub use graph::{Edge, Vertex};
pub use value::Value;
