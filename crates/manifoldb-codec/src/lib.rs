//! `ManifoldDB` Codec
//!
//! This crate provides the binary encoding of graph values: 64-bit integers,
//! doubles, vertices, edges and paths, stored inside a generic aligned
//! container format of arrays and objects.
//!
//! # Overview
//!
//! - **Values**: [`Value`] covers generic scalars, arrays and objects plus
//!   the extended kinds [`Vertex`], [`Edge`] and paths
//! - **Codec**: [`Codec`] encodes single extended values into a caller's
//!   buffer and serializes whole documents
//! - **Zero-copy reads**: [`ContainerRef`] and [`Events`] walk encoded bytes
//!   without decoding them; [`Codec::locate_properties`] finds a vertex or
//!   edge property map directly
//!
//! # Example
//!
//! ```
//! use manifoldb_codec::{Codec, ContainerRef, Value, Vertex};
//!
//! let codec = Codec::default();
//! let ada = Vertex::new(1, "Person").with_property("name", "Ada");
//!
//! let bytes = codec.serialize(&Value::Vertex(ada)).unwrap();
//!
//! // Read the property map without decoding the vertex.
//! let doc = ContainerRef::new(&bytes).unwrap();
//! let located = codec.locate_properties(doc).unwrap();
//! let props = codec.decode_container(located.properties).unwrap();
//! assert_eq!(props.get("name"), Some(&Value::from("Ada")));
//! ```
//!
//! # Modules
//!
//! - [`types`] - Value types ([`Value`], [`Vertex`], [`Edge`])
//! - [`encoding`] - Wire format, container views and iterators
//! - [`config`] - Codec configuration ([`CodecConfig`])
//! - [`error`] - Error types ([`CodecError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use codec::Codec;
pub use config::{CodecConfig, PathElements};
pub use encoding::{
    read_header, write_header, AgtEntry, ContainerRef, Decoder, Encoder, Event, Events, ExtTag,
    IterMode, Item, LocatedProperties, ValueBuilder,
};
pub use error::{CodecError, Result};
pub use types::{Edge, Value, Vertex};
