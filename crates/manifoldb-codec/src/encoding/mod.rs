//! Binary encoding of graph values.
//!
//! This module implements the aligned wire format: extended scalars and
//! composites, the generic container they nest in, and the readers that
//! walk encoded bytes without copying.
//!
//! # Layers
//!
//! - [`buffer`] - word alignment and bounds-checked reads
//! - [`entry`] - 4-byte child descriptors and container header flags
//! - [`header`] - the tag word in front of every extended value
//! - [`extended`] - integer, float, vertex, edge and path encode/decode
//! - [`view`] - [`ContainerRef`], a validated view over an encoded container
//! - [`iter`] - [`Events`], a pull iterator over a container
//! - [`builder`] - [`ValueBuilder`], which assembles values from events
//! - [`locator`] - direct access to a vertex or edge property map
//!
//! # Example
//!
//! ```
//! use manifoldb_codec::encoding::{Decoder, Encoder};
//! use manifoldb_codec::{Edge, Value};
//!
//! let knows = Edge::new(7, 1, 2, "KNOWS").with_property("since", 2019i64);
//!
//! let bytes = knows.encode().unwrap();
//! let decoded = Edge::decode(&bytes).unwrap();
//! assert_eq!(decoded, knows);
//! ```

pub mod buffer;
pub mod builder;
pub(crate) mod container;
pub mod entry;
pub mod extended;
pub mod header;
pub mod iter;
pub mod locator;
mod traits;
pub mod view;

#[cfg(test)]
mod proptest_tests;

pub use builder::ValueBuilder;
pub use entry::{AgtEntry, EntryKind};
pub use header::{read_header, write_header, ExtTag};
pub use iter::{Event, Events, IterMode};
pub use locator::{locate_properties, LocatedProperties};
pub use traits::{Decoder, Encoder};
pub use view::{ContainerRef, Item};
