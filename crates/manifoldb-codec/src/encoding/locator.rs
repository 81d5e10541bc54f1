//! Zero-copy access to a vertex or edge property map.
//!
//! Reading one property normally means decoding the whole composite. The
//! locator instead walks straight to the properties slot of the encoded
//! object, using the field order the encoder always writes:
//!
//! - vertex: `{id, label, properties}`, properties at value index 2
//! - edge: `{id, label, end_id, start_id, properties}`, properties at value index 4
//!
//! The order is not recorded in the bytes. Any structural surprise yields
//! `None`, and the caller falls back to a full decode.

use tracing::trace;

use crate::codec::Codec;

use super::buffer::{int_align, read_u32};
use super::header::{ExtTag, HEADER_SIZE};
use super::view::ContainerRef;

/// Value index of the properties field in an encoded vertex object.
pub const VERTEX_PROPERTIES_INDEX: usize = 2;

/// Value index of the properties field in an encoded edge object.
pub const EDGE_PROPERTIES_INDEX: usize = 4;

/// A property map found without decoding its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedProperties<'a> {
    /// Whether the owner is a vertex or an edge.
    pub tag: ExtTag,
    /// The encoded property container, borrowed from the input.
    pub properties: ContainerRef<'a>,
}

/// Find the property map of a boxed vertex or edge.
///
/// `boxed` must be a one-element array holding a single extended entry, the
/// shape a serialized root vertex or edge has.
#[must_use]
pub fn locate_properties(boxed: ContainerRef<'_>) -> Option<LocatedProperties<'_>> {
    locate(boxed).map_err(|reason| trace!(%reason, "property locator miss")).ok()
}

fn locate(boxed: ContainerRef<'_>) -> Result<LocatedProperties<'_>, &'static str> {
    if !boxed.is_array() || boxed.len() != 1 {
        return Err("not a single-element array");
    }
    let entry = boxed.entry(0).map_err(|_| "unreadable element entry")?;
    if !entry.is_extended() {
        return Err("element is not an extended type");
    }

    let (start, end) = boxed.span(0).map_err(|_| "element out of bounds")?;
    let bytes = &boxed.data()[..end];
    let base = int_align(start);
    let tag = read_u32(bytes, base)
        .and_then(|raw| ExtTag::try_from(raw).ok())
        .ok_or("unreadable header")?;
    let index = match tag {
        ExtTag::Vertex => VERTEX_PROPERTIES_INDEX,
        ExtTag::Edge => EDGE_PROPERTIES_INDEX,
        _ => return Err("element is not a vertex or edge"),
    };

    let body = bytes.get(base + HEADER_SIZE..).ok_or("body out of bounds")?;
    let object = ContainerRef::new(body).map_err(|_| "unreadable body")?;
    if !object.is_object() {
        return Err("body is not an object");
    }
    let num_pairs = object.len();
    if index >= num_pairs {
        return Err("too few pairs");
    }

    // Values follow all keys: pair i's value is entry num_pairs + i.
    let slot = num_pairs + index;
    let slot_entry = object.entry(slot).map_err(|_| "unreadable properties entry")?;
    if !slot_entry.is_container() {
        return Err("properties slot is not a container");
    }
    let properties = object.child_container(slot).map_err(|_| "unreadable properties")?;

    Ok(LocatedProperties { tag, properties })
}

impl Codec {
    /// Find the property map of a boxed vertex or edge without decoding it.
    ///
    /// See [`locate_properties`].
    #[must_use]
    pub fn locate_properties<'a>(&self, boxed: ContainerRef<'a>) -> Option<LocatedProperties<'a>> {
        locate_properties(boxed)
    }
}
