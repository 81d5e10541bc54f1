//! Extended types: integers, floats and the vertex/edge/path composites.
//!
//! # Format
//!
//! ```text
//! [pad to word][tag: u32][payload]
//! ```
//!
//! - `Integer`: 8 bytes native `i64`
//! - `Float`: 8 bytes native IEEE-754 `f64`
//! - `Vertex`: object `{id, label, properties}`, then padding to word
//! - `Edge`: object `{id, label, end_id, start_id, properties}`, then padding
//! - `Path`: array of vertices and edges, then padding
//!
//! The entry length of an extended value covers everything from the first
//! padding byte to the last trailing padding byte.
//!
//! The composite field order is fixed by [`vertex_fields`] and
//! [`edge_fields`]. Full decoding matches fields by name, but the property
//! locator reads the properties slot by position and relies on this order.

use tracing::debug;

use crate::codec::Codec;
use crate::config::PathElements;
use crate::error::{CodecError, Result};
use crate::types::{Edge, Value, Vertex};

use super::buffer::{int_align, read_8, BufferExt};
use super::container::{checked_len, Field};
use super::entry::{AgtEntry, EntryKind};
use super::header::{read_header, write_header, ExtTag, HEADER_SIZE};
use super::view::ContainerRef;

/// Key of the identifier field.
pub const KEY_ID: &str = "id";
/// Key of the label field.
pub const KEY_LABEL: &str = "label";
/// Key of the property map field.
pub const KEY_PROPERTIES: &str = "properties";
/// Key of an edge's start vertex identifier.
pub const KEY_START_ID: &str = "start_id";
/// Key of an edge's end vertex identifier.
pub const KEY_END_ID: &str = "end_id";

/// Fields of a vertex in encoded order.
pub(crate) fn vertex_fields(v: &Vertex) -> [(&'static str, Field<'_>); 3] {
    [
        (KEY_ID, Field::Int(v.id)),
        (KEY_LABEL, Field::Str(&v.label)),
        (KEY_PROPERTIES, Field::Value(&v.properties)),
    ]
}

/// Fields of an edge in encoded order.
pub(crate) fn edge_fields(e: &Edge) -> [(&'static str, Field<'_>); 5] {
    [
        (KEY_ID, Field::Int(e.id)),
        (KEY_LABEL, Field::Str(&e.label)),
        (KEY_END_ID, Field::Int(e.end_id)),
        (KEY_START_ID, Field::Int(e.start_id)),
        (KEY_PROPERTIES, Field::Value(&e.properties)),
    ]
}

/// Decoded object pairs, consumed field by field during promotion.
struct Fields {
    kind: &'static str,
    pairs: Vec<(String, Value)>,
}

impl Fields {
    fn take(&mut self, key: &str) -> Result<Value> {
        let pos = self.pairs.iter().position(|(k, _)| k == key).ok_or_else(|| {
            CodecError::MalformedComposite(format!("{} is missing field {key}", self.kind))
        })?;
        Ok(self.pairs.swap_remove(pos).1)
    }

    fn int(&mut self, key: &str) -> Result<i64> {
        match self.take(key)? {
            Value::Integer(i) => Ok(i),
            other => Err(CodecError::mistyped_field(key, "an integer", other)),
        }
    }

    fn string(&mut self, key: &str) -> Result<String> {
        match self.take(key)? {
            Value::String(s) => Ok(s),
            other => Err(CodecError::mistyped_field(key, "a string", other)),
        }
    }
}

fn object_pairs(generic: Value, kind: &'static str) -> Result<Fields> {
    match generic {
        Value::Object(pairs) => Ok(Fields { kind, pairs }),
        other => Err(CodecError::MalformedComposite(format!(
            "{kind} body must be an object, got {}",
            other.kind_name()
        ))),
    }
}

/// Promote a decoded generic object to a [`Vertex`].
pub(crate) fn promote_vertex(generic: Value) -> Result<Vertex> {
    let mut fields = object_pairs(generic, "vertex")?;
    let id = fields.int(KEY_ID)?;
    let label = fields.string(KEY_LABEL)?;
    let properties = fields.take(KEY_PROPERTIES)?;
    Ok(Vertex { id, label, properties: Box::new(properties) })
}

/// Promote a decoded generic object to an [`Edge`].
pub(crate) fn promote_edge(generic: Value) -> Result<Edge> {
    let mut fields = object_pairs(generic, "edge")?;
    let id = fields.int(KEY_ID)?;
    let start_id = fields.int(KEY_START_ID)?;
    let end_id = fields.int(KEY_END_ID)?;
    let label = fields.string(KEY_LABEL)?;
    let properties = fields.take(KEY_PROPERTIES)?;
    Ok(Edge { id, start_id, end_id, label, properties: Box::new(properties) })
}

impl Codec {
    /// Encode an extended value found inside a container at level `depth`.
    pub(crate) fn encode_extended(
        &self,
        buf: &mut Vec<u8>,
        value: &Value,
        depth: usize,
    ) -> Result<AgtEntry> {
        match value {
            Value::Integer(i) => self.write_integer(buf, *i),
            Value::Float(f) => write_fixed(buf, ExtTag::Float, f.to_ne_bytes()),
            Value::Vertex(v) => self.write_composite(buf, ExtTag::Vertex, |codec, buf| {
                codec.write_object(buf, &vertex_fields(v), depth + 1)
            }),
            Value::Edge(e) => self.write_composite(buf, ExtTag::Edge, |codec, buf| {
                codec.write_object(buf, &edge_fields(e), depth + 1)
            }),
            Value::Path(elems) => {
                self.check_path(elems)?;
                self.write_composite(buf, ExtTag::Path, |codec, buf| {
                    codec.write_array(buf, elems, false, depth + 1)
                })
            }
            other => Err(CodecError::UnsupportedKind(other.kind_name())),
        }
    }

    pub(crate) fn write_integer(&self, buf: &mut Vec<u8>, i: i64) -> Result<AgtEntry> {
        write_fixed(buf, ExtTag::Integer, i.to_ne_bytes())
    }

    fn write_composite<F>(&self, buf: &mut Vec<u8>, tag: ExtTag, body: F) -> Result<AgtEntry>
    where
        F: FnOnce(&Self, &mut Vec<u8>) -> Result<AgtEntry>,
    {
        let start = buf.len();
        write_header(buf, tag);
        body(self, buf)?;
        // Trailing padding keeps the next sibling's computed offset exact.
        buf.pad_to_word();
        Ok(AgtEntry::new(EntryKind::Extended, checked_len(buf.len() - start)?))
    }

    pub(crate) fn check_path(&self, elems: &[Value]) -> Result<()> {
        if self.config().path_elements == PathElements::Any {
            return Ok(());
        }
        match elems.iter().position(|e| !matches!(e, Value::Vertex(_) | Value::Edge(_))) {
            Some(i) => Err(CodecError::MalformedComposite(format!(
                "path element {i} is a {}, expected a vertex or edge",
                elems[i].kind_name()
            ))),
            None => Ok(()),
        }
    }

    /// Decode the extended value whose entry spans `offset..end` of `data`.
    ///
    /// `depth` is the nesting level of the container holding the entry.
    pub(crate) fn decode_extended(
        &self,
        data: &[u8],
        offset: usize,
        end: usize,
        depth: usize,
    ) -> Result<Value> {
        let bytes = data
            .get(..end)
            .filter(|_| offset <= end)
            .ok_or_else(|| CodecError::truncated("extended value"))?;
        let base = int_align(offset);
        let tag = read_header(bytes, base)?;
        let payload = base + HEADER_SIZE;

        match tag {
            ExtTag::Integer => read_8(bytes, payload)
                .map(|b| Value::Integer(i64::from_ne_bytes(b)))
                .ok_or_else(|| CodecError::truncated("integer payload")),
            ExtTag::Float => read_8(bytes, payload)
                .map(|b| Value::Float(f64::from_ne_bytes(b)))
                .ok_or_else(|| CodecError::truncated("float payload")),
            ExtTag::Vertex | ExtTag::Edge | ExtTag::Path => {
                let body = bytes.get(payload..).ok_or_else(|| CodecError::truncated("composite"))?;
                let container = ContainerRef::new(body)?;
                self.decode_composite(tag, container, depth + 1).map_err(|err| {
                    debug!(?tag, %err, "composite decode failed");
                    err
                })
            }
        }
    }

    /// Decode a composite body at nesting level `depth` and promote it by tag.
    fn decode_composite(
        &self,
        tag: ExtTag,
        container: ContainerRef<'_>,
        depth: usize,
    ) -> Result<Value> {
        let shaped = match tag {
            ExtTag::Vertex | ExtTag::Edge => container.is_object(),
            ExtTag::Path => container.is_array() && !container.is_scalar(),
            ExtTag::Integer | ExtTag::Float => return Err(CodecError::CorruptHeader(tag.as_u32())),
        };
        if !shaped {
            let kind = if container.is_object() { "object" } else { "array" };
            return Err(CodecError::MalformedComposite(format!(
                "{tag:?} body has the wrong container shape ({kind}, raw scalar: {})",
                container.is_scalar()
            )));
        }
        let generic = self.build(container, depth)?;
        match tag {
            ExtTag::Vertex => promote_vertex(generic).map(Value::Vertex),
            ExtTag::Edge => promote_edge(generic).map(Value::Edge),
            ExtTag::Path => match generic {
                Value::Array(elems) => {
                    self.check_path(&elems)?;
                    Ok(Value::Path(elems))
                }
                other => Err(CodecError::MalformedComposite(format!(
                    "path body must be an array, got {}",
                    other.kind_name()
                ))),
            },
            ExtTag::Integer | ExtTag::Float => Err(CodecError::CorruptHeader(tag.as_u32())),
        }
    }
}

fn write_fixed(buf: &mut Vec<u8>, tag: ExtTag, payload: [u8; 8]) -> Result<AgtEntry> {
    let start = buf.len();
    write_header(buf, tag);
    buf.extend_from_slice(&payload);
    Ok(AgtEntry::new(EntryKind::Extended, checked_len(buf.len() - start)?))
}
