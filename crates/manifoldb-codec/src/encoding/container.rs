//! Generic container serializer.
//!
//! # Format
//!
//! A container is written as:
//! - padding to word alignment
//! - 4 bytes header (count | kind flags)
//! - one 4-byte [`AgtEntry`] per child (objects: all keys, then all values)
//! - the children's bytes, back to back
//!
//! Strings are unpadded. Nested containers and extended values pad
//! themselves, and count that padding in their own entry length, so the
//! start of child `i` is always the sum of the lengths before it.

use std::collections::HashSet;

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::types::Value;

use super::buffer::BufferExt;
use super::entry::{AgtEntry, EntryKind, COUNT_MASK, F_ARRAY, F_OBJECT, F_SCALAR, MAX_LEN, OFFSET_STRIDE};

/// A borrowed child handed to the serializer.
///
/// Composite encoders use this to lay out their fixed fields straight from
/// the typed struct, without building an owned object first.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Field<'a> {
    Int(i64),
    Str(&'a str),
    Value(&'a Value),
}

pub(crate) fn checked_len(len: usize) -> Result<u32> {
    if len > MAX_LEN {
        return Err(CodecError::TooLarge { size: len, max: MAX_LEN });
    }
    u32::try_from(len).map_err(|_| CodecError::TooLarge { size: len, max: MAX_LEN })
}

fn checked_count(count: usize) -> Result<u32> {
    let max = COUNT_MASK as usize;
    if count > max {
        return Err(CodecError::TooLarge { size: count, max });
    }
    u32::try_from(count).map_err(|_| CodecError::TooLarge { size: count, max })
}

/// Tracks the running data length of a container and fixes up its entry table.
struct EntryTable {
    table: usize,
    total: usize,
}

impl EntryTable {
    fn record(&mut self, buf: &mut Vec<u8>, index: usize, entry: AgtEntry) -> Result<()> {
        self.total = self
            .total
            .checked_add(entry.offlen())
            .ok_or(CodecError::TooLarge { size: usize::MAX, max: MAX_LEN })?;
        let total = checked_len(self.total)?;
        let entry = if index % OFFSET_STRIDE == 0 { entry.with_end_offset(total) } else { entry };
        buf.write_u32_at(self.table + index * 4, entry.raw())
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<AgtEntry> {
    let len = checked_len(s.len())?;
    buf.extend_from_slice(s.as_bytes());
    Ok(AgtEntry::new(EntryKind::String, len))
}

impl Codec {
    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config().max_depth {
            return Err(CodecError::DepthExceeded { limit: self.config().max_depth });
        }
        Ok(())
    }

    /// Write one child of a container whose own nesting level is `depth`.
    pub(crate) fn write_value(
        &self,
        buf: &mut Vec<u8>,
        field: Field<'_>,
        depth: usize,
    ) -> Result<AgtEntry> {
        let value = match field {
            Field::Int(i) => return self.write_integer(buf, i),
            Field::Str(s) => return write_string(buf, s),
            Field::Value(value) => value,
        };

        match value {
            Value::Null => Ok(AgtEntry::new(EntryKind::Null, 0)),
            Value::Bool(false) => Ok(AgtEntry::new(EntryKind::BoolFalse, 0)),
            Value::Bool(true) => Ok(AgtEntry::new(EntryKind::BoolTrue, 0)),
            Value::String(s) => write_string(buf, s),
            Value::Array(elems) => self.write_array(buf, elems, false, depth + 1),
            Value::Object(pairs) => {
                let mut seen = HashSet::with_capacity(pairs.len());
                let mut fields = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    if !seen.insert(key.as_str()) {
                        return Err(CodecError::MalformedContainer(format!(
                            "duplicate object key {key:?}"
                        )));
                    }
                    fields.push((key.as_str(), Field::Value(value)));
                }
                self.write_object(buf, &fields, depth + 1)
            }
            Value::Integer(_) | Value::Float(_) | Value::Vertex(_) | Value::Edge(_) | Value::Path(_) => {
                self.encode_extended(buf, value, depth)
            }
        }
    }

    /// Write an array container at nesting level `depth`.
    pub(crate) fn write_array(
        &self,
        buf: &mut Vec<u8>,
        elems: &[Value],
        raw_scalar: bool,
        depth: usize,
    ) -> Result<AgtEntry> {
        self.check_depth(depth)?;
        let base = buf.len();
        buf.pad_to_word();

        let mut header = checked_count(elems.len())? | F_ARRAY;
        if raw_scalar {
            header |= F_SCALAR;
        }
        buf.extend_from_slice(&header.to_ne_bytes());

        let mut table = EntryTable { table: buf.reserve_bytes(elems.len() * 4), total: 0 };
        for (i, elem) in elems.iter().enumerate() {
            let entry = self.write_value(buf, Field::Value(elem), depth)?;
            table.record(buf, i, entry)?;
        }

        Ok(AgtEntry::new(EntryKind::Container, checked_len(buf.len() - base)?))
    }

    /// Write an object container at nesting level `depth`, keys in the given order.
    pub(crate) fn write_object(
        &self,
        buf: &mut Vec<u8>,
        pairs: &[(&str, Field<'_>)],
        depth: usize,
    ) -> Result<AgtEntry> {
        self.check_depth(depth)?;
        let base = buf.len();
        buf.pad_to_word();

        let n = pairs.len();
        let header = checked_count(n)? | F_OBJECT;
        buf.extend_from_slice(&header.to_ne_bytes());

        let mut table = EntryTable { table: buf.reserve_bytes(n * 2 * 4), total: 0 };
        for (i, (key, _)) in pairs.iter().enumerate() {
            let entry = write_string(buf, key)?;
            table.record(buf, i, entry)?;
        }
        for (i, (_, value)) in pairs.iter().enumerate() {
            let entry = self.write_value(buf, *value, depth)?;
            table.record(buf, n + i, entry)?;
        }

        Ok(AgtEntry::new(EntryKind::Container, checked_len(buf.len() - base)?))
    }

    /// Append a whole document for `value`.
    ///
    /// Arrays and objects become the root container; any other value is
    /// boxed in a one-element raw-scalar array.
    pub(crate) fn write_document(&self, buf: &mut Vec<u8>, value: &Value) -> Result<()> {
        match value {
            Value::Array(_) | Value::Object(_) => {
                self.write_value(buf, Field::Value(value), 0)?;
            }
            scalar => {
                self.write_array(buf, std::slice::from_ref(scalar), true, 1)?;
            }
        }
        Ok(())
    }
}
