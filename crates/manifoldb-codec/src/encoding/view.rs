//! Bounds-checked view over an encoded container.
//!
//! [`ContainerRef`] borrows encoded bytes and answers structural questions
//! (kind, child count, child offsets and lengths) without decoding. Every
//! offset or length read from the entry table is checked against the data
//! region before it is used.

use std::fmt;

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::types::Value;

use super::buffer::{int_align, read_u32};
use super::entry::{AgtEntry, EntryKind, COUNT_MASK, F_ARRAY, F_OBJECT, F_SCALAR};

/// A borrowed, validated container.
#[derive(Clone, Copy)]
pub struct ContainerRef<'a> {
    header: u32,
    bytes: &'a [u8],
    children: &'a [u8],
    data: &'a [u8],
}

/// A child read from a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<'a> {
    /// A fully decoded scalar or composite.
    Value(Value),
    /// A nested container that was not expanded.
    Binary(ContainerRef<'a>),
}

impl<'a> ContainerRef<'a> {
    /// Validate the header and entry table at the start of `bytes`.
    ///
    /// `bytes` may extend past the end of the container.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if the header is not exactly
    /// one of array or object, or the entry table does not fit.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let header = read_u32(bytes, 0).ok_or_else(|| CodecError::truncated("container header"))?;
        let count = (header & COUNT_MASK) as usize;
        let n_children = match (header & F_OBJECT != 0, header & F_ARRAY != 0) {
            (true, false) => count * 2,
            (false, true) => count,
            _ => {
                return Err(CodecError::MalformedContainer(format!(
                    "header {header:#x} is neither an array nor an object"
                )))
            }
        };
        if header & F_SCALAR != 0 && (header & F_ARRAY == 0 || count != 1) {
            return Err(CodecError::MalformedContainer(
                "raw scalar flag on a container that is not a one-element array".to_owned(),
            ));
        }

        let table_end = 4 + n_children * 4;
        if bytes.len() < table_end {
            return Err(CodecError::truncated("container entry table"));
        }
        Ok(Self {
            header,
            bytes,
            children: &bytes[4..table_end],
            data: &bytes[table_end..],
        })
    }

    /// Number of elements (arrays) or pairs (objects).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        (self.header & COUNT_MASK) as usize
    }

    /// Whether the container has no children.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the container is an object.
    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.header & F_OBJECT != 0
    }

    /// Whether the container is an array.
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.header & F_ARRAY != 0
    }

    /// Whether the container is a one-element array boxing a root scalar.
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.header & F_SCALAR != 0
    }

    /// The bytes this view was built from, starting at the header.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The data region following the entry table.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of entries in the table (twice [`len`](Self::len) for objects).
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.children.len() / 4
    }

    /// The entry descriptor of child `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if `index` is out of range.
    pub fn entry(&self, index: usize) -> Result<AgtEntry> {
        index
            .checked_mul(4)
            .and_then(|at| read_u32(self.children, at))
            .map(AgtEntry::from_raw)
            .ok_or_else(|| {
                CodecError::MalformedContainer(format!(
                    "entry {index} out of range ({} entries)",
                    self.entry_count()
                ))
            })
    }

    /// Start of child `index` within the data region, before alignment.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] on an out-of-range index or
    /// an offset overflow.
    pub fn offset(&self, index: usize) -> Result<usize> {
        let mut offset = 0usize;
        for i in (0..index).rev() {
            let entry = self.entry(i)?;
            offset = offset
                .checked_add(entry.offlen())
                .ok_or_else(|| CodecError::MalformedContainer("offset overflow".to_owned()))?;
            if entry.has_off() {
                break;
            }
        }
        Ok(offset)
    }

    /// Length of child `index`, including any leading alignment padding.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] on an out-of-range index or
    /// an end offset before the start offset.
    pub fn length(&self, index: usize) -> Result<usize> {
        let entry = self.entry(index)?;
        if entry.has_off() {
            entry.offlen().checked_sub(self.offset(index)?).ok_or_else(|| {
                CodecError::MalformedContainer(format!("entry {index} ends before it starts"))
            })
        } else {
            Ok(entry.offlen())
        }
    }

    /// The `(start, end)` range of child `index` within [`data`](Self::data).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if the range leaves the data region.
    pub fn span(&self, index: usize) -> Result<(usize, usize)> {
        let start = self.offset(index)?;
        let end = start
            .checked_add(self.length(index)?)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                CodecError::MalformedContainer(format!(
                    "entry {index} extends past the {} data bytes",
                    self.data.len()
                ))
            })?;
        Ok((start, end))
    }

    /// Size of the container in bytes: header, entry table and the data up to
    /// the end of its last child.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if the last child leaves the data region.
    pub fn encoded_len(&self) -> Result<usize> {
        let table_end = self.bytes.len() - self.data.len();
        match self.entry_count().checked_sub(1) {
            Some(last) => Ok(table_end + self.span(last)?.1),
            None => Ok(table_end),
        }
    }

    /// Key `index` of an object (`0..len()`).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if the entry is not a valid string.
    pub fn key(&self, index: usize) -> Result<String> {
        let entry = self.entry(index)?;
        if entry.kind() != Some(EntryKind::String) {
            return Err(CodecError::MalformedContainer(format!(
                "object key {index} is not a string (entry {:#x})",
                entry.raw()
            )));
        }
        let (start, end) = self.span(index)?;
        utf8(&self.data[start..end])
    }

    /// The nested container of child `index`, without decoding it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if the child is not a valid container.
    pub fn child_container(&self, index: usize) -> Result<ContainerRef<'a>> {
        let entry = self.entry(index)?;
        if !entry.is_container() {
            return Err(CodecError::MalformedContainer(format!(
                "entry {index} is not a container (entry {:#x})",
                entry.raw()
            )));
        }
        let (start, end) = self.span(index)?;
        let aligned = int_align(start);
        if aligned > end {
            return Err(CodecError::truncated("nested container padding"));
        }
        ContainerRef::new(&self.data[aligned..end])
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CodecError::MalformedContainer(format!("invalid UTF-8: {e}")))
}

impl PartialEq for ContainerRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl fmt::Debug for ContainerRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_object() { "object" } else { "array" };
        f.debug_struct("ContainerRef")
            .field("kind", &kind)
            .field("len", &self.len())
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Codec {
    /// Read child `index` of a container at nesting level `depth`.
    ///
    /// Nested containers come back as [`Item::Binary`]; everything else is decoded.
    pub(crate) fn read_item<'a>(
        &self,
        container: &ContainerRef<'a>,
        index: usize,
        depth: usize,
    ) -> Result<Item<'a>> {
        let entry = container.entry(index)?;
        let kind = entry.kind().ok_or_else(|| {
            CodecError::MalformedContainer(format!("unknown entry kind {:#x}", entry.raw()))
        })?;

        let value = match kind {
            EntryKind::Null => Value::Null,
            EntryKind::BoolFalse => Value::Bool(false),
            EntryKind::BoolTrue => Value::Bool(true),
            EntryKind::String => {
                let (start, end) = container.span(index)?;
                Value::String(utf8(&container.data[start..end])?)
            }
            EntryKind::Extended => {
                let (start, end) = container.span(index)?;
                self.decode_extended(container.data, start, end, depth)?
            }
            EntryKind::Container => return container.child_container(index).map(Item::Binary),
        };
        Ok(Item::Value(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::encoding::container::Field;

    fn encode(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        Codec::default().write_value(&mut buf, Field::Value(value), 0).unwrap();
        buf
    }

    #[test]
    fn offsets_and_lengths() {
        let bytes = encode(&Value::Array(vec!["abc".into(), Value::Null, "de".into()]));
        let c = ContainerRef::new(&bytes).unwrap();
        assert!(c.is_array());
        assert_eq!(c.len(), 3);
        assert_eq!(c.span(0).unwrap(), (0, 3));
        assert_eq!(c.span(1).unwrap(), (3, 3));
        assert_eq!(c.span(2).unwrap(), (3, 5));
        assert!(c.entry(3).is_err());
    }

    #[test]
    fn offsets_across_stride_boundary() {
        let elems: Vec<Value> = (0..40).map(|i| Value::from("x".repeat(i % 3 + 1))).collect();
        let bytes = encode(&Value::Array(elems.clone()));
        let c = ContainerRef::new(&bytes).unwrap();
        let codec = Codec::default();
        for (i, elem) in elems.iter().enumerate() {
            assert_eq!(codec.read_item(&c, i, 1).unwrap(), Item::Value(elem.clone()));
        }
    }

    #[test]
    fn object_keys_and_nested_binary() {
        let value = Value::object([("name", Value::from("n")), ("tags", Value::Array(vec![]))]);
        let bytes = encode(&value);
        let c = ContainerRef::new(&bytes).unwrap();
        assert!(c.is_object());
        assert_eq!(c.entry_count(), 4);
        assert_eq!(c.key(0).unwrap(), "name");
        assert_eq!(c.key(1).unwrap(), "tags");

        match Codec::default().read_item(&c, 3, 1).unwrap() {
            Item::Binary(nested) => {
                assert!(nested.is_array());
                assert!(nested.is_empty());
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_headers() {
        let neither = 0u32.to_ne_bytes();
        assert!(ContainerRef::new(&neither).is_err());

        let both = (F_ARRAY | F_OBJECT).to_ne_bytes();
        assert!(ContainerRef::new(&both).is_err());

        let scalar_object = (1 | F_OBJECT | F_SCALAR).to_ne_bytes();
        assert!(ContainerRef::new(&scalar_object).is_err());

        // Claims 5 entries with no table behind it.
        let short = (5 | F_ARRAY).to_ne_bytes();
        assert!(ContainerRef::new(&short).is_err());
    }

    #[test]
    fn lengths_past_data_are_rejected() {
        let mut bytes = encode(&Value::Array(vec!["abc".into()]));
        // Rewrite the single entry to claim 100 bytes.
        let forged = AgtEntry::new(EntryKind::String, 100).raw();
        bytes[4..8].copy_from_slice(&forged.to_ne_bytes());
        let c = ContainerRef::new(&bytes).unwrap();
        assert!(matches!(c.span(0), Err(CodecError::MalformedContainer(_))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut bytes = encode(&Value::Array(vec!["ab".into()]));
        let n = bytes.len();
        bytes[n - 2] = 0xFF;
        let c = ContainerRef::new(&bytes).unwrap();
        assert!(Codec::default().read_item(&c, 0, 1).is_err());
    }

    #[test]
    fn unknown_entry_kind_is_rejected() {
        let mut bytes = encode(&Value::Array(vec![Value::Null]));
        bytes[4..8].copy_from_slice(&0x1000_0000u32.to_ne_bytes());
        let c = ContainerRef::new(&bytes).unwrap();
        assert!(matches!(
            Codec::default().read_item(&c, 0, 1),
            Err(CodecError::MalformedContainer(_))
        ));
    }
}
