//! The codec entry point.

use tracing::debug;

use crate::config::CodecConfig;
use crate::encoding::entry::AgtEntry;
use crate::encoding::view::ContainerRef;
use crate::error::{CodecError, Result};
use crate::types::Value;

/// Encoder and decoder for graph values.
///
/// A `Codec` holds only its configuration and can be shared freely between
/// threads. Encoding appends to a caller-owned buffer; decoding borrows the
/// input and returns owned values.
///
/// # Example
///
/// ```
/// use manifoldb_codec::{Codec, Value, Vertex};
///
/// let codec = Codec::default();
/// let alice = Vertex::new(1, "Person").with_property("name", "Alice");
///
/// let bytes = codec.serialize(&Value::Vertex(alice.clone())).unwrap();
/// assert_eq!(codec.deserialize(&bytes).unwrap(), Value::Vertex(alice));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the given configuration.
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Append the extended encoding of `value` to `buf`.
    ///
    /// Returns the entry describing what was written: kind extended, length
    /// covering the alignment padding, the tag and the payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedKind`](crate::CodecError::UnsupportedKind)
    /// for values with no extended form (null, bool, string, array, object),
    /// leaving `buf` untouched. Other errors are fatal and may leave a
    /// partial write behind.
    pub fn encode(&self, buf: &mut Vec<u8>, value: &Value) -> Result<AgtEntry> {
        self.encode_extended(buf, value, 0)
    }

    /// Decode the extended value starting at `offset` in `data`.
    ///
    /// `offset` is where the encoder started writing, before any alignment
    /// padding.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CorruptHeader`](crate::CodecError::CorruptHeader)
    /// on an unknown tag, and a malformed error when the payload is truncated
    /// or a composite body does not have the required fields.
    pub fn decode(&self, data: &[u8], offset: usize) -> Result<Value> {
        self.decode_extended(data, offset, data.len(), 0)
    }

    /// Encode `value` as a standalone document.
    ///
    /// # Errors
    ///
    /// Returns an error if the value nests too deeply, holds a duplicate
    /// object key, violates the path policy or is too large to encode.
    pub fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf, value)?;
        Ok(buf)
    }

    /// Append a standalone document for `value` to `buf`.
    ///
    /// `buf` should be empty or word aligned; the document starts at the next
    /// word boundary.
    ///
    /// # Errors
    ///
    /// See [`serialize`](Self::serialize).
    pub fn serialize_into(&self, buf: &mut Vec<u8>, value: &Value) -> Result<()> {
        self.write_document(buf, value)
    }

    /// Decode a document produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a well-formed document, or if
    /// bytes follow the end of the root container.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        let container = ContainerRef::new(bytes).map_err(|err| {
            debug!(%err, len = bytes.len(), "rejected document header");
            err
        })?;
        let used = container.encoded_len()?;
        if used != bytes.len() {
            debug!(used, len = bytes.len(), "trailing bytes after document");
            return Err(CodecError::MalformedContainer(format!(
                "{} trailing bytes after a {used}-byte document",
                bytes.len() - used
            )));
        }
        self.decode_container(container)
    }

    /// Fully decode a root container.
    ///
    /// A raw-scalar box decodes to the value it holds.
    ///
    /// # Errors
    ///
    /// Returns an error if any child is malformed.
    pub fn decode_container(&self, container: ContainerRef<'_>) -> Result<Value> {
        self.build(container, 1)
    }
}
