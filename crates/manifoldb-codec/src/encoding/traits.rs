//! Encoding and decoding traits for serialization.

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::types::{Edge, Value, Vertex};

/// A trait for types that can be encoded to a standalone document.
///
/// Implementations use a default-configured [`Codec`]. Use the codec
/// directly to apply a custom [`CodecConfig`](crate::CodecConfig).
pub trait Encoder: Sized {
    /// Encode this value to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails (e.g., due to invalid data).
    fn encode(&self) -> Result<Vec<u8>>;

    /// Encode this value into a pre-allocated buffer.
    ///
    /// This method appends the encoded bytes to the provided buffer,
    /// which can be more efficient when encoding multiple values.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<()>;
}

/// A trait for types that can be decoded from a standalone document.
pub trait Decoder: Sized {
    /// Decode a value from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails (e.g., invalid data, truncated input).
    fn decode(bytes: &[u8]) -> Result<Self>;
}

impl Encoder for Value {
    fn encode(&self) -> Result<Vec<u8>> {
        Codec::default().serialize(self)
    }

    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        Codec::default().serialize_into(buf, self)
    }
}

impl Decoder for Value {
    fn decode(bytes: &[u8]) -> Result<Self> {
        Codec::default().deserialize(bytes)
    }
}

impl Encoder for Vertex {
    fn encode(&self) -> Result<Vec<u8>> {
        Value::Vertex(self.clone()).encode()
    }

    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        Value::Vertex(self.clone()).encode_to(buf)
    }
}

impl Decoder for Vertex {
    fn decode(bytes: &[u8]) -> Result<Self> {
        match Value::decode(bytes)? {
            Value::Vertex(v) => Ok(v),
            other => Err(wrong_kind("vertex", &other)),
        }
    }
}

impl Encoder for Edge {
    fn encode(&self) -> Result<Vec<u8>> {
        Value::Edge(self.clone()).encode()
    }

    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        Value::Edge(self.clone()).encode_to(buf)
    }
}

impl Decoder for Edge {
    fn decode(bytes: &[u8]) -> Result<Self> {
        match Value::decode(bytes)? {
            Value::Edge(e) => Ok(e),
            other => Err(wrong_kind("edge", &other)),
        }
    }
}

fn wrong_kind(expected: &str, got: &Value) -> CodecError {
    CodecError::MalformedComposite(format!(
        "expected a {expected} document, got {}",
        got.kind_name()
    ))
}
