//! Property-based tests for the codec.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

use proptest::prelude::*;

use crate::codec::Codec;
use crate::encoding::container::Field;
use crate::encoding::entry::{AgtEntry, EntryKind, F_ARRAY, F_SCALAR};
use crate::encoding::extended::{edge_fields, vertex_fields};
use crate::encoding::header::{write_header, ExtTag};
use crate::encoding::view::ContainerRef;
use crate::encoding::{Decoder, Encoder};
use crate::types::{Edge, Value, Vertex};

/// Strategy for generic scalars and extended numbers.
fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        // Filter out NaN since NaN != NaN
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(Value::Float),
        ".{0,40}".prop_map(Value::String),
    ]
}

/// Strategy for arrays and objects of leaves, nested a few levels.
fn arb_generic() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(
        3,  // depth
        48, // size
        6,  // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,10}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for a property map.
fn arb_properties() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-zA-Z_][a-zA-Z0-9_]{0,12}", arb_generic(), 0..8)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    (any::<i64>(), "[A-Z][a-zA-Z]{0,10}", arb_properties())
        .prop_map(|(id, label, properties)| Vertex::new(id, label).with_properties(properties))
}

fn arb_edge() -> impl Strategy<Value = Edge> {
    (any::<i64>(), any::<i64>(), any::<i64>(), "[A-Z][A-Z_]{0,10}", arb_properties()).prop_map(
        |(id, start, end, label, properties)| {
            Edge::new(id, start, end, label).with_properties(properties)
        },
    )
}

/// Strategy for any value the default codec accepts.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => arb_generic(),
        1 => arb_vertex().prop_map(Value::Vertex),
        1 => arb_edge().prop_map(Value::Edge),
        1 => prop::collection::vec(
            prop_oneof![
                arb_vertex().prop_map(Value::Vertex),
                arb_edge().prop_map(Value::Edge),
            ],
            0..4,
        )
        .prop_map(Value::Path),
    ]
}

/// Encode a vertex body with its fields in the order given by `order`.
fn vertex_with_field_order(v: &Vertex, order: &[usize]) -> Vec<u8> {
    let fields = vertex_fields(v);
    let permuted: Vec<(&str, Field<'_>)> = order.iter().map(|&i| fields[i]).collect();
    composite_document(ExtTag::Vertex, &permuted)
}

fn edge_with_field_order(e: &Edge, order: &[usize]) -> Vec<u8> {
    let fields = edge_fields(e);
    let permuted: Vec<(&str, Field<'_>)> = order.iter().map(|&i| fields[i]).collect();
    composite_document(ExtTag::Edge, &permuted)
}

/// A root document boxing one composite with the given body pairs.
fn composite_document(tag: ExtTag, pairs: &[(&str, Field<'_>)]) -> Vec<u8> {
    let mut inner = Vec::new();
    write_header(&mut inner, tag);
    Codec::default().write_object(&mut inner, pairs, 2).expect("body should encode");
    // Trailing padding, as the composite encoder writes it.
    while inner.len() % 4 != 0 {
        inner.push(0);
    }

    let len = u32::try_from(inner.len()).expect("small document");
    let entry = AgtEntry::new(EntryKind::Extended, len).with_end_offset(len);
    let mut doc = Vec::new();
    doc.extend_from_slice(&(1 | F_ARRAY | F_SCALAR).to_ne_bytes());
    doc.extend_from_slice(&entry.raw().to_ne_bytes());
    doc.extend_from_slice(&inner);
    doc
}

proptest! {
    #[test]
    fn value_roundtrip(value in arb_value()) {
        let encoded = value.encode().expect("encoding should succeed");
        let decoded = Value::decode(&encoded).expect("decoding should succeed");
        prop_assert_eq!(value, decoded);
    }

    #[test]
    fn extended_value_roundtrip_at_any_offset(value in arb_value(), prefix in 0usize..8) {
        let codec = Codec::default();
        let mut buf = vec![0u8; prefix];
        match codec.encode(&mut buf, &value) {
            Ok(entry) => {
                prop_assert_eq!(entry.offlen(), buf.len() - prefix);
                prop_assert_eq!(codec.decode(&buf, prefix).expect("decoding should succeed"), value);
            }
            Err(err) => {
                prop_assert!(!err.is_fatal());
                prop_assert_eq!(buf.len(), prefix);
            }
        }
    }

    #[test]
    fn encoding_is_deterministic(value in arb_value()) {
        let codec = Codec::default();
        let first = codec.serialize(&value).expect("encoding should succeed");
        let second = codec.serialize(&value).expect("encoding should succeed");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn vertex_decode_ignores_field_order(
        vertex in arb_vertex(),
        order in Just(vec![0usize, 1, 2]).prop_shuffle(),
    ) {
        let doc = vertex_with_field_order(&vertex, &order);
        let decoded = Codec::default().deserialize(&doc).expect("decoding should succeed");
        prop_assert_eq!(decoded, Value::Vertex(vertex));
    }

    #[test]
    fn edge_decode_ignores_field_order(
        edge in arb_edge(),
        order in Just(vec![0usize, 1, 2, 3, 4]).prop_shuffle(),
    ) {
        let doc = edge_with_field_order(&edge, &order);
        let decoded = Codec::default().deserialize(&doc).expect("decoding should succeed");
        prop_assert_eq!(decoded, Value::Edge(edge));
    }

    #[test]
    fn located_vertex_properties_match_full_decode(vertex in arb_vertex()) {
        let codec = Codec::default();
        let bytes = codec.serialize(&Value::Vertex(vertex.clone())).expect("encoding should succeed");
        let doc = ContainerRef::new(&bytes).expect("valid document");

        let located = codec.locate_properties(doc).expect("vertex properties should be found");
        prop_assert_eq!(located.tag, ExtTag::Vertex);
        let props = codec.decode_container(located.properties).expect("properties should decode");
        prop_assert_eq!(&props, vertex.properties.as_ref());

        match codec.decode_container(doc).expect("decoding should succeed") {
            Value::Vertex(full) => prop_assert_eq!(props, *full.properties),
            other => prop_assert!(false, "expected a vertex, got {}", other.kind_name()),
        }
    }

    #[test]
    fn located_edge_properties_match_full_decode(edge in arb_edge()) {
        let codec = Codec::default();
        let bytes = codec.serialize(&Value::Edge(edge.clone())).expect("encoding should succeed");
        let doc = ContainerRef::new(&bytes).expect("valid document");

        let located = codec.locate_properties(doc).expect("edge properties should be found");
        prop_assert_eq!(located.tag, ExtTag::Edge);
        let props = codec.decode_container(located.properties).expect("properties should decode");
        prop_assert_eq!(&props, edge.properties.as_ref());
    }

    /// Corrupted/arbitrary bytes should not crash, only return errors.
    #[test]
    fn arbitrary_bytes_dont_crash(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let codec = Codec::default();
        let _ = codec.deserialize(&bytes);
        let _ = codec.decode(&bytes, 0);
        if let Ok(doc) = ContainerRef::new(&bytes) {
            let _ = codec.locate_properties(doc);
        }
    }

    /// Truncated valid encodings should return errors, not panic.
    #[test]
    fn truncated_encoding_returns_error(value in arb_value()) {
        let codec = Codec::default();
        let encoded = codec.serialize(&value).expect("encoding should succeed");
        for truncate_at in 0..encoded.len() {
            let truncated = &encoded[..truncate_at];
            let _ = codec.deserialize(truncated);
            if let Ok(doc) = ContainerRef::new(truncated) {
                let _ = codec.locate_properties(doc);
            }
        }
    }

    /// Mutated encodings should return errors or valid values, never panic.
    #[test]
    fn mutated_encoding_returns_error_or_value(
        value in arb_value(),
        mutation_idx in any::<usize>(),
        mutation_val in any::<u8>()
    ) {
        let codec = Codec::default();
        let mut encoded = codec.serialize(&value).expect("encoding should succeed");
        let idx = mutation_idx % encoded.len();
        encoded[idx] = mutation_val;
        let _ = codec.deserialize(&encoded);
        if let Ok(doc) = ContainerRef::new(&encoded) {
            let _ = codec.locate_properties(doc);
        }
    }
}
