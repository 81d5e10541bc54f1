//! Pull iterator over encoded containers.
//!
//! [`Events`] walks a container and yields a flat stream of [`Event`]s:
//! begin/end markers for arrays and objects, keys, object values and array
//! elements. Exhaustion of the iterator is the end of the stream.
//!
//! In [`IterMode::SkipNested`] a nested container is yielded as a single
//! [`Item::Binary`] without looking inside it. In [`IterMode::Recurse`] its
//! begin marker, children and end marker are yielded in place.

use crate::codec::Codec;
use crate::error::{CodecError, Result};

use super::view::{ContainerRef, Item};

/// How nested containers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterMode {
    /// Yield nested containers as borrowed views.
    SkipNested,
    /// Descend into nested containers.
    Recurse,
}

/// One step of the container walk.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// Start of an array.
    BeginArray {
        /// Number of elements.
        len: usize,
        /// Whether this is the one-element box around a root scalar.
        raw_scalar: bool,
    },
    /// Start of an object.
    BeginObject {
        /// Number of pairs.
        len: usize,
    },
    /// An object key; the matching value follows.
    Key(String),
    /// An object value.
    Value(Item<'a>),
    /// An array element.
    Elem(Item<'a>),
    /// End of the innermost array.
    EndArray,
    /// End of the innermost object.
    EndObject,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    Elements,
    Key,
    Value,
}

#[derive(Debug)]
struct Frame<'a> {
    container: ContainerRef<'a>,
    state: State,
    index: usize,
}

impl<'a> Frame<'a> {
    const fn new(container: ContainerRef<'a>) -> Self {
        Self { container, state: State::Start, index: 0 }
    }
}

/// Iterator of [`Event`]s over one container.
///
/// The iterator is fused: after yielding an error it yields nothing more.
#[derive(Debug)]
pub struct Events<'a, 'c> {
    codec: &'c Codec,
    mode: IterMode,
    depth: usize,
    stack: Vec<Frame<'a>>,
    pending: Option<CodecError>,
}

impl<'a, 'c> Events<'a, 'c> {
    /// Walk `container`, whose nesting level is `depth`.
    pub(crate) fn new(
        codec: &'c Codec,
        container: ContainerRef<'a>,
        mode: IterMode,
        depth: usize,
    ) -> Self {
        let pending = codec.check_depth(depth).err();
        let stack = if pending.is_some() { Vec::new() } else { vec![Frame::new(container)] };
        Self { codec, mode, depth, stack, pending }
    }

    /// The mode this iterator runs in.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> IterMode {
        self.mode
    }

    fn fail(&mut self, err: CodecError) -> Option<Result<Event<'a>>> {
        self.stack.clear();
        Some(Err(err))
    }

    /// Level of the innermost open container.
    fn level(&self) -> usize {
        self.depth + self.stack.len().saturating_sub(1)
    }

    /// Either descend into `item` or hand it back for emission.
    fn expand(&mut self, item: Item<'a>) -> Result<Option<Item<'a>>> {
        match item {
            Item::Binary(nested) if self.mode == IterMode::Recurse => {
                self.codec.check_depth(self.level() + 1)?;
                self.stack.push(Frame::new(nested));
                Ok(None)
            }
            item => Ok(Some(item)),
        }
    }
}

impl<'a> Iterator for Events<'a, '_> {
    type Item = Result<Event<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }
        let codec = self.codec;

        loop {
            let level = self.level();
            let frame = self.stack.last_mut()?;
            let container = frame.container;

            match frame.state {
                State::Start => {
                    return Some(Ok(if container.is_object() {
                        frame.state = State::Key;
                        Event::BeginObject { len: container.len() }
                    } else {
                        frame.state = State::Elements;
                        Event::BeginArray { len: container.len(), raw_scalar: container.is_scalar() }
                    }));
                }
                State::Elements => {
                    if frame.index >= container.len() {
                        self.stack.pop();
                        return Some(Ok(Event::EndArray));
                    }
                    let index = frame.index;
                    frame.index += 1;
                    let item = match codec.read_item(&container, index, level) {
                        Ok(item) => item,
                        Err(err) => return self.fail(err),
                    };
                    match self.expand(item) {
                        Ok(Some(item)) => return Some(Ok(Event::Elem(item))),
                        Ok(None) => continue,
                        Err(err) => return self.fail(err),
                    }
                }
                State::Key => {
                    if frame.index >= container.len() {
                        self.stack.pop();
                        return Some(Ok(Event::EndObject));
                    }
                    frame.state = State::Value;
                    return match container.key(frame.index) {
                        Ok(key) => Some(Ok(Event::Key(key))),
                        Err(err) => self.fail(err),
                    };
                }
                State::Value => {
                    let index = container.len() + frame.index;
                    frame.index += 1;
                    frame.state = State::Key;
                    let item = match codec.read_item(&container, index, level) {
                        Ok(item) => item,
                        Err(err) => return self.fail(err),
                    };
                    match self.expand(item) {
                        Ok(Some(item)) => return Some(Ok(Event::Value(item))),
                        Ok(None) => continue,
                        Err(err) => return self.fail(err),
                    }
                }
            }
        }
    }
}

impl Codec {
    /// Iterate the events of `container` as a root-level document.
    pub fn events<'a>(&self, container: ContainerRef<'a>, mode: IterMode) -> Events<'a, '_> {
        Events::new(self, container, mode, 1)
    }

    /// Look up `key` in an object without decoding nested containers.
    ///
    /// Nested containers come back as [`Item::Binary`]. Returns `Ok(None)`
    /// when the key is absent or `container` is not an object.
    ///
    /// # Errors
    ///
    /// Returns an error if a key or a scalar value before the match is corrupt.
    pub fn find_key<'a>(&self, container: ContainerRef<'a>, key: &str) -> Result<Option<Item<'a>>> {
        if !container.is_object() {
            return Ok(None);
        }
        let mut events = self.events(container, IterMode::SkipNested);
        while let Some(event) = events.next() {
            if let Event::Key(k) = event? {
                if k != key {
                    continue;
                }
                return match events.next().transpose()? {
                    Some(Event::Value(item)) => Ok(Some(item)),
                    other => Err(CodecError::MalformedContainer(format!(
                        "key {key:?} not followed by a value: {other:?}"
                    ))),
                };
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Value, Vertex};

    fn doc(value: &Value) -> Vec<u8> {
        Codec::default().serialize(value).unwrap()
    }

    fn collect<'a>(codec: &Codec, bytes: &'a [u8], mode: IterMode) -> Vec<Event<'a>> {
        let c = ContainerRef::new(bytes).unwrap();
        codec.events(c, mode).collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn recurse_mode_expands_nested_containers() {
        let codec = Codec::default();
        let bytes = doc(&Value::object([("a", Value::Array(vec![Value::Integer(1)]))]));
        let events = collect(&codec, &bytes, IterMode::Recurse);
        assert_eq!(
            events,
            vec![
                Event::BeginObject { len: 1 },
                Event::Key("a".to_owned()),
                Event::BeginArray { len: 1, raw_scalar: false },
                Event::Elem(Item::Value(Value::Integer(1))),
                Event::EndArray,
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn skip_mode_yields_binary() {
        let codec = Codec::default();
        let bytes = doc(&Value::object([("a", Value::Array(vec![Value::Integer(1)]))]));
        let events = collect(&codec, &bytes, IterMode::SkipNested);
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[2], Event::Value(Item::Binary(c)) if c.is_array() && c.len() == 1));
    }

    #[test]
    fn composites_are_scalars_in_both_modes() {
        let codec = Codec::default();
        let v = Vertex::new(1, "A").with_property("k", "v");
        let bytes = doc(&Value::Vertex(v.clone()));
        for mode in [IterMode::SkipNested, IterMode::Recurse] {
            let events = collect(&codec, &bytes, mode);
            assert_eq!(
                events,
                vec![
                    Event::BeginArray { len: 1, raw_scalar: true },
                    Event::Elem(Item::Value(Value::Vertex(v.clone()))),
                    Event::EndArray,
                ]
            );
        }
    }

    #[test]
    fn find_key_is_shallow() {
        let codec = Codec::default();
        let bytes = doc(&Value::object([
            ("name", Value::from("Ada")),
            ("nested", Value::object([("deep", 1i64)])),
        ]));
        let c = ContainerRef::new(&bytes).unwrap();

        assert_eq!(codec.find_key(c, "name").unwrap(), Some(Item::Value(Value::from("Ada"))));
        assert!(matches!(codec.find_key(c, "nested").unwrap(), Some(Item::Binary(n)) if n.is_object()));
        assert_eq!(codec.find_key(c, "deep").unwrap(), None);
    }

    #[test]
    fn errors_fuse_the_iterator() {
        let codec = Codec::default();
        let mut bytes = doc(&Value::Array(vec![Value::Null, Value::Null]));
        bytes[8..12].copy_from_slice(&0x6000_0000u32.to_ne_bytes());
        let c = ContainerRef::new(&bytes).unwrap();
        let mut events = codec.events(c, IterMode::Recurse);

        assert!(matches!(events.next(), Some(Ok(Event::BeginArray { .. }))));
        assert!(matches!(events.next(), Some(Ok(Event::Elem(_)))));
        assert!(matches!(events.next(), Some(Err(_))));
        assert!(events.next().is_none());
    }
}
