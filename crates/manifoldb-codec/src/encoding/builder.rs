//! Push-style value builder.
//!
//! [`ValueBuilder`] consumes the [`Event`] stream produced by
//! [`Events`](super::iter::Events) and assembles an owned [`Value`] tree.

use std::collections::HashSet;

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::types::Value;

use super::iter::{Event, Events, IterMode};
use super::view::{ContainerRef, Item};

/// Upper bound on capacity reserved from an event's declared length.
const MAX_PREALLOC: usize = 1024;

#[derive(Debug)]
enum Level {
    Array { elems: Vec<Value>, raw_scalar: bool },
    Object { pairs: Vec<(String, Value)>, key: Option<String> },
}

/// Assembles a [`Value`] from container events.
#[derive(Debug, Default)]
pub struct ValueBuilder {
    stack: Vec<Level>,
    result: Option<Value>,
}

fn malformed(msg: &str) -> CodecError {
    CodecError::MalformedContainer(msg.to_owned())
}

/// Owned value of an item; unexpanded containers cannot be owned.
fn owned(item: Item<'_>) -> Result<Value> {
    match item {
        Item::Value(value) => Ok(value),
        Item::Binary(_) => Err(malformed(
            "nested container was not expanded; build from a recursing iterator",
        )),
    }
}

fn check_unique(pairs: &[(String, Value)]) -> Result<()> {
    let mut seen = HashSet::with_capacity(pairs.len());
    for (key, _) in pairs {
        if !seen.insert(key.as_str()) {
            return Err(CodecError::MalformedContainer(format!("duplicate object key {key:?}")));
        }
    }
    Ok(())
}

impl ValueBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if the event does not fit
    /// the current state, carries an unexpanded nested container, opens a
    /// raw scalar array below the root, or closes an object holding a
    /// repeated key.
    pub fn push(&mut self, event: Event<'_>) -> Result<()> {
        if self.result.is_some() {
            return Err(malformed("event after the root value was complete"));
        }
        match event {
            Event::BeginArray { len, raw_scalar } => {
                if raw_scalar && !self.stack.is_empty() {
                    return Err(malformed("raw scalar array below the root"));
                }
                let elems = Vec::with_capacity(len.min(MAX_PREALLOC));
                self.stack.push(Level::Array { elems, raw_scalar });
            }
            Event::BeginObject { len } => {
                let pairs = Vec::with_capacity(len.min(MAX_PREALLOC));
                self.stack.push(Level::Object { pairs, key: None });
            }
            Event::Key(k) => match self.stack.last_mut() {
                Some(Level::Object { key, .. }) if key.is_none() => *key = Some(k),
                _ => return Err(malformed("key outside an object or after another key")),
            },
            Event::Value(item) => {
                let value = owned(item)?;
                match self.stack.last_mut() {
                    Some(Level::Object { pairs, key }) => {
                        let k = key.take().ok_or_else(|| malformed("object value without a key"))?;
                        pairs.push((k, value));
                    }
                    _ => return Err(malformed("object value outside an object")),
                }
            }
            Event::Elem(item) => {
                let value = owned(item)?;
                match self.stack.last_mut() {
                    Some(Level::Array { elems, .. }) => elems.push(value),
                    _ => return Err(malformed("array element outside an array")),
                }
            }
            Event::EndArray => match self.stack.pop() {
                Some(Level::Array { mut elems, raw_scalar }) => {
                    let value = if raw_scalar {
                        match (elems.pop(), elems.is_empty()) {
                            (Some(scalar), true) => scalar,
                            _ => return Err(malformed("raw scalar array must hold one element")),
                        }
                    } else {
                        Value::Array(elems)
                    };
                    self.attach(value)?;
                }
                _ => return Err(malformed("unbalanced end of array")),
            },
            Event::EndObject => match self.stack.pop() {
                Some(Level::Object { pairs, key: None }) => {
                    check_unique(&pairs)?;
                    self.attach(Value::Object(pairs))?;
                }
                _ => return Err(malformed("unbalanced end of object")),
            },
        }
        Ok(())
    }

    fn attach(&mut self, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            None => self.result = Some(value),
            Some(Level::Array { elems, .. }) => elems.push(value),
            Some(Level::Object { pairs, key }) => {
                let k = key.take().ok_or_else(|| malformed("nested container without a key"))?;
                pairs.push((k, value));
            }
        }
        Ok(())
    }

    /// Finish building and return the root value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedContainer`] if a container is still open
    /// or no value was built.
    pub fn finish(self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(malformed("unterminated container"));
        }
        self.result.ok_or_else(|| malformed("no value was built"))
    }
}

impl Codec {
    /// Fully decode `container`, whose nesting level is `depth`.
    pub(crate) fn build(&self, container: ContainerRef<'_>, depth: usize) -> Result<Value> {
        let mut builder = ValueBuilder::new();
        for event in Events::new(self, container, IterMode::Recurse, depth) {
            builder.push(event?)?;
        }
        builder.finish()
    }
}
