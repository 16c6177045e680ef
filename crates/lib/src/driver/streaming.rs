//! JSON backend that serializes straight from the tree.

use std::{
    cell::RefCell,
    io::{Read, Write},
};

use indexmap::IndexMap;
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use super::{Driver, DriverError, into_document, write_json};
use crate::{
    AutoMap, Result, Value,
    codec::{CodecError, MapTagging, TypeCodec},
    constants::{AUTOMAP_MARKER, TYPE_KEY},
};

/// JSON driver that skips the intermediate `serde_json::Value`.
///
/// Dumping streams the tree through `serde` while still consulting the
/// codec's encoder tables, so its output is byte-for-byte what
/// [`JsonDriver`](super::JsonDriver) writes. Loading deserializes directly
/// into [`Value`] and does not upgrade anything: implicit strings stay
/// [`Value::Text`] and explicit wrappers stay maps. Only the AutoMap
/// self-marker is stripped.
#[derive(Debug, Clone, Default)]
pub struct StreamingJsonDriver {
    codec: TypeCodec,
}

impl StreamingJsonDriver {
    /// Creates a driver using `codec` for dumping.
    pub fn new(codec: TypeCodec) -> Self {
        Self { codec }
    }
}

impl Driver for StreamingJsonDriver {
    fn name(&self) -> &'static str {
        "json-stream"
    }

    fn codec(&self) -> &TypeCodec {
        &self.codec
    }

    fn dump_writer(
        &self,
        tree: &AutoMap,
        writer: &mut dyn Write,
        indent: Option<usize>,
    ) -> Result<()> {
        let failure = RefCell::new(None);
        let root = Encoded {
            codec: &self.codec,
            failure: &failure,
            node: Node::Map(tree),
        };
        match write_json(writer, &root, indent) {
            Ok(()) => Ok(()),
            Err(err) => match failure.into_inner() {
                Some(codec_err) => Err(codec_err.into()),
                None => Err(DriverError::from_write(err).into()),
            },
        }
    }

    fn load_reader(&self, reader: &mut dyn Read) -> Result<AutoMap> {
        let value: Value = serde_json::from_reader(reader).map_err(DriverError::from_read)?;
        into_document(value)
    }

    fn load_slice(&self, bytes: &[u8]) -> Result<AutoMap> {
        let value: Value = serde_json::from_slice(bytes).map_err(DriverError::from_read)?;
        into_document(value)
    }
}

#[derive(Clone, Copy)]
enum Node<'a> {
    Value(&'a Value),
    Map(&'a AutoMap),
}

/// Serializes a node with the codec's rules.
///
/// `serde` errors are strings, so codec failures are parked in `failure` and
/// recovered by the caller.
struct Encoded<'a> {
    codec: &'a TypeCodec,
    failure: &'a RefCell<Option<CodecError>>,
    node: Node<'a>,
}

impl<'a> Encoded<'a> {
    fn child(&self, value: &'a Value) -> Self {
        Encoded {
            codec: self.codec,
            failure: self.failure,
            node: Node::Value(value),
        }
    }

    fn fail<E: serde::ser::Error>(&self, err: CodecError) -> E {
        let message = err.to_string();
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        E::custom(message)
    }

    /// Mirrors `TypeCodec::encode_map`: the marker leads, and an entry using
    /// the reserved key takes the marker's place.
    fn serialize_entries<S: Serializer>(
        &self,
        serializer: S,
        entries: &'a IndexMap<String, Value>,
        marker: Option<&str>,
    ) -> std::result::Result<S::Ok, S::Error> {
        let Some(marker) = marker else {
            let mut map = serializer.serialize_map(Some(entries.len()))?;
            for (key, value) in entries {
                map.serialize_entry(key, &self.child(value))?;
            }
            return map.end();
        };

        let reserved = entries.get(TYPE_KEY);
        let len = entries.len() + usize::from(reserved.is_none());
        let mut map = serializer.serialize_map(Some(len))?;
        match reserved {
            Some(value) => map.serialize_entry(TYPE_KEY, &self.child(value))?,
            None => map.serialize_entry(TYPE_KEY, marker)?,
        }
        for (key, value) in entries {
            if key != TYPE_KEY {
                map.serialize_entry(key, &self.child(value))?;
            }
        }
        map.end()
    }
}

impl Serialize for Encoded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let value = match self.node {
            Node::Map(map) => {
                let marker = match self.codec.map_tagging() {
                    MapTagging::Tagged => Some(AUTOMAP_MARKER),
                    MapTagging::Untagged => None,
                };
                return self.serialize_entries(serializer, map.as_index_map(), marker);
            }
            Node::Value(value) => value,
        };

        match value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Value::Float(x) => Err(self.fail(CodecError::UnsupportedType {
                type_name: format!("non-finite float ({x})"),
            })),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Object(entries) => self.serialize_entries(serializer, entries, None),
            Value::Map(map) => Encoded {
                node: Node::Map(map),
                ..*self
            }
            .serialize(serializer),
            extension => match self.codec.encode_extension(extension) {
                Ok(wire) => wire.serialize(serializer),
                Err(err) => Err(self.fail(err)),
            },
        }
    }
}
