//! Translation between [`Value`] trees and JSON wire values.
//!
//! JSON only knows null, booleans, numbers, strings, arrays and objects. The
//! [`TypeCodec`] carries everything else through two registries:
//!
//! - **Implicit** types are written as a bare canonical string
//!   (`"2000-09-01"`) and recovered on load by matching strict text patterns,
//!   tried in registration order.
//! - **Explicit** types are wrapped as `{"__type__": <marker>, "value": <payload>}`
//!   and recovered by dispatching on the marker, so the concrete type survives
//!   even when its text form is ambiguous.
//!
//! On encode the implicit table takes priority over the explicit one. On
//! decode, every object is inspected for a marker first.
//!
//! # AutoMap tagging
//!
//! With [`MapTagging::Tagged`] every `AutoMap` is written with the
//! `"__type__": "AutoMap"` self-marker and untagged objects reload as plain
//! [`Value::Object`]s, which keeps auto-vivifying subtrees distinct from inert
//! ones across a save and load. With the default [`MapTagging::Untagged`]
//! nothing is written and every object reloads as an `AutoMap`. The marker
//! only ever exists on the wire, never inside a map's entries.
//!
//! # Examples
//!
//! ```
//! # use automap::{AutoMap, TypeCodec, Value};
//! # use chrono::NaiveDate;
//! let codec = TypeCodec::default();
//!
//! let mut map = AutoMap::new();
//! map.insert("born", NaiveDate::from_ymd_opt(2000, 9, 1).unwrap());
//!
//! let wire = codec.encode_map(&map)?;
//! assert_eq!(wire.to_string(), r#"{"born":"2000-09-01"}"#);
//!
//! let back = codec.decode_document(wire)?;
//! assert_eq!(back, map);
//! # Ok::<(), automap::Error>(())
//! ```

pub(crate) mod builtin;
mod errors;
pub(crate) mod temporal;

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number, Value as Json};

pub use errors::CodecError;
pub use temporal::{TimeOfDay, Timestamp};

use crate::{
    AutoMap, TypedValue, Value,
    constants::{AUTOMAP_MARKER, TYPE_KEY, VALUE_KEY},
};

/// Converts a value to its bare string form, or declines with `None`.
pub type ImplicitEncoder = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Recognizes the string form of an implicit type.
pub type Recognizer = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Produces the payload of an explicit wrapper.
pub type ExplicitEncoder =
    Arc<dyn Fn(&Value, &TypeCodec) -> Result<Json, CodecError> + Send + Sync>;

/// Rebuilds a value from the payload of an explicit wrapper.
pub type Decoder = Arc<dyn Fn(Json, &TypeCodec) -> Result<Value, CodecError> + Send + Sync>;

/// Whether `AutoMap`s carry the self-marker on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapTagging {
    /// No self-marker; every untagged object decodes to an `AutoMap`.
    #[default]
    Untagged,
    /// Self-marker on every `AutoMap`; untagged objects decode to `Value::Object`.
    Tagged,
}

#[derive(Clone)]
struct ExplicitEntry {
    marker: String,
    encode: ExplicitEncoder,
}

/// Registry of encoders and decoders for non-JSON value types.
///
/// Cheap to clone: registered functions are reference counted.
#[derive(Clone)]
pub struct TypeCodec {
    implicit: IndexMap<String, ImplicitEncoder>,
    recognizers: Vec<(String, Recognizer)>,
    explicit: IndexMap<String, ExplicitEntry>,
    decoders: IndexMap<String, Decoder>,
    map_tagging: MapTagging,
}

impl TypeCodec {
    /// Creates a codec with empty registries.
    ///
    /// Only JSON-native values and maps can be encoded with it.
    pub fn new() -> Self {
        Self {
            implicit: IndexMap::new(),
            recognizers: Vec::new(),
            explicit: IndexMap::new(),
            decoders: IndexMap::new(),
            map_tagging: MapTagging::Untagged,
        }
    }

    /// Built-in types encoded implicitly.
    ///
    /// Decoders for the built-in markers are registered as well, so documents
    /// written with [`TypeCodec::explicit`] still load.
    pub fn implicit() -> Self {
        let mut codec = Self::new();
        for marker in builtin::MARKERS {
            codec.register_implicit(marker, builtin::encode_text, move |text| {
                builtin::recognize(marker, text)
            });
            codec.register_decoder(marker, builtin::decoder(marker));
        }
        codec
    }

    /// Built-in types encoded explicitly.
    ///
    /// No recognizers are registered: a string that happens to look like a
    /// date stays a string.
    pub fn explicit() -> Self {
        let mut codec = Self::new();
        for marker in builtin::MARKERS {
            codec.register_explicit(
                marker,
                marker,
                builtin::encode_payload,
                builtin::decoder(marker),
            );
        }
        codec
    }

    /// Sets the AutoMap tagging mode.
    pub fn with_map_tagging(mut self, map_tagging: MapTagging) -> Self {
        self.map_tagging = map_tagging;
        self
    }

    pub fn map_tagging(&self) -> MapTagging {
        self.map_tagging
    }

    /// Registers an implicit type.
    ///
    /// `encode` is consulted for values whose [`Value::type_name`] equals
    /// `type_name`; returning `None` defers to the explicit table.
    /// `recognize` runs on every decoded string after the recognizers
    /// registered before it.
    pub fn register_implicit<E, R>(
        &mut self,
        type_name: impl Into<String>,
        encode: E,
        recognize: R,
    ) -> &mut Self
    where
        E: Fn(&Value) -> Option<String> + Send + Sync + 'static,
        R: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        let recognize: Recognizer = Arc::new(recognize);
        match self.recognizers.iter_mut().find(|(name, _)| *name == type_name) {
            Some(slot) => slot.1 = recognize,
            None => self.recognizers.push((type_name.clone(), recognize)),
        }
        self.implicit.insert(type_name, Arc::new(encode));
        self
    }

    /// Registers an explicit type: an encoder for values named `type_name`
    /// and a decoder for objects marked with `marker`.
    pub fn register_explicit<E, D>(
        &mut self,
        type_name: impl Into<String>,
        marker: impl Into<String>,
        encode: E,
        decode: D,
    ) -> &mut Self
    where
        E: Fn(&Value, &TypeCodec) -> Result<Json, CodecError> + Send + Sync + 'static,
        D: Fn(Json, &TypeCodec) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        let marker = marker.into();
        self.explicit.insert(
            type_name.into(),
            ExplicitEntry {
                marker: marker.clone(),
                encode: Arc::new(encode),
            },
        );
        self.register_decoder(marker, decode)
    }

    /// Registers a decoder for `marker` without an encoder.
    pub fn register_decoder<D>(&mut self, marker: impl Into<String>, decode: D) -> &mut Self
    where
        D: Fn(Json, &TypeCodec) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.decoders.insert(marker.into(), Arc::new(decode));
        self
    }

    /// Registers [`TypedValue`]s named `type_name` as an explicit type whose
    /// marker is the same name. The payload goes through this codec
    /// recursively.
    ///
    /// ```
    /// # use automap::{AutoMap, TypeCodec, TypedValue, Value};
    /// let mut codec = TypeCodec::default();
    /// codec.register_typed("point");
    ///
    /// let mut map = AutoMap::new();
    /// map.insert("origin", TypedValue::new("point", vec![0, 0]));
    ///
    /// let wire = codec.encode_map(&map)?;
    /// assert_eq!(wire["origin"]["__type__"], "point");
    /// assert_eq!(codec.decode_document(wire)?, map);
    /// # Ok::<(), automap::Error>(())
    /// ```
    pub fn register_typed(&mut self, type_name: impl Into<String>) -> &mut Self {
        let type_name = type_name.into();
        let name = type_name.clone();
        self.register_explicit(
            type_name.clone(),
            type_name,
            |value: &Value, codec: &TypeCodec| match value {
                Value::Typed(typed) => codec.encode(typed.payload()),
                other => Err(CodecError::UnsupportedType {
                    type_name: other.type_name().to_string(),
                }),
            },
            move |payload: Json, codec: &TypeCodec| {
                Ok(Value::Typed(TypedValue::new(name.clone(), codec.decode(payload)?)))
            },
        )
    }

    /// Returns true if values named `type_name` can be encoded.
    pub fn encodes(&self, type_name: &str) -> bool {
        self.implicit.contains_key(type_name) || self.explicit.contains_key(type_name)
    }

    /// Returns true if objects marked with `marker` can be decoded.
    pub fn decodes(&self, marker: &str) -> bool {
        marker == AUTOMAP_MARKER || self.decoders.contains_key(marker)
    }

    /// Encodes a value into its JSON wire form.
    ///
    /// # Errors
    /// [`CodecError::UnsupportedType`] for values with no registered encoder,
    /// including non-finite floats which JSON cannot represent.
    pub fn encode(&self, value: &Value) -> Result<Json, CodecError> {
        match value {
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Int(n) => Ok(Json::from(*n)),
            Value::Float(x) => Number::from_f64(*x).map(Json::Number).ok_or_else(|| {
                CodecError::UnsupportedType {
                    type_name: format!("non-finite float ({x})"),
                }
            }),
            Value::Text(s) => Ok(Json::String(s.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| self.encode(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Object(entries) => self.encode_entries(entries, None),
            Value::Map(map) => self.encode_map(map),
            other => self.encode_extension(other),
        }
    }

    /// Encodes an `AutoMap`, adding the self-marker in tagged mode.
    pub fn encode_map(&self, map: &AutoMap) -> Result<Json, CodecError> {
        let marker = match self.map_tagging {
            MapTagging::Tagged => Some(AUTOMAP_MARKER),
            MapTagging::Untagged => None,
        };
        self.encode_entries(map.as_index_map(), marker)
    }

    /// The marker goes first so it leads the written object. An entry that
    /// itself uses the reserved key replaces it.
    fn encode_entries(
        &self,
        entries: &IndexMap<String, Value>,
        marker: Option<&str>,
    ) -> Result<Json, CodecError> {
        let mut object = JsonMap::with_capacity(entries.len() + usize::from(marker.is_some()));
        if let Some(marker) = marker {
            object.insert(TYPE_KEY.to_string(), Json::from(marker));
        }
        for (key, value) in entries {
            object.insert(key.clone(), self.encode(value)?);
        }
        Ok(Json::Object(object))
    }

    /// Encodes a value that has no JSON-native form.
    pub(crate) fn encode_extension(&self, value: &Value) -> Result<Json, CodecError> {
        let type_name = value.type_name();
        if let Some(text) = self.implicit.get(type_name).and_then(|encode| encode(value)) {
            return Ok(Json::String(text));
        }
        if let Some(entry) = self.explicit.get(type_name) {
            let payload = (entry.encode)(value, self)?;
            let mut wrapper = JsonMap::with_capacity(2);
            wrapper.insert(TYPE_KEY.to_string(), Json::from(entry.marker.as_str()));
            wrapper.insert(VALUE_KEY.to_string(), payload);
            return Ok(Json::Object(wrapper));
        }
        Err(CodecError::UnsupportedType {
            type_name: type_name.to_string(),
        })
    }

    /// Decodes a JSON wire value.
    ///
    /// # Errors
    /// - [`CodecError::UnknownMarker`] for an object whose `__type__` names no
    ///   registered decoder, or is not a string
    /// - [`CodecError::InvalidPayload`] when a decoder rejects its payload
    pub fn decode(&self, wire: Json) -> Result<Value, CodecError> {
        match wire {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => Ok(number_to_value(&n)),
            Json::String(s) => Ok(self.recognize(s)),
            Json::Array(items) => items
                .into_iter()
                .map(|item| self.decode(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Json::Object(object) => self.decode_object(object),
        }
    }

    /// Decodes a whole document, whose top level must be an object.
    ///
    /// In tagged mode an untagged top level is still returned as an
    /// `AutoMap`.
    ///
    /// # Errors
    /// Codec errors from [`TypeCodec::decode`], or
    /// [`DriverError::NotAnObject`](crate::driver::DriverError::NotAnObject)
    /// when the top level is not a map.
    pub fn decode_document(&self, wire: Json) -> crate::Result<AutoMap> {
        let value = self.decode(wire)?;
        crate::driver::into_document(value)
    }

    fn decode_object(&self, mut object: JsonMap<String, Json>) -> Result<Value, CodecError> {
        match object.shift_remove(TYPE_KEY) {
            None => {
                let entries = self.decode_entries(object)?;
                Ok(match self.map_tagging {
                    MapTagging::Untagged => Value::Map(AutoMap::from(entries)),
                    MapTagging::Tagged => Value::Object(entries),
                })
            }
            Some(Json::String(marker)) if marker == AUTOMAP_MARKER => {
                Ok(Value::Map(AutoMap::from(self.decode_entries(object)?)))
            }
            Some(Json::String(marker)) => {
                let Some(decode) = self.decoders.get(&marker) else {
                    return Err(CodecError::UnknownMarker { marker });
                };
                let payload = object.shift_remove(VALUE_KEY).ok_or_else(|| {
                    CodecError::invalid_payload(marker.as_str(), "missing \"value\" field")
                })?;
                decode(payload, self)
            }
            Some(other) => Err(CodecError::UnknownMarker {
                marker: other.to_string(),
            }),
        }
    }

    fn decode_entries(
        &self,
        object: JsonMap<String, Json>,
    ) -> Result<IndexMap<String, Value>, CodecError> {
        object
            .into_iter()
            .map(|(key, value)| Ok((key, self.decode(value)?)))
            .collect()
    }

    /// Runs a string through the implicit recognizers, first match wins.
    pub fn recognize(&self, text: String) -> Value {
        self.recognizers
            .iter()
            .find_map(|(_, recognize)| recognize(&text))
            .unwrap_or(Value::Text(text))
    }
}

impl Default for TypeCodec {
    fn default() -> Self {
        Self::implicit()
    }
}

impl fmt::Debug for TypeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCodec")
            .field("implicit", &self.implicit.keys().collect::<Vec<_>>())
            .field("explicit", &self.explicit.keys().collect::<Vec<_>>())
            .field("decoders", &self.decoders.keys().collect::<Vec<_>>())
            .field("map_tagging", &self.map_tagging)
            .finish()
    }
}

/// Integers that fit `i64` stay integers; everything else becomes a float.
fn number_to_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}
