//! Value types stored inside an `AutoMap`.
//!
//! This module provides the [`Value`] enum covering every kind of data an
//! `AutoMap` can hold: JSON primitives, plain sequences and maps, nested
//! auto-vivifying maps, and the extension types (timestamps, dates, times,
//! identifiers and user-defined typed values) that the codec knows how to
//! carry through JSON.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
};
use uuid::Uuid;

use super::AutoMap;
use crate::{
    codec::{TimeOfDay, Timestamp, temporal},
    constants::{
        AUTOMAP_MARKER, DATE_MARKER, DATETIME_MARKER, TIME_MARKER, TYPE_KEY, UUID_MARKER,
        VALUE_KEY,
    },
};

/// A value stored in an [`AutoMap`].
///
/// # Value Types
///
/// ## Primitives
/// - [`Value::Null`], [`Value::Bool`], [`Value::Int`], [`Value::Float`], [`Value::Text`]
///
/// ## Containers
/// - [`Value::List`] - a plain sequence, never auto-vivifying
/// - [`Value::Object`] - a plain ordered map, never auto-vivifying
/// - [`Value::Map`] - a nested [`AutoMap`]
///
/// ## Extension types
/// - [`Value::DateTime`], [`Value::Date`], [`Value::Time`], [`Value::Uuid`]
/// - [`Value::Typed`] - a user-defined type carried by name
///
/// # Equality
///
/// A `Map` and an `Object` with the same entries compare equal: how a map was
/// built never leaks into comparisons.
///
/// ```
/// # use automap::{AutoMap, Value};
/// # use indexmap::IndexMap;
/// let mut auto = AutoMap::new();
/// auto.insert("name", "Alice");
///
/// let mut plain = IndexMap::new();
/// plain.insert("name".to_string(), Value::from("Alice"));
///
/// assert_eq!(Value::Map(auto), Value::Object(plain));
/// assert!(Value::from("Alice") == "Alice");
/// assert!(42 == Value::from(42));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// JSON null
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Text string value
    Text(String),
    /// Plain ordered sequence of values
    List(Vec<Value>),
    /// Plain ordered map that does not auto-vivify
    Object(IndexMap<String, Value>),
    /// Nested auto-vivifying map
    Map(AutoMap),
    /// Date and time of day
    DateTime(Timestamp),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(TimeOfDay),
    /// Unique identifier
    Uuid(Uuid),
    /// User-defined value identified by its type name
    Typed(TypedValue),
}

/// A user-defined value: a type name plus a payload.
///
/// The codec looks up encoders and decoders by `type_name`, so registering a
/// name with [`TypeCodec::register_typed`](crate::TypeCodec::register_typed)
/// makes values of that name serializable.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    type_name: String,
    payload: Box<Value>,
}

impl TypedValue {
    /// Creates a typed value.
    pub fn new(type_name: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            payload: Box::new(payload.into()),
        }
    }

    /// Returns the type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consumes the typed value, returning its payload.
    pub fn into_payload(self) -> Value {
        *self.payload
    }
}

impl Value {
    /// Returns the runtime type name used for codec lookups and error messages.
    ///
    /// Built-in extension types use their wire markers, `Map` uses the
    /// AutoMap self-marker and typed values report their own name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Map(_) => AUTOMAP_MARKER,
            Value::DateTime(_) => DATETIME_MARKER,
            Value::Date(_) => DATE_MARKER,
            Value::Time(_) => TIME_MARKER,
            Value::Uuid(_) => UUID_MARKER,
            Value::Typed(typed) => typed.type_name(),
        }
    }

    /// Returns true for null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for either kind of map
    pub fn is_map_like(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Object(_))
    }

    /// Returns true for values that need the codec to reach JSON
    pub fn is_extension(&self) -> bool {
        matches!(
            self,
            Value::DateTime(_) | Value::Date(_) | Value::Time(_) | Value::Uuid(_) | Value::Typed(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&AutoMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut AutoMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Timestamp> {
        match self {
            Value::DateTime(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&TimeOfDay> {
        match self {
            Value::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_typed(&self) -> Option<&TypedValue> {
        match self {
            Value::Typed(typed) => Some(typed),
            _ => None,
        }
    }

    /// Literal containment used by `AutoMap::contains_path` once the walk
    /// leaves the auto-vivifying part of the tree.
    ///
    /// A single key is looked up natively: object keys, list elements, or a
    /// substring of text. More than one key is searched for as a literal list
    /// of strings.
    pub(crate) fn contains_literal<K: AsRef<str>>(&self, keys: &[K]) -> bool {
        match (self, keys) {
            (_, []) => false,
            (Value::Object(entries), [key]) => entries.contains_key(key.as_ref()),
            (Value::List(items), [key]) => items.iter().any(|item| *item == key.as_ref()),
            (Value::Text(text), [key]) => text.contains(key.as_ref()),
            (Value::List(items), keys) => {
                let tuple = Value::List(keys.iter().map(|k| Value::from(k.as_ref())).collect());
                items.contains(&tuple)
            }
            _ => false,
        }
    }

    /// Canonical text of a built-in extension value, as used for implicit
    /// encoding. `None` for every other variant.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Value::DateTime(ts) => Some(ts.to_string()),
            Value::Date(date) => Some(temporal::format_date(*date)),
            Value::Time(time) => Some(time.to_string()),
            Value::Uuid(id) => Some(id.hyphenated().to_string()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(map), Value::Object(entries)) | (Value::Object(entries), Value::Map(map)) => {
                map == entries
            }
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Typed(a), Value::Typed(b)) => a == b,
            _ => false,
        }
    }
}

/// Compact JSON rendering with extension types in their canonical text form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Looks up a key in either kind of map.
    ///
    /// # Panics
    /// Panics if the value is not a map or the key is absent.
    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Map(map) => &map[key],
            Value::Object(entries) => entries
                .get(key)
                .unwrap_or_else(|| panic!("no entry found for key {key:?}")),
            other => panic!("cannot index into {} with key {key:?}", other.type_name()),
        }
    }
}

impl IndexMut<&str> for Value {
    /// Auto-vivifying access on `Map`; plain lookup on `Object`.
    ///
    /// # Panics
    /// Panics if the value is not a map, or if it is an `Object` without the key.
    fn index_mut(&mut self, key: &str) -> &mut Value {
        match self {
            Value::Map(map) => map.get_or_create(key),
            Value::Object(entries) => entries
                .get_mut(key)
                .unwrap_or_else(|| panic!("no entry found for key {key:?}")),
            other => panic!("cannot index into {} with key {key:?}", other.type_name()),
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Value::List(items) => &items[index],
            other => panic!("cannot index into {} with position {index}", other.type_name()),
        }
    }
}

impl IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        match self {
            Value::List(items) => &mut items[index],
            other => panic!("cannot index into {} with position {index}", other.type_name()),
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<AutoMap> for Value {
    fn from(value: AutoMap) -> Self {
        Value::Map(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Object(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::DateTime(value.into())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value.into())
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value.into())
    }
}

impl From<TimeOfDay> for Value {
    fn from(value: TimeOfDay) -> Self {
        Value::Time(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        Value::Typed(value)
    }
}

// Direct comparisons with primitives
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(x) if x == other)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

/// Serializes with the built-in conventions and no codec: extension types
/// become their canonical text, typed values an explicit wrapper, and maps
/// carry no self-marker.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => serialize_entries(serializer, entries),
            Value::Map(map) => serialize_entries(serializer, map.as_index_map()),
            Value::Typed(typed) => {
                let mut wrapper = serializer.serialize_map(Some(2))?;
                wrapper.serialize_entry(TYPE_KEY, typed.type_name())?;
                wrapper.serialize_entry(VALUE_KEY, typed.payload())?;
                wrapper.end()
            }
            Value::DateTime(ts) => serializer.collect_str(ts),
            Value::Date(date) => serializer.serialize_str(&temporal::format_date(*date)),
            Value::Time(time) => serializer.collect_str(time),
            Value::Uuid(id) => serializer.collect_str(&id.hyphenated()),
        }
    }
}

fn serialize_entries<S: Serializer>(
    serializer: S,
    entries: &IndexMap<String, Value>,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Deserializes without upgrading: strings stay text, every object becomes an
/// `AutoMap` and only the AutoMap self-marker is stripped.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut entries = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        if entries
            .get(TYPE_KEY)
            .is_some_and(|marker| *marker == AUTOMAP_MARKER)
        {
            entries.shift_remove(TYPE_KEY);
        }
        Ok(Value::Map(AutoMap::from(entries)))
    }
}
