//! Auto-vivifying nested maps.
//!
//! An [`AutoMap`] is an insertion-ordered map from strings to [`Value`]s that
//! creates an empty child `AutoMap` whenever a missing key is accessed through
//! one of its vivifying accessors. This makes deep writes a one-liner:
//!
//! ```
//! # use automap::{AutoMap, Value};
//! let mut config = AutoMap::new();
//! config["server"]["tls"]["enabled"] = Value::from(true);
//!
//! assert!(config.contains_path(&["server", "tls", "enabled"]));
//! assert!(config["server"].as_map().is_some());
//! ```
//!
//! # Vivification rules
//!
//! - [`AutoMap::get_or_create`] and mutable indexing (`map["key"]` in a
//!   mutable context) insert an empty `AutoMap` on a miss, even if nothing is
//!   ever written below it.
//! - Shared access ([`AutoMap::get`], immutable indexing, [`AutoMap::contains_path`])
//!   never creates entries. Immutable indexing on a missing key panics, like
//!   `HashMap`.
//! - Only `AutoMap` children vivify. `Value::Object` and `Value::List` are
//!   plain containers.

mod errors;
mod value;


use std::{
    fmt,
    ops::{Index, IndexMut},
};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use errors::AutoMapError;
pub use value::{TypedValue, Value};

/// An insertion-ordered map that creates nested maps on demand.
///
/// Equality and `Debug` output match the equivalent plain
/// `IndexMap<String, Value>`, so how entries were created is invisible.
///
/// ```
/// # use automap::{AutoMap, Value};
/// # use indexmap::IndexMap;
/// let mut auto = AutoMap::new();
/// auto.insert("key", "value");
///
/// let mut plain = IndexMap::new();
/// plain.insert("key".to_string(), Value::from("value"));
///
/// assert_eq!(auto, plain);
/// assert_eq!(format!("{auto:?}"), format!("{plain:?}"));
/// ```
#[derive(Clone, Default)]
pub struct AutoMap {
    entries: IndexMap<String, Value>,
}

impl AutoMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Returns the value at `key`, inserting an empty `AutoMap` there first if
    /// the key is missing.
    ///
    /// This is the auto-vivification primitive. It always succeeds and mutates
    /// the map on a miss.
    pub fn get_or_create(&mut self, key: impl Into<String>) -> &mut Value {
        self.entries
            .entry(key.into())
            .or_insert_with(|| Value::Map(AutoMap::new()))
    }

    /// Checks for a nested path of keys without creating anything.
    ///
    /// The walk descends through `AutoMap` values only. Once it reaches a
    /// different kind of value with keys left over:
    /// - one key left: the value's own containment is used (`Object` keys,
    ///   `List` elements equal to the key text, substrings of `Text`)
    /// - several keys left: they are searched for as a literal list of
    ///   strings inside a `List`
    ///
    /// A single key is an ordinary membership test. An empty slice is `false`.
    ///
    /// ```
    /// # use automap::{AutoMap, Value};
    /// let mut map = AutoMap::new();
    /// map["a"]["b"]["c"] = Value::from(1);
    /// map.insert("tags", vec!["x", "y"]);
    ///
    /// assert!(map.contains_path(&["a", "b", "c"]));
    /// assert!(!map.contains_path(&["a", "c"]));
    /// assert!(map.contains_path(&["tags", "x"]));
    /// assert!(!map.contains_path(&["a", "b", "c", "d"]));
    ///
    /// map.insert("motto", "carpe diem");
    /// assert!(map.contains_path(&["motto", "diem"]));
    /// ```
    pub fn contains_path<K: AsRef<str>>(&self, keys: &[K]) -> bool {
        let Some((first, rest)) = keys.split_first() else {
            return false;
        };
        let Some(value) = self.entries.get(first.as_ref()) else {
            return false;
        };
        if rest.is_empty() {
            return true;
        }
        match value {
            Value::Map(child) => child.contains_path(rest),
            other => other.contains_literal(rest),
        }
    }

    /// Checks for a single key without creating it.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` at a nested path, creating intermediate maps as needed.
    ///
    /// Returns the value previously stored at the final key.
    ///
    /// # Errors
    /// - [`AutoMapError::EmptyPath`] if `keys` is empty
    /// - [`AutoMapError::PathConflict`] if an intermediate key holds something
    ///   other than an `AutoMap`. The map is left unchanged in that case.
    pub fn set_path<K: AsRef<str>>(
        &mut self,
        keys: &[K],
        value: impl Into<Value>,
    ) -> Result<Option<Value>, AutoMapError> {
        let Some((last, parents)) = keys.split_last() else {
            return Err(AutoMapError::EmptyPath);
        };
        let parent = self.walk_or_create(parents)?;
        Ok(parent.insert(last.as_ref(), value))
    }

    /// Looks up a nested path without creating anything.
    ///
    /// Descends through both `AutoMap` and plain `Object` values; any other
    /// value on the way yields `None`.
    pub fn get_path<K: AsRef<str>>(&self, keys: &[K]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.entries.get(first.as_ref())?;
        for key in rest {
            current = match current {
                Value::Map(map) => map.get(key.as_ref())?,
                Value::Object(entries) => entries.get(key.as_ref())?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns the value at a nested path, vivifying every missing level.
    ///
    /// # Errors
    /// Same conditions as [`AutoMap::set_path`].
    pub fn get_path_or_create<K: AsRef<str>>(
        &mut self,
        keys: &[K],
    ) -> Result<&mut Value, AutoMapError> {
        let Some((last, parents)) = keys.split_last() else {
            return Err(AutoMapError::EmptyPath);
        };
        let parent = self.walk_or_create(parents)?;
        Ok(parent.get_or_create(last.as_ref()))
    }

    /// Descends through `keys`, creating missing maps.
    ///
    /// A conflict can only be hit before the first missing key, since every
    /// level after that is freshly created, so a failed walk creates nothing.
    fn walk_or_create<K: AsRef<str>>(&mut self, keys: &[K]) -> Result<&mut AutoMap, AutoMapError> {
        let mut current = self;
        for key in keys {
            current = match current.get_or_create(key.as_ref()) {
                Value::Map(child) => child,
                other => {
                    return Err(AutoMapError::PathConflict {
                        key: key.as_ref().to_string(),
                        found: other.type_name().to_string(),
                    });
                }
            };
        }
        Ok(current)
    }

    /// Inserts or overwrites a value, returning the previous one.
    ///
    /// Overwriting keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value at `key` without creating it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value at `key` without creating it.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.entries.iter_mut()
    }

    /// Borrows the underlying ordered map.
    pub fn as_index_map(&self) -> &IndexMap<String, Value> {
        &self.entries
    }

    /// Consumes the map, returning the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.entries
    }
}

impl From<IndexMap<String, Value>> for AutoMap {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl From<AutoMap> for IndexMap<String, Value> {
    fn from(map: AutoMap) -> Self {
        map.entries
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AutoMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AutoMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for AutoMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for AutoMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a AutoMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a mut AutoMap {
    type Item = (&'a String, &'a mut Value);
    type IntoIter = indexmap::map::IterMut<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}

impl Index<&str> for AutoMap {
    type Output = Value;

    /// # Panics
    /// Panics if the key is absent. Shared access never vivifies.
    fn index(&self, key: &str) -> &Value {
        self.entries
            .get(key)
            .unwrap_or_else(|| panic!("no entry found for key {key:?}"))
    }
}

impl IndexMut<&str> for AutoMap {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.get_or_create(key)
    }
}

impl PartialEq for AutoMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl PartialEq<IndexMap<String, Value>> for AutoMap {
    fn eq(&self, other: &IndexMap<String, Value>) -> bool {
        self.entries == *other
    }
}

impl PartialEq<AutoMap> for IndexMap<String, Value> {
    fn eq(&self, other: &AutoMap) -> bool {
        *self == other.entries
    }
}

impl fmt::Debug for AutoMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.entries, f)
    }
}

impl fmt::Display for AutoMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Serialize for AutoMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}

impl<'de> Deserialize<'de> for AutoMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Map(map) => Ok(map),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                other.type_name()
            ))),
        }
    }
}
