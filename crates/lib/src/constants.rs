//! Constants used throughout the automap library.
//!
//! This module provides central definitions for the reserved keys and marker
//! strings of the JSON wire format, so every driver agrees on them.

/// Reserved object key carrying the type marker of an explicitly encoded value.
pub const TYPE_KEY: &str = "__type__";

/// Reserved object key carrying the payload of an explicitly encoded value.
pub const VALUE_KEY: &str = "value";

/// Self-marker written on the wire form of tagged `AutoMap` objects.
pub const AUTOMAP_MARKER: &str = "AutoMap";

/// Marker for timestamps (date and time of day).
pub const DATETIME_MARKER: &str = "datetime";

/// Marker for calendar dates.
pub const DATE_MARKER: &str = "date";

/// Marker for times of day.
pub const TIME_MARKER: &str = "time";

/// Marker for unique identifiers.
pub const UUID_MARKER: &str = "uuid";
