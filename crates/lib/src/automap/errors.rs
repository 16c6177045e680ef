//! Error types for path operations on `AutoMap`.

use thiserror::Error;

/// Errors raised by the path helpers of [`AutoMap`](super::AutoMap).
///
/// Plain reads and writes on an `AutoMap` never fail; only the multi-key
/// helpers can, when the requested path is empty or runs into a value that
/// is not an `AutoMap`.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutoMapError {
    /// A path operation was given no keys.
    #[error("Path must contain at least one key")]
    EmptyPath,

    /// An intermediate key holds a value that cannot be descended into.
    #[error("Cannot descend into '{key}': found {found}, expected AutoMap")]
    PathConflict {
        /// The key whose value blocked the walk
        key: String,
        /// Type name of the value found at `key`
        found: String,
    },
}

impl AutoMapError {
    /// Check if this error was caused by an empty key list
    pub fn is_empty_path(&self) -> bool {
        matches!(self, AutoMapError::EmptyPath)
    }

    /// Check if this error was caused by a non-map intermediate value
    pub fn is_path_conflict(&self) -> bool {
        matches!(self, AutoMapError::PathConflict { .. })
    }

    /// Get the blocking key if this is a path conflict
    pub fn key(&self) -> Option<&str> {
        match self {
            AutoMapError::PathConflict { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<AutoMapError> for crate::Error {
    fn from(err: AutoMapError) -> Self {
        crate::Error::AutoMap(err)
    }
}
