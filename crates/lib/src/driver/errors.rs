//! Error types for the serialization drivers.
//!
//! Encoding and decoding failures of individual values are reported as
//! [`CodecError`](crate::codec::CodecError)s; this module covers the document
//! level: parsing, writing and file access.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while dumping or loading documents.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DriverError {
    /// The input was not valid JSON.
    #[error("Malformed JSON document")]
    MalformedWireFormat {
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Writing the JSON output failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// The document's top level was not an object.
    #[error("Expected a JSON object at the top level, found {found}")]
    NotAnObject {
        /// Type name of what was found instead
        found: String,
    },

    /// Reading from or writing to a caller-supplied stream failed.
    #[error("I/O error")]
    Io {
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// File I/O error.
    #[error("File I/O error on {}", .path.display())]
    FileIo {
        /// The file being read or written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    /// Check if the input could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(self, DriverError::MalformedWireFormat { .. })
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(self, DriverError::Io { .. } | DriverError::FileIo { .. })
    }

    /// Check if a file or directory was missing.
    pub fn is_not_found(&self) -> bool {
        self.io_error()
            .is_some_and(|err| err.kind() == io::ErrorKind::NotFound)
    }

    /// Get the file path if this error is about a specific file.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            DriverError::FileIo { path, .. } => Some(path),
            _ => None,
        }
    }

    fn io_error(&self) -> Option<&io::Error> {
        match self {
            DriverError::Io { source } | DriverError::FileIo { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Classifies a `serde_json` error raised while writing.
    ///
    /// I/O failures of the underlying writer are reported as I/O errors.
    pub(crate) fn from_write(source: serde_json::Error) -> Self {
        if source.is_io() {
            DriverError::Io {
                source: source.into(),
            }
        } else {
            DriverError::SerializationFailed { source }
        }
    }

    /// Classifies a `serde_json` error raised while reading.
    pub(crate) fn from_read(source: serde_json::Error) -> Self {
        if source.is_io() {
            DriverError::Io {
                source: source.into(),
            }
        } else {
            DriverError::MalformedWireFormat { source }
        }
    }

    /// Attaches a path to a stream I/O error.
    pub(crate) fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            DriverError::Io { source } => DriverError::FileIo {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

impl From<DriverError> for crate::Error {
    fn from(err: DriverError) -> Self {
        crate::Error::Driver(err)
    }
}
