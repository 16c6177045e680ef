//! Error types for encoding values to and decoding values from JSON.

use thiserror::Error;

/// Errors raised by [`TypeCodec`](super::TypeCodec).
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// No encoder is registered for the value's runtime type.
    #[error("Cannot encode value of type '{type_name}'")]
    UnsupportedType {
        /// Runtime type name of the rejected value
        type_name: String,
    },

    /// An object carried a type marker with no registered decoder.
    #[error("Unknown type marker '{marker}'")]
    UnknownMarker {
        /// The marker found on the wire
        marker: String,
    },

    /// A registered decoder rejected its payload.
    #[error("Invalid payload for type marker '{marker}': {reason}")]
    InvalidPayload {
        /// The marker whose decoder failed
        marker: String,
        /// Description of what was wrong with the payload
        reason: String,
    },
}

impl CodecError {
    /// Creates an `InvalidPayload` error.
    pub fn invalid_payload(marker: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidPayload {
            marker: marker.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error was raised while encoding
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, CodecError::UnsupportedType { .. })
    }

    /// Check if this error names an unregistered marker
    pub fn is_unknown_marker(&self) -> bool {
        matches!(self, CodecError::UnknownMarker { .. })
    }

    /// Check if a decoder rejected its payload
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self, CodecError::InvalidPayload { .. })
    }
}

impl From<CodecError> for crate::Error {
    fn from(err: CodecError) -> Self {
        crate::Error::Codec(err)
    }
}
