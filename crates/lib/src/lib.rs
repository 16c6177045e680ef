//!
//! automap: auto-vivifying nested maps with pluggable JSON persistence.
//!
//! ## Core Concepts
//!
//! * **AutoMaps (`automap::AutoMap`)**: Insertion-ordered string-keyed maps that create an empty child map when a missing key is accessed mutably, so deep writes need no setup.
//! * **Values (`automap::Value`)**: The sum type stored in a map: JSON primitives, lists, plain objects, nested AutoMaps, and extension types such as timestamps, dates, times, UUIDs and user-defined typed values.
//! * **Codecs (`codec::TypeCodec`)**: Registries that carry extension types through JSON, either implicitly as recognizable strings or explicitly inside a `{"__type__": ..., "value": ...}` wrapper.
//! * **Drivers (`driver::Driver`)**: Pluggable serialization backends that dump a tree to a writer, string or file and load it back.
//! * **Documents (`document::PersistentDocument`)**: A tree bound to a file path that is loaded on open and saved automatically when it goes out of scope.

pub mod automap;
pub mod codec;
pub mod constants;
pub mod document;
pub mod driver;

pub use automap::{AutoMap, AutoMapError, TypedValue, Value};
pub use codec::{CodecError, MapTagging, TimeOfDay, Timestamp, TypeCodec};
pub use document::{DocumentOptions, PersistentDocument};
pub use driver::{Driver, DriverError, JsonDriver, StreamingJsonDriver};

/// Result type used throughout the automap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the automap library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured path errors from the automap module
    #[error(transparent)]
    AutoMap(automap::AutoMapError),

    /// Structured encoding and decoding errors from the codec module
    #[error(transparent)]
    Codec(codec::CodecError),

    /// Structured document and file errors from the driver module
    #[error(transparent)]
    Driver(driver::DriverError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::AutoMap(_) => "automap",
            Error::Codec(_) => "codec",
            Error::Driver(_) => "driver",
        }
    }

    /// Check if this error indicates a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Driver(driver_err) => driver_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Driver(driver_err) => driver_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if a value could not be encoded.
    pub fn is_unsupported_type(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_unsupported_type(),
            _ => false,
        }
    }

    /// Check if a document named a type marker with no registered decoder.
    pub fn is_unknown_marker(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_unknown_marker(),
            _ => false,
        }
    }

    /// Check if a document could not be parsed or had the wrong shape.
    pub fn is_malformed(&self) -> bool {
        match self {
            Error::Driver(driver_err) => {
                driver_err.is_malformed() || matches!(driver_err, DriverError::NotAnObject { .. })
            }
            Error::Codec(codec_err) => codec_err.is_invalid_payload(),
            _ => false,
        }
    }

    /// Check if this error is a codec error.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Codec(_))
    }

    /// Check if this error is a path error.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::AutoMap(_))
    }
}
