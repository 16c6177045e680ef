//! Pluggable serialization backends.
//!
//! A [`Driver`] turns an [`AutoMap`] tree into bytes and back. Implementors
//! provide [`Driver::dump_writer`] and [`Driver::load_reader`]; string, slice
//! and file variants are derived from those two. Drivers are stateless apart
//! from their [`TypeCodec`], so a single `Arc<dyn Driver>` can be shared
//! between documents and threads.
//!
//! Two JSON backends are provided:
//!
//! - [`JsonDriver`] goes through an intermediate `serde_json::Value` and the
//!   full codec on both paths. Implicit and explicit types round-trip.
//! - [`StreamingJsonDriver`] writes straight from the tree and reads straight
//!   into [`Value`](crate::Value) without upgrading strings or explicit
//!   wrappers. It is faster and its output is identical, but loading gives
//!   plain values.
//!
//! Both produce output the other can read.
//!
//! # Indentation
//!
//! `Some(n)` pretty prints with `n` spaces per level, inserting newlines even
//! for `n == 0`. `None` writes compact JSON with no whitespace at all.

mod errors;
mod json;
mod streaming;

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::{Builder, NamedTempFile};

pub use errors::DriverError;
pub use json::JsonDriver;
pub use streaming::StreamingJsonDriver;

use crate::{AutoMap, Result, Value, codec::TypeCodec};

/// A serialization backend for `AutoMap` documents.
pub trait Driver: std::fmt::Debug + Send + Sync {
    /// Short backend name used in log output.
    fn name(&self) -> &'static str;

    /// The codec used to carry non-JSON types.
    fn codec(&self) -> &TypeCodec;

    /// Writes `tree` as one document to `writer`.
    ///
    /// # Errors
    /// [`CodecError::UnsupportedType`](crate::CodecError::UnsupportedType) for
    /// values the codec cannot encode, or a [`DriverError`] if writing fails.
    fn dump_writer(&self, tree: &AutoMap, writer: &mut dyn Write, indent: Option<usize>)
    -> Result<()>;

    /// Reads one document from `reader`.
    ///
    /// # Errors
    /// - [`DriverError::MalformedWireFormat`] for invalid JSON
    /// - [`DriverError::NotAnObject`] when the top level is not an object
    /// - codec errors for markers the codec cannot decode
    fn load_reader(&self, reader: &mut dyn Read) -> Result<AutoMap>;

    /// Serializes `tree` to a string.
    fn dumps(&self, tree: &AutoMap, indent: Option<usize>) -> Result<String> {
        let mut buffer = Vec::new();
        self.dump_writer(tree, &mut buffer, indent)?;
        String::from_utf8(buffer).map_err(|err| {
            DriverError::Io {
                source: io::Error::new(io::ErrorKind::InvalidData, err),
            }
            .into()
        })
    }

    /// Serializes `tree` to the file at `path`.
    ///
    /// Missing parent directories are created. The document is written to a
    /// temporary file in the target directory which then replaces `path` in a
    /// single rename, so readers never observe a partial document.
    fn dump(&self, tree: &AutoMap, path: &Path, indent: Option<usize>) -> Result<()> {
        write_atomically(path, |writer| self.dump_writer(tree, writer, indent))?;
        tracing::debug!(
            path = %path.display(),
            driver = self.name(),
            entries = tree.len(),
            "Saved document"
        );
        Ok(())
    }

    /// Parses a document from a string.
    fn loads(&self, text: &str) -> Result<AutoMap> {
        self.load_slice(text.as_bytes())
    }

    /// Parses a document from a byte slice.
    fn load_slice(&self, mut bytes: &[u8]) -> Result<AutoMap> {
        self.load_reader(&mut bytes)
    }

    /// Reads the document stored at `path`.
    ///
    /// # Errors
    /// A missing file is a [`DriverError::FileIo`] error; see
    /// [`Driver::load_or_default`] to treat it as an empty document.
    fn load(&self, path: &Path) -> Result<AutoMap> {
        let file = File::open(path).map_err(|source| DriverError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = self
            .load_reader(&mut BufReader::new(file))
            .map_err(|err| attach_path(err, path))?;
        tracing::debug!(
            path = %path.display(),
            driver = self.name(),
            entries = tree.len(),
            "Loaded document"
        );
        Ok(tree)
    }

    /// Like [`Driver::load`], but a missing file yields an empty tree.
    fn load_or_default(&self, path: &Path) -> Result<AutoMap> {
        match self.load(path) {
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %path.display(), "No document on disk, starting empty");
                Ok(AutoMap::new())
            }
            other => other,
        }
    }
}

/// Serializes `value` as JSON with the requested indentation.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
    indent: Option<usize>,
) -> std::result::Result<(), serde_json::Error> {
    match indent {
        None => serde_json::to_writer(writer, value),
        Some(width) => {
            let indent = vec![b' '; width];
            let mut serializer =
                serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
            value.serialize(&mut serializer)
        }
    }
}

/// Checks that a decoded document is a map.
///
/// Untagged top-level objects decoded in tagged mode are promoted.
pub(crate) fn into_document(value: Value) -> Result<AutoMap> {
    match value {
        Value::Map(map) => Ok(map),
        Value::Object(entries) => Ok(AutoMap::from(entries)),
        other => Err(DriverError::NotAnObject {
            found: other.type_name().to_string(),
        }
        .into()),
    }
}

/// Runs `write` against a temporary file next to `path`, then renames the
/// temporary file over `path`. On failure the temporary file is removed and
/// `path` is untouched.
///
/// The replacement keeps the permissions of the file it replaces. A new file
/// gets the same mode a plain `File::create` would.
fn write_atomically(
    path: &Path,
    write: impl FnOnce(&mut dyn Write) -> Result<()>,
) -> Result<()> {
    let file_error = |source: io::Error| DriverError::FileIo {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(file_error)?;

    let mut temp = temp_file_for(path, dir).map_err(file_error)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer).map_err(|err| attach_path(err, path))?;
        writer.flush().map_err(file_error)?;
    }
    temp.as_file().sync_all().map_err(file_error)?;
    temp.persist(path).map_err(|err| file_error(err.error))?;
    Ok(())
}

fn temp_file_for(target: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    match fs::metadata(target) {
        Ok(metadata) => {
            builder.permissions(metadata.permissions());
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                // Filtered through the process umask on creation.
                builder.permissions(fs::Permissions::from_mode(0o666));
            }
        }
        Err(err) => return Err(err),
    }
    builder.tempfile_in(dir)
}

fn attach_path(err: crate::Error, path: &Path) -> crate::Error {
    match err {
        crate::Error::Driver(driver_err) => driver_err.at_path(path).into(),
        other => other,
    }
}
