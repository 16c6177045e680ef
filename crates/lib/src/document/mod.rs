//! File-backed `AutoMap` documents that save themselves.
//!
//! A [`PersistentDocument`] loads a JSON document on open (or starts empty when
//! the file does not exist yet), hands out the tree through `Deref`, and writes
//! it back when it goes out of scope:
//!
//! ```
//! # use automap::{PersistentDocument, Value};
//! # let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("settings.json");
//!
//! {
//!     let mut doc = PersistentDocument::open(&path)?;
//!     doc["window"]["width"] = Value::from(800);
//! } // saved here
//!
//! let doc = PersistentDocument::open(&path)?;
//! assert_eq!(doc.get_path(&["window", "width"]), Some(&Value::Int(800)));
//! # Ok::<(), automap::Error>(())
//! ```
//!
//! Saving on drop cannot report failures, which are only logged. Use
//! [`PersistentDocument::close`] to end the scope and get the save result, or
//! [`PersistentDocument::discard`] to drop the changes.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    AutoMap, Result,
    driver::{Driver, JsonDriver},
};

/// Options controlling how a [`PersistentDocument`] is loaded and saved.
///
/// ```
/// # use std::sync::Arc;
/// # use automap::{DocumentOptions, StreamingJsonDriver};
/// let options = DocumentOptions::new()
///     .save_on_exit(false)
///     .indent(Some(2))
///     .driver(Arc::new(StreamingJsonDriver::default()));
/// ```
#[derive(Clone)]
pub struct DocumentOptions {
    save_on_exit: bool,
    indent: Option<usize>,
    driver: Arc<dyn Driver>,
}

impl DocumentOptions {
    /// Default options: save on drop, compact output, [`JsonDriver`].
    pub fn new() -> Self {
        Self {
            save_on_exit: true,
            indent: None,
            driver: Arc::new(JsonDriver::default()),
        }
    }

    /// Whether the document saves itself when dropped.
    pub fn save_on_exit(mut self, save_on_exit: bool) -> Self {
        self.save_on_exit = save_on_exit;
        self
    }

    /// Indentation used by [`PersistentDocument::save`]. `None` is compact.
    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// The backend used to load and save.
    pub fn driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.driver = driver;
        self
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentOptions")
            .field("save_on_exit", &self.save_on_exit)
            .field("indent", &self.indent)
            .field("driver", &self.driver.name())
            .finish()
    }
}

/// An `AutoMap` bound to a file.
///
/// Dereferences to the [`AutoMap`] it holds. Saving happens at most once per
/// scope exit: dropping, [`close`](Self::close) and
/// [`discard`](Self::discard) all disarm the save-on-exit flag.
pub struct PersistentDocument {
    path: PathBuf,
    tree: AutoMap,
    options: DocumentOptions,
}

impl PersistentDocument {
    /// Opens the document at `path` with default options.
    ///
    /// # Errors
    /// Anything but a missing file: unreadable files, malformed JSON, a
    /// non-object top level, or unknown type markers.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DocumentOptions::default())
    }

    /// Opens the document at `path` with the given options.
    pub fn open_with(path: impl AsRef<Path>, options: DocumentOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tree = options.driver.load_or_default(&path)?;
        tracing::debug!(
            path = %path.display(),
            driver = options.driver.name(),
            save_on_exit = options.save_on_exit,
            "Opened document"
        );
        Ok(Self {
            path,
            tree,
            options,
        })
    }

    /// Writes the tree with the configured indentation.
    ///
    /// Missing parent directories are created.
    pub fn save(&self) -> Result<()> {
        self.save_with_indent(self.options.indent)
    }

    /// Writes the tree with an explicit indentation.
    pub fn save_with_indent(&self, indent: Option<usize>) -> Result<()> {
        self.options.driver.dump(&self.tree, &self.path, indent)
    }

    /// Ends the document's scope, saving once if save-on-exit is set.
    ///
    /// Unlike dropping, a failed save is returned to the caller.
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }

    /// Drops the document without saving.
    pub fn discard(mut self) {
        tracing::debug!(path = %self.path.display(), "Discarding document changes");
        self.options.save_on_exit = false;
    }

    /// Disarms saving and returns the tree.
    pub fn into_inner(mut self) -> AutoMap {
        self.options.save_on_exit = false;
        std::mem::take(&mut self.tree)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_on_exit(&self) -> bool {
        self.options.save_on_exit
    }

    pub fn set_save_on_exit(&mut self, save_on_exit: bool) {
        self.options.save_on_exit = save_on_exit;
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.options.driver
    }

    /// Saves if the flag is set, clearing it first so the save runs once.
    fn finish(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.options.save_on_exit, false) {
            return Ok(());
        }
        self.save()
    }
}

impl Deref for PersistentDocument {
    type Target = AutoMap;

    fn deref(&self) -> &AutoMap {
        &self.tree
    }
}

impl DerefMut for PersistentDocument {
    fn deref_mut(&mut self) -> &mut AutoMap {
        &mut self.tree
    }
}

impl fmt::Debug for PersistentDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentDocument")
            .field("path", &self.path)
            .field("tree", &self.tree)
            .field("options", &self.options)
            .finish()
    }
}

impl Drop for PersistentDocument {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            tracing::error!(
                path = %self.path.display(),
                error = %err,
                "Failed to save document on drop"
            );
        }
    }
}
