use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::section::Section;
use crate::Encoding;

/// An INI document bound to an optional file on disk.
///
/// Every operation holds a single lock for its whole duration, so one `IniFile` can be shared
/// between threads. Lookups return copies of sections; use [`IniFile::with_document_mut`] to
/// edit in place.
#[derive(Debug, Default)]
pub struct IniFile {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    path: Option<PathBuf>,
    encoding: Encoding,
    document: Document,
}

impl IniFile {
    /// Create an empty document with no backing file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self::from_state(State {
            encoding,
            ..State::default()
        })
    }

    /// Bind to `path` and load it. An empty path gives an empty document with no backing file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_encoding(path, Encoding::default())
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn open_with_encoding(path: impl AsRef<Path>, encoding: Encoding) -> Result<Self> {
        let file = Self::with_encoding(encoding);
        file.set_path(path)?;
        Ok(file)
    }

    fn from_state(state: State) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    // Every guarded operation leaves the state consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    /// Bind to `path` and immediately load it. An empty path unbinds the document without
    /// touching its contents.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse. The previous path and contents are
    /// both kept.
    pub fn set_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut state = self.lock();

        if path.as_os_str().is_empty() {
            state.path = None;
            return Ok(());
        }

        let document = read_document(path, state.encoding)?;
        state.path = Some(path.to_path_buf());
        state.document = document;
        Ok(())
    }

    /// Read the bound file again. Does nothing when no file is bound.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse; the previous contents are kept.
    pub fn reload(&self) -> Result<()> {
        let mut state = self.lock();
        let Some(path) = state.path.clone() else {
            return Ok(());
        };

        state.document = read_document(&path, state.encoding)?;
        Ok(())
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.lock().encoding
    }

    pub fn set_encoding(&self, encoding: Encoding) {
        self.lock().encoding = encoding;
    }

    /// Write the document to the bound file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullElement`] if no file is bound, or [`Error::Write`] if writing fails.
    pub fn save(&self) -> Result<()> {
        let state = self.lock();
        let path = state
            .path
            .as_deref()
            .ok_or(Error::NullElement { what: "INI file path" })?;

        state.write_to(path)
    }

    /// Write the document to `path`, replacing any existing content. The bound path is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullElement`] if `path` is empty, or [`Error::Write`] if writing fails.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::NullElement { what: "INI file path" });
        }

        self.lock().write_to(path)
    }

    /// Run `f` with the lock held.
    pub fn with_document<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        f(&self.lock().document)
    }

    /// Run `f` with the lock held and mutable access to the document.
    pub fn with_document_mut<T>(&self, f: impl FnOnce(&mut Document) -> T) -> T {
        f(&mut self.lock().document)
    }

    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.lock().document.clone()
    }

    /// Return a copy of the first section named `name`, ignoring case.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<Section> {
        self.lock().document.section(name).cloned()
    }

    /// Replace every section named `name` with `section`, returning how many were replaced.
    pub fn replace(&self, name: &str, section: &Section) -> usize {
        self.lock().document.replace(name, section)
    }

    pub fn add_entry(
        &self,
        section_name: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.lock().document.add_entry(section_name, key, value)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Section> {
        self.lock().document.get(index).cloned()
    }

    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn set(&self, index: usize, section: Section) -> Result<Section> {
        self.lock().document.set(index, section)
    }

    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`.
    pub fn insert(&self, index: usize, section: Section) -> Result<()> {
        self.lock().document.insert(index, section)
    }

    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&self, index: usize) -> Result<Section> {
        self.lock().document.remove_at(index)
    }

    pub fn remove(&self, section: &Section) -> bool {
        self.lock().document.remove(section)
    }

    pub fn push(&self, section: Section) {
        self.lock().document.push(section);
    }

    #[must_use]
    pub fn contains(&self, section: &Section) -> bool {
        self.lock().document.contains(section)
    }

    #[must_use]
    pub fn position(&self, section: &Section) -> Option<usize> {
        self.lock().document.position(section)
    }

    pub fn clear(&self) {
        self.lock().document.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().document.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().document.is_empty()
    }
}

impl From<Document> for IniFile {
    fn from(document: Document) -> Self {
        Self::from_state(State {
            document,
            ..State::default()
        })
    }
}

impl State {
    fn write_to(&self, path: &Path) -> Result<()> {
        let data = self.document.to_bytes(self.encoding);

        fs::write(path, data).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            path = %path.display(),
            encoding = ?self.encoding,
            sections = self.document.len(),
            "saved INI file"
        );
        Ok(())
    }
}

/// Parse the whole file into a new document; callers swap it in only on success.
fn read_document(path: &Path, encoding: Encoding) -> Result<Document> {
    let data = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = Document::from_bytes(&data, encoding)?;

    debug!(
        path = %path.display(),
        encoding = ?encoding,
        sections = document.len(),
        "loaded INI file"
    );
    Ok(document)
}
