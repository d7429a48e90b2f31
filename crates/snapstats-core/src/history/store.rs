use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value persistence for the serialized history
///
/// Implementations give no atomicity guarantee beyond last-write-wins.
pub trait HistoryStore {
    /// Return the persisted value, or `None` if nothing has been saved
    fn load_raw(&self) -> Result<Option<String>>;

    fn save_raw(&mut self, raw: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// Stores the history as a single JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileStore {
    fn load_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn save_raw(&mut self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, raw).map_err(|e| {
            if e.kind() == ErrorKind::StorageFull {
                Error::QuotaExceeded(format!("{}: {}", self.path.display(), e))
            } else {
                Error::Io(e)
            }
        })
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// In-process store with an optional byte capacity
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects values longer than `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            value: None,
            capacity: Some(capacity),
        }
    }

    /// A store pre-loaded with a raw value
    pub fn with_value(raw: impl Into<String>) -> Self {
        Self {
            value: Some(raw.into()),
            capacity: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl HistoryStore for MemoryStore {
    fn load_raw(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn save_raw(&mut self, raw: &str) -> Result<()> {
        if let Some(capacity) = self.capacity
            && raw.len() > capacity
        {
            return Err(Error::QuotaExceeded(format!(
                "{} bytes exceeds capacity of {} bytes",
                raw.len(),
                capacity
            )));
        }
        self.value = Some(raw.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}
