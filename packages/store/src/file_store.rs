//! # Filesystem-backed key/value storage
//!
//! [`FileStorage`] is the native stand-in for the browser's `localStorage`: each
//! key is a file under a base directory and its value is the file content. Guest
//! data on desktop builds survives restarts this way.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── workTypes        # JSON array
//! ├── studySessions    # JSON array
//! ├── tasks            # JSON array
//! └── guestMode        # "true"
//! ```
//!
//! Use `dirs::data_dir()` for a platform-appropriate base, e.g.
//! `~/.local/share/studyflow/` on Linux.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::storage::Storage;

#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
            return Err(StoreError::Storage(format!("invalid storage key: {key:?}")));
        }
        Ok(self.base.join(key))
    }

    /// Remove every stored key by deleting the base directory.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_dir_all(&self.base) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StoreError::Storage(e.to_string())),
            _ => Ok(()),
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.item_path(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.item_path(key)?;
        std::fs::create_dir_all(&self.base).map_err(|e| StoreError::Storage(e.to_string()))?;
        std::fs::write(path, value).map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.item_path(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StoreError::Storage(e.to_string())),
            _ => Ok(()),
        }
    }
}
