//! Storage configuration blobs.
//!
//! A configuration describes where a storage lives, never what it holds.
//! It is self-describing JSON tagged by backend type:
//!
//! ```json
//! {"type": "directory", "path": "/home/me/.anothermemory/notes"}
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::backend::Storage;
use super::directory::DirectoryStorage;
use super::error::{StorageError, StorageResult};

/// Serializable configuration of a reconstructible storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// [`DirectoryStorage`] rooted at `path`
    Directory {
        /// Root directory
        path: PathBuf,
    },
}

impl StorageConfig {
    /// Encode as JSON.
    pub fn to_json(&self) -> StorageResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(bytes: &[u8]) -> StorageResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::config(e.to_string()))
    }

    /// Build the storage this configuration points at.
    pub fn open(self) -> StorageResult<Box<dyn Storage>> {
        match self {
            Self::Directory { path } => {
                if path.as_os_str().is_empty() {
                    return Err(StorageError::config("directory path cannot be empty"));
                }
                Ok(Box::new(DirectoryStorage::new(path)))
            }
        }
    }
}

/// Rebuild a storage from a configuration blob.
///
/// This is the `load_from_config` factory for the backends of this crate.
pub fn open_storage(bytes: &[u8]) -> StorageResult<Box<dyn Storage>> {
    StorageConfig::from_json(bytes)?.open()
}
