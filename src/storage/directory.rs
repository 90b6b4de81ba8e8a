//! DirectoryStorage - One JSON file per unit
//!
//! TigerStyle: Plain files, atomic writes, explicit layout.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! └── units/
//!     ├── <unit id>.json
//!     └── <unit id>.json
//! ```
//!
//! The storage counts as created while `<root>/units` exists, so any handle
//! pointing at the same root observes the same lifecycle state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::backend::Storage;
use super::config::StorageConfig;
use super::error::{StorageError, StorageResult};
use super::record::{
    check_list_children, load_resolved, require_unit, validate_id, RecordSource, UnitRecord,
};
use crate::constants::{UNITS_DIR_NAME, UNIT_FILE_EXTENSION, UNIT_TMP_FILE_EXTENSION};
use crate::unit::Unit;

/// Filesystem storage backend rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Create a handle for the given root directory.
    ///
    /// Nothing is touched on disk until [`Storage::create`].
    ///
    /// # Panics
    /// Panics if the root path is empty.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        assert!(!root.as_os_str().is_empty(), "storage root cannot be empty");
        Self { root }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn units_dir(&self) -> PathBuf {
        self.root.join(UNITS_DIR_NAME)
    }

    /// Path of a unit's file. IDs that cannot serve as a file name are
    /// rejected here, for stored list children as much as for arguments.
    fn unit_path(&self, id: &str) -> StorageResult<PathBuf> {
        validate_file_name(id)?;
        Ok(self.units_dir().join(format!("{id}.{UNIT_FILE_EXTENSION}")))
    }

    async fn ensure_created(&self) -> StorageResult<()> {
        if self.is_created().await {
            Ok(())
        } else {
            Err(StorageError::NotCreated)
        }
    }
}

/// Reject IDs that would escape or hide inside the units directory.
fn validate_file_name(id: &str) -> StorageResult<()> {
    if id.starts_with('.') || id.contains(['/', '\\', '\0']) {
        return Err(StorageError::invalid_argument(format!(
            "unit id {id:?} is not a valid file name"
        )));
    }
    Ok(())
}

#[async_trait]
impl RecordSource for DirectoryStorage {
    async fn read_record(&self, id: &str) -> StorageResult<UnitRecord> {
        let bytes = match fs::read(self.unit_path(id)?).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::not_found(id)),
            Err(e) => return Err(e.into()),
        };
        let record: UnitRecord = serde_json::from_slice(&bytes)?;

        // Postcondition
        if record.id != id {
            return Err(StorageError::invalid_argument(format!(
                "unit file {id} holds unit {}",
                record.id
            )));
        }
        Ok(record)
    }
}

#[async_trait]
impl Storage for DirectoryStorage {
    async fn create(&self) -> StorageResult<()> {
        fs::create_dir_all(self.units_dir()).await?;
        debug!(root = %self.root.display(), "Created directory storage");
        Ok(())
    }

    async fn is_created(&self) -> bool {
        fs::metadata(self.units_dir())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn remove(&self) -> StorageResult<()> {
        match fs::remove_dir_all(self.units_dir()).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        // Only drop the root if nothing else lives there.
        if let Err(e) = fs::remove_dir(&self.root).await {
            debug!(root = %self.root.display(), error = %e, "Kept storage root");
        }
        debug!(root = %self.root.display(), "Removed directory storage");
        Ok(())
    }

    async fn save_unit(&self, unit: Option<&Unit>) -> StorageResult<()> {
        self.ensure_created().await?;
        let unit = require_unit(unit)?;
        validate_id(unit.id())?;
        let path = self.unit_path(unit.id())?;
        check_list_children(self, unit).await?;

        let bytes = serde_json::to_vec_pretty(&UnitRecord::from_unit(unit))?;
        let tmp_path = self
            .units_dir()
            .join(format!("{}.{UNIT_TMP_FILE_EXTENSION}", unit.id()));
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!(
            unit_id = %unit.id(),
            unit_type = %unit.unit_type(),
            bytes = bytes.len(),
            "Saved unit"
        );
        Ok(())
    }

    async fn load_unit(&self, id: &str) -> StorageResult<Unit> {
        self.ensure_created().await?;
        validate_id(id)?;
        load_resolved(self, id).await
    }

    async fn remove_unit(&self, unit: Option<&Unit>) -> StorageResult<()> {
        self.ensure_created().await?;
        let unit = require_unit(unit)?;
        validate_id(unit.id())?;

        match fs::remove_file(self.unit_path(unit.id())?).await {
            Ok(()) => {
                debug!(unit_id = %unit.id(), "Removed unit");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(unit.id())),
            Err(e) => Err(e.into()),
        }
    }

    fn config(&self) -> StorageResult<Vec<u8>> {
        StorageConfig::Directory {
            path: self.root.clone(),
        }
        .to_json()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LIST_NESTING_DEPTH_MAX;
    use crate::unit::{Content, TodoItem};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_directory_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path().join("store"));

        assert!(!storage.is_created().await);
        storage.create().await.unwrap();
        assert!(storage.is_created().await);
        assert!(dir.path().join("store").join(UNITS_DIR_NAME).is_dir());

        storage.remove().await.unwrap();
        assert!(!storage.is_created().await);
        assert!(!dir.path().join("store").exists());
    }

    #[tokio::test]
    async fn test_directory_remove_keeps_foreign_files() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        storage.create().await.unwrap();
        storage.remove().await.unwrap();

        assert!(!storage.is_created().await);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_directory_remove_uncreated() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path().join("never"));
        storage.remove().await.unwrap();
    }

    #[tokio::test]
    async fn test_directory_crud() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.create().await.unwrap();

        let unit = Unit::todo(
            "MyUnit",
            vec![TodoItem::new("Data1", true), TodoItem::new("Data2", false)],
        );
        storage.save_unit(Some(&unit)).await.unwrap();
        assert!(storage.unit_path(unit.id()).unwrap().is_file());

        let loaded = storage.load_unit(unit.id()).await.unwrap();
        assert_eq!(loaded, unit);

        storage.remove_unit(Some(&loaded)).await.unwrap();
        assert!(storage.load_unit(unit.id()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_directory_handles_share_state() {
        let dir = tempdir().unwrap();
        let a = DirectoryStorage::new(dir.path());
        let b = DirectoryStorage::new(dir.path());
        a.create().await.unwrap();

        let unit = Unit::plain_text("MyUnit", "MyData");
        a.save_unit(Some(&unit)).await.unwrap();

        assert!(b.is_created().await);
        assert_eq!(b.load_unit(unit.id()).await.unwrap(), unit);
    }

    #[tokio::test]
    async fn test_directory_rejects_path_ids() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.create().await.unwrap();

        assert!(matches!(
            storage.load_unit("../secret").await,
            Err(StorageError::InvalidArgument(_))
        ));

        let unit = Unit::builder("MyUnit").with_id("a/b").build(Content::Unit);
        assert!(matches!(
            storage.save_unit(Some(&unit)).await,
            Err(StorageError::InvalidArgument(_))
        ));
        assert!(matches!(
            storage.remove_unit(Some(&unit)).await,
            Err(StorageError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_rejects_list_with_unsaved_child() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.create().await.unwrap();

        let child = Unit::markdown_text("Child", "*MyData*");
        let list = Unit::list("List", vec![child.clone()]);

        assert!(matches!(
            storage.save_unit(Some(&list)).await,
            Err(StorageError::InvalidArgument(_))
        ));
        assert!(!storage.unit_path(list.id()).unwrap().exists());

        storage.save_unit(Some(&child)).await.unwrap();
        storage.save_unit(Some(&list)).await.unwrap();
        assert_eq!(storage.load_unit(list.id()).await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_directory_list_with_removed_child() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.create().await.unwrap();

        let child = Unit::new("Child");
        let list = Unit::list("List", vec![child.clone()]);
        storage.save_unit(Some(&child)).await.unwrap();
        storage.save_unit(Some(&list)).await.unwrap();
        storage.remove_unit(Some(&child)).await.unwrap();

        let err = storage.load_unit(list.id()).await.unwrap_err();
        assert!(
            matches!(&err, StorageError::MissingChild { child: c, .. } if c == child.id()),
            "{err}"
        );
    }

    #[tokio::test]
    async fn test_directory_rejects_list_nested_too_deep() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.create().await.unwrap();

        let mut top = Unit::new("Leaf");
        storage.save_unit(Some(&top)).await.unwrap();
        for _ in 0..LIST_NESTING_DEPTH_MAX {
            top = Unit::list("Level", vec![top]);
            storage.save_unit(Some(&top)).await.unwrap();
        }
        assert_eq!(storage.load_unit(top.id()).await.unwrap(), top);

        let too_deep = Unit::list("Level", vec![top]);
        assert!(matches!(
            storage.save_unit(Some(&too_deep)).await,
            Err(StorageError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_detects_mismatched_file() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());
        storage.create().await.unwrap();

        let unit = Unit::new("MyUnit");
        storage.save_unit(Some(&unit)).await.unwrap();
        std::fs::copy(
            storage.unit_path(unit.id()).unwrap(),
            storage.unit_path("other").unwrap(),
        )
        .unwrap();

        assert!(storage.load_unit("other").await.is_err());
    }

    #[tokio::test]
    async fn test_directory_config() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path());

        let config: serde_json::Value = serde_json::from_slice(&storage.config().unwrap()).unwrap();

        assert_eq!(config["type"], "directory");
        assert_eq!(config["path"], dir.path().to_str().unwrap());
    }
}
