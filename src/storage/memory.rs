//! MemoryStorage - In-process storage
//!
//! TigerStyle: Per-instance state, nothing shared between instances.
//!
//! Units live in a map behind a lock; `None` means the storage has not been
//! created (or was removed). Nothing survives the instance, so the
//! configuration cannot be serialized.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::Storage;
use super::error::{StorageError, StorageResult};
use super::record::{check_list_children, load_resolved, require_unit, validate_id, UnitRecord};
use crate::unit::Unit;

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    units: RwLock<Option<HashMap<String, UnitRecord>>>,
}

impl MemoryStorage {
    /// Create a new, uncreated storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored units, or `None` if not created.
    pub async fn unit_count(&self) -> Option<usize> {
        self.units.read().await.as_ref().map(HashMap::len)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create(&self) -> StorageResult<()> {
        let mut guard = self.units.write().await;
        if guard.is_none() {
            *guard = Some(HashMap::new());
        }
        debug!("Created memory storage");
        Ok(())
    }

    async fn is_created(&self) -> bool {
        self.units.read().await.is_some()
    }

    async fn remove(&self) -> StorageResult<()> {
        let removed = self.units.write().await.take();
        debug!(
            units = removed.as_ref().map_or(0, HashMap::len),
            "Removed memory storage"
        );
        Ok(())
    }

    async fn save_unit(&self, unit: Option<&Unit>) -> StorageResult<()> {
        let mut guard = self.units.write().await;
        let units = guard.as_mut().ok_or(StorageError::NotCreated)?;
        let unit = require_unit(unit)?;
        validate_id(unit.id())?;
        check_list_children(&*units, unit).await?;

        units.insert(unit.id().to_string(), UnitRecord::from_unit(unit));
        debug!(unit_id = %unit.id(), unit_type = %unit.unit_type(), "Saved unit");
        Ok(())
    }

    async fn load_unit(&self, id: &str) -> StorageResult<Unit> {
        let guard = self.units.read().await;
        let units = guard.as_ref().ok_or(StorageError::NotCreated)?;
        validate_id(id)?;
        load_resolved(units, id).await
    }

    async fn remove_unit(&self, unit: Option<&Unit>) -> StorageResult<()> {
        let mut guard = self.units.write().await;
        let units = guard.as_mut().ok_or(StorageError::NotCreated)?;
        let unit = require_unit(unit)?;

        units
            .remove(unit.id())
            .ok_or_else(|| StorageError::not_found(unit.id()))?;
        debug!(unit_id = %unit.id(), "Removed unit");
        Ok(())
    }

    fn config(&self) -> StorageResult<Vec<u8>> {
        Err(StorageError::unsupported(
            "memory storage has no persistent configuration",
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
