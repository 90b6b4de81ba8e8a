//! Storage Trait
//!
//! TigerStyle: Abstract interface for unit storage.
//!
//! All implementations must pass the same contract, checked by
//! [`crate::conformance::run_storage_tests`].

use async_trait::async_trait;

use super::error::StorageResult;
use crate::unit::Unit;

/// Abstract storage backend for units.
///
/// Lifecycle: `uninitialized` → `created` → `removed`. Unit operations are
/// only valid while created; otherwise they fail with
/// [`super::StorageError::NotCreated`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create the storage so units can be saved.
    async fn create(&self) -> StorageResult<()>;

    /// Check whether the storage exists.
    ///
    /// Pure query, must not create anything.
    async fn is_created(&self) -> bool;

    /// Remove the storage and all its units.
    ///
    /// Succeeds whether or not the storage was ever created.
    async fn remove(&self) -> StorageResult<()>;

    /// Store a unit, replacing any unit with the same ID.
    ///
    /// `None` is rejected.
    async fn save_unit(&self, unit: Option<&Unit>) -> StorageResult<()>;

    /// Load a unit by ID.
    ///
    /// Fails for an empty ID and for IDs that do not exist.
    async fn load_unit(&self, id: &str) -> StorageResult<Unit>;

    /// Remove a stored unit.
    ///
    /// `None` is rejected, as are units that were never stored.
    async fn remove_unit(&self, unit: Option<&Unit>) -> StorageResult<()>;

    /// Serialize the configuration (not the data) of this storage.
    ///
    /// The blob must let a loader rebuild an instance pointing at the same
    /// units. Backends that cannot be rebuilt return
    /// [`super::StorageError::Unsupported`].
    fn config(&self) -> StorageResult<Vec<u8>>;
}
