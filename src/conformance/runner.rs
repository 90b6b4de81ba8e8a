//! Suite runner.
//!
//! Runs the whole catalogue against one backend, one report node per
//! scenario. Scenarios run one after another; a panic inside one is
//! recorded as its failure and the run continues.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::catalogue::catalogue;
use super::harness::Harness;
use super::report::{Outcome, SuiteReport};
use crate::storage::{Storage, StorageResult};

/// Factory of fresh, uncreated storage instances.
pub type CreateStorageFn = Arc<dyn Fn() -> Box<dyn Storage> + Send + Sync>;

/// Factory rebuilding a storage from a configuration blob.
pub type LoadFromConfigFn = Arc<dyn Fn(&[u8]) -> StorageResult<Box<dyn Storage>> + Send + Sync>;

/// The two factories a backend author supplies.
///
/// `create_storage` must return an independent instance on every call.
/// Without `load_from_config`, the configuration scenario is skipped.
#[derive(Clone)]
pub struct Factories {
    create_storage: CreateStorageFn,
    load_from_config: Option<LoadFromConfigFn>,
}

impl Factories {
    /// Create factories without configuration loading.
    pub fn new<F>(create_storage: F) -> Self
    where
        F: Fn() -> Box<dyn Storage> + Send + Sync + 'static,
    {
        Self {
            create_storage: Arc::new(create_storage),
            load_from_config: None,
        }
    }

    /// Add a configuration loader.
    #[must_use]
    pub fn with_load_from_config<F>(mut self, load_from_config: F) -> Self
    where
        F: Fn(&[u8]) -> StorageResult<Box<dyn Storage>> + Send + Sync + 'static,
    {
        self.load_from_config = Some(Arc::new(load_from_config));
        self
    }

    /// Produce a fresh, uncreated storage.
    #[must_use]
    pub fn create_storage(&self) -> Box<dyn Storage> {
        (self.create_storage)()
    }

    /// Configuration loader, if the backend supports one.
    #[must_use]
    pub fn load_from_config(
        &self,
    ) -> Option<&(dyn Fn(&[u8]) -> StorageResult<Box<dyn Storage>> + Send + Sync)> {
        self.load_from_config.as_deref()
    }
}

impl fmt::Debug for Factories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factories")
            .field("load_from_config", &self.load_from_config.is_some())
            .finish_non_exhaustive()
    }
}

/// Run every catalogue scenario against one backend.
///
/// # Example
///
/// ```no_run
/// use anothermemory::conformance::{run_storage_tests, Factories};
/// use anothermemory::storage::{MemoryStorage, Storage};
///
/// # async fn certify() {
/// let factories = Factories::new(|| Box::new(MemoryStorage::new()) as Box<dyn Storage>);
/// run_storage_tests("memory", factories).await.assert_success();
/// # }
/// ```
pub async fn run_storage_tests(backend: impl Into<String>, factories: Factories) -> SuiteReport {
    let backend = backend.into();
    info!(
        backend = %backend,
        scenarios = catalogue().len(),
        load_from_config = factories.load_from_config.is_some(),
        "Running storage conformance suite"
    );

    let mut scenarios = Vec::with_capacity(catalogue().len());
    for scenario in catalogue() {
        debug!(scenario = scenario.title, "Scenario started");
        let harness = Harness::new();
        harness
            .guard((scenario.body)(harness.clone(), factories.clone()))
            .await;

        let report = harness.into_report(scenario.title.to_string());
        match report.outcome {
            Outcome::Passed => debug!(scenario = scenario.title, "Scenario passed"),
            Outcome::Skipped => info!(
                scenario = scenario.title,
                reason = report.skip_reason.as_deref().unwrap_or_default(),
                "Scenario skipped"
            ),
            Outcome::Failed => warn!(scenario = scenario.title, "Scenario failed"),
        }
        scenarios.push(report);
    }

    let report = SuiteReport { backend, scenarios };
    let counts = report.counts();
    info!(
        backend = %report.backend,
        passed = counts.passed,
        failed = counts.failed,
        skipped = counts.skipped,
        "Storage conformance suite finished"
    );
    for (path, failure) in report.failures() {
        warn!(scenario = %path, "{failure}");
    }
    report
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{open_storage, MemoryStorage};

    #[tokio::test]
    async fn test_factories_create_independent_instances() {
        let factories = Factories::new(|| Box::new(MemoryStorage::new()) as Box<dyn Storage>);

        let a = factories.create_storage();
        let b = factories.create_storage();
        a.create().await.unwrap();

        assert!(a.is_created().await);
        assert!(!b.is_created().await);
        assert!(factories.load_from_config().is_none());
    }

    #[test]
    fn test_factories_with_loader() {
        let factories = Factories::new(|| Box::new(MemoryStorage::new()) as Box<dyn Storage>)
            .with_load_from_config(open_storage);

        assert!(factories.load_from_config().is_some());
        assert_eq!(
            format!("{factories:?}"),
            "Factories { load_from_config: true, .. }"
        );
    }

    #[tokio::test]
    async fn test_run_memory_backend() {
        let factories = Factories::new(|| Box::new(MemoryStorage::new()) as Box<dyn Storage>);

        let report = run_storage_tests("memory", factories).await;

        report.assert_success();
        assert_eq!(report.scenarios.len(), catalogue().len());
        assert_eq!(report.counts().skipped, 1);
    }
}
