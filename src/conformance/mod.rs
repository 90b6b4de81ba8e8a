//! Conformance - The contract every storage backend must pass
//!
//! TigerStyle: One catalogue, run identically against every backend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ run_storage_tests(backend, Factories)                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  for each Scenario in catalogue():                           │
//! │     body(Harness, Factories) ──▶ Storage ──▶ unit::equal     │
//! │     Harness ──▶ ScenarioReport { Passed | Failed | Skipped } │
//! ├──────────────────────────────────────────────────────────────┤
//! │ SuiteReport (tree, JSON, Display)                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use anothermemory::conformance::{run_storage_tests, Factories};
//! use anothermemory::storage::{open_storage, DirectoryStorage, Storage};
//!
//! #[tokio::test]
//! async fn test_directory_storage_conformance() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let root = dir.path().to_path_buf();
//!     let factories = Factories::new(move || {
//!         Box::new(DirectoryStorage::new(root.join(uuid::Uuid::new_v4().to_string())))
//!             as Box<dyn Storage>
//!     })
//!     .with_load_from_config(open_storage);
//!
//!     run_storage_tests("directory", factories).await.assert_success();
//! }
//! ```

mod catalogue;
pub mod fixtures;
mod harness;
mod report;
mod runner;

pub use catalogue::{catalogue, Scenario, ScenarioFn};
pub use harness::Harness;
pub use report::{Outcome, OutcomeCounts, ScenarioReport, SuiteReport};
pub use runner::{run_storage_tests, CreateStorageFn, Factories, LoadFromConfigFn};
