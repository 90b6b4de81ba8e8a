//! anothermemory - Unit storage and its conformance suite
//!
//! TigerStyle: One storage contract, many backends, one suite to hold them
//! to it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  conformance   │ Scenario catalogue, runner │
//! ├─────────────────────────────────────────────┤
//! │  storage       │ Storage trait, backends    │
//! ├─────────────────────────────────────────────┤
//! │  unit          │ Content model, equality    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use anothermemory::conformance::{run_storage_tests, Factories};
//! use anothermemory::storage::{MemoryStorage, Storage};
//!
//! #[tokio::test]
//! async fn test_memory_storage_conformance() {
//!     let factories = Factories::new(|| Box::new(MemoryStorage::new()) as Box<dyn Storage>);
//!     run_storage_tests("memory", factories).await.assert_success();
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod conformance;
pub mod constants;
pub mod storage;
pub mod unit;

// Re-export common types
pub use conformance::{run_storage_tests, Factories, Outcome, SuiteReport};
pub use storage::{
    open_storage, DirectoryStorage, MemoryStorage, Storage, StorageConfig, StorageError,
    StorageResult,
};
pub use unit::{Content, TodoItem, Unit, UnitBuilder, UnitType};
