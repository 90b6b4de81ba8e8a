//! Storage - Backend Trait and Implementations
//!
//! TigerStyle: Abstract storage, every backend held to the same contract.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Storage Trait                          │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴─────────┐
//! │  MemoryStorage  │           │ DirectoryStorage │
//! │  (in-process)   │           │  (JSON files)    │
//! └─────────────────┘           └──────────────────┘
//! ```
//!
//! Both backends are certified by [`crate::conformance`].

mod backend;
mod config;
mod directory;
mod error;
mod memory;
mod record;

pub use backend::Storage;
pub use config::{open_storage, StorageConfig};
pub use directory::DirectoryStorage;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
