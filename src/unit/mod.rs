//! Unit - Polymorphic content model
//!
//! TigerStyle: One struct, one closed sum type for variant payloads.
//!
//! # Variants
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Unit { id, title, created_at, updated_at }   │
//! ├──────────────────────────────────────────────┤
//! │ Content::Unit                                │
//! │ Content::PlainText    { data }               │
//! │ Content::MarkdownText { data }               │
//! │ Content::CodeText     { data, language }     │
//! │ Content::Todo         { items: [TodoItem] }  │
//! │ Content::List         { items: [Unit] }      │
//! └──────────────────────────────────────────────┘
//! ```

mod content;
mod equal;
mod model;

pub use content::{Content, TodoItem, UnitType};
pub use equal::{equal, first_difference};
pub use model::{Unit, UnitBuilder};
