//! Unit Content - Type tags and variant payloads
//!
//! TigerStyle: Closed set of variants, exhaustive matches everywhere.

use serde::{Deserialize, Serialize};

// =============================================================================
// Unit Type
// =============================================================================

/// Type tag of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitType {
    /// Plain unit with a title only
    Unit,
    /// Plain text
    PlainText,
    /// Markdown text
    MarkdownText,
    /// Source code with a language tag
    CodeText,
    /// Todo list
    Todo,
    /// Ordered list of other units
    List,
}

impl UnitType {
    /// Get string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::PlainText => "plain-text",
            Self::MarkdownText => "markdown-text",
            Self::CodeText => "code-text",
            Self::Todo => "todo",
            Self::List => "list",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unit" => Some(Self::Unit),
            "plain-text" => Some(Self::PlainText),
            "markdown-text" => Some(Self::MarkdownText),
            "code-text" => Some(Self::CodeText),
            "todo" => Some(Self::Todo),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// Get all unit types in order.
    #[must_use]
    pub fn all() -> &'static [UnitType] {
        &[
            Self::Unit,
            Self::PlainText,
            Self::MarkdownText,
            Self::CodeText,
            Self::Todo,
            Self::List,
        ]
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Todo Item
// =============================================================================

/// A single entry of a todo unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Item text
    pub data: String,
    /// Whether the item is checked off
    pub done: bool,
}

impl TodoItem {
    /// Create a new item with a fresh ID.
    #[must_use]
    pub fn new(data: impl Into<String>, done: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            data: data.into(),
            done,
        }
    }
}

// =============================================================================
// Content
// =============================================================================

/// Variant-specific payload of a unit.
///
/// Equality of contents is defined by [`crate::unit::first_difference`],
/// which is why this type does not derive `PartialEq`.
#[derive(Debug, Clone)]
pub enum Content {
    /// No payload
    Unit,
    /// Plain text body
    PlainText {
        /// Text body
        data: String,
    },
    /// Markdown body
    MarkdownText {
        /// Markdown source
        data: String,
    },
    /// Code snippet
    CodeText {
        /// Source code
        data: String,
        /// Language tag (free-form, e.g. "rust")
        language: String,
    },
    /// Ordered todo items
    Todo {
        /// Items in display order
        items: Vec<TodoItem>,
    },
    /// Ordered child units
    List {
        /// Children in display order
        items: Vec<super::Unit>,
    },
}

impl Content {
    /// Type tag matching this payload.
    #[must_use]
    pub fn unit_type(&self) -> UnitType {
        match self {
            Self::Unit => UnitType::Unit,
            Self::PlainText { .. } => UnitType::PlainText,
            Self::MarkdownText { .. } => UnitType::MarkdownText,
            Self::CodeText { .. } => UnitType::CodeText,
            Self::Todo { .. } => UnitType::Todo,
            Self::List { .. } => UnitType::List,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
