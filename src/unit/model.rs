//! Unit - Addressable content record
//!
//! TigerStyle: Explicit types, validation, builder pattern.

use chrono::{DateTime, Utc};

use super::content::{Content, TodoItem, UnitType};
use crate::constants::{TODO_ITEMS_COUNT_MAX, UNIT_ID_BYTES_MAX, UNIT_TITLE_BYTES_MAX};

// =============================================================================
// Unit
// =============================================================================

/// A unit of content, addressable by ID.
///
/// Comparison is structural: see [`crate::unit::equal`].
#[derive(Debug, Clone)]
pub struct Unit {
    id: String,
    title: String,
    content: Content,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Unit {
    /// Create a plain unit carrying only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        UnitBuilder::new(title).build(Content::Unit)
    }

    /// Create a plain text unit.
    #[must_use]
    pub fn plain_text(title: impl Into<String>, data: impl Into<String>) -> Self {
        UnitBuilder::new(title).build(Content::PlainText { data: data.into() })
    }

    /// Create a markdown text unit.
    #[must_use]
    pub fn markdown_text(title: impl Into<String>, data: impl Into<String>) -> Self {
        UnitBuilder::new(title).build(Content::MarkdownText { data: data.into() })
    }

    /// Create a code text unit.
    #[must_use]
    pub fn code_text(
        title: impl Into<String>,
        data: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        UnitBuilder::new(title).build(Content::CodeText {
            data: data.into(),
            language: language.into(),
        })
    }

    /// Create a todo unit.
    ///
    /// # Panics
    /// Panics if items exceed `TODO_ITEMS_COUNT_MAX`.
    #[must_use]
    pub fn todo(title: impl Into<String>, items: Vec<TodoItem>) -> Self {
        UnitBuilder::new(title).build(Content::Todo { items })
    }

    /// Create a list unit owning the given children.
    #[must_use]
    pub fn list(title: impl Into<String>, items: Vec<Unit>) -> Self {
        UnitBuilder::new(title).build(Content::List { items })
    }

    /// Create a builder for explicit IDs and timestamps.
    #[must_use]
    pub fn builder(title: impl Into<String>) -> UnitBuilder {
        UnitBuilder::new(title)
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type tag, derived from the content.
    #[must_use]
    pub fn unit_type(&self) -> UnitType {
        self.content.unit_type()
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Variant payload.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Update title and timestamp.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        assert_title(&title);
        self.title = title;
        self.updated_at = Utc::now();
    }

    /// Replace content and timestamp.
    ///
    /// The type tag follows the new content.
    pub fn set_content(&mut self, content: Content) {
        assert_content(&content);
        self.content = content;
        self.updated_at = Utc::now();
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        super::equal(self, other)
    }
}

// =============================================================================
// Unit Builder
// =============================================================================

/// Builder for Unit with fluent API.
#[derive(Debug)]
pub struct UnitBuilder {
    title: String,
    id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl UnitBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set custom ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set update timestamp.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Build the unit with the given content.
    ///
    /// # Panics
    /// Panics if the ID is empty or any field exceeds its limit.
    #[must_use]
    pub fn build(self, content: Content) -> Unit {
        let id = self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        // Preconditions
        assert!(!id.is_empty(), "unit id cannot be empty");
        assert!(
            id.len() <= UNIT_ID_BYTES_MAX,
            "id {} bytes exceeds max {}",
            id.len(),
            UNIT_ID_BYTES_MAX
        );
        assert_title(&self.title);
        assert_content(&content);

        let now = Utc::now();
        let created_at = self.created_at.unwrap_or(now);
        Unit {
            id,
            title: self.title,
            content,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

fn assert_title(title: &str) {
    assert!(
        title.len() <= UNIT_TITLE_BYTES_MAX,
        "title {} bytes exceeds max {}",
        title.len(),
        UNIT_TITLE_BYTES_MAX
    );
}

fn assert_content(content: &Content) {
    if let Content::Todo { items } = content {
        assert!(
            items.len() <= TODO_ITEMS_COUNT_MAX,
            "todo items {} exceeds max {}",
            items.len(),
            TODO_ITEMS_COUNT_MAX
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
