//! UnitRecord - Persistent form of a unit
//!
//! TigerStyle: One JSON document per unit, tagged by unit type.
//!
//! Lists are stored by reference: a list record keeps the IDs of its
//! children, which are resolved from the same storage when the list is
//! loaded. Re-saving a child therefore changes what every list holding it
//! loads (last write wins). Saving a list requires its children to be
//! stored already, so a freshly saved list always loads back.
//!
//! ```json
//! {"id":"…","title":"MyUnit","created_at":"…","updated_at":"…",
//!  "type":"list","items":["<child id>","<child id>"]}
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::error::{StorageError, StorageResult};
use crate::constants::{
    LIST_NESTING_DEPTH_MAX, TODO_ITEMS_COUNT_MAX, UNIT_ID_BYTES_MAX, UNIT_TITLE_BYTES_MAX,
};
use crate::unit::{Content, TodoItem, Unit, UnitBuilder};

// =============================================================================
// Record Types
// =============================================================================

/// Stored representation of a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UnitRecord {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: RecordBody,
}

/// Stored variant payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub(crate) enum RecordBody {
    Unit,
    PlainText { data: String },
    MarkdownText { data: String },
    CodeText { data: String, language: String },
    Todo { items: Vec<TodoItem> },
    List { items: Vec<String> },
}

impl UnitRecord {
    /// Flatten a unit into its stored form.
    pub fn from_unit(unit: &Unit) -> Self {
        let body = match unit.content() {
            Content::Unit => RecordBody::Unit,
            Content::PlainText { data } => RecordBody::PlainText { data: data.clone() },
            Content::MarkdownText { data } => RecordBody::MarkdownText { data: data.clone() },
            Content::CodeText { data, language } => RecordBody::CodeText {
                data: data.clone(),
                language: language.clone(),
            },
            Content::Todo { items } => RecordBody::Todo {
                items: items.clone(),
            },
            Content::List { items } => RecordBody::List {
                items: items.iter().map(|child| child.id().to_string()).collect(),
            },
        };

        Self {
            id: unit.id().to_string(),
            title: unit.title().to_string(),
            created_at: unit.created_at(),
            updated_at: unit.updated_at(),
            body,
        }
    }

    /// Reject records that would violate unit limits when rebuilt.
    fn validate(&self) -> StorageResult<()> {
        validate_id(&self.id)?;
        if self.title.len() > UNIT_TITLE_BYTES_MAX {
            return Err(StorageError::invalid_argument(format!(
                "stored unit {} title {} bytes exceeds max {}",
                self.id,
                self.title.len(),
                UNIT_TITLE_BYTES_MAX
            )));
        }
        if let RecordBody::Todo { items } = &self.body {
            if items.len() > TODO_ITEMS_COUNT_MAX {
                return Err(StorageError::invalid_argument(format!(
                    "stored unit {} has {} todo items, max {}",
                    self.id,
                    items.len(),
                    TODO_ITEMS_COUNT_MAX
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a unit ID for use as a storage key.
pub(crate) fn validate_id(id: &str) -> StorageResult<()> {
    if id.is_empty() {
        return Err(StorageError::invalid_argument("unit id cannot be empty"));
    }
    if id.len() > UNIT_ID_BYTES_MAX {
        return Err(StorageError::invalid_argument(format!(
            "unit id {} bytes exceeds max {}",
            id.len(),
            UNIT_ID_BYTES_MAX
        )));
    }
    Ok(())
}

/// Unwrap an optional unit argument.
pub(crate) fn require_unit(unit: Option<&Unit>) -> StorageResult<&Unit> {
    unit.ok_or_else(|| StorageError::invalid_argument("unit is required"))
}

/// Check that a list will load back once saved.
///
/// Every child must already be stored, no stored descendant may lead back
/// to the list, and nesting must stay within `LIST_NESTING_DEPTH_MAX`.
/// Non-list units always pass.
pub(crate) async fn check_list_children(
    source: &dyn RecordSource,
    unit: &Unit,
) -> StorageResult<()> {
    let Content::List { items } = unit.content() else {
        return Ok(());
    };

    for child in items {
        let record = match source.read_record(child.id()).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                return Err(StorageError::invalid_argument(format!(
                    "list {} references unsaved unit {}",
                    unit.id(),
                    child.id()
                )));
            }
            Err(e) => return Err(e),
        };
        check_nesting(source, unit.id(), record, 1).await?;
    }
    Ok(())
}

fn check_nesting<'a>(
    source: &'a dyn RecordSource,
    list_id: &'a str,
    record: UnitRecord,
    depth: usize,
) -> BoxFuture<'a, StorageResult<()>> {
    Box::pin(async move {
        if record.id == list_id {
            return Err(StorageError::invalid_argument(format!(
                "list {list_id} contains itself"
            )));
        }
        if depth > LIST_NESTING_DEPTH_MAX {
            return Err(StorageError::invalid_argument(format!(
                "list {list_id} nested deeper than {LIST_NESTING_DEPTH_MAX}"
            )));
        }
        if let RecordBody::List { items } = &record.body {
            for id in items {
                let child = read_child(source, &record.id, id).await?;
                check_nesting(source, list_id, child, depth + 1).await?;
            }
        }
        Ok(())
    })
}

// =============================================================================
// Resolution
// =============================================================================

/// Backend-side lookup of stored records.
#[async_trait]
pub(crate) trait RecordSource: Send + Sync {
    /// Read one record, failing with `NotFound` when absent.
    async fn read_record(&self, id: &str) -> StorageResult<UnitRecord>;
}

#[async_trait]
impl RecordSource for HashMap<String, UnitRecord> {
    async fn read_record(&self, id: &str) -> StorageResult<UnitRecord> {
        self.get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(id))
    }
}

/// Load a unit and resolve list children recursively.
pub(crate) async fn load_resolved(source: &dyn RecordSource, id: &str) -> StorageResult<Unit> {
    let record = source.read_record(id).await?;
    resolve(source, record, 0).await
}

/// Read a list child, reporting an absent one as `MissingChild`.
async fn read_child(
    source: &dyn RecordSource,
    list_id: &str,
    child_id: &str,
) -> StorageResult<UnitRecord> {
    match source.read_record(child_id).await {
        Err(e) if e.is_not_found() => Err(StorageError::missing_child(list_id, child_id)),
        other => other,
    }
}

fn resolve<'a>(
    source: &'a dyn RecordSource,
    record: UnitRecord,
    depth: usize,
) -> BoxFuture<'a, StorageResult<Unit>> {
    Box::pin(async move {
        if depth > LIST_NESTING_DEPTH_MAX {
            return Err(StorageError::invalid_argument(format!(
                "list {} nested deeper than {}",
                record.id, LIST_NESTING_DEPTH_MAX
            )));
        }
        record.validate()?;

        let content = match record.body {
            RecordBody::Unit => Content::Unit,
            RecordBody::PlainText { data } => Content::PlainText { data },
            RecordBody::MarkdownText { data } => Content::MarkdownText { data },
            RecordBody::CodeText { data, language } => Content::CodeText { data, language },
            RecordBody::Todo { items } => Content::Todo { items },
            RecordBody::List { items: ids } => {
                let mut items = Vec::with_capacity(ids.len());
                for id in &ids {
                    let child = read_child(source, &record.id, id).await?;
                    items.push(resolve(source, child, depth + 1).await?);
                }
                Content::List { items }
            }
        };

        Ok(UnitBuilder::new(record.title)
            .with_id(record.id)
            .with_created_at(record.created_at)
            .with_updated_at(record.updated_at)
            .build(content))
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn source_of(units: &[&Unit]) -> HashMap<String, UnitRecord> {
        units
            .iter()
            .map(|u| (u.id().to_string(), UnitRecord::from_unit(u)))
            .collect()
    }

    fn empty_list(id: &str) -> Unit {
        Unit::builder("Loop")
            .with_id(id)
            .build(Content::List { items: vec![] })
    }

    #[test]
    fn test_record_json_shape() {
        let unit = Unit::code_text("MyUnit", "MyData", "MyLang");
        let value = serde_json::to_value(UnitRecord::from_unit(&unit)).unwrap();

        assert_eq!(value["type"], "code-text");
        assert_eq!(value["id"], unit.id());
        assert_eq!(value["title"], "MyUnit");
        assert_eq!(value["data"], "MyData");
        assert_eq!(value["language"], "MyLang");
    }

    #[test]
    fn test_list_record_stores_child_ids() {
        let a = Unit::new("A");
        let b = Unit::plain_text("B", "b");
        let list = Unit::list("L", vec![a.clone(), b.clone()]);

        let value = serde_json::to_value(UnitRecord::from_unit(&list)).unwrap();

        assert_eq!(value["type"], "list");
        assert_eq!(value["items"], serde_json::json!([a.id(), b.id()]));
    }

    #[test]
    fn test_record_parses_back() {
        let unit = Unit::todo(
            "MyUnit",
            vec![TodoItem::new("Data1", true), TodoItem::new("Data2", false)],
        );
        let bytes = serde_json::to_vec(&UnitRecord::from_unit(&unit)).unwrap();
        let record: UnitRecord = serde_json::from_slice(&bytes).unwrap();

        assert!(matches!(record.body, RecordBody::Todo { ref items } if items.len() == 2));
    }

    #[tokio::test]
    async fn test_resolve_nested_list() {
        let leaf = Unit::markdown_text("Leaf", "*x*");
        let inner = Unit::list("Inner", vec![leaf.clone()]);
        let outer = Unit::list("Outer", vec![inner.clone(), Unit::new("Plain")]);
        let plain = match outer.content() {
            Content::List { items } => items[1].clone(),
            _ => unreachable!(),
        };
        let source = source_of(&[&leaf, &inner, &outer, &plain]);

        let loaded = load_resolved(&source, outer.id()).await.unwrap();

        assert_eq!(crate::unit::first_difference(&outer, &loaded), None);
    }

    #[tokio::test]
    async fn test_resolve_missing_child() {
        let child = Unit::new("Child");
        let list = Unit::list("L", vec![child.clone()]);
        let source = source_of(&[&list]);

        let err = load_resolved(&source, list.id()).await.unwrap_err();

        assert!(!err.is_not_found());
        assert!(
            matches!(
                &err,
                StorageError::MissingChild { list: l, child: c }
                    if l == list.id() && c == child.id()
            ),
            "{err}"
        );
    }

    #[tokio::test]
    async fn test_resolve_rejects_self_reference() {
        let mut record = UnitRecord::from_unit(&empty_list("loop"));
        record.body = RecordBody::List {
            items: vec!["loop".to_string()],
        };
        let source = HashMap::from([("loop".to_string(), record)]);

        let err = load_resolved(&source, "loop").await.unwrap_err();

        assert!(matches!(err, StorageError::InvalidArgument(_)), "{err}");
    }

    #[tokio::test]
    async fn test_check_accepts_stored_children() {
        let child = Unit::plain_text("Child", "MyData");
        let list = Unit::list("L", vec![child.clone()]);
        let source = source_of(&[&child]);

        check_list_children(&source, &list).await.unwrap();
        check_list_children(&source, &child).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_rejects_unsaved_child() {
        let saved = Unit::new("Saved");
        let unsaved = Unit::new("Unsaved");
        let list = Unit::list("L", vec![saved.clone(), unsaved.clone()]);
        let source = source_of(&[&saved]);

        let err = check_list_children(&source, &list).await.unwrap_err();

        assert!(matches!(err, StorageError::InvalidArgument(_)), "{err}");
        assert!(err.to_string().contains(unsaved.id()), "{err}");
    }

    #[tokio::test]
    async fn test_check_rejects_cycle_through_stored_list() {
        // Stored "outer" holds "loop"; saving "loop" to hold "outer" closes the cycle
        let old_loop = empty_list("loop");
        let outer = Unit::builder("Outer")
            .with_id("outer")
            .build(Content::List {
                items: vec![old_loop.clone()],
            });
        let source = source_of(&[&old_loop, &outer]);
        let new_loop = Unit::builder("Loop")
            .with_id("loop")
            .build(Content::List { items: vec![outer] });

        let err = check_list_children(&source, &new_loop).await.unwrap_err();

        assert!(err.to_string().contains("contains itself"), "{err}");
    }

    #[tokio::test]
    async fn test_check_nesting_limit() {
        let mut source = HashMap::new();
        let mut top = Unit::new("Leaf");
        source.insert(top.id().to_string(), UnitRecord::from_unit(&top));

        for _ in 0..LIST_NESTING_DEPTH_MAX {
            top = Unit::list("Level", vec![top]);
            check_list_children(&source, &top).await.unwrap();
            source.insert(top.id().to_string(), UnitRecord::from_unit(&top));
        }
        let loaded = load_resolved(&source, top.id()).await.unwrap();
        assert_eq!(loaded, top);

        let too_deep = Unit::list("Level", vec![top]);
        let err = check_list_children(&source, &too_deep).await.unwrap_err();
        assert!(err.to_string().contains("nested deeper"), "{err}");
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("0b3c0a3e-5d1f-4b8e-9a57-1f2b1a0c9e11").is_ok());
        assert!(validate_id("a/b").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id(&"x".repeat(UNIT_ID_BYTES_MAX + 1)).is_err());
    }
}
