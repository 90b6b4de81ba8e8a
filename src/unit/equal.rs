//! Structural equality of units.
//!
//! Two units are equal when their common fields, type tag and variant
//! payload match. Lists compare element-wise and order-sensitive, recursing
//! into nested lists. Instance identity never matters.

use std::fmt::Debug;

use super::content::{Content, TodoItem};
use super::model::Unit;

/// Check two units for structural equality.
#[must_use]
pub fn equal(a: &Unit, b: &Unit) -> bool {
    first_difference(a, b).is_none()
}

/// Describe the first field where two units differ.
///
/// Returns `None` when the units are structurally equal. The description
/// is prefixed with the field path, e.g. `items[2].data: "a" != "b"`.
#[must_use]
pub fn first_difference(a: &Unit, b: &Unit) -> Option<String> {
    diff_unit(a, b, "")
}

fn diff_unit(a: &Unit, b: &Unit, path: &str) -> Option<String> {
    diff_field(path, "id", &a.id(), &b.id())
        .or_else(|| diff_field(path, "type", &a.unit_type(), &b.unit_type()))
        .or_else(|| diff_field(path, "title", &a.title(), &b.title()))
        .or_else(|| diff_field(path, "created_at", &a.created_at(), &b.created_at()))
        .or_else(|| diff_field(path, "updated_at", &a.updated_at(), &b.updated_at()))
        .or_else(|| diff_content(a.content(), b.content(), path))
}

fn diff_content(a: &Content, b: &Content, path: &str) -> Option<String> {
    match (a, b) {
        (Content::Unit, Content::Unit) => None,
        (Content::PlainText { data: x }, Content::PlainText { data: y })
        | (Content::MarkdownText { data: x }, Content::MarkdownText { data: y }) => {
            diff_field(path, "data", x, y)
        }
        (
            Content::CodeText {
                data: x,
                language: lx,
            },
            Content::CodeText {
                data: y,
                language: ly,
            },
        ) => diff_field(path, "data", x, y).or_else(|| diff_field(path, "language", lx, ly)),
        (Content::Todo { items: x }, Content::Todo { items: y }) => diff_todo_items(x, y, path),
        (Content::List { items: x }, Content::List { items: y }) => {
            let items_path = join(path, "items");
            diff_field(path, "items.len", &x.len(), &y.len()).or_else(|| {
                x.iter()
                    .zip(y)
                    .enumerate()
                    .find_map(|(i, (p, q))| diff_unit(p, q, &format!("{items_path}[{i}]")))
            })
        }
        (Content::Unit, _)
        | (Content::PlainText { .. }, _)
        | (Content::MarkdownText { .. }, _)
        | (Content::CodeText { .. }, _)
        | (Content::Todo { .. }, _)
        | (Content::List { .. }, _) => {
            diff_field(path, "type", &a.unit_type(), &b.unit_type())
        }
    }
}

fn diff_todo_items(x: &[TodoItem], y: &[TodoItem], path: &str) -> Option<String> {
    let items_path = join(path, "items");
    diff_field(path, "items.len", &x.len(), &y.len()).or_else(|| {
        x.iter().zip(y).enumerate().find_map(|(i, (p, q))| {
            let item_path = format!("{items_path}[{i}]");
            diff_field(&item_path, "id", &p.id, &q.id)
                .or_else(|| diff_field(&item_path, "data", &p.data, &q.data))
                .or_else(|| diff_field(&item_path, "done", &p.done, &q.done))
        })
    })
}

fn diff_field<T: PartialEq + Debug + ?Sized>(
    path: &str,
    name: &str,
    a: &T,
    b: &T,
) -> Option<String> {
    if a == b {
        None
    } else {
        Some(format!("{}: {a:?} != {b:?}", join(path, name)))
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

// =============================================================================
// Tests
// =============================================================================
