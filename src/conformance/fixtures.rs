//! Fixture units used by the catalogue.
//!
//! Public so backend authors can reproduce a failing scenario by hand.

use crate::unit::{TodoItem, Unit};

/// Title shared by all fixtures.
pub const FIXTURE_TITLE: &str = "MyUnit";

/// Payload shared by all text fixtures.
pub const FIXTURE_DATA: &str = "MyData";

/// Language tag of the code fixture.
pub const FIXTURE_LANGUAGE: &str = "MyLang";

/// Plain text unit `"MyUnit"` / `"MyData"`.
#[must_use]
pub fn plain_text() -> Unit {
    Unit::plain_text(FIXTURE_TITLE, FIXTURE_DATA)
}

/// Todo unit with `"Data1"` (done) and `"Data2"` (open).
#[must_use]
pub fn todo() -> Unit {
    Unit::todo(
        FIXTURE_TITLE,
        vec![TodoItem::new("Data1", true), TodoItem::new("Data2", false)],
    )
}

/// One fresh unit of every non-list type, in type order.
#[must_use]
pub fn simple_units() -> Vec<Unit> {
    vec![
        Unit::new(FIXTURE_TITLE),
        plain_text(),
        Unit::markdown_text(FIXTURE_TITLE, FIXTURE_DATA),
        Unit::code_text(FIXTURE_TITLE, FIXTURE_DATA, FIXTURE_LANGUAGE),
        todo(),
    ]
}

/// List unit owning the given children.
#[must_use]
pub fn list_of(items: Vec<Unit>) -> Unit {
    Unit::list(FIXTURE_TITLE, items)
}
