//! Scenario catalogue.
//!
//! Every scenario builds its own storage instances from the factories, so
//! no scenario depends on another's side effects. The order only keeps
//! reports stable.

use futures::future::BoxFuture;
use futures::FutureExt;

use super::fixtures;
use super::harness::Harness;
use super::runner::Factories;
use crate::unit::{Content, Unit};

/// Scenario body: gets a fresh harness and the backend's factories.
pub type ScenarioFn = fn(Harness, Factories) -> BoxFuture<'static, ()>;

/// One named entry of the catalogue.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Human-readable title, used as the report node name
    pub title: &'static str,
    /// Scenario body
    pub body: ScenarioFn,
}

/// The fixed, ordered scenario set every backend must pass.
#[must_use]
pub fn catalogue() -> &'static [Scenario] {
    SCENARIOS
}

static SCENARIOS: &[Scenario] = &[
    Scenario {
        title: "Storage is not created initially when initialized first time with given arguments",
        body: |h, f| not_created_initially(h, f).boxed(),
    },
    Scenario {
        title: "Storage can be successfully created",
        body: |h, f| can_be_created(h, f).boxed(),
    },
    Scenario {
        title: "Storage can not be used before it will be created",
        body: |h, f| unusable_before_created(h, f).boxed(),
    },
    Scenario {
        title: "Storage can be removed if not created before",
        body: |h, f| remove_if_not_created(h, f).boxed(),
    },
    Scenario {
        title: "Storage can be removed if was created before",
        body: |h, f| remove_if_created(h, f).boxed(),
    },
    Scenario {
        title: "Storage is not created when removed",
        body: |h, f| not_created_when_removed(h, f).boxed(),
    },
    Scenario {
        title: "Storage can handle all supported simple unit types",
        body: |h, f| simple_unit_types(h, f).boxed(),
    },
    Scenario {
        title: "Storage can handle list unit",
        body: |h, f| list_unit(h, f).boxed(),
    },
    Scenario {
        title: "Nil unit cannot be saved",
        body: |h, f| nil_unit_not_saved(h, f).boxed(),
    },
    Scenario {
        title: "Nil unit cannot be removed",
        body: |h, f| nil_unit_not_removed(h, f).boxed(),
    },
    Scenario {
        title: "Empty ID cannot be used to load unit",
        body: |h, f| empty_id_not_loaded(h, f).boxed(),
    },
    Scenario {
        title: "Storage config can be serialized and loaded back",
        body: |h, f| config_round_trip(h, f).boxed(),
    },
];

// =============================================================================
// Lifecycle
// =============================================================================

async fn not_created_initially(h: Harness, f: Factories) {
    h.is_false(f.create_storage().is_created().await, "fresh storage is_created");
}

async fn can_be_created(h: Harness, f: Factories) {
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.is_true(s.is_created().await, "is_created after create");
}

async fn unusable_before_created(h: Harness, f: Factories) {
    let s = f.create_storage();
    let unit = Unit::new(fixtures::FIXTURE_TITLE);

    h.error(&s.save_unit(Some(&unit)).await, "save_unit before create");
    h.error(&s.remove_unit(Some(&unit)).await, "remove_unit before create");
    h.error(&s.load_unit("123").await, "load_unit before create");
}

async fn remove_if_not_created(h: Harness, f: Factories) {
    h.no_error(&f.create_storage().remove().await, "remove without create");
}

async fn remove_if_created(h: Harness, f: Factories) {
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.no_error(&s.remove().await, "remove after create");
}

async fn not_created_when_removed(h: Harness, f: Factories) {
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.no_error(&s.remove().await, "remove");
    h.is_false(
        f.create_storage().is_created().await,
        "new storage is_created after remove",
    );
}

// =============================================================================
// Units
// =============================================================================

async fn simple_unit_types(h: Harness, f: Factories) {
    for unit in fixtures::simple_units() {
        let f = f.clone();
        h.run(unit.unit_type().as_str(), |h| unit_round_trip(h, f, unit))
            .await;
    }
}

async fn unit_round_trip(h: Harness, f: Factories, unit: Unit) {
    let s = f.create_storage();
    if !h.no_error(&s.create().await, "create") {
        return;
    }
    h.no_error(&s.save_unit(Some(&unit)).await, "save_unit");

    let Some(loaded) = h.require_ok(s.load_unit(unit.id()).await, "load_unit") else {
        return;
    };
    h.units_equal(&unit, &loaded, "loaded unit");

    h.no_error(&s.remove_unit(Some(&loaded)).await, "remove_unit");
    h.error(&s.load_unit(loaded.id()).await, "load_unit after remove_unit");
}

async fn list_unit(h: Harness, f: Factories) {
    let children = fixtures::simple_units();
    let list = fixtures::list_of(children.clone());

    let s = f.create_storage();
    if !h.no_error(&s.create().await, "create") {
        return;
    }
    for child in &children {
        h.no_error(
            &s.save_unit(Some(child)).await,
            &format!("save_unit {}", child.unit_type()),
        );
    }
    h.no_error(&s.save_unit(Some(&list)).await, "save_unit list");

    let Some(loaded) = h.require_ok(s.load_unit(list.id()).await, "load_unit list") else {
        return;
    };
    h.units_equal(&list, &loaded, "loaded list");

    if let Content::List { items } = loaded.content() {
        for (expected, actual) in children.iter().zip(items) {
            h.run(expected.unit_type().as_str(), |h| async move {
                h.units_equal(expected, actual, "list item");
            })
            .await;
        }
    }

    h.no_error(&s.remove_unit(Some(&loaded)).await, "remove_unit list");
    h.error(&s.load_unit(loaded.id()).await, "load_unit list after remove_unit");
}

// =============================================================================
// Invalid Arguments
// =============================================================================

async fn nil_unit_not_saved(h: Harness, f: Factories) {
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.error(&s.save_unit(None).await, "save_unit(None)");
}

async fn nil_unit_not_removed(h: Harness, f: Factories) {
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.error(&s.remove_unit(None).await, "remove_unit(None)");
}

async fn empty_id_not_loaded(h: Harness, f: Factories) {
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.error(&s.load_unit("").await, "load_unit(\"\")");
}

// =============================================================================
// Configuration
// =============================================================================

async fn config_round_trip(h: Harness, f: Factories) {
    let Some(load_from_config) = f.load_from_config() else {
        h.skip("storage does not support loading from config");
        return;
    };

    let unit = fixtures::plain_text();
    let s = f.create_storage();
    h.no_error(&s.create().await, "create");
    h.no_error(&s.save_unit(Some(&unit)).await, "save_unit");

    let Some(config) = h.require_ok(s.config(), "config") else {
        return;
    };
    h.is_false(config.is_empty(), "config is empty");

    let Some(loaded_storage) =
        h.require_ok(load_from_config(config.as_slice()), "load_from_config")
    else {
        return;
    };
    let Some(loaded) = h.require_ok(
        loaded_storage.load_unit(unit.id()).await,
        "load_unit from loaded storage",
    ) else {
        return;
    };
    h.units_equal(&unit, &loaded, "unit loaded through config");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_titles_unique() {
        let titles: HashSet<&str> = catalogue().iter().map(|s| s.title).collect();
        assert_eq!(titles.len(), catalogue().len());
        assert_eq!(catalogue().len(), 12);
    }

    #[test]
    fn test_catalogue_order_is_stable() {
        assert_eq!(
            catalogue()[0].title,
            "Storage is not created initially when initialized first time with given arguments"
        );
        assert_eq!(
            catalogue()[catalogue().len() - 1].title,
            "Storage config can be serialized and loaded back"
        );
    }
}
