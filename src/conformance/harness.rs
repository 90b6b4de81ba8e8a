//! Harness - Assertion facility handed to every scenario.
//!
//! Assertions record failures and keep going, so one run reports every
//! broken expectation of a scenario rather than only the first. Each
//! assertion returns whether it held, letting a scenario bail out when
//! later steps depend on an earlier one.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::{AssertUnwindSafe, Location};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;

use super::report::{Outcome, ScenarioReport};
use crate::unit::{first_difference, Unit};

#[derive(Debug, Default)]
struct NodeState {
    failures: Vec<String>,
    skip_reason: Option<String>,
    children: Vec<ScenarioReport>,
}

/// Assertion and reporting context of one scenario or sub-test.
///
/// Cloning yields another handle to the same report node.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    state: Arc<Mutex<NodeState>>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut NodeState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn record(&self, message: String) {
        self.with_state(|state| state.failures.push(message));
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// Record a failure.
    #[track_caller]
    pub fn fail(&self, message: impl Display) {
        let caller = Location::caller();
        let file = Path::new(caller.file())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(caller.file());
        self.record(format!("{message} [{file}:{}]", caller.line()));
    }

    /// Assert that an operation succeeded.
    #[track_caller]
    pub fn no_error<T, E: Display>(&self, result: &Result<T, E>, what: &str) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => {
                self.fail(format_args!("{what}: unexpected error: {e}"));
                false
            }
        }
    }

    /// Assert that an operation succeeded and hand back its value.
    #[track_caller]
    pub fn require_ok<T, E: Display>(&self, result: Result<T, E>, what: &str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(format_args!("{what}: unexpected error: {e}"));
                None
            }
        }
    }

    /// Assert that an operation failed.
    #[track_caller]
    pub fn error<T, E>(&self, result: &Result<T, E>, what: &str) -> bool {
        if result.is_ok() {
            self.fail(format_args!("{what}: expected an error, got success"));
            false
        } else {
            true
        }
    }

    /// Assert that a condition holds.
    #[track_caller]
    pub fn is_true(&self, condition: bool, what: &str) -> bool {
        if !condition {
            self.fail(format_args!("{what}: expected true"));
        }
        condition
    }

    /// Assert that a condition does not hold.
    #[track_caller]
    pub fn is_false(&self, condition: bool, what: &str) -> bool {
        if condition {
            self.fail(format_args!("{what}: expected false"));
        }
        !condition
    }

    /// Assert that two units are structurally equal.
    #[track_caller]
    pub fn units_equal(&self, expected: &Unit, actual: &Unit, what: &str) -> bool {
        match first_difference(expected, actual) {
            None => true,
            Some(diff) => {
                self.fail(format_args!("{what}: units differ at {diff}"));
                false
            }
        }
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Mark this node as skipped. The caller returns right after.
    pub fn skip(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.with_state(|state| state.skip_reason = Some(reason));
    }

    /// Check whether any failure was recorded on this node so far.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.with_state(|state| !state.failures.is_empty())
    }

    /// Run a named sub-test with its own report node.
    ///
    /// Returns whether the sub-test did not fail.
    pub async fn run<F, Fut>(&self, name: impl Into<String>, body: F) -> bool
    where
        F: FnOnce(Harness) -> Fut,
        Fut: Future<Output = ()> + Send,
    {
        let child = Harness::new();
        child.guard(body(child.clone())).await;
        let report = child.into_report(name.into());
        let passed = report.outcome != Outcome::Failed;
        self.with_state(|state| state.children.push(report));
        passed
    }

    /// Drive a scenario body, turning a panic into a recorded failure.
    pub(crate) async fn guard<Fut>(&self, body: Fut)
    where
        Fut: Future<Output = ()> + Send,
    {
        if let Err(payload) = AssertUnwindSafe(body).catch_unwind().await {
            self.record(format!("panicked: {}", panic_message(payload.as_ref())));
        }
    }

    pub(crate) fn into_report(self, name: String) -> ScenarioReport {
        let state = self.with_state(std::mem::take);
        ScenarioReport::new(name, state.failures, state.skip_reason, state.children)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertions_record_and_continue() {
        let h = Harness::new();

        assert!(h.no_error(&Ok::<_, String>(()), "ok op"));
        assert!(!h.no_error(&Err::<(), _>("disk full"), "save"));
        assert!(!h.error(&Ok::<_, String>(1), "load"));
        assert!(h.is_false(false, "flag"));

        let report = h.into_report("scenario".to_string());
        assert_eq!(report.outcome, Outcome::Failed);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures[0].starts_with("save: unexpected error: disk full [harness.rs:"));
        assert!(report.failures[1].starts_with("load: expected an error, got success"));
    }

    #[test]
    fn test_require_ok() {
        let h = Harness::new();

        assert_eq!(h.require_ok(Ok::<_, String>(7), "count"), Some(7));
        assert_eq!(h.require_ok(Err::<i32, _>("gone"), "count"), None);
        assert!(h.has_failed());
    }

    #[test]
    fn test_units_equal_reports_difference() {
        let h = Harness::new();
        let a = Unit::plain_text("MyUnit", "MyData");
        let b = Unit::plain_text("MyUnit", "MyData");

        assert!(h.units_equal(&a, &a.clone(), "same"));
        assert!(!h.units_equal(&a, &b, "fresh"));

        let report = h.into_report("scenario".to_string());
        assert!(report.failures[0].starts_with("fresh: units differ at id:"));
    }

    #[test]
    fn test_skip() {
        let h = Harness::new();
        h.skip("no loader");

        let report = h.into_report("config".to_string());
        assert_eq!(report.outcome, Outcome::Skipped);
        assert_eq!(report.skip_reason.as_deref(), Some("no loader"));
    }

    #[tokio::test]
    async fn test_sub_tests_are_isolated() {
        let h = Harness::new();

        let first = h.run("unit", |c| async move {
            c.is_true(true, "fine");
        })
        .await;
        let second = h.run("todo", |c| async move {
            c.fail("items lost");
        })
        .await;

        assert!(first);
        assert!(!second);
        assert!(!h.has_failed());

        let report = h.into_report("variants".to_string());
        assert_eq!(report.outcome, Outcome::Failed);
        assert_eq!(report.child("unit").unwrap().outcome, Outcome::Passed);
        assert_eq!(report.child("todo").unwrap().outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn test_guard_catches_panic() {
        let h = Harness::new();

        h.guard(async {
            panic!("backend exploded");
        })
        .await;

        let report = h.into_report("scenario".to_string());
        assert_eq!(report.failures, vec!["panicked: backend exploded".to_string()]);
    }
}
