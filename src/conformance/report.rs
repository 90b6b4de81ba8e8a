//! Conformance reports.
//!
//! A run yields one [`ScenarioReport`] per catalogue entry, nested one level
//! deeper for per-unit-type sub-tests. Skips are their own outcome and never
//! count as failures.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Outcome
// =============================================================================

/// Result of one scenario or sub-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// All assertions held
    Passed,
    /// At least one assertion failed, here or in a sub-test
    Failed,
    /// A required capability is missing
    Skipped,
}

impl Outcome {
    /// Short label for report output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Skipped => "SKIP",
        }
    }
}

// =============================================================================
// Scenario Report
// =============================================================================

/// Report node for a scenario or one of its sub-tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario title or sub-test name
    pub name: String,
    /// Aggregated outcome
    pub outcome: Outcome,
    /// Failure messages recorded directly on this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    /// Why this node was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    /// Nested sub-tests in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScenarioReport>,
}

impl ScenarioReport {
    pub(crate) fn new(
        name: String,
        failures: Vec<String>,
        skip_reason: Option<String>,
        children: Vec<ScenarioReport>,
    ) -> Self {
        let outcome = if !failures.is_empty()
            || children.iter().any(|c| c.outcome == Outcome::Failed)
        {
            Outcome::Failed
        } else if skip_reason.is_some() {
            Outcome::Skipped
        } else {
            Outcome::Passed
        };

        Self {
            name,
            outcome,
            failures,
            skip_reason,
            children,
        }
    }

    /// Find a direct sub-test by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ScenarioReport> {
        self.children.iter().find(|c| c.name == name)
    }

    fn collect_failures<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        let path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{prefix}/{}", self.name)
        };
        for failure in &self.failures {
            out.push((path.clone(), failure.as_str()));
        }
        for child in &self.children {
            child.collect_failures(&path, out);
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth + 1);
        write!(f, "{indent}{} {}", self.outcome.label(), self.name)?;
        if let Some(reason) = &self.skip_reason {
            write!(f, " ({reason})")?;
        }
        writeln!(f)?;
        for failure in &self.failures {
            writeln!(f, "{indent}    - {failure}")?;
        }
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

// =============================================================================
// Suite Report
// =============================================================================

/// Counts of top-level scenario outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Scenarios that passed
    pub passed: usize,
    /// Scenarios that failed
    pub failed: usize,
    /// Scenarios that were skipped
    pub skipped: usize,
}

/// Report of one conformance run against one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Name of the backend under test
    pub backend: String,
    /// One node per catalogue entry, in catalogue order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Check that no scenario failed. Skipped scenarios are fine.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.scenarios.iter().all(|s| s.outcome != Outcome::Failed)
    }

    /// Count top-level outcomes.
    #[must_use]
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for scenario in &self.scenarios {
            match scenario.outcome {
                Outcome::Passed => counts.passed += 1,
                Outcome::Failed => counts.failed += 1,
                Outcome::Skipped => counts.skipped += 1,
            }
        }
        counts
    }

    /// Find a scenario by title.
    #[must_use]
    pub fn scenario(&self, title: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == title)
    }

    /// All failure messages with their `scenario/sub-test` path.
    #[must_use]
    pub fn failures(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        for scenario in &self.scenarios {
            scenario.collect_failures("", &mut out);
        }
        out
    }

    /// Panic with the rendered report unless the run succeeded.
    ///
    /// # Panics
    /// Panics if any scenario failed.
    #[track_caller]
    pub fn assert_success(&self) {
        assert!(self.is_success(), "storage conformance failed\n{self}");
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.counts();
        writeln!(
            f,
            "storage conformance: {} ({} passed, {} failed, {} skipped)",
            self.backend, counts.passed, counts.failed, counts.skipped
        )?;
        for scenario in &self.scenarios {
            scenario.render(f, 0)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
