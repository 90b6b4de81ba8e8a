//! TigerStyle Constants
//!
//! Every limit carries its unit in the name (`_BYTES_MAX`, `_COUNT_MAX`).

// =============================================================================
// Units
// =============================================================================

/// Maximum unit ID length in bytes
pub const UNIT_ID_BYTES_MAX: usize = 128;

/// Maximum unit title length in bytes
pub const UNIT_TITLE_BYTES_MAX: usize = 1_024;

/// Maximum number of items in a todo unit
pub const TODO_ITEMS_COUNT_MAX: usize = 10_000;

/// Maximum nesting depth of list units resolved from storage
pub const LIST_NESTING_DEPTH_MAX: usize = 64;

// =============================================================================
// Directory Storage
// =============================================================================

/// Sub-directory holding one file per unit
pub const UNITS_DIR_NAME: &str = "units";

/// Extension of unit files
pub const UNIT_FILE_EXTENSION: &str = "json";

/// Extension of in-flight unit writes (renamed into place)
pub const UNIT_TMP_FILE_EXTENSION: &str = "json.tmp";

// =============================================================================
// CLI
// =============================================================================

/// Application name
pub const APP_NAME: &str = "anothermemory";

/// Default data directory for conformance runs
pub const DATA_DIR_DEFAULT: &str = "~/.anothermemory";

/// Prefix of per-run scratch directories under the data directory
pub const CONFORMANCE_RUN_DIR_PREFIX: &str = "conformance-";
