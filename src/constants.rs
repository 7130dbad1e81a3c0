//! Crate-wide constants.
//!
//! Centralizes defaults and the literal strings cell formatting relies on.

// ============================================================================
// Loading
// ============================================================================

/// Number of rows fetched by a list created without an explicit limit
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Reload duration (ms) above which a fetch is logged as slow
pub const DEFAULT_SLOW_FETCH_MS: f64 = 500.0;

/// Number of reload timings kept for statistics
pub const FETCH_STATS_SAMPLES: usize = 100;

// ============================================================================
// Cell Formatting
// ============================================================================

/// Separator between display names of plural relations
pub const RELATION_SEPARATOR: &str = ", ";

/// Boolean cell literals
pub const TRUE_LITERAL: &str = "TRUE";
pub const FALSE_LITERAL: &str = "FALSE";

/// Remote date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Remote datetime format
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Seconds in a day, for the fractional part of datetime serials
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// ============================================================================
// Settings
// ============================================================================

/// Directory name under the platform config dir
pub const SETTINGS_DIR: &str = "sheetlist";

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Log directive used when neither settings nor `RUST_LOG` provide one
pub const DEFAULT_LOG_FILTER: &str = "sheetlist=info";
