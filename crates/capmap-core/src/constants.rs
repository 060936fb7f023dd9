//! Shared constants.

/// Deepest level of the capability tree (L4).
pub const MAX_HIERARCHY_DEPTH: usize = 4;

/// Lowest valid importance / fit score.
pub const MIN_RATING: u8 = 1;

/// Highest valid importance / fit score.
pub const MAX_RATING: u8 = 5;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "CAPMAP_LOG";

/// Project-level configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "capmap.toml";
