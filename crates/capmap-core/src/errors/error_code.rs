//! Stable string error codes surfaced to callers and logs.

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";
pub const CONFLICT: &str = "CONFLICT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const HANDLER_PANICKED: &str = "HANDLER_PANICKED";
pub const CANCELLED: &str = "CANCELLED";

/// Maps an error to its stable code.
pub trait CapmapErrorCode {
    fn error_code(&self) -> &'static str;
}
