//! Command-bus errors.

use super::error_code::{self, CapmapErrorCode};
use super::kind::ErrorKind;
use super::{HierarchyError, StorageError};

/// Errors raised while validating or applying a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Hierarchy(e) => e.kind(),
            Self::Storage(_) => ErrorKind::TransientStore,
        }
    }
}

impl CapmapErrorCode for CommandError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::InvariantViolation(_) => error_code::INVARIANT_VIOLATION,
            Self::Conflict(_) => error_code::CONFLICT,
            Self::Hierarchy(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}
