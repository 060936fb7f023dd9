//! Projection errors: the aggregate error type of event handlers.

use super::error_code::{self, CapmapErrorCode};
use super::kind::ErrorKind;
use super::{CommandError, HierarchyError, StorageError};

/// Errors that can occur while projecting a domain event.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("handler '{handler}' panicked while handling {event}")]
    HandlerPanicked {
        handler: &'static str,
        event: &'static str,
    },

    #[error("projection cancelled")]
    Cancelled,
}

impl ProjectionError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(_) => ErrorKind::TransientStore,
            Self::Hierarchy(e) => e.kind(),
            Self::Command(e) => e.kind(),
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvariantViolation(_) | Self::HandlerPanicked { .. } => {
                ErrorKind::InvariantViolation
            }
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl CapmapErrorCode for ProjectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Hierarchy(e) => e.error_code(),
            Self::Command(e) => e.error_code(),
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::InvariantViolation(_) => error_code::INVARIANT_VIOLATION,
            Self::Conflict(_) => error_code::CONFLICT,
            Self::HandlerPanicked { .. } => error_code::HANDLER_PANICKED,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
