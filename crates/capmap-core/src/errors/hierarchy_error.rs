//! Capability tree errors.

use super::error_code::{self, CapmapErrorCode};
use super::kind::ErrorKind;
use super::StorageError;
use crate::ids::CapabilityId;
use crate::models::CapabilityLevel;

/// Errors raised while reading or restructuring the capability tree.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("capability not found: {0}")]
    CapabilityNotFound(CapabilityId),

    #[error("parent {parent_id} of capability {capability_id} not found")]
    ParentNotFound {
        capability_id: CapabilityId,
        parent_id: CapabilityId,
    },

    #[error("capability {capability_id} must be {expected}, got {actual}")]
    LevelMismatch {
        capability_id: CapabilityId,
        expected: CapabilityLevel,
        actual: CapabilityLevel,
    },

    #[error("moving {capability_id} under {parent_id} would create a cycle")]
    CycleDetected {
        capability_id: CapabilityId,
        parent_id: CapabilityId,
    },

    #[error("capability {capability_id} would reach depth {depth}, max is 4")]
    DepthExceeded {
        capability_id: CapabilityId,
        depth: usize,
    },

    #[error("capability {capability_id} still has {child_count} children")]
    HasChildren {
        capability_id: CapabilityId,
        child_count: usize,
    },

    #[error("invalid capability level: {0}")]
    InvalidLevel(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl HierarchyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapabilityNotFound(_) => ErrorKind::NotFound,
            // A missing parent breaks the one-parent rule; it is not the
            // object that triggered the event.
            Self::ParentNotFound { .. }
            | Self::LevelMismatch { .. }
            | Self::CycleDetected { .. }
            | Self::DepthExceeded { .. }
            | Self::HasChildren { .. }
            | Self::InvalidLevel(_) => ErrorKind::InvariantViolation,
            Self::Storage(_) => ErrorKind::TransientStore,
        }
    }
}

impl CapmapErrorCode for HierarchyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::CapabilityNotFound(_) => error_code::NOT_FOUND,
            _ => error_code::INVARIANT_VIOLATION,
        }
    }
}
