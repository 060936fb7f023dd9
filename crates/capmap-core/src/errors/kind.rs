//! Coarse error classification used by the projection runtime.

use std::fmt;

/// How the event-delivery layer should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Capability, domain, component, or rating absent.
    NotFound,
    /// Data would break a structural rule (non-L1 assignment, unknown pillar, ...).
    InvariantViolation,
    /// Duplicate write attempted.
    Conflict,
    /// Underlying storage failure during read or write.
    TransientStore,
    /// The operation was cancelled through its context.
    Cancelled,
}

impl ErrorKind {
    /// Redelivering the same event may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TransientStore | Self::Cancelled)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::InvariantViolation => "invariant_violation",
            Self::Conflict => "conflict",
            Self::TransientStore => "transient_store",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}
