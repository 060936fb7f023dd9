//! Commands the engine issues back onto the command bus.

use serde::{Deserialize, Serialize};

use crate::context::ProjectionContext;
use crate::errors::CommandError;
use crate::events::DomainEvent;
use crate::ids::{BusinessDomainId, CapabilityId};

/// Internal commands. Recomputation is event-driven only; the one command
/// the engine issues is domain (re)assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainCommand {
    AssignCapabilityToDomain {
        domain_id: BusinessDomainId,
        capability_id: CapabilityId,
    },
    UnassignCapabilityFromDomain {
        domain_id: BusinessDomainId,
        capability_id: CapabilityId,
    },
}

impl DomainCommand {
    pub fn command_type(&self) -> &'static str {
        match self {
            Self::AssignCapabilityToDomain { .. } => "AssignCapabilityToDomain",
            Self::UnassignCapabilityFromDomain { .. } => "UnassignCapabilityFromDomain",
        }
    }
}

/// Accepts commands, validates them against current state, and returns the
/// events they produce. The events are delivered back through the runtime.
pub trait CommandBus: Send + Sync {
    fn dispatch(
        &self,
        ctx: &ProjectionContext<'_>,
        command: DomainCommand,
    ) -> Result<Vec<DomainEvent>, CommandError>;
}
