//! Command bus backed by the projection store.
//!
//! Commands are validated against the state visible in the caller's
//! transaction and turned into events. Nothing is written here: the events
//! are delivered back through the runtime, and the catalog projector
//! persists them like any other event.

use capmap_core::commands::{CommandBus, DomainCommand};
use capmap_core::context::ProjectionContext;
use capmap_core::errors::CommandError;
use capmap_core::events::{DomainAssignmentEvent, DomainEvent};
use capmap_core::ids::{BusinessDomainId, CapabilityId};
use capmap_storage::queries::{capabilities, domains};

#[derive(Debug, Default, Clone, Copy)]
pub struct StoreCommandBus;

impl StoreCommandBus {
    fn assign(
        &self,
        ctx: &ProjectionContext<'_>,
        domain_id: BusinessDomainId,
        capability_id: CapabilityId,
    ) -> Result<Vec<DomainEvent>, CommandError> {
        let tenant = ctx.tenant_id();
        if domains::get_domain(ctx.conn, tenant, &domain_id)?.is_none() {
            return Err(CommandError::NotFound {
                entity: "business domain",
                id: domain_id.into_inner(),
            });
        }
        let capability = capabilities::get_capability(ctx.conn, tenant, &capability_id)?
            .ok_or_else(|| CommandError::NotFound {
                entity: "capability",
                id: capability_id.to_string(),
            })?;
        if !capability.level.is_root() {
            return Err(CommandError::InvariantViolation(format!(
                "only L1 capabilities can be assigned to a domain; {} is {}",
                capability.id, capability.level
            )));
        }
        if domains::assignment_exists(ctx.conn, tenant, &domain_id, &capability_id)? {
            return Err(CommandError::Conflict(format!(
                "{capability_id} is already assigned to {domain_id}"
            )));
        }
        Ok(vec![DomainEvent::CapabilityAssignedToDomain(
            DomainAssignmentEvent {
                domain_id,
                capability_id,
            },
        )])
    }

    fn unassign(
        &self,
        ctx: &ProjectionContext<'_>,
        domain_id: BusinessDomainId,
        capability_id: CapabilityId,
    ) -> Result<Vec<DomainEvent>, CommandError> {
        if !domains::assignment_exists(ctx.conn, ctx.tenant_id(), &domain_id, &capability_id)? {
            return Err(CommandError::NotFound {
                entity: "domain assignment",
                id: format!("{domain_id}/{capability_id}"),
            });
        }
        Ok(vec![DomainEvent::CapabilityUnassignedFromDomain(
            DomainAssignmentEvent {
                domain_id,
                capability_id,
            },
        )])
    }
}

impl CommandBus for StoreCommandBus {
    fn dispatch(
        &self,
        ctx: &ProjectionContext<'_>,
        command: DomainCommand,
    ) -> Result<Vec<DomainEvent>, CommandError> {
        tracing::debug!(
            tenant = %ctx.tenant_id(),
            command = command.command_type(),
            "dispatching command"
        );
        match command {
            DomainCommand::AssignCapabilityToDomain {
                domain_id,
                capability_id,
            } => self.assign(ctx, domain_id, capability_id),
            DomainCommand::UnassignCapabilityFromDomain {
                domain_id,
                capability_id,
            } => self.unassign(ctx, domain_id, capability_id),
        }
    }
}
