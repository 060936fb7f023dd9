//! Assignment-Consistency Resolver.
//!
//! Domain membership is defined only at L1. When an assigned root is moved
//! under another capability, its assignments are handed to the L1 root that
//! now dominates it. The hand-over goes through the command bus; the events
//! it returns are applied by the runtime after this event commits.

use std::sync::Arc;

use capmap_core::commands::{CommandBus, DomainCommand};
use capmap_core::context::ProjectionContext;
use capmap_core::errors::{CommandError, ErrorKind, ProjectionError};
use capmap_core::events::*;
use capmap_core::ids::{BusinessDomainId, CapabilityId};
use capmap_storage::queries::domains;

use crate::hierarchy::HierarchyNavigator;

pub struct AssignmentConsistencyProjector {
    bus: Arc<dyn CommandBus>,
}

impl AssignmentConsistencyProjector {
    pub fn new(bus: Arc<dyn CommandBus>) -> Self {
        Self { bus }
    }

    /// Issue one command. Invariant violations and conflicts end this one
    /// reassignment attempt and are logged; store failures propagate so the
    /// event is redelivered.
    fn issue(
        &self,
        ctx: &ProjectionContext<'_>,
        command: DomainCommand,
        out: &mut Vec<DomainEvent>,
    ) -> Result<bool, ProjectionError> {
        let command_type = command.command_type();
        match self.bus.dispatch(ctx, command) {
            Ok(events) => {
                out.extend(events);
                Ok(true)
            }
            Err(e) => match e.kind() {
                ErrorKind::TransientStore | ErrorKind::Cancelled => Err(e.into()),
                ErrorKind::NotFound => {
                    tracing::debug!(command = command_type, error = %e, "reassignment target gone");
                    Ok(false)
                }
                ErrorKind::InvariantViolation | ErrorKind::Conflict => {
                    log_rejected(ctx, command_type, &e);
                    Ok(false)
                }
            },
        }
    }

    fn reassign(
        &self,
        ctx: &ProjectionContext<'_>,
        moved: &CapabilityId,
        root: &CapabilityId,
        domain_id: &BusinessDomainId,
        out: &mut Vec<DomainEvent>,
    ) -> Result<(), ProjectionError> {
        let unassigned = self.issue(
            ctx,
            DomainCommand::UnassignCapabilityFromDomain {
                domain_id: domain_id.clone(),
                capability_id: moved.clone(),
            },
            out,
        )?;
        if !unassigned {
            return Ok(());
        }

        if domains::assignment_exists(ctx.conn, ctx.tenant_id(), domain_id, root)? {
            tracing::info!(
                tenant = %ctx.tenant_id(),
                domain_id = %domain_id,
                moved = %moved,
                root = %root,
                "new root already assigned; dropping moved capability's assignment"
            );
            return Ok(());
        }

        if self.issue(
            ctx,
            DomainCommand::AssignCapabilityToDomain {
                domain_id: domain_id.clone(),
                capability_id: root.clone(),
            },
            out,
        )? {
            tracing::info!(
                tenant = %ctx.tenant_id(),
                domain_id = %domain_id,
                from = %moved,
                to = %root,
                "domain assignment transferred"
            );
        }
        Ok(())
    }
}

fn log_rejected(ctx: &ProjectionContext<'_>, command_type: &'static str, e: &CommandError) {
    tracing::error!(
        tenant = %ctx.tenant_id(),
        command = command_type,
        error = %e,
        "reassignment command rejected"
    );
}

impl CapabilityEventHandler for AssignmentConsistencyProjector {
    fn name(&self) -> &'static str {
        "assignment-consistency"
    }

    fn on_capability_parent_changed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityParentChangedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let moved = &event.capability_id;
        let nav = HierarchyNavigator::new(ctx.conn, tenant);
        let capability = nav.get_info(moved)?;
        if capability.is_root() {
            return Ok(Vec::new());
        }

        let held = domains::domains_for_capability(ctx.conn, tenant, moved)?;
        if held.is_empty() {
            return Ok(Vec::new());
        }

        let root = nav.nearest_l1_ancestor(moved)?;
        let mut follow_ups = Vec::new();
        for domain_id in &held {
            self.reassign(ctx, moved, &root.id, domain_id, &mut follow_ups)?;
        }
        Ok(follow_ups)
    }
}
