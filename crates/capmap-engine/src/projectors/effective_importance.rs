//! Change projectors for the effective-importance view.
//!
//! Each trigger narrows the recomputation to the part of the tree the event
//! can affect and re-derives it from current state:
//!
//! | event                      | scope                                              |
//! |----------------------------|----------------------------------------------------|
//! | rating set/updated/removed | the rated capability's subtree, one pillar, one domain, if in scope |
//! | parent changed             | moved subtree, every domain of the new root or with rows left in the subtree |
//! | deleted                    | the capability's own rows                          |
//! | assigned / unassigned      | the root's subtree, re-scoped for that domain      |

use std::collections::BTreeSet;
use std::sync::Arc;

use capmap_core::context::ProjectionContext;
use capmap_core::errors::ProjectionError;
use capmap_core::events::*;
use capmap_core::ids::{BusinessDomainId, CapabilityId, PillarId};
use capmap_core::traits::PillarGateway;
use capmap_storage::queries::effective_importance;

use crate::ancestry::DomainAncestryChecker;
use crate::hierarchy::HierarchyNavigator;
use crate::recompute::EffectiveImportanceRecomputer;

pub struct EffectiveImportanceProjector {
    pillars: Arc<dyn PillarGateway>,
}

impl EffectiveImportanceProjector {
    pub fn new(pillars: Arc<dyn PillarGateway>) -> Self {
        Self { pillars }
    }

    fn active_pillars(&self, ctx: &ProjectionContext<'_>) -> Result<Vec<PillarId>, ProjectionError> {
        Ok(self.pillars.active_pillar_ids(ctx.conn, ctx.tenant_id())?)
    }

    /// Recompute a single rating's subtree when its domain covers it.
    fn rating_changed(
        &self,
        ctx: &ProjectionContext<'_>,
        capability_id: &CapabilityId,
        pillar_id: &PillarId,
        domain_id: &BusinessDomainId,
    ) -> HandlerResult {
        let checker = DomainAncestryChecker::new(ctx.conn, ctx.tenant_id());
        if !checker.is_in_domain_scope(capability_id, domain_id)? {
            tracing::debug!(
                capability_id = %capability_id,
                domain_id = %domain_id,
                "rating outside assigned domains, nothing to derive"
            );
            return Ok(Vec::new());
        }
        if !self.active_pillars(ctx)?.contains(pillar_id) {
            // Inactive pillars carry no derived rows.
            let nav = HierarchyNavigator::new(ctx.conn, ctx.tenant_id());
            for node in nav.subtree_inclusive(capability_id)? {
                effective_importance::delete_effective(ctx.conn, ctx.tenant_id(), &node, pillar_id, domain_id)?;
            }
            return Ok(Vec::new());
        }
        EffectiveImportanceRecomputer::new(*ctx).recompute_subtree(
            capability_id,
            domain_id,
            std::slice::from_ref(pillar_id),
        )?;
        Ok(Vec::new())
    }

    fn rescope(
        &self,
        ctx: &ProjectionContext<'_>,
        root: &CapabilityId,
        domain_id: &BusinessDomainId,
    ) -> HandlerResult {
        let pillars = self.active_pillars(ctx)?;
        EffectiveImportanceRecomputer::new(*ctx).rescope_subtree(root, domain_id, &pillars)?;
        Ok(Vec::new())
    }
}

impl CapabilityEventHandler for EffectiveImportanceProjector {
    fn name(&self) -> &'static str {
        "effective-importance"
    }

    fn on_capability_created(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityCreatedEvent,
    ) -> HandlerResult {
        let checker = DomainAncestryChecker::new(ctx.conn, ctx.tenant_id());
        let domains = checker.domains_in_scope(&event.capability_id)?;
        if domains.is_empty() {
            return Ok(Vec::new());
        }
        let pillars = self.active_pillars(ctx)?;
        let recomputer = EffectiveImportanceRecomputer::new(*ctx);
        for domain_id in &domains {
            recomputer.recompute_subtree(&event.capability_id, domain_id, &pillars)?;
        }
        Ok(Vec::new())
    }

    fn on_capability_renamed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityRenamedEvent,
    ) -> HandlerResult {
        let refreshed =
            effective_importance::rename_source(ctx.conn, ctx.tenant_id(), &event.capability_id, &event.name)?;
        tracing::debug!(capability_id = %event.capability_id, rows = refreshed, "source name refreshed");
        Ok(Vec::new())
    }

    fn on_capability_parent_changed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityParentChangedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let moved = &event.capability_id;
        let nav = HierarchyNavigator::new(ctx.conn, tenant);

        // Domains the subtree now belongs to, plus any it still has rows in
        // from its previous position.
        let mut domains: BTreeSet<BusinessDomainId> = DomainAncestryChecker::new(ctx.conn, tenant)
            .domains_in_scope(moved)?
            .into_iter()
            .collect();
        for capability_id in nav.subtree_inclusive(moved)? {
            domains.extend(effective_importance::domains_for_capability(ctx.conn, tenant, &capability_id)?);
        }

        let pillars = self.active_pillars(ctx)?;
        let recomputer = EffectiveImportanceRecomputer::new(*ctx);
        for domain_id in &domains {
            recomputer.rescope_subtree(moved, domain_id, &pillars)?;
        }
        Ok(Vec::new())
    }

    fn on_capability_deleted(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityDeletedEvent,
    ) -> HandlerResult {
        let removed = effective_importance::delete_for_capability(ctx.conn, ctx.tenant_id(), &event.capability_id)?;
        tracing::debug!(capability_id = %event.capability_id, rows = removed, "effective importance removed");
        Ok(Vec::new())
    }

    fn on_capability_assigned_to_domain(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &DomainAssignmentEvent,
    ) -> HandlerResult {
        self.rescope(ctx, &event.capability_id, &event.domain_id)
    }

    fn on_capability_unassigned_from_domain(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &DomainAssignmentEvent,
    ) -> HandlerResult {
        self.rescope(ctx, &event.capability_id, &event.domain_id)
    }

    fn on_strategy_importance_set(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &StrategyImportanceSetEvent,
    ) -> HandlerResult {
        self.rating_changed(ctx, &event.capability_id, &event.pillar_id, &event.domain_id)
    }

    fn on_strategy_importance_removed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &StrategyImportanceRemovedEvent,
    ) -> HandlerResult {
        self.rating_changed(ctx, &event.capability_id, &event.pillar_id, &event.domain_id)
    }
}
