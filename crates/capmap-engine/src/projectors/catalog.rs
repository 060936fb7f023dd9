//! Catalog projector: maintains the capability tree, business domains,
//! domain assignments, and application components that every derived view
//! reads. Registered first so derivations see the state the event produced.

use capmap_core::context::ProjectionContext;
use capmap_core::errors::{HierarchyError, ProjectionError};
use capmap_core::events::*;
use capmap_core::ids::{BusinessDomainId, CapabilityId};
use capmap_core::models::{Capability, CapabilityLevel};
use capmap_storage::queries::{capabilities, components, domains, importance};

use crate::hierarchy::HierarchyNavigator;

pub struct CatalogProjector;

impl CatalogProjector {
    /// Level a capability must have under `parent_id`.
    fn level_under(
        nav: &HierarchyNavigator<'_>,
        capability_id: &CapabilityId,
        parent_id: Option<&CapabilityId>,
    ) -> Result<CapabilityLevel, HierarchyError> {
        let Some(parent_id) = parent_id else {
            return Ok(CapabilityLevel::L1);
        };
        let parent = nav
            .find(parent_id)?
            .ok_or_else(|| HierarchyError::ParentNotFound {
                capability_id: capability_id.clone(),
                parent_id: parent_id.clone(),
            })?;
        parent.level.child().ok_or(HierarchyError::DepthExceeded {
            capability_id: capability_id.clone(),
            depth: parent.level.depth() + 1,
        })
    }

    fn refresh_count(ctx: &ProjectionContext<'_>, domain_id: &BusinessDomainId) -> Result<(), ProjectionError> {
        domains::refresh_capability_count(ctx.conn, ctx.tenant_id(), domain_id)?;
        Ok(())
    }
}

impl CapabilityEventHandler for CatalogProjector {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn on_capability_created(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityCreatedEvent,
    ) -> HandlerResult {
        let nav = HierarchyNavigator::new(ctx.conn, ctx.tenant_id());
        let expected = Self::level_under(&nav, &event.capability_id, event.parent_id.as_ref())?;
        if expected != event.level {
            return Err(HierarchyError::LevelMismatch {
                capability_id: event.capability_id.clone(),
                expected,
                actual: event.level,
            }
            .into());
        }

        let capability = Capability {
            id: event.capability_id.clone(),
            name: event.name.clone(),
            level: event.level,
            parent_id: event.parent_id.clone(),
        };
        if capabilities::insert_capability(ctx.conn, ctx.tenant_id(), &capability)? {
            tracing::info!(
                tenant = %ctx.tenant_id(),
                capability_id = %capability.id,
                level = %capability.level,
                "capability created"
            );
        } else {
            tracing::debug!(capability_id = %capability.id, "capability already exists");
        }
        Ok(Vec::new())
    }

    fn on_capability_renamed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityRenamedEvent,
    ) -> HandlerResult {
        if !capabilities::rename_capability(ctx.conn, ctx.tenant_id(), &event.capability_id, &event.name)? {
            return Err(ProjectionError::not_found("capability", &event.capability_id));
        }
        Ok(Vec::new())
    }

    fn on_capability_parent_changed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityParentChangedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let nav = HierarchyNavigator::new(ctx.conn, tenant);
        let moved = nav.get_info(&event.capability_id)?;

        if let Some(parent_id) = &event.new_parent_id {
            if parent_id == &moved.id || nav.is_strict_descendant(parent_id, &moved.id)? {
                return Err(HierarchyError::CycleDetected {
                    capability_id: moved.id,
                    parent_id: parent_id.clone(),
                }
                .into());
            }
        }

        let new_level = Self::level_under(&nav, &moved.id, event.new_parent_id.as_ref())?;
        let descendants = nav.subtree_with_depth(&moved.id)?;
        let deepest = descendants.iter().map(|(_, d)| *d).max().unwrap_or(0);
        if CapabilityLevel::from_depth(new_level.depth() + deepest).is_none() {
            return Err(HierarchyError::DepthExceeded {
                capability_id: moved.id,
                depth: new_level.depth() + deepest,
            }
            .into());
        }

        capabilities::set_parent(ctx.conn, tenant, &moved.id, event.new_parent_id.as_ref(), new_level)?;
        for (descendant, offset) in &descendants {
            if let Some(level) = CapabilityLevel::from_depth(new_level.depth() + offset) {
                if level != descendant.level {
                    capabilities::set_level(ctx.conn, tenant, &descendant.id, level)?;
                }
            }
        }

        tracing::info!(
            tenant = %tenant,
            capability_id = %moved.id,
            old_parent = ?event.old_parent_id,
            new_parent = ?event.new_parent_id,
            level = %new_level,
            "capability moved"
        );
        Ok(Vec::new())
    }

    fn on_capability_deleted(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityDeletedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let id = &event.capability_id;
        if capabilities::get_capability(ctx.conn, tenant, id)?.is_none() {
            return Err(ProjectionError::not_found("capability", id));
        }
        let child_count = capabilities::count_children(ctx.conn, tenant, id)?;
        if child_count > 0 {
            return Err(HierarchyError::HasChildren {
                capability_id: id.clone(),
                child_count,
            }
            .into());
        }

        for domain_id in domains::domains_for_capability(ctx.conn, tenant, id)? {
            domains::delete_assignment(ctx.conn, tenant, &domain_id, id)?;
            Self::refresh_count(ctx, &domain_id)?;
        }
        importance::delete_importance_for_capability(ctx.conn, tenant, id)?;
        capabilities::delete_capability(ctx.conn, tenant, id)?;

        tracing::info!(tenant = %tenant, capability_id = %id, "capability deleted");
        Ok(Vec::new())
    }

    fn on_business_domain_created(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &BusinessDomainCreatedEvent,
    ) -> HandlerResult {
        domains::insert_domain(ctx.conn, ctx.tenant_id(), &event.domain_id, &event.name)?;
        Ok(Vec::new())
    }

    fn on_capability_assigned_to_domain(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &DomainAssignmentEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        if domains::get_domain(ctx.conn, tenant, &event.domain_id)?.is_none() {
            return Err(ProjectionError::not_found("business domain", &event.domain_id));
        }
        let capability = capabilities::get_capability(ctx.conn, tenant, &event.capability_id)?
            .ok_or_else(|| ProjectionError::not_found("capability", &event.capability_id))?;
        if !capability.level.is_root() {
            return Err(ProjectionError::InvariantViolation(format!(
                "cannot assign {} capability {} to domain {}",
                capability.level, capability.id, event.domain_id
            )));
        }

        if domains::insert_assignment(ctx.conn, tenant, &event.domain_id, &event.capability_id)? {
            Self::refresh_count(ctx, &event.domain_id)?;
            tracing::info!(
                tenant = %tenant,
                domain_id = %event.domain_id,
                capability_id = %event.capability_id,
                "capability assigned to domain"
            );
        }
        Ok(Vec::new())
    }

    fn on_capability_unassigned_from_domain(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &DomainAssignmentEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        if domains::delete_assignment(ctx.conn, tenant, &event.domain_id, &event.capability_id)? {
            Self::refresh_count(ctx, &event.domain_id)?;
            tracing::info!(
                tenant = %tenant,
                domain_id = %event.domain_id,
                capability_id = %event.capability_id,
                "capability unassigned from domain"
            );
        }
        Ok(Vec::new())
    }

    fn on_application_component_named(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &ApplicationComponentEvent,
    ) -> HandlerResult {
        components::upsert_component(ctx.conn, ctx.tenant_id(), &event.component_id, &event.name)?;
        Ok(Vec::new())
    }
}
