//! Realization-Inheritance Projector.
//!
//! A Direct realization links a component to a capability. Every strict
//! ancestor of a capability holding a Direct row for component K holds
//! exactly one Inherited row for K, unless it has its own Direct row for K.
//! Inherited rows point at the Direct row they were derived from and never
//! outlive it.

use capmap_core::context::ProjectionContext;
use capmap_core::errors::ProjectionError;
use capmap_core::events::*;
use capmap_core::ids::{CapabilityId, ComponentId, RealizationId};
use capmap_core::models::{Realization, RealizationOrigin};
use capmap_storage::queries::realizations;
use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::hierarchy::HierarchyNavigator;

pub struct RealizationProjector;

impl RealizationProjector {
    /// Re-derive the Inherited row of `component_id` at `ancestor`.
    fn derive_inherited(
        ctx: &ProjectionContext<'_>,
        ancestor: &CapabilityId,
        component_id: &ComponentId,
    ) -> Result<(), ProjectionError> {
        let tenant = ctx.tenant_id();
        let existing = realizations::find_inherited(ctx.conn, tenant, ancestor, component_id)?;

        if realizations::find_direct(ctx.conn, tenant, ancestor, component_id)?.is_some() {
            if let Some(stale) = existing {
                realizations::delete_realization(ctx.conn, tenant, &stale.id)?;
            }
            return Ok(());
        }

        let descendants = HierarchyNavigator::new(ctx.conn, tenant).get_subtree(ancestor)?;
        let sources = realizations::directs_for_component_in(ctx.conn, tenant, component_id, &descendants)?;

        match (existing, sources.first()) {
            (Some(stale), None) => {
                realizations::delete_realization(ctx.conn, tenant, &stale.id)?;
            }
            (Some(current), Some(earliest)) => {
                let source = current
                    .source_realization_id
                    .as_ref()
                    .and_then(|id| sources.iter().find(|s| &s.id == id))
                    .unwrap_or(earliest);
                if current.source_realization_id.as_ref() != Some(&source.id) || current.level != source.level {
                    realizations::update_inherited_source(ctx.conn, tenant, &current.id, source)?;
                }
            }
            (None, Some(earliest)) => {
                let inherited = Realization {
                    id: RealizationId::new(Uuid::new_v4().to_string()),
                    capability_id: ancestor.clone(),
                    component_id: component_id.clone(),
                    level: earliest.level,
                    origin: RealizationOrigin::Inherited,
                    source_realization_id: Some(earliest.id.clone()),
                    notes: None,
                    linked_at: earliest.linked_at,
                };
                realizations::insert_realization(ctx.conn, tenant, &inherited)?;
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn derive_along(
        ctx: &ProjectionContext<'_>,
        ancestors: &[CapabilityId],
        component_id: &ComponentId,
    ) -> Result<(), ProjectionError> {
        for ancestor in ancestors {
            Self::derive_inherited(ctx, ancestor, component_id)?;
        }
        Ok(())
    }

    fn strict_ancestors(
        ctx: &ProjectionContext<'_>,
        capability_id: &CapabilityId,
    ) -> Result<Vec<CapabilityId>, ProjectionError> {
        Ok(HierarchyNavigator::new(ctx.conn, ctx.tenant_id())
            .get_ancestors(capability_id)?
            .into_iter()
            .map(|c| c.id)
            .collect())
    }

    fn direct(ctx: &ProjectionContext<'_>, id: &RealizationId) -> Result<Realization, ProjectionError> {
        let row = realizations::get_realization(ctx.conn, ctx.tenant_id(), id)?
            .ok_or_else(|| ProjectionError::not_found("realization", id))?;
        if row.origin != RealizationOrigin::Direct {
            return Err(ProjectionError::InvariantViolation(format!(
                "realization {id} is inherited and cannot be changed directly"
            )));
        }
        Ok(row)
    }
}

impl CapabilityEventHandler for RealizationProjector {
    fn name(&self) -> &'static str {
        "realization"
    }

    fn on_system_linked_to_capability(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &SystemLinkedToCapabilityEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        if realizations::get_realization(ctx.conn, tenant, &event.realization_id)?.is_some() {
            tracing::debug!(realization_id = %event.realization_id, "link already projected");
            return Ok(Vec::new());
        }
        let ancestors = Self::strict_ancestors(ctx, &event.capability_id)?;
        if let Some(other) =
            realizations::find_direct(ctx.conn, tenant, &event.capability_id, &event.component_id)?
        {
            return Err(ProjectionError::Conflict(format!(
                "{} already realizes {} as {}",
                event.component_id, event.capability_id, other.id
            )));
        }

        let direct = Realization {
            id: event.realization_id.clone(),
            capability_id: event.capability_id.clone(),
            component_id: event.component_id.clone(),
            level: event.level,
            origin: RealizationOrigin::Direct,
            source_realization_id: None,
            notes: event.notes.clone(),
            linked_at: chrono::Utc::now().timestamp(),
        };
        // The Direct link supersedes an Inherited copy at the same node.
        if let Some(superseded) =
            realizations::find_inherited(ctx.conn, tenant, &event.capability_id, &event.component_id)?
        {
            realizations::delete_realization(ctx.conn, tenant, &superseded.id)?;
        }
        realizations::insert_realization(ctx.conn, tenant, &direct)?;
        Self::derive_along(ctx, &ancestors, &event.component_id)?;

        tracing::info!(
            tenant = %tenant,
            realization_id = %direct.id,
            capability_id = %direct.capability_id,
            component_id = %direct.component_id,
            ancestors = ancestors.len(),
            "system linked"
        );
        Ok(Vec::new())
    }

    fn on_system_realization_updated(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &SystemRealizationUpdatedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let row = Self::direct(ctx, &event.realization_id)?;
        realizations::update_level_notes(ctx.conn, tenant, &row.id, event.level, event.notes.as_deref())?;
        let mirrored = realizations::update_inherited_level(ctx.conn, tenant, &row.id, event.level)?;
        tracing::debug!(realization_id = %row.id, mirrored, "realization updated");
        Ok(Vec::new())
    }

    fn on_system_realization_deleted(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &SystemRealizationDeletedEvent,
    ) -> HandlerResult {
        let row = Self::direct(ctx, &event.realization_id)?;
        let ancestors = Self::strict_ancestors(ctx, &row.capability_id)?;
        realizations::delete_realization(ctx.conn, ctx.tenant_id(), &row.id)?;
        Self::derive_along(ctx, &ancestors, &row.component_id)?;

        tracing::info!(
            tenant = %ctx.tenant_id(),
            realization_id = %row.id,
            capability_id = %row.capability_id,
            "system unlinked"
        );
        Ok(Vec::new())
    }

    fn on_capability_parent_changed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityParentChangedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let nav = HierarchyNavigator::new(ctx.conn, tenant);

        let subtree = nav.subtree_inclusive(&event.capability_id)?;
        let mut components = FxHashSet::default();
        for capability_id in &subtree {
            for row in realizations::realizations_for_capability(ctx.conn, tenant, capability_id)? {
                if row.origin == RealizationOrigin::Direct {
                    components.insert(row.component_id);
                }
            }
        }
        if components.is_empty() {
            return Ok(Vec::new());
        }

        // Former chain first (copies must be withdrawn), then the new one.
        let mut ancestors: Vec<CapabilityId> = Vec::new();
        if let Some(old_parent) = &event.old_parent_id {
            if nav.find(old_parent)?.is_some() {
                ancestors.extend(nav.get_ancestor_chain(old_parent)?.into_iter().map(|c| c.id));
            }
        }
        for ancestor in Self::strict_ancestors(ctx, &event.capability_id)? {
            if !ancestors.contains(&ancestor) {
                ancestors.push(ancestor);
            }
        }

        let mut components: Vec<ComponentId> = components.into_iter().collect();
        components.sort();
        for component_id in &components {
            Self::derive_along(ctx, &ancestors, component_id)?;
        }
        Ok(Vec::new())
    }

    fn on_capability_deleted(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &CapabilityDeletedEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        let rows = realizations::realizations_for_capability(ctx.conn, tenant, &event.capability_id)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // The capability row is already gone, so the former ancestors are
        // found through the copies its Direct rows sourced.
        let mut affected: Vec<(CapabilityId, ComponentId)> = Vec::new();
        for row in rows.iter().filter(|r| r.origin == RealizationOrigin::Direct) {
            for copy in realizations::inherited_sourced_by(ctx.conn, tenant, &row.id)? {
                affected.push((copy.capability_id, copy.component_id));
            }
        }
        realizations::delete_for_capability(ctx.conn, tenant, &event.capability_id)?;
        for (ancestor, component_id) in &affected {
            Self::derive_inherited(ctx, ancestor, component_id)?;
        }
        Ok(Vec::new())
    }
}
