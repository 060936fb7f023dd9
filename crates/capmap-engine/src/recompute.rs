//! Effective-Importance Recomputer.
//!
//! Every operation re-derives rows from the current explicit ratings and
//! assignments and writes the result with keyed upserts and deletes. Running
//! one twice with unchanged inputs leaves the view unchanged.

use std::ops::AddAssign;

use capmap_core::context::ProjectionContext;
use capmap_core::errors::ProjectionError;
use capmap_core::ids::{BusinessDomainId, CapabilityId, PillarId};
use capmap_core::models::{Capability, EffectiveImportance};
use capmap_storage::queries::{domains, effective_importance};

use crate::ancestry::DomainAncestryChecker;
use crate::hierarchy::HierarchyNavigator;
use crate::resolver::RatingResolver;

/// Row counts touched by one recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeStats {
    pub capabilities_visited: usize,
    pub rows_upserted: usize,
    pub rows_deleted: usize,
}

impl AddAssign for RecomputeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.capabilities_visited += rhs.capabilities_visited;
        self.rows_upserted += rhs.rows_upserted;
        self.rows_deleted += rhs.rows_deleted;
    }
}

pub struct EffectiveImportanceRecomputer<'a> {
    ctx: ProjectionContext<'a>,
}

impl<'a> EffectiveImportanceRecomputer<'a> {
    pub fn new(ctx: ProjectionContext<'a>) -> Self {
        Self { ctx }
    }

    fn navigator(&self) -> HierarchyNavigator<'a> {
        HierarchyNavigator::new(self.ctx.conn, self.ctx.tenant_id())
    }

    /// Resolve one key and upsert the row, or delete it when nothing on the
    /// chain is rated.
    pub fn recompute_for_capability_pillar_domain(
        &self,
        capability_id: &CapabilityId,
        pillar_id: &PillarId,
        domain_id: &BusinessDomainId,
    ) -> Result<RecomputeStats, ProjectionError> {
        let chain = self.navigator().get_ancestor_chain(capability_id)?;
        let mut stats = RecomputeStats {
            capabilities_visited: 1,
            ..Default::default()
        };
        self.apply_key(&chain, pillar_id, domain_id, &mut stats)?;
        Ok(stats)
    }

    /// Recompute `root` and every descendant for each pillar in `pillar_ids`.
    /// Checks cancellation before each capability; a cancelled run returns
    /// `Cancelled` and the caller's transaction discards the partial writes.
    pub fn recompute_subtree(
        &self,
        root: &CapabilityId,
        domain_id: &BusinessDomainId,
        pillar_ids: &[PillarId],
    ) -> Result<RecomputeStats, ProjectionError> {
        let nav = self.navigator();
        let mut stats = RecomputeStats::default();
        for capability_id in nav.subtree_inclusive(root)? {
            self.ctx.check_cancelled()?;
            let chain = nav.get_ancestor_chain(&capability_id)?;
            stats.capabilities_visited += 1;
            for pillar_id in pillar_ids {
                self.apply_key(&chain, pillar_id, domain_id, &mut stats)?;
            }
        }
        tracing::debug!(
            tenant = %self.ctx.tenant_id(),
            root = %root,
            domain = %domain_id,
            visited = stats.capabilities_visited,
            upserted = stats.rows_upserted,
            deleted = stats.rows_deleted,
            "recomputed subtree"
        );
        Ok(stats)
    }

    /// Delete every row under `domain_id` for `root` and its descendants.
    pub fn clear_subtree_for_domain(
        &self,
        root: &CapabilityId,
        domain_id: &BusinessDomainId,
    ) -> Result<RecomputeStats, ProjectionError> {
        self.prune_subtree(root, domain_id, &[])
    }

    /// Bring a subtree's rows for one domain in line with its current scope:
    /// recompute over `active_pillars` when the root is assigned to the
    /// domain, clear the domain otherwise. Rows for pillars outside
    /// `active_pillars` are dropped either way.
    pub fn rescope_subtree(
        &self,
        root: &CapabilityId,
        domain_id: &BusinessDomainId,
        active_pillars: &[PillarId],
    ) -> Result<RecomputeStats, ProjectionError> {
        let checker = DomainAncestryChecker::new(self.ctx.conn, self.ctx.tenant_id());
        if !checker.is_in_domain_scope(root, domain_id)? {
            return self.clear_subtree_for_domain(root, domain_id);
        }
        let mut stats = self.prune_subtree(root, domain_id, active_pillars)?;
        stats += self.recompute_subtree(root, domain_id, active_pillars)?;
        Ok(stats)
    }

    /// Re-scope every assigned root of the tenant against `active_pillars`.
    /// Used when pillar configuration changes, since that moves no
    /// capability and so triggers no other recomputation.
    pub fn rescope_tenant(&self, active_pillars: &[PillarId]) -> Result<RecomputeStats, ProjectionError> {
        let mut stats = RecomputeStats::default();
        for assignment in domains::list_assignments(self.ctx.conn, self.ctx.tenant_id())? {
            stats += self.rescope_subtree(&assignment.capability_id, &assignment.domain_id, active_pillars)?;
        }
        tracing::info!(
            tenant = %self.ctx.tenant_id(),
            pillars = active_pillars.len(),
            upserted = stats.rows_upserted,
            deleted = stats.rows_deleted,
            "re-scoped tenant after pillar change"
        );
        Ok(stats)
    }

    fn prune_subtree(
        &self,
        root: &CapabilityId,
        domain_id: &BusinessDomainId,
        keep: &[PillarId],
    ) -> Result<RecomputeStats, ProjectionError> {
        let mut stats = RecomputeStats::default();
        for capability_id in self.navigator().subtree_inclusive(root)? {
            self.ctx.check_cancelled()?;
            stats.capabilities_visited += 1;
            stats.rows_deleted += effective_importance::delete_for_capability_domain_except(
                self.ctx.conn,
                self.ctx.tenant_id(),
                &capability_id,
                domain_id,
                keep,
            )?;
        }
        Ok(stats)
    }

    fn apply_key(
        &self,
        chain: &[Capability],
        pillar_id: &PillarId,
        domain_id: &BusinessDomainId,
        stats: &mut RecomputeStats,
    ) -> Result<(), ProjectionError> {
        let Some(target) = chain.first() else {
            return Ok(());
        };
        let tenant = self.ctx.tenant_id();
        let resolver = RatingResolver::new(self.ctx.conn, tenant);
        match resolver.resolve_along(chain, pillar_id, domain_id)? {
            Some(resolved) => {
                let row = EffectiveImportance {
                    capability_id: target.id.clone(),
                    pillar_id: pillar_id.clone(),
                    domain_id: domain_id.clone(),
                    importance: resolved.importance,
                    is_inherited: resolved.source_capability_id != target.id,
                    source_capability_id: resolved.source_capability_id,
                    source_capability_name: resolved.source_capability_name,
                };
                effective_importance::upsert_effective(self.ctx.conn, tenant, &row)?;
                stats.rows_upserted += 1;
            }
            None => {
                if effective_importance::delete_effective(
                    self.ctx.conn,
                    tenant,
                    &target.id,
                    pillar_id,
                    domain_id,
                )? {
                    stats.rows_deleted += 1;
                }
            }
        }
        Ok(())
    }
}
