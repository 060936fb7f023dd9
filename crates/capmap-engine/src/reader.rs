//! Read facade over the materialized views, served from the read pool.

use std::sync::Arc;

use capmap_core::errors::StorageError;
use capmap_core::ids::{BusinessDomainId, CapabilityId, ComponentId, PillarId, TenantId};
use capmap_core::models::{
    BusinessDomain, DomainAssignment, EffectiveImportance, FitScore, GapAssessment, Importance,
    RealizationView,
};
use capmap_core::traits::PillarGateway;
use capmap_storage::queries::{components, domains, effective_importance, fit_scores, realizations};
use capmap_storage::DatabaseManager;
use serde::Serialize;

use crate::gap::GapPolicy;

/// Importance against fit for one component realizing a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicFitEntry {
    pub component_id: ComponentId,
    pub component_name: Option<String>,
    pub pillar_id: PillarId,
    pub pillar_name: String,
    pub importance: Option<Importance>,
    pub fit_score: Option<FitScore>,
    pub gap: Option<GapAssessment>,
}

#[derive(Clone)]
pub struct CapabilityMapReader {
    db: Arc<DatabaseManager>,
    pillars: Arc<dyn PillarGateway>,
    gap: GapPolicy,
}

impl CapabilityMapReader {
    pub fn new(db: Arc<DatabaseManager>, pillars: Arc<dyn PillarGateway>, gap: GapPolicy) -> Self {
        Self { db, pillars, gap }
    }

    /// Every effective-importance row of a capability.
    pub fn effective_importance_for_capability(
        &self,
        tenant: &TenantId,
        capability_id: &CapabilityId,
    ) -> Result<Vec<EffectiveImportance>, StorageError> {
        self.db
            .with_reader(|conn| effective_importance::get_by_capability(conn, tenant, capability_id))
    }

    /// Rows whose value was supplied by `source` for a pillar and domain.
    pub fn effective_importance_by_source(
        &self,
        tenant: &TenantId,
        source: &CapabilityId,
        pillar_id: &PillarId,
        domain_id: &BusinessDomainId,
    ) -> Result<Vec<EffectiveImportance>, StorageError> {
        self.db.with_reader(|conn| {
            effective_importance::get_by_source(conn, tenant, source, pillar_id, domain_id)
        })
    }

    /// Realizations of a batch of capabilities with component and source names.
    pub fn realizations_for_capabilities(
        &self,
        tenant: &TenantId,
        capability_ids: &[CapabilityId],
    ) -> Result<Vec<RealizationView>, StorageError> {
        self.db.with_reader(|conn| {
            realizations::realization_views_for_capabilities(conn, tenant, capability_ids)
        })
    }

    pub fn assignments_for_domain(
        &self,
        tenant: &TenantId,
        domain_id: &BusinessDomainId,
    ) -> Result<Vec<DomainAssignment>, StorageError> {
        self.db
            .with_reader(|conn| domains::assignments_for_domain(conn, tenant, domain_id))
    }

    pub fn assignments_for_capability(
        &self,
        tenant: &TenantId,
        capability_id: &CapabilityId,
    ) -> Result<Vec<DomainAssignment>, StorageError> {
        self.db
            .with_reader(|conn| domains::assignments_for_capability(conn, tenant, capability_id))
    }

    pub fn business_domain(
        &self,
        tenant: &TenantId,
        domain_id: &BusinessDomainId,
    ) -> Result<Option<BusinessDomain>, StorageError> {
        self.db.with_reader(|conn| domains::get_domain(conn, tenant, domain_id))
    }

    /// For every component realizing `capability_id` (directly or through a
    /// descendant) and every active pillar with fit scoring enabled: the
    /// effective importance, the component's fit score, and their gap.
    pub fn strategic_fit(
        &self,
        tenant: &TenantId,
        capability_id: &CapabilityId,
        domain_id: &BusinessDomainId,
    ) -> Result<Vec<StrategicFitEntry>, StorageError> {
        self.db.with_reader(|conn| {
            let pillars = self.pillars.pillars(conn, tenant)?;
            let mut component_ids: Vec<ComponentId> =
                realizations::realizations_for_capability(conn, tenant, capability_id)?
                    .into_iter()
                    .map(|r| r.component_id)
                    .collect();
            component_ids.sort();
            component_ids.dedup();

            let mut entries = Vec::new();
            for component_id in component_ids {
                let component_name = components::get_component(conn, tenant, &component_id)?.map(|c| c.name);
                for pillar in pillars.iter().filter(|p| p.active && p.fit_scoring_enabled) {
                    let importance =
                        effective_importance::get_effective(conn, tenant, capability_id, &pillar.id, domain_id)?
                            .map(|row| row.importance);
                    let fit_score = fit_scores::get_fit_score(conn, tenant, &component_id, &pillar.id)?
                        .map(|fit| fit.score);
                    let gap = self.gap.categorize(importance, fit_score);
                    entries.push(StrategicFitEntry {
                        component_id: component_id.clone(),
                        component_name: component_name.clone(),
                        pillar_id: pillar.id.clone(),
                        pillar_name: pillar.name.clone(),
                        importance,
                        fit_score,
                        gap,
                    });
                }
            }
            Ok(entries)
        })
    }
}
