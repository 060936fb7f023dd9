//! Shared harness for engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use capmap_core::events::*;
use capmap_core::ids::*;
use capmap_core::models::*;
use capmap_core::{CapmapConfig, TenantContext};
use capmap_engine::{ApplyReport, ProjectionRuntime};
use capmap_storage::queries::{domains, effective_importance, realizations};
use capmap_storage::DatabaseManager;

pub const P1: &str = "always-on";
pub const P2: &str = "growth";

pub struct Harness {
    pub runtime: ProjectionRuntime,
    pub ctx: TenantContext,
}

impl Harness {
    /// In-memory runtime for tenant "acme" with two active pillars; fit
    /// scoring is enabled on P1 only.
    pub fn new() -> Self {
        Self::for_tenant(Arc::new(DatabaseManager::open_in_memory().unwrap()), "acme")
    }

    pub fn for_tenant(db: Arc<DatabaseManager>, tenant: &str) -> Self {
        let runtime = ProjectionRuntime::new(db, &CapmapConfig::default());
        let ctx = TenantContext::new(tenant);
        let harness = Self { runtime, ctx };
        harness.pillar(P1, true, true);
        harness.pillar(P2, true, false);
        harness
    }

    pub fn tenant(&self) -> &TenantId {
        &self.ctx.tenant
    }

    pub fn pillar(&self, id: &str, active: bool, fit_scoring_enabled: bool) {
        self.runtime
            .upsert_pillar(
                &self.ctx,
                &StrategyPillar {
                    id: PillarId::new(id),
                    name: id.to_uppercase(),
                    active,
                    fit_scoring_enabled,
                },
            )
            .unwrap();
    }

    pub fn apply(&self, event: DomainEvent) -> ApplyReport {
        self.runtime.apply(&self.ctx, event).unwrap()
    }

    /// Create `id` under `parent` with the level implied by the parent.
    pub fn capability(&self, id: &str, parent: Option<&str>) -> ApplyReport {
        let level = match parent {
            None => CapabilityLevel::L1,
            Some(p) => self.level_of(p).child().unwrap(),
        };
        self.apply(created(id, parent, level))
    }

    /// Create a root with a straight chain of descendants: `chain("c", 3)`
    /// yields c1 (L1) > c2 (L2) > c3 (L3).
    pub fn chain(&self, prefix: &str, depth: usize) {
        let mut parent: Option<String> = None;
        for i in 1..=depth {
            let id = format!("{prefix}{i}");
            self.capability(&id, parent.as_deref());
            parent = Some(id);
        }
    }

    pub fn domain(&self, id: &str) {
        self.apply(DomainEvent::BusinessDomainCreated(BusinessDomainCreatedEvent {
            domain_id: BusinessDomainId::new(id),
            name: format!("Domain {id}"),
        }));
    }

    pub fn assign(&self, domain: &str, capability: &str) -> ApplyReport {
        self.apply(DomainEvent::CapabilityAssignedToDomain(assignment(domain, capability)))
    }

    pub fn unassign(&self, domain: &str, capability: &str) -> ApplyReport {
        self.apply(DomainEvent::CapabilityUnassignedFromDomain(assignment(domain, capability)))
    }

    pub fn rate(&self, domain: &str, capability: &str, pillar: &str, value: u8) -> ApplyReport {
        self.apply(rating(domain, capability, pillar, value))
    }

    pub fn unrate(&self, domain: &str, capability: &str, pillar: &str) -> ApplyReport {
        self.apply(DomainEvent::StrategyImportanceRemoved(StrategyImportanceRemovedEvent {
            domain_id: BusinessDomainId::new(domain),
            capability_id: CapabilityId::new(capability),
            pillar_id: PillarId::new(pillar),
        }))
    }

    pub fn move_to(&self, capability: &str, new_parent: Option<&str>) -> ApplyReport {
        let old_parent = self.read(|conn, t| {
            capmap_storage::queries::capabilities::get_capability(conn, t, &CapabilityId::new(capability))
        });
        self.apply(DomainEvent::CapabilityParentChanged(CapabilityParentChangedEvent {
            capability_id: CapabilityId::new(capability),
            old_parent_id: old_parent.and_then(|c| c.parent_id),
            new_parent_id: new_parent.map(CapabilityId::new),
        }))
    }

    pub fn delete(&self, capability: &str) -> ApplyReport {
        self.apply(DomainEvent::CapabilityDeleted(CapabilityDeletedEvent {
            capability_id: CapabilityId::new(capability),
        }))
    }

    pub fn link(&self, realization: &str, capability: &str, component: &str) -> ApplyReport {
        self.apply(DomainEvent::SystemLinkedToCapability(SystemLinkedToCapabilityEvent {
            realization_id: RealizationId::new(realization),
            capability_id: CapabilityId::new(capability),
            component_id: ComponentId::new(component),
            level: RealizationLevel::Full,
            notes: None,
        }))
    }

    pub fn unlink(&self, realization: &str) -> ApplyReport {
        self.apply(DomainEvent::SystemRealizationDeleted(SystemRealizationDeletedEvent {
            realization_id: RealizationId::new(realization),
        }))
    }

    pub fn read<T>(
        &self,
        f: impl FnOnce(&rusqlite::Connection, &TenantId) -> Result<T, capmap_core::errors::StorageError>,
    ) -> T {
        self.runtime
            .database()
            .with_reader(|conn| f(conn, self.tenant()))
            .unwrap()
    }

    pub fn level_of(&self, capability: &str) -> CapabilityLevel {
        self.read(|conn, t| {
            capmap_storage::queries::capabilities::get_capability(conn, t, &CapabilityId::new(capability))
        })
        .unwrap()
        .level
    }

    pub fn effective(&self, capability: &str, pillar: &str, domain: &str) -> Option<EffectiveImportance> {
        self.read(|conn, t| {
            effective_importance::get_effective(
                conn,
                t,
                &CapabilityId::new(capability),
                &PillarId::new(pillar),
                &BusinessDomainId::new(domain),
            )
        })
    }

    pub fn all_effective(&self) -> Vec<EffectiveImportance> {
        self.read(|conn, t| effective_importance::list_all(conn, t))
    }

    pub fn assigned(&self, domain: &str) -> Vec<String> {
        self.read(|conn, t| domains::assignments_for_domain(conn, t, &BusinessDomainId::new(domain)))
            .into_iter()
            .map(|a| a.capability_id.into_inner())
            .collect()
    }

    pub fn all_realizations(&self) -> Vec<Realization> {
        self.read(|conn, t| realizations::list_all(conn, t))
    }

    pub fn realizations_at(&self, capability: &str) -> Vec<Realization> {
        self.read(|conn, t| realizations::realizations_for_capability(conn, t, &CapabilityId::new(capability)))
    }
}

pub fn created(id: &str, parent: Option<&str>, level: CapabilityLevel) -> DomainEvent {
    DomainEvent::CapabilityCreated(CapabilityCreatedEvent {
        capability_id: CapabilityId::new(id),
        name: format!("{id} name"),
        parent_id: parent.map(CapabilityId::new),
        level,
    })
}

pub fn assignment(domain: &str, capability: &str) -> DomainAssignmentEvent {
    DomainAssignmentEvent {
        domain_id: BusinessDomainId::new(domain),
        capability_id: CapabilityId::new(capability),
    }
}

pub fn rating(domain: &str, capability: &str, pillar: &str, value: u8) -> DomainEvent {
    DomainEvent::StrategyImportanceSet(StrategyImportanceSetEvent {
        domain_id: BusinessDomainId::new(domain),
        capability_id: CapabilityId::new(capability),
        pillar_id: PillarId::new(pillar),
        importance: Importance::new(value).unwrap(),
        rationale: None,
    })
}
