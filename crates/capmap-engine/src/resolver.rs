//! Rating Store Lookup and Rating Resolver.
//!
//! Closest explicit rating wins: the walk starts at the capability itself
//! and stops at the first node holding a rating for the (pillar, domain).
//! There is no blending and no "highest wins".

use capmap_core::errors::{HierarchyError, StorageError};
use capmap_core::ids::{BusinessDomainId, CapabilityId, PillarId, TenantId};
use capmap_core::models::{Capability, Importance};
use capmap_storage::queries::importance;
use rusqlite::Connection;

use crate::hierarchy::HierarchyNavigator;

/// A resolved rating and the node that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImportance {
    pub importance: Importance,
    pub source_capability_id: CapabilityId,
    pub source_capability_name: String,
}

/// Explicit rating recorded at exactly (domain, capability, pillar).
pub fn explicit_rating(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
    capability_id: &CapabilityId,
    pillar_id: &PillarId,
) -> Result<Option<Importance>, StorageError> {
    Ok(importance::get_importance(conn, tenant, domain_id, capability_id, pillar_id)?
        .map(|rating| rating.importance))
}

/// Walks ancestor chains looking for the nearest explicit rating.
#[derive(Clone, Copy)]
pub struct RatingResolver<'a> {
    conn: &'a Connection,
    tenant: &'a TenantId,
}

impl<'a> RatingResolver<'a> {
    pub fn new(conn: &'a Connection, tenant: &'a TenantId) -> Self {
        Self { conn, tenant }
    }

    /// Resolve the effective rating of `capability_id`. `None` when no node
    /// on its ancestor-or-self chain is rated for the pair.
    pub fn resolve(
        &self,
        capability_id: &CapabilityId,
        pillar_id: &PillarId,
        domain_id: &BusinessDomainId,
    ) -> Result<Option<ResolvedImportance>, HierarchyError> {
        let chain = HierarchyNavigator::new(self.conn, self.tenant).get_ancestor_chain(capability_id)?;
        Ok(self.resolve_along(&chain, pillar_id, domain_id)?)
    }

    /// Resolve over an already-walked self-to-root chain. Lets a subtree
    /// recompute walk each chain once for all pillars.
    pub fn resolve_along(
        &self,
        chain: &[Capability],
        pillar_id: &PillarId,
        domain_id: &BusinessDomainId,
    ) -> Result<Option<ResolvedImportance>, StorageError> {
        for node in chain {
            if let Some(value) = explicit_rating(self.conn, self.tenant, domain_id, &node.id, pillar_id)? {
                return Ok(Some(ResolvedImportance {
                    importance: value,
                    source_capability_id: node.id.clone(),
                    source_capability_name: node.name.clone(),
                }));
            }
        }
        Ok(None)
    }
}
