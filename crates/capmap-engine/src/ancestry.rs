//! Domain-Ancestry Checker: a capability is in a domain's scope when its L1
//! root is assigned to that domain.

use capmap_core::errors::HierarchyError;
use capmap_core::ids::{BusinessDomainId, CapabilityId, TenantId};
use capmap_storage::queries::domains;
use rusqlite::Connection;

use crate::hierarchy::HierarchyNavigator;

#[derive(Clone, Copy)]
pub struct DomainAncestryChecker<'a> {
    conn: &'a Connection,
    tenant: &'a TenantId,
}

impl<'a> DomainAncestryChecker<'a> {
    pub fn new(conn: &'a Connection, tenant: &'a TenantId) -> Self {
        Self { conn, tenant }
    }

    /// Whether the L1 root of `capability_id` is assigned to `domain_id`.
    pub fn is_in_domain_scope(
        &self,
        capability_id: &CapabilityId,
        domain_id: &BusinessDomainId,
    ) -> Result<bool, HierarchyError> {
        let root = HierarchyNavigator::new(self.conn, self.tenant).nearest_l1_ancestor(capability_id)?;
        Ok(domains::assignment_exists(self.conn, self.tenant, domain_id, &root.id)?)
    }

    /// Every domain whose scope contains `capability_id`.
    pub fn domains_in_scope(
        &self,
        capability_id: &CapabilityId,
    ) -> Result<Vec<BusinessDomainId>, HierarchyError> {
        let root = HierarchyNavigator::new(self.conn, self.tenant).nearest_l1_ancestor(capability_id)?;
        Ok(domains::domains_for_capability(self.conn, self.tenant, &root.id)?)
    }
}
