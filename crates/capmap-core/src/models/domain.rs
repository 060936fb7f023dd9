//! Business domains and their L1 capability assignments.

use serde::{Deserialize, Serialize};

use crate::ids::{BusinessDomainId, CapabilityId};

/// A grouping to which L1 capabilities may be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDomain {
    pub id: BusinessDomainId,
    pub name: String,
    /// Denormalized count of assigned capabilities.
    pub capability_count: u32,
}

/// A (domain, L1 capability) pair. Unique per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAssignment {
    pub domain_id: BusinessDomainId,
    pub capability_id: CapabilityId,
    pub capability_name: String,
    pub assigned_at: i64,
}
