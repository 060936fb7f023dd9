//! business_domains and domain_capability_assignments queries.

use capmap_core::errors::StorageError;
use capmap_core::ids::{BusinessDomainId, CapabilityId, TenantId};
use capmap_core::models::{BusinessDomain, DomainAssignment};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::collect_rows;
use crate::{now_secs, to_storage_err};

/// Insert a domain. Returns false when it already exists.
pub fn insert_domain(
    conn: &Connection,
    tenant: &TenantId,
    id: &BusinessDomainId,
    name: &str,
) -> Result<bool, StorageError> {
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO business_domains (tenant_id, id, name, capability_count)
             VALUES (?1, ?2, ?3, 0)",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, id, name])
        .map_err(to_storage_err)?;
    Ok(inserted > 0)
}

pub fn get_domain(
    conn: &Connection,
    tenant: &TenantId,
    id: &BusinessDomainId,
) -> Result<Option<BusinessDomain>, StorageError> {
    conn.prepare_cached(
        "SELECT id, name, capability_count FROM business_domains
         WHERE tenant_id = ?1 AND id = ?2",
    )
    .map_err(to_storage_err)?
    .query_row(params![tenant, id], |row| {
        Ok(BusinessDomain {
            id: row.get(0)?,
            name: row.get(1)?,
            capability_count: row.get(2)?,
        })
    })
    .optional()
    .map_err(to_storage_err)
}

/// Re-derive the denormalized capability count from the assignment rows.
pub fn refresh_capability_count(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE business_domains SET capability_count = (
             SELECT COUNT(*) FROM domain_capability_assignments
             WHERE tenant_id = ?1 AND domain_id = ?2
         )
         WHERE tenant_id = ?1 AND id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, domain_id])
    .map_err(to_storage_err)?;
    Ok(())
}

/// Insert an assignment. Returns false when the pair already exists.
pub fn insert_assignment(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
    capability_id: &CapabilityId,
) -> Result<bool, StorageError> {
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO domain_capability_assignments
             (tenant_id, domain_id, capability_id, assigned_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, domain_id, capability_id, now_secs()])
        .map_err(to_storage_err)?;
    Ok(inserted > 0)
}

/// Delete an assignment. Returns false when it did not exist.
pub fn delete_assignment(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
    capability_id: &CapabilityId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached(
            "DELETE FROM domain_capability_assignments
             WHERE tenant_id = ?1 AND domain_id = ?2 AND capability_id = ?3",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, domain_id, capability_id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}

pub fn assignment_exists(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
    capability_id: &CapabilityId,
) -> Result<bool, StorageError> {
    conn.prepare_cached(
        "SELECT EXISTS (
             SELECT 1 FROM domain_capability_assignments
             WHERE tenant_id = ?1 AND domain_id = ?2 AND capability_id = ?3
         )",
    )
    .map_err(to_storage_err)?
    .query_row(params![tenant, domain_id, capability_id], |row| row.get(0))
    .map_err(to_storage_err)
}

/// Domains a capability is directly assigned to, ordered by id.
pub fn domains_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<Vec<BusinessDomainId>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT domain_id FROM domain_capability_assignments
             WHERE tenant_id = ?1 AND capability_id = ?2 ORDER BY domain_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, capability_id], |row| row.get(0))
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

fn map_assignment(row: &Row<'_>) -> rusqlite::Result<DomainAssignment> {
    Ok(DomainAssignment {
        domain_id: row.get(0)?,
        capability_id: row.get(1)?,
        capability_name: row.get(2)?,
        assigned_at: row.get(3)?,
    })
}

/// Assignments of one domain with the capability name joined in.
pub fn assignments_for_domain(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
) -> Result<Vec<DomainAssignment>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT a.domain_id, a.capability_id, COALESCE(c.name, ''), a.assigned_at
             FROM domain_capability_assignments a
             LEFT JOIN capabilities c ON c.tenant_id = a.tenant_id AND c.id = a.capability_id
             WHERE a.tenant_id = ?1 AND a.domain_id = ?2
             ORDER BY a.capability_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, domain_id], map_assignment)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Every assignment of the tenant, ordered by domain then capability.
pub fn list_assignments(conn: &Connection, tenant: &TenantId) -> Result<Vec<DomainAssignment>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT a.domain_id, a.capability_id, COALESCE(c.name, ''), a.assigned_at
             FROM domain_capability_assignments a
             LEFT JOIN capabilities c ON c.tenant_id = a.tenant_id AND c.id = a.capability_id
             WHERE a.tenant_id = ?1
             ORDER BY a.domain_id, a.capability_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt.query_map(params![tenant], map_assignment).map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Assignments held by one capability.
pub fn assignments_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<Vec<DomainAssignment>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT a.domain_id, a.capability_id, COALESCE(c.name, ''), a.assigned_at
             FROM domain_capability_assignments a
             LEFT JOIN capabilities c ON c.tenant_id = a.tenant_id AND c.id = a.capability_id
             WHERE a.tenant_id = ?1 AND a.capability_id = ?2
             ORDER BY a.domain_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, capability_id], map_assignment)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Number of assignment rows for a domain (the ground truth behind capability_count).
pub fn count_assignments(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
) -> Result<usize, StorageError> {
    let count: i64 = conn
        .prepare_cached(
            "SELECT COUNT(*) FROM domain_capability_assignments
             WHERE tenant_id = ?1 AND domain_id = ?2",
        )
        .map_err(to_storage_err)?
        .query_row(params![tenant, domain_id], |row| row.get(0))
        .map_err(to_storage_err)?;
    Ok(count as usize)
}
