//! effective_importance (materialized view) queries.

use capmap_core::errors::StorageError;
use capmap_core::ids::{BusinessDomainId, CapabilityId, PillarId, TenantId};
use capmap_core::models::EffectiveImportance;
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{collect_rows, placeholders};
use crate::{now_secs, to_storage_err};

const COLUMNS: &str = "capability_id, pillar_id, domain_id, importance, \
                       source_capability_id, source_capability_name, is_inherited";

fn map_effective(row: &Row<'_>) -> rusqlite::Result<EffectiveImportance> {
    Ok(EffectiveImportance {
        capability_id: row.get(0)?,
        pillar_id: row.get(1)?,
        domain_id: row.get(2)?,
        importance: row.get(3)?,
        source_capability_id: row.get(4)?,
        source_capability_name: row.get(5)?,
        is_inherited: row.get(6)?,
    })
}

/// Insert or overwrite the row keyed by (capability, pillar, domain).
pub fn upsert_effective(
    conn: &Connection,
    tenant: &TenantId,
    row: &EffectiveImportance,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO effective_importance
         (tenant_id, capability_id, pillar_id, domain_id, importance,
          source_capability_id, source_capability_name, is_inherited, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (tenant_id, capability_id, pillar_id, domain_id) DO UPDATE SET
             importance = excluded.importance,
             source_capability_id = excluded.source_capability_id,
             source_capability_name = excluded.source_capability_name,
             is_inherited = excluded.is_inherited,
             computed_at = excluded.computed_at",
    )
    .map_err(to_storage_err)?
    .execute(params![
        tenant,
        row.capability_id,
        row.pillar_id,
        row.domain_id,
        row.importance,
        row.source_capability_id,
        row.source_capability_name,
        row.is_inherited,
        now_secs(),
    ])
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_effective(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
    pillar_id: &PillarId,
    domain_id: &BusinessDomainId,
) -> Result<Option<EffectiveImportance>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM effective_importance
         WHERE tenant_id = ?1 AND capability_id = ?2 AND pillar_id = ?3 AND domain_id = ?4"
    ))
    .map_err(to_storage_err)?
    .query_row(params![tenant, capability_id, pillar_id, domain_id], map_effective)
    .optional()
    .map_err(to_storage_err)
}

pub fn delete_effective(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
    pillar_id: &PillarId,
    domain_id: &BusinessDomainId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached(
            "DELETE FROM effective_importance
             WHERE tenant_id = ?1 AND capability_id = ?2 AND pillar_id = ?3 AND domain_id = ?4",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, capability_id, pillar_id, domain_id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}

/// Remove every row keyed by a capability, across pillars and domains.
pub fn delete_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<usize, StorageError> {
    conn.prepare_cached(
        "DELETE FROM effective_importance WHERE tenant_id = ?1 AND capability_id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, capability_id])
    .map_err(to_storage_err)
}

/// Remove a capability's rows for one domain, keeping the listed pillars.
/// An empty `keep` removes all of them.
pub fn delete_for_capability_domain_except(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
    domain_id: &BusinessDomainId,
    keep: &[PillarId],
) -> Result<usize, StorageError> {
    let mut sql = String::from(
        "DELETE FROM effective_importance
         WHERE tenant_id = ?1 AND capability_id = ?2 AND domain_id = ?3",
    );
    if !keep.is_empty() {
        sql.push_str(&format!(" AND pillar_id NOT IN ({})", placeholders(4, keep.len())));
    }
    let mut params: Vec<&dyn ToSql> = vec![tenant, capability_id, domain_id];
    params.extend(keep.iter().map(|p| p as &dyn ToSql));
    conn.prepare(&sql)
        .map_err(to_storage_err)?
        .execute(params_from_iter(params))
        .map_err(to_storage_err)
}

/// Distinct domains that currently have rows for a capability.
pub fn domains_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<Vec<BusinessDomainId>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT DISTINCT domain_id FROM effective_importance
             WHERE tenant_id = ?1 AND capability_id = ?2 ORDER BY domain_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, capability_id], |row| row.get(0))
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// All rows of a capability, ordered by (pillar, domain).
pub fn get_by_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<Vec<EffectiveImportance>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM effective_importance
             WHERE tenant_id = ?1 AND capability_id = ?2
             ORDER BY pillar_id, domain_id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, capability_id], map_effective)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Rows whose value was supplied by `source` for one pillar and domain.
pub fn get_by_source(
    conn: &Connection,
    tenant: &TenantId,
    source_capability_id: &CapabilityId,
    pillar_id: &PillarId,
    domain_id: &BusinessDomainId,
) -> Result<Vec<EffectiveImportance>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM effective_importance
             WHERE tenant_id = ?1 AND source_capability_id = ?2
               AND pillar_id = ?3 AND domain_id = ?4
             ORDER BY capability_id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(
            params![tenant, source_capability_id, pillar_id, domain_id],
            map_effective,
        )
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Refresh the denormalized source name after a rename.
pub fn rename_source(
    conn: &Connection,
    tenant: &TenantId,
    source_capability_id: &CapabilityId,
    name: &str,
) -> Result<usize, StorageError> {
    conn.prepare_cached(
        "UPDATE effective_importance SET source_capability_name = ?3
         WHERE tenant_id = ?1 AND source_capability_id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, source_capability_id, name])
    .map_err(to_storage_err)
}

/// Every row of a tenant in key order.
pub fn list_all(conn: &Connection, tenant: &TenantId) -> Result<Vec<EffectiveImportance>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM effective_importance
             WHERE tenant_id = ?1
             ORDER BY capability_id, pillar_id, domain_id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant], map_effective)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}
