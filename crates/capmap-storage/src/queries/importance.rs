//! strategy_importance (explicit ratings) queries: the Rating Store.

use capmap_core::errors::StorageError;
use capmap_core::ids::{BusinessDomainId, CapabilityId, PillarId, TenantId};
use capmap_core::models::StrategyImportance;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::collect_rows;
use crate::{now_secs, to_storage_err};

fn map_importance(row: &Row<'_>) -> rusqlite::Result<StrategyImportance> {
    Ok(StrategyImportance {
        domain_id: row.get(0)?,
        capability_id: row.get(1)?,
        pillar_id: row.get(2)?,
        importance: row.get(3)?,
        rationale: row.get(4)?,
    })
}

/// Insert or overwrite the rating at (domain, capability, pillar).
pub fn upsert_importance(
    conn: &Connection,
    tenant: &TenantId,
    rating: &StrategyImportance,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO strategy_importance
         (tenant_id, domain_id, capability_id, pillar_id, importance, rationale, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (tenant_id, domain_id, capability_id, pillar_id) DO UPDATE SET
             importance = excluded.importance,
             rationale = excluded.rationale,
             updated_at = excluded.updated_at",
    )
    .map_err(to_storage_err)?
    .execute(params![
        tenant,
        rating.domain_id,
        rating.capability_id,
        rating.pillar_id,
        rating.importance,
        rating.rationale,
        now_secs(),
    ])
    .map_err(to_storage_err)?;
    Ok(())
}

/// The explicit rating recorded at exactly this triple, if any.
pub fn get_importance(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
    capability_id: &CapabilityId,
    pillar_id: &PillarId,
) -> Result<Option<StrategyImportance>, StorageError> {
    conn.prepare_cached(
        "SELECT domain_id, capability_id, pillar_id, importance, rationale
         FROM strategy_importance
         WHERE tenant_id = ?1 AND domain_id = ?2 AND capability_id = ?3 AND pillar_id = ?4",
    )
    .map_err(to_storage_err)?
    .query_row(params![tenant, domain_id, capability_id, pillar_id], map_importance)
    .optional()
    .map_err(to_storage_err)
}

pub fn delete_importance(
    conn: &Connection,
    tenant: &TenantId,
    domain_id: &BusinessDomainId,
    capability_id: &CapabilityId,
    pillar_id: &PillarId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached(
            "DELETE FROM strategy_importance
             WHERE tenant_id = ?1 AND domain_id = ?2 AND capability_id = ?3 AND pillar_id = ?4",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, domain_id, capability_id, pillar_id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}

/// Remove every explicit rating attached to a capability.
pub fn delete_importance_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<usize, StorageError> {
    conn.prepare_cached(
        "DELETE FROM strategy_importance WHERE tenant_id = ?1 AND capability_id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, capability_id])
    .map_err(to_storage_err)
}

/// All explicit ratings at a capability.
pub fn list_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<Vec<StrategyImportance>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT domain_id, capability_id, pillar_id, importance, rationale
             FROM strategy_importance
             WHERE tenant_id = ?1 AND capability_id = ?2
             ORDER BY domain_id, pillar_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, capability_id], map_importance)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}
