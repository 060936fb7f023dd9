//! strategy_pillars configuration queries.

use capmap_core::errors::StorageError;
use capmap_core::ids::{PillarId, TenantId};
use capmap_core::models::StrategyPillar;
use rusqlite::{params, Connection};

use super::collect_rows;
use crate::to_storage_err;

/// Insert or replace a pillar definition.
///
/// This is the configuration write path; callers holding a pillar cache must
/// invalidate the tenant afterwards.
pub fn upsert_pillar(
    conn: &Connection,
    tenant: &TenantId,
    pillar: &StrategyPillar,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO strategy_pillars (tenant_id, id, name, active, fit_scoring_enabled)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (tenant_id, id) DO UPDATE SET
             name = excluded.name,
             active = excluded.active,
             fit_scoring_enabled = excluded.fit_scoring_enabled",
    )
    .map_err(to_storage_err)?
    .execute(params![
        tenant,
        pillar.id,
        pillar.name,
        pillar.active,
        pillar.fit_scoring_enabled,
    ])
    .map_err(to_storage_err)?;
    Ok(())
}

/// All pillars of a tenant, ordered by id.
pub fn list_pillars(conn: &Connection, tenant: &TenantId) -> Result<Vec<StrategyPillar>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, name, active, fit_scoring_enabled FROM strategy_pillars
             WHERE tenant_id = ?1 ORDER BY id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant], |row| {
            Ok(StrategyPillar {
                id: row.get(0)?,
                name: row.get(1)?,
                active: row.get(2)?,
                fit_scoring_enabled: row.get(3)?,
            })
        })
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

pub fn delete_pillar(
    conn: &Connection,
    tenant: &TenantId,
    id: &PillarId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached("DELETE FROM strategy_pillars WHERE tenant_id = ?1 AND id = ?2")
        .map_err(to_storage_err)?
        .execute(params![tenant, id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}
