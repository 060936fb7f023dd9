//! application_fit_scores queries.

use capmap_core::errors::StorageError;
use capmap_core::ids::{ComponentId, PillarId, TenantId};
use capmap_core::models::ApplicationFitScore;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::collect_rows;
use crate::{now_secs, to_storage_err};

fn map_fit_score(row: &Row<'_>) -> rusqlite::Result<ApplicationFitScore> {
    Ok(ApplicationFitScore {
        component_id: row.get(0)?,
        pillar_id: row.get(1)?,
        score: row.get(2)?,
        rationale: row.get(3)?,
    })
}

pub fn upsert_fit_score(
    conn: &Connection,
    tenant: &TenantId,
    fit: &ApplicationFitScore,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO application_fit_scores
         (tenant_id, component_id, pillar_id, score, rationale, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (tenant_id, component_id, pillar_id) DO UPDATE SET
             score = excluded.score,
             rationale = excluded.rationale,
             updated_at = excluded.updated_at",
    )
    .map_err(to_storage_err)?
    .execute(params![
        tenant,
        fit.component_id,
        fit.pillar_id,
        fit.score,
        fit.rationale,
        now_secs(),
    ])
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_fit_score(
    conn: &Connection,
    tenant: &TenantId,
    component_id: &ComponentId,
    pillar_id: &PillarId,
) -> Result<Option<ApplicationFitScore>, StorageError> {
    conn.prepare_cached(
        "SELECT component_id, pillar_id, score, rationale FROM application_fit_scores
         WHERE tenant_id = ?1 AND component_id = ?2 AND pillar_id = ?3",
    )
    .map_err(to_storage_err)?
    .query_row(params![tenant, component_id, pillar_id], map_fit_score)
    .optional()
    .map_err(to_storage_err)
}

pub fn delete_fit_score(
    conn: &Connection,
    tenant: &TenantId,
    component_id: &ComponentId,
    pillar_id: &PillarId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached(
            "DELETE FROM application_fit_scores
             WHERE tenant_id = ?1 AND component_id = ?2 AND pillar_id = ?3",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, component_id, pillar_id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}

pub fn list_for_component(
    conn: &Connection,
    tenant: &TenantId,
    component_id: &ComponentId,
) -> Result<Vec<ApplicationFitScore>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT component_id, pillar_id, score, rationale FROM application_fit_scores
             WHERE tenant_id = ?1 AND component_id = ?2 ORDER BY pillar_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, component_id], map_fit_score)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}
