//! capability_realizations queries.
//!
//! Direct rows carry explicit links. Inherited rows live on ancestors and
//! reference the direct row they were propagated from. Partial unique
//! indexes allow at most one of each per (capability, component).

use capmap_core::errors::StorageError;
use capmap_core::ids::{CapabilityId, ComponentId, RealizationId, TenantId};
use capmap_core::models::{Realization, RealizationLevel, RealizationView};
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{collect_rows, leading_then, placeholders};
use crate::to_storage_err;

const COLUMNS: &str = "id, capability_id, component_id, realization_level, origin, \
                       source_realization_id, notes, linked_at";

fn map_realization(row: &Row<'_>) -> rusqlite::Result<Realization> {
    Ok(Realization {
        id: row.get(0)?,
        capability_id: row.get(1)?,
        component_id: row.get(2)?,
        level: row.get(3)?,
        origin: row.get(4)?,
        source_realization_id: row.get(5)?,
        notes: row.get(6)?,
        linked_at: row.get(7)?,
    })
}

/// Insert a realization. Returns false when the id or the
/// (capability, component, origin) slot is already taken.
pub fn insert_realization(
    conn: &Connection,
    tenant: &TenantId,
    realization: &Realization,
) -> Result<bool, StorageError> {
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO capability_realizations
             (tenant_id, id, capability_id, component_id, realization_level, origin,
              source_realization_id, notes, linked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .map_err(to_storage_err)?
        .execute(params![
            tenant,
            realization.id,
            realization.capability_id,
            realization.component_id,
            realization.level,
            realization.origin,
            realization.source_realization_id,
            realization.notes,
            realization.linked_at,
        ])
        .map_err(to_storage_err)?;
    Ok(inserted > 0)
}

pub fn get_realization(
    conn: &Connection,
    tenant: &TenantId,
    id: &RealizationId,
) -> Result<Option<Realization>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM capability_realizations WHERE tenant_id = ?1 AND id = ?2"
    ))
    .map_err(to_storage_err)?
    .query_row(params![tenant, id], map_realization)
    .optional()
    .map_err(to_storage_err)
}

fn find_by_origin(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
    component_id: &ComponentId,
    origin: &str,
) -> Result<Option<Realization>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM capability_realizations
         WHERE tenant_id = ?1 AND capability_id = ?2 AND component_id = ?3 AND origin = ?4"
    ))
    .map_err(to_storage_err)?
    .query_row(params![tenant, capability_id, component_id, origin], map_realization)
    .optional()
    .map_err(to_storage_err)
}

/// The direct link between a capability and a component, if any.
pub fn find_direct(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
    component_id: &ComponentId,
) -> Result<Option<Realization>, StorageError> {
    find_by_origin(conn, tenant, capability_id, component_id, "Direct")
}

/// The inherited row for a capability and component, if any.
pub fn find_inherited(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
    component_id: &ComponentId,
) -> Result<Option<Realization>, StorageError> {
    find_by_origin(conn, tenant, capability_id, component_id, "Inherited")
}

/// Update level and notes of one row. Returns false when it does not exist.
pub fn update_level_notes(
    conn: &Connection,
    tenant: &TenantId,
    id: &RealizationId,
    level: RealizationLevel,
    notes: Option<&str>,
) -> Result<bool, StorageError> {
    let updated = conn
        .prepare_cached(
            "UPDATE capability_realizations SET realization_level = ?3, notes = ?4
             WHERE tenant_id = ?1 AND id = ?2",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, id, level, notes])
        .map_err(to_storage_err)?;
    Ok(updated > 0)
}

/// Re-point an inherited row at a different source and copy its level.
pub fn update_inherited_source(
    conn: &Connection,
    tenant: &TenantId,
    id: &RealizationId,
    source: &Realization,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE capability_realizations
         SET source_realization_id = ?3, realization_level = ?4, linked_at = ?5
         WHERE tenant_id = ?1 AND id = ?2 AND origin = 'Inherited'",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, id, source.id, source.level, source.linked_at])
    .map_err(to_storage_err)?;
    Ok(())
}

/// Copy a direct row's level onto every inherited row it sourced.
pub fn update_inherited_level(
    conn: &Connection,
    tenant: &TenantId,
    source_id: &RealizationId,
    level: RealizationLevel,
) -> Result<usize, StorageError> {
    conn.prepare_cached(
        "UPDATE capability_realizations SET realization_level = ?3
         WHERE tenant_id = ?1 AND source_realization_id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, source_id, level])
    .map_err(to_storage_err)
}

pub fn delete_realization(
    conn: &Connection,
    tenant: &TenantId,
    id: &RealizationId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached("DELETE FROM capability_realizations WHERE tenant_id = ?1 AND id = ?2")
        .map_err(to_storage_err)?
        .execute(params![tenant, id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}

/// Remove every row (direct or inherited) held by a capability.
pub fn delete_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<usize, StorageError> {
    conn.prepare_cached(
        "DELETE FROM capability_realizations WHERE tenant_id = ?1 AND capability_id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, capability_id])
    .map_err(to_storage_err)
}

/// Direct rows for a component on any of `capability_ids`, earliest link first.
pub fn directs_for_component_in(
    conn: &Connection,
    tenant: &TenantId,
    component_id: &ComponentId,
    capability_ids: &[CapabilityId],
) -> Result<Vec<Realization>, StorageError> {
    if capability_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM capability_realizations
         WHERE tenant_id = ?1 AND component_id = ?2 AND origin = 'Direct'
           AND capability_id IN ({})
         ORDER BY linked_at, id",
        placeholders(3, capability_ids.len())
    );
    let mut params: Vec<&dyn ToSql> = vec![tenant, component_id];
    params.extend(capability_ids.iter().map(|c| c as &dyn ToSql));
    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params_from_iter(params), map_realization)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Inherited copies pointing at one Direct row.
pub fn inherited_sourced_by(
    conn: &Connection,
    tenant: &TenantId,
    source_id: &RealizationId,
) -> Result<Vec<Realization>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM capability_realizations
             WHERE tenant_id = ?1 AND source_realization_id = ?2
             ORDER BY capability_id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, source_id], map_realization)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Every row (direct and inherited) held by a capability.
pub fn realizations_for_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability_id: &CapabilityId,
) -> Result<Vec<Realization>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM capability_realizations
             WHERE tenant_id = ?1 AND capability_id = ?2
             ORDER BY component_id, origin"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, capability_id], map_realization)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Rows for a batch of capabilities joined with component and source names.
pub fn realization_views_for_capabilities(
    conn: &Connection,
    tenant: &TenantId,
    capability_ids: &[CapabilityId],
) -> Result<Vec<RealizationView>, StorageError> {
    if capability_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT r.id, r.capability_id, r.component_id, r.realization_level, r.origin,
                r.source_realization_id, r.notes, r.linked_at,
                ac.name, src.capability_id, sc.name
         FROM capability_realizations r
         LEFT JOIN application_components ac
                ON ac.tenant_id = r.tenant_id AND ac.id = r.component_id
         LEFT JOIN capability_realizations src
                ON src.tenant_id = r.tenant_id AND src.id = r.source_realization_id
         LEFT JOIN capabilities sc
                ON sc.tenant_id = src.tenant_id AND sc.id = src.capability_id
         WHERE r.tenant_id = ?1 AND r.capability_id IN ({})
         ORDER BY r.capability_id, r.component_id, r.origin",
        placeholders(2, capability_ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params_from_iter(leading_then(tenant, capability_ids)), |row| {
            Ok(RealizationView {
                realization: map_realization(row)?,
                component_name: row.get(8)?,
                source_capability_id: row.get(9)?,
                source_capability_name: row.get(10)?,
            })
        })
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Every row of a tenant, in (capability, component, origin) order.
pub fn list_all(conn: &Connection, tenant: &TenantId) -> Result<Vec<Realization>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM capability_realizations
             WHERE tenant_id = ?1
             ORDER BY capability_id, component_id, origin"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant], map_realization)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}
