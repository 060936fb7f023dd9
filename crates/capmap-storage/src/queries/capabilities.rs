//! capabilities table queries.

use capmap_core::errors::StorageError;
use capmap_core::ids::{CapabilityId, TenantId};
use capmap_core::models::{Capability, CapabilityLevel};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{collect_rows, leading_then, placeholders};
use crate::{now_secs, to_storage_err};

const COLUMNS: &str = "id, name, level, parent_id";

fn map_capability(row: &Row<'_>) -> rusqlite::Result<Capability> {
    Ok(Capability {
        id: row.get(0)?,
        name: row.get(1)?,
        level: row.get(2)?,
        parent_id: row.get(3)?,
    })
}

/// Insert a capability. Returns false when it already exists.
pub fn insert_capability(
    conn: &Connection,
    tenant: &TenantId,
    capability: &Capability,
) -> Result<bool, StorageError> {
    let now = now_secs();
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO capabilities
             (tenant_id, id, name, level, parent_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .map_err(to_storage_err)?
        .execute(params![
            tenant,
            capability.id,
            capability.name,
            capability.level,
            capability.parent_id,
            now,
        ])
        .map_err(to_storage_err)?;
    Ok(inserted > 0)
}

/// Fetch one capability.
pub fn get_capability(
    conn: &Connection,
    tenant: &TenantId,
    id: &CapabilityId,
) -> Result<Option<Capability>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM capabilities WHERE tenant_id = ?1 AND id = ?2"
    ))
    .map_err(to_storage_err)?
    .query_row(params![tenant, id], map_capability)
    .optional()
    .map_err(to_storage_err)
}

/// Fetch several capabilities. Missing ids are skipped.
pub fn get_capabilities(
    conn: &Connection,
    tenant: &TenantId,
    ids: &[CapabilityId],
) -> Result<Vec<Capability>, StorageError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM capabilities WHERE tenant_id = ?1 AND id IN ({}) ORDER BY id",
        placeholders(2, ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params_from_iter(leading_then(tenant, ids)), map_capability)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Direct children of a capability, ordered by id.
pub fn get_children(
    conn: &Connection,
    tenant: &TenantId,
    parent_id: &CapabilityId,
) -> Result<Vec<Capability>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM capabilities
             WHERE tenant_id = ?1 AND parent_id = ?2 ORDER BY id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![tenant, parent_id], map_capability)
        .map_err(to_storage_err)?;
    collect_rows(rows)
}

/// Number of direct children.
pub fn count_children(
    conn: &Connection,
    tenant: &TenantId,
    parent_id: &CapabilityId,
) -> Result<usize, StorageError> {
    let count: i64 = conn
        .prepare_cached(
            "SELECT COUNT(*) FROM capabilities WHERE tenant_id = ?1 AND parent_id = ?2",
        )
        .map_err(to_storage_err)?
        .query_row(params![tenant, parent_id], |row| row.get(0))
        .map_err(to_storage_err)?;
    Ok(count as usize)
}

/// Rename a capability. Returns false when it does not exist.
pub fn rename_capability(
    conn: &Connection,
    tenant: &TenantId,
    id: &CapabilityId,
    name: &str,
) -> Result<bool, StorageError> {
    let updated = conn
        .prepare_cached(
            "UPDATE capabilities SET name = ?3, updated_at = ?4
             WHERE tenant_id = ?1 AND id = ?2",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, id, name, now_secs()])
        .map_err(to_storage_err)?;
    Ok(updated > 0)
}

/// Point a capability at a new parent (or none) and set its level.
pub fn set_parent(
    conn: &Connection,
    tenant: &TenantId,
    id: &CapabilityId,
    parent_id: Option<&CapabilityId>,
    level: CapabilityLevel,
) -> Result<bool, StorageError> {
    let updated = conn
        .prepare_cached(
            "UPDATE capabilities SET parent_id = ?3, level = ?4, updated_at = ?5
             WHERE tenant_id = ?1 AND id = ?2",
        )
        .map_err(to_storage_err)?
        .execute(params![tenant, id, parent_id, level, now_secs()])
        .map_err(to_storage_err)?;
    Ok(updated > 0)
}

/// Set only the level (used when a moved subtree shifts depth).
pub fn set_level(
    conn: &Connection,
    tenant: &TenantId,
    id: &CapabilityId,
    level: CapabilityLevel,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "UPDATE capabilities SET level = ?3, updated_at = ?4 WHERE tenant_id = ?1 AND id = ?2",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, id, level, now_secs()])
    .map_err(to_storage_err)?;
    Ok(())
}

/// Delete a capability row. Returns false when it was already gone.
pub fn delete_capability(
    conn: &Connection,
    tenant: &TenantId,
    id: &CapabilityId,
) -> Result<bool, StorageError> {
    let deleted = conn
        .prepare_cached("DELETE FROM capabilities WHERE tenant_id = ?1 AND id = ?2")
        .map_err(to_storage_err)?
        .execute(params![tenant, id])
        .map_err(to_storage_err)?;
    Ok(deleted > 0)
}

/// Number of capabilities held by a tenant.
pub fn count_capabilities(conn: &Connection, tenant: &TenantId) -> Result<usize, StorageError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM capabilities WHERE tenant_id = ?1",
            params![tenant],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;
    Ok(count as usize)
}
