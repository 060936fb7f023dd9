//! application_components table queries.

use capmap_core::errors::StorageError;
use capmap_core::ids::{ComponentId, TenantId};
use capmap_core::models::ApplicationComponent;
use rusqlite::{params, Connection, OptionalExtension};

use crate::to_storage_err;

/// Insert a component or update its name.
pub fn upsert_component(
    conn: &Connection,
    tenant: &TenantId,
    id: &ComponentId,
    name: &str,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO application_components (tenant_id, id, name) VALUES (?1, ?2, ?3)
         ON CONFLICT (tenant_id, id) DO UPDATE SET name = excluded.name",
    )
    .map_err(to_storage_err)?
    .execute(params![tenant, id, name])
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_component(
    conn: &Connection,
    tenant: &TenantId,
    id: &ComponentId,
) -> Result<Option<ApplicationComponent>, StorageError> {
    conn.prepare_cached("SELECT id, name FROM application_components WHERE tenant_id = ?1 AND id = ?2")
        .map_err(to_storage_err)?
        .query_row(params![tenant, id], |row| {
            Ok(ApplicationComponent {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()
        .map_err(to_storage_err)
}
