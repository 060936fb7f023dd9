//! Strategy-pillar configuration lookup.

use std::sync::Arc;

use rusqlite::Connection;

use crate::errors::StorageError;
use crate::ids::{PillarId, TenantId};
use crate::models::StrategyPillar;

/// Key-value lookup of a tenant's strategy pillars.
///
/// Implementations may cache; the connection is passed so that a lookup made
/// inside a projection transaction reads the same snapshot as the projection.
pub trait PillarGateway: Send + Sync {
    /// All configured pillars of the tenant, active or not.
    fn pillars(
        &self,
        conn: &Connection,
        tenant: &TenantId,
    ) -> Result<Arc<Vec<StrategyPillar>>, StorageError>;

    /// Look up a single pillar.
    fn find(
        &self,
        conn: &Connection,
        tenant: &TenantId,
        pillar_id: &PillarId,
    ) -> Result<Option<StrategyPillar>, StorageError> {
        Ok(self
            .pillars(conn, tenant)?
            .iter()
            .find(|p| &p.id == pillar_id)
            .cloned())
    }

    /// Ids of the active pillars, in configuration order.
    fn active_pillar_ids(
        &self,
        conn: &Connection,
        tenant: &TenantId,
    ) -> Result<Vec<PillarId>, StorageError> {
        Ok(self
            .pillars(conn, tenant)?
            .iter()
            .filter(|p| p.active)
            .map(|p| p.id.clone())
            .collect())
    }
}
