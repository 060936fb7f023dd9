//! Strategy-pillar gateways: the SQLite configuration table and a per-tenant
//! moka cache in front of it.

use std::sync::Arc;
use std::time::Duration;

use capmap_core::config::CacheConfig;
use capmap_core::errors::StorageError;
use capmap_core::ids::TenantId;
use capmap_core::models::StrategyPillar;
use capmap_core::traits::PillarGateway;
use capmap_storage::queries::pillars;
use moka::sync::Cache;
use rusqlite::Connection;

/// Reads `strategy_pillars` on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlitePillarGateway;

impl PillarGateway for SqlitePillarGateway {
    fn pillars(
        &self,
        conn: &Connection,
        tenant: &TenantId,
    ) -> Result<Arc<Vec<StrategyPillar>>, StorageError> {
        Ok(Arc::new(pillars::list_pillars(conn, tenant)?))
    }
}

/// Caches a gateway's answer per tenant.
///
/// Entries are filled lazily on first lookup and live until `invalidate`
/// or `invalidate_all` is called. Concurrent misses for one tenant share a
/// single load. A load that started before an `invalidate` may still land
/// afterwards; the TTL bounds how long such a stale list can be served,
/// and it also covers writers that forget to invalidate.
pub struct CachedPillarGateway<G> {
    inner: G,
    cache: Cache<TenantId, Arc<Vec<StrategyPillar>>>,
}

impl<G: PillarGateway> CachedPillarGateway<G> {
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_tenants)
            .time_to_live(Duration::from_secs(config.pillar_ttl_secs))
            .build();
        Self { inner, cache }
    }

    /// Drop the cached pillars of one tenant.
    pub fn invalidate(&self, tenant: &TenantId) {
        self.cache.invalidate(tenant);
        tracing::debug!(tenant = %tenant, "pillar cache invalidated");
    }

    /// Drop every cached tenant.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Whether a tenant currently has a cached entry.
    pub fn is_cached(&self, tenant: &TenantId) -> bool {
        self.cache.contains_key(tenant)
    }
}

impl<G: PillarGateway> PillarGateway for CachedPillarGateway<G> {
    fn pillars(
        &self,
        conn: &Connection,
        tenant: &TenantId,
    ) -> Result<Arc<Vec<StrategyPillar>>, StorageError> {
        self.cache
            .try_get_with(tenant.clone(), || self.inner.pillars(conn, tenant))
            .map_err(|e| (*e).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use capmap_core::ids::PillarId;

    use super::*;

    struct CountingGateway {
        calls: AtomicUsize,
    }

    impl PillarGateway for CountingGateway {
        fn pillars(
            &self,
            _conn: &Connection,
            _tenant: &TenantId,
        ) -> Result<Arc<Vec<StrategyPillar>>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(vec![StrategyPillar {
                id: PillarId::new("p1"),
                name: "Always On".to_string(),
                active: true,
                fit_scoring_enabled: false,
            }]))
        }
    }

    fn gateway() -> CachedPillarGateway<CountingGateway> {
        CachedPillarGateway::new(
            CountingGateway {
                calls: AtomicUsize::new(0),
            },
            &CacheConfig::default(),
        )
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let conn = Connection::open_in_memory().unwrap();
        let gateway = gateway();
        let tenant = TenantId::new("acme");
        gateway.pillars(&conn, &tenant).unwrap();
        gateway.pillars(&conn, &tenant).unwrap();
        assert_eq!(gateway.inner.calls.load(Ordering::SeqCst), 1);
        assert!(gateway.is_cached(&tenant));
    }

    #[test]
    fn invalidate_forces_reload_for_that_tenant_only() {
        let conn = Connection::open_in_memory().unwrap();
        let gateway = gateway();
        let acme = TenantId::new("acme");
        let globex = TenantId::new("globex");
        gateway.pillars(&conn, &acme).unwrap();
        gateway.pillars(&conn, &globex).unwrap();

        gateway.invalidate(&acme);
        gateway.pillars(&conn, &acme).unwrap();
        gateway.pillars(&conn, &globex).unwrap();
        assert_eq!(gateway.inner.calls.load(Ordering::SeqCst), 3);
    }

    struct FailingGateway;

    impl PillarGateway for FailingGateway {
        fn pillars(
            &self,
            _conn: &Connection,
            _tenant: &TenantId,
        ) -> Result<Arc<Vec<StrategyPillar>>, StorageError> {
            Err(StorageError::SqliteError {
                message: "database is locked".to_string(),
            })
        }
    }

    #[test]
    fn failed_load_is_returned_and_not_cached() {
        let conn = Connection::open_in_memory().unwrap();
        let gateway = CachedPillarGateway::new(FailingGateway, &CacheConfig::default());
        let tenant = TenantId::new("acme");
        let err = gateway.pillars(&conn, &tenant).unwrap_err();
        assert!(err.to_string().contains("database is locked"));
        assert!(!gateway.is_cached(&tenant));
    }

    #[test]
    fn concurrent_misses_share_one_load() {
        let gateway = gateway();
        let tenant = TenantId::new("acme");
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let conn = Connection::open_in_memory().unwrap();
                    gateway.pillars(&conn, &tenant).unwrap();
                });
            }
        });
        assert_eq!(gateway.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn find_and_active_ids_use_the_cached_list() {
        let conn = Connection::open_in_memory().unwrap();
        let gateway = gateway();
        let tenant = TenantId::new("acme");
        assert!(gateway.find(&conn, &tenant, &PillarId::new("p1")).unwrap().is_some());
        assert!(gateway.find(&conn, &tenant, &PillarId::new("nope")).unwrap().is_none());
        assert_eq!(gateway.active_pillar_ids(&conn, &tenant).unwrap(), vec![PillarId::new("p1")]);
        assert_eq!(gateway.inner.calls.load(Ordering::SeqCst), 1);
    }
}
