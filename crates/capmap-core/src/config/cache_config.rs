use serde::{Deserialize, Serialize};

/// Pillar lookup cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backstop expiry; explicit invalidation is the primary mechanism.
    pub pillar_ttl_secs: u64,
    /// Maximum number of tenants kept in the cache.
    pub max_tenants: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pillar_ttl_secs: 300,
            max_tenants: 1024,
        }
    }
}
