//! Top-level capmap configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CacheConfig, GapConfig, ProjectionConfig, StorageConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CAPMAP_*`)
/// 3. Project config (`capmap.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CapmapConfig {
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub gap: GapConfig,
    pub projection: ProjectionConfig,
}

/// Explicit overrides supplied by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub read_pool_size: Option<usize>,
    pub pillar_ttl_secs: Option<u64>,
}

impl CapmapConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            config = Self::from_file(&project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Read and parse a TOML file (no env or override layering).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CapmapConfig) -> Result<(), ConfigError> {
        if !(1..=8).contains(&config.storage.read_pool_size) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.read_pool_size".to_string(),
                message: "must be between 1 and 8".to_string(),
            });
        }
        if config.gap.concern_min_gap < 1 {
            return Err(ConfigError::ValidationFailed {
                field: "gap.concern_min_gap".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.gap.liability_min_gap <= config.gap.concern_min_gap {
            return Err(ConfigError::ValidationFailed {
                field: "gap.liability_min_gap".to_string(),
                message: "must be greater than gap.concern_min_gap".to_string(),
            });
        }
        if config.gap.liability_min_gap > 4 {
            return Err(ConfigError::ValidationFailed {
                field: "gap.liability_min_gap".to_string(),
                message: "must be at most 4 (largest possible gap)".to_string(),
            });
        }
        if config.projection.max_follow_up_events == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "projection.max_follow_up_events".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn apply_env_overrides(config: &mut CapmapConfig) {
        if let Ok(val) = std::env::var("CAPMAP_DB_PATH") {
            if !val.is_empty() {
                config.storage.db_path = Some(PathBuf::from(val));
            }
        }
        if let Some(v) = env_parse::<usize>("CAPMAP_READ_POOL_SIZE") {
            config.storage.read_pool_size = v;
        }
        if let Some(v) = env_parse::<u64>("CAPMAP_PILLAR_TTL_SECS") {
            config.cache.pillar_ttl_secs = v;
        }
        if let Some(v) = env_parse::<i8>("CAPMAP_CONCERN_MIN_GAP") {
            config.gap.concern_min_gap = v;
        }
        if let Some(v) = env_parse::<i8>("CAPMAP_LIABILITY_MIN_GAP") {
            config.gap.liability_min_gap = v;
        }
    }

    fn apply_overrides(config: &mut CapmapConfig, overrides: &ConfigOverrides) {
        if let Some(ref path) = overrides.db_path {
            config.storage.db_path = Some(path.clone());
        }
        if let Some(size) = overrides.read_pool_size {
            config.storage.read_pool_size = size;
        }
        if let Some(ttl) = overrides.pillar_ttl_secs {
            config.cache.pillar_ttl_secs = ttl;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CapmapConfig::default();
        CapmapConfig::validate(&config).unwrap();
        assert_eq!(config.gap.liability_min_gap, 2);
        assert_eq!(config.gap.concern_min_gap, 1);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CapmapConfig::from_toml("[gap]\nliability_min_gap = 3\n").unwrap();
        assert_eq!(config.gap.liability_min_gap, 3);
        assert_eq!(config.gap.concern_min_gap, 1);
        assert_eq!(config.storage.read_pool_size, 4);
    }

    #[test]
    fn liability_threshold_must_exceed_concern() {
        let err = CapmapConfig::from_toml("[gap]\nconcern_min_gap = 2\nliability_min_gap = 2\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "gap.liability_min_gap"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = CapmapConfig::from_toml("[storage\nread_pool_size = 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
