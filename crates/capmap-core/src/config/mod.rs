//! Configuration system for capmap.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod cache_config;
pub mod capmap_config;
pub mod gap_config;
pub mod projection_config;
pub mod storage_config;

pub use cache_config::CacheConfig;
pub use capmap_config::{CapmapConfig, ConfigOverrides};
pub use gap_config::GapConfig;
pub use projection_config::ProjectionConfig;
pub use storage_config::StorageConfig;
