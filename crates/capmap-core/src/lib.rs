//! # capmap-core
//!
//! Foundation crate for the capability-map projection engine.
//! Defines ids, models, domain events, commands, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod events;
pub mod ids;
pub mod logging;
pub mod models;
pub mod traits;

pub use config::CapmapConfig;
pub use context::{ProjectionContext, TenantContext};
pub use errors::{ErrorKind, ProjectionError};
pub use events::DomainEvent;
pub use ids::{
    BusinessDomainId, CapabilityId, ComponentId, PillarId, RealizationId, TenantId,
};
