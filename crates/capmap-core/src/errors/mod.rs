//! Error handling for capmap.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod command_error;
pub mod config_error;
pub mod error_code;
pub mod hierarchy_error;
pub mod kind;
pub mod projection_error;
pub mod storage_error;

pub use command_error::CommandError;
pub use config_error::ConfigError;
pub use error_code::CapmapErrorCode;
pub use hierarchy_error::HierarchyError;
pub use kind::ErrorKind;
pub use projection_error::ProjectionError;
pub use storage_error::StorageError;
