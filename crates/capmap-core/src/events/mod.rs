//! Domain events consumed by the projectors, the handler trait, and the
//! dispatcher that routes one to the other.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::{CapabilityEventHandler, HandlerResult};
pub use types::*;
