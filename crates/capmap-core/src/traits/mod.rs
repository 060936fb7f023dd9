//! Seams between the engine and its collaborators.

pub mod cancellation;
pub mod pillar_gateway;

pub use cancellation::{Cancellable, CancellationToken};
pub use pillar_gateway::PillarGateway;
