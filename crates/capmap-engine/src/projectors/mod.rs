//! Event handlers, in the order the runtime registers them.
//!
//! The catalog and strategy projectors write the source-of-truth tables;
//! the rest derive from them and must run after.

pub mod assignment_consistency;
pub mod catalog;
pub mod effective_importance;
pub mod realization;
pub mod strategy;

use std::sync::Arc;

use capmap_core::commands::CommandBus;
use capmap_core::events::{CapabilityEventHandler, EventDispatcher};
use capmap_core::traits::PillarGateway;

pub use assignment_consistency::AssignmentConsistencyProjector;
pub use catalog::CatalogProjector;
pub use effective_importance::EffectiveImportanceProjector;
pub use realization::RealizationProjector;
pub use strategy::StrategyProjector;

/// The standard projector set, source-of-truth first.
pub fn standard_projectors(
    pillars: Arc<dyn PillarGateway>,
    bus: Arc<dyn CommandBus>,
) -> Vec<Arc<dyn CapabilityEventHandler>> {
    vec![
        Arc::new(CatalogProjector),
        Arc::new(StrategyProjector::new(Arc::clone(&pillars))),
        Arc::new(EffectiveImportanceProjector::new(pillars)),
        Arc::new(AssignmentConsistencyProjector::new(bus)),
        Arc::new(RealizationProjector),
    ]
}

/// A dispatcher with the standard projectors registered.
pub fn standard_dispatcher(pillars: Arc<dyn PillarGateway>, bus: Arc<dyn CommandBus>) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    for handler in standard_projectors(pillars, bus) {
        dispatcher.register(handler);
    }
    dispatcher
}
