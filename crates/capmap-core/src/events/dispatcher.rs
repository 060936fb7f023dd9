//! EventDispatcher: synchronous, ordered dispatch to registered handlers.

use std::sync::Arc;

use crate::context::ProjectionContext;
use crate::errors::ProjectionError;

use super::handler::{CapabilityEventHandler, HandlerResult};
use super::types::DomainEvent;

/// Routes a `DomainEvent` to every registered handler in registration order.
///
/// Order matters: source-of-truth projectors are registered before the
/// derived ones so that derivations read the state the event produced.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn CapabilityEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn CapabilityEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Names of the registered handlers, in dispatch order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Dispatch one event to all handlers.
    ///
    /// Stops at the first error so the caller can roll the event's
    /// transaction back as a whole. A panicking handler is reported as
    /// `HandlerPanicked` instead of unwinding through the caller.
    pub fn dispatch(&self, ctx: &ProjectionContext<'_>, event: &DomainEvent) -> HandlerResult {
        let mut follow_ups = Vec::new();
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                route(handler.as_ref(), ctx, event)
            }));
            match result {
                Ok(Ok(events)) => follow_ups.extend(events),
                Ok(Err(e)) => return Err(e),
                Err(_panic) => {
                    tracing::error!(
                        handler = handler.name(),
                        event = event.event_type(),
                        "event handler panicked"
                    );
                    return Err(ProjectionError::HandlerPanicked {
                        handler: handler.name(),
                        event: event.event_type(),
                    });
                }
            }
        }
        Ok(follow_ups)
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn route(
    handler: &dyn CapabilityEventHandler,
    ctx: &ProjectionContext<'_>,
    event: &DomainEvent,
) -> HandlerResult {
    match event {
        DomainEvent::CapabilityCreated(e) => handler.on_capability_created(ctx, e),
        DomainEvent::CapabilityRenamed(e) => handler.on_capability_renamed(ctx, e),
        DomainEvent::CapabilityParentChanged(e) => handler.on_capability_parent_changed(ctx, e),
        DomainEvent::CapabilityDeleted(e) => handler.on_capability_deleted(ctx, e),
        DomainEvent::BusinessDomainCreated(e) => handler.on_business_domain_created(ctx, e),
        DomainEvent::CapabilityAssignedToDomain(e) => {
            handler.on_capability_assigned_to_domain(ctx, e)
        }
        DomainEvent::CapabilityUnassignedFromDomain(e) => {
            handler.on_capability_unassigned_from_domain(ctx, e)
        }
        DomainEvent::StrategyImportanceSet(e) | DomainEvent::StrategyImportanceUpdated(e) => {
            handler.on_strategy_importance_set(ctx, e)
        }
        DomainEvent::StrategyImportanceRemoved(e) => {
            handler.on_strategy_importance_removed(ctx, e)
        }
        DomainEvent::ApplicationComponentCreated(e)
        | DomainEvent::ApplicationComponentRenamed(e) => {
            handler.on_application_component_named(ctx, e)
        }
        DomainEvent::ApplicationFitScoreSet(e) => handler.on_application_fit_score_set(ctx, e),
        DomainEvent::ApplicationFitScoreRemoved(e) => {
            handler.on_application_fit_score_removed(ctx, e)
        }
        DomainEvent::SystemLinkedToCapability(e) => {
            handler.on_system_linked_to_capability(ctx, e)
        }
        DomainEvent::SystemRealizationUpdated(e) => handler.on_system_realization_updated(ctx, e),
        DomainEvent::SystemRealizationDeleted(e) => handler.on_system_realization_deleted(ctx, e),
    }
}
