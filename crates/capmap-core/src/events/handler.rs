//! CapabilityEventHandler trait: one method per event, no-op defaults.

use crate::context::ProjectionContext;
use crate::errors::ProjectionError;

use super::types::*;

/// Outcome of handling one event: follow-up events produced by commands the
/// handler issued (empty for pure projections).
pub type HandlerResult = Result<Vec<DomainEvent>, ProjectionError>;

/// A projector reacting to domain events.
///
/// Every method defaults to a no-op so a projector only implements the events
/// it cares about. All work happens on `ctx.conn`, inside the transaction the
/// runtime opened for the event.
pub trait CapabilityEventHandler: Send + Sync {
    /// Short name used in logs and panic reports.
    fn name(&self) -> &'static str;

    // ---- Capability tree ----
    fn on_capability_created(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &CapabilityCreatedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_capability_renamed(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &CapabilityRenamedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_capability_parent_changed(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &CapabilityParentChangedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_capability_deleted(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &CapabilityDeletedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    // ---- Business domains ----
    fn on_business_domain_created(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &BusinessDomainCreatedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_capability_assigned_to_domain(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &DomainAssignmentEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_capability_unassigned_from_domain(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &DomainAssignmentEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    // ---- Strategy ----
    /// Called for both `StrategyImportanceSet` and `StrategyImportanceUpdated`.
    fn on_strategy_importance_set(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &StrategyImportanceSetEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_strategy_importance_removed(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &StrategyImportanceRemovedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    // ---- Components ----
    /// Called for both `ApplicationComponentCreated` and `ApplicationComponentRenamed`.
    fn on_application_component_named(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &ApplicationComponentEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_application_fit_score_set(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &ApplicationFitScoreSetEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_application_fit_score_removed(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &ApplicationFitScoreRemovedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    // ---- Realizations ----
    fn on_system_linked_to_capability(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &SystemLinkedToCapabilityEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_system_realization_updated(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &SystemRealizationUpdatedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }

    fn on_system_realization_deleted(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &SystemRealizationDeletedEvent,
    ) -> HandlerResult {
        Ok(Vec::new())
    }
}
