//! Strategy projector: explicit importance ratings and application fit
//! scores, validated against the tenant's pillar configuration.

use std::sync::Arc;

use capmap_core::context::ProjectionContext;
use capmap_core::errors::ProjectionError;
use capmap_core::events::*;
use capmap_core::ids::PillarId;
use capmap_core::models::{ApplicationFitScore, StrategyImportance, StrategyPillar};
use capmap_core::traits::PillarGateway;
use capmap_storage::queries::{capabilities, fit_scores, importance};

pub struct StrategyProjector {
    pillars: Arc<dyn PillarGateway>,
}

impl StrategyProjector {
    pub fn new(pillars: Arc<dyn PillarGateway>) -> Self {
        Self { pillars }
    }

    fn known_pillar(
        &self,
        ctx: &ProjectionContext<'_>,
        pillar_id: &PillarId,
    ) -> Result<StrategyPillar, ProjectionError> {
        self.pillars
            .find(ctx.conn, ctx.tenant_id(), pillar_id)?
            .ok_or_else(|| ProjectionError::InvariantViolation(format!("unknown strategy pillar {pillar_id}")))
    }
}

impl CapabilityEventHandler for StrategyProjector {
    fn name(&self) -> &'static str {
        "strategy"
    }

    fn on_strategy_importance_set(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &StrategyImportanceSetEvent,
    ) -> HandlerResult {
        let tenant = ctx.tenant_id();
        self.known_pillar(ctx, &event.pillar_id)?;
        if capabilities::get_capability(ctx.conn, tenant, &event.capability_id)?.is_none() {
            return Err(ProjectionError::not_found("capability", &event.capability_id));
        }
        importance::upsert_importance(
            ctx.conn,
            tenant,
            &StrategyImportance {
                domain_id: event.domain_id.clone(),
                capability_id: event.capability_id.clone(),
                pillar_id: event.pillar_id.clone(),
                importance: event.importance,
                rationale: event.rationale.clone(),
            },
        )?;
        Ok(Vec::new())
    }

    fn on_strategy_importance_removed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &StrategyImportanceRemovedEvent,
    ) -> HandlerResult {
        importance::delete_importance(
            ctx.conn,
            ctx.tenant_id(),
            &event.domain_id,
            &event.capability_id,
            &event.pillar_id,
        )?;
        Ok(Vec::new())
    }

    fn on_application_fit_score_set(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &ApplicationFitScoreSetEvent,
    ) -> HandlerResult {
        let pillar = self.known_pillar(ctx, &event.pillar_id)?;
        if !pillar.fit_scoring_enabled {
            return Err(ProjectionError::InvariantViolation(format!(
                "fit scoring is disabled for pillar {}",
                pillar.id
            )));
        }
        fit_scores::upsert_fit_score(
            ctx.conn,
            ctx.tenant_id(),
            &ApplicationFitScore {
                component_id: event.component_id.clone(),
                pillar_id: event.pillar_id.clone(),
                score: event.score,
                rationale: event.rationale.clone(),
            },
        )?;
        Ok(Vec::new())
    }

    fn on_application_fit_score_removed(
        &self,
        ctx: &ProjectionContext<'_>,
        event: &ApplicationFitScoreRemovedEvent,
    ) -> HandlerResult {
        fit_scores::delete_fit_score(ctx.conn, ctx.tenant_id(), &event.component_id, &event.pillar_id)?;
        Ok(Vec::new())
    }
}
