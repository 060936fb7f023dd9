//! Projection runtime: applies events atomically and drains the follow-up
//! events produced by commands.

use std::collections::VecDeque;
use std::sync::Arc;

use capmap_core::config::CapmapConfig;
use capmap_core::context::{ProjectionContext, TenantContext};
use capmap_core::errors::{ErrorKind, ProjectionError, StorageError};
use capmap_core::events::{DomainEvent, EventDispatcher};
use capmap_core::ids::{PillarId, TenantId};
use capmap_core::models::StrategyPillar;
use capmap_core::traits::PillarGateway;
use capmap_storage::queries::pillars;
use capmap_storage::DatabaseManager;
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::StoreCommandBus;
use crate::gap::GapPolicy;
use crate::pillars::{CachedPillarGateway, SqlitePillarGateway};
use crate::projectors;
use crate::reader::CapabilityMapReader;
use crate::recompute::{EffectiveImportanceRecomputer, RecomputeStats};

/// An event dropped because redelivering it could not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEvent {
    pub event_type: &'static str,
    pub kind: String,
    pub reason: String,
}

/// Outcome of applying one event and its follow-ups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    /// Events whose projections committed, follow-ups included.
    pub events_applied: usize,
    /// Follow-up events produced by commands.
    pub follow_ups: usize,
    /// Events that resolved to a missing object and were treated as no-ops.
    pub no_ops: usize,
    pub skipped: Vec<SkippedEvent>,
}

impl ApplyReport {
    fn merge(&mut self, other: ApplyReport) {
        self.events_applied += other.events_applied;
        self.follow_ups += other.follow_ups;
        self.no_ops += other.no_ops;
        self.skipped.extend(other.skipped);
    }
}

pub struct ProjectionRuntime {
    db: Arc<DatabaseManager>,
    dispatcher: EventDispatcher,
    pillars: Arc<CachedPillarGateway<SqlitePillarGateway>>,
    gap: GapPolicy,
    max_follow_up_events: usize,
}

impl ProjectionRuntime {
    /// Build a runtime with the standard projectors over `db`.
    pub fn new(db: Arc<DatabaseManager>, config: &CapmapConfig) -> Self {
        let pillars = Arc::new(CachedPillarGateway::new(SqlitePillarGateway, &config.cache));
        let gateway: Arc<dyn PillarGateway> = pillars.clone();
        let dispatcher = projectors::standard_dispatcher(gateway, Arc::new(StoreCommandBus));
        Self {
            db,
            dispatcher,
            pillars,
            gap: GapPolicy::from(&config.gap),
            max_follow_up_events: config.projection.max_follow_up_events,
        }
    }

    /// Open the configured database and build a runtime over it.
    pub fn open(config: &CapmapConfig) -> Result<Self, StorageError> {
        let db = DatabaseManager::from_config(&config.storage)?;
        Ok(Self::new(Arc::new(db), config))
    }

    /// Apply one event, then every follow-up it produces, each in its own
    /// immediate transaction.
    ///
    /// Missing objects make an event a no-op. Invariant violations and
    /// conflicts are logged and the event is skipped. Store failures and
    /// cancellation are returned so the delivery layer can redeliver; the
    /// failed event's writes are rolled back.
    pub fn apply(&self, ctx: &TenantContext, event: DomainEvent) -> Result<ApplyReport, ProjectionError> {
        let mut report = ApplyReport::default();
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let event_type = event.event_type();
            match self.apply_one(ctx, &event) {
                Ok(follow_ups) => {
                    report.events_applied += 1;
                    if report.follow_ups + follow_ups.len() > self.max_follow_up_events {
                        tracing::error!(
                            tenant = %ctx.tenant,
                            event = event_type,
                            limit = self.max_follow_up_events,
                            "follow-up event limit reached, dropping remaining follow-ups"
                        );
                        report.skipped.push(SkippedEvent {
                            event_type,
                            kind: ErrorKind::InvariantViolation.to_string(),
                            reason: format!("more than {} follow-up events", self.max_follow_up_events),
                        });
                        break;
                    }
                    report.follow_ups += follow_ups.len();
                    queue.extend(follow_ups);
                }
                Err(e) => match e.kind() {
                    ErrorKind::NotFound => {
                        tracing::debug!(tenant = %ctx.tenant, event = event_type, error = %e, "event is a no-op");
                        report.no_ops += 1;
                    }
                    ErrorKind::InvariantViolation | ErrorKind::Conflict => {
                        tracing::error!(tenant = %ctx.tenant, event = event_type, error = %e, "event skipped");
                        report.skipped.push(SkippedEvent {
                            event_type,
                            kind: e.kind().to_string(),
                            reason: e.to_string(),
                        });
                    }
                    ErrorKind::TransientStore | ErrorKind::Cancelled => {
                        tracing::warn!(tenant = %ctx.tenant, event = event_type, error = %e, "event failed, redeliver");
                        return Err(e);
                    }
                },
            }
        }
        Ok(report)
    }

    /// Apply a batch in order. Stops at the first retryable failure.
    pub fn apply_all(
        &self,
        ctx: &TenantContext,
        events: impl IntoIterator<Item = DomainEvent>,
    ) -> Result<ApplyReport, ProjectionError> {
        let mut report = ApplyReport::default();
        for event in events {
            report.merge(self.apply(ctx, event)?);
        }
        Ok(report)
    }

    fn apply_one(&self, ctx: &TenantContext, event: &DomainEvent) -> Result<Vec<DomainEvent>, ProjectionError> {
        if ctx.is_cancelled() {
            return Err(ProjectionError::Cancelled);
        }
        self.db.with_write_transaction(|tx| {
            let projection = ProjectionContext::new(tx, ctx);
            self.dispatcher.dispatch(&projection, event)
        })
    }

    /// Write a pillar's configuration and bring the tenant's derived
    /// importance in line with the new active set, in one transaction.
    pub fn upsert_pillar(
        &self,
        ctx: &TenantContext,
        pillar: &StrategyPillar,
    ) -> Result<RecomputeStats, ProjectionError> {
        self.reconfigure_pillars(ctx, |conn| pillars::upsert_pillar(conn, &ctx.tenant, pillar))
    }

    /// Remove a pillar's configuration and its derived rows. Returns false
    /// when the pillar did not exist.
    pub fn remove_pillar(&self, ctx: &TenantContext, pillar_id: &PillarId) -> Result<bool, ProjectionError> {
        let mut removed = false;
        self.reconfigure_pillars(ctx, |conn| {
            removed = pillars::delete_pillar(conn, &ctx.tenant, pillar_id)?;
            Ok(())
        })?;
        Ok(removed)
    }

    fn reconfigure_pillars(
        &self,
        ctx: &TenantContext,
        write: impl FnOnce(&Connection) -> Result<(), StorageError>,
    ) -> Result<RecomputeStats, ProjectionError> {
        if ctx.is_cancelled() {
            return Err(ProjectionError::Cancelled);
        }
        // The active set is read uncached inside the transaction so the
        // cache never holds uncommitted configuration.
        let result = self.db.with_write_transaction(|tx| {
            let conn: &Connection = tx;
            write(conn)?;
            let active = SqlitePillarGateway.active_pillar_ids(conn, &ctx.tenant)?;
            EffectiveImportanceRecomputer::new(ProjectionContext::new(conn, ctx)).rescope_tenant(&active)
        });
        self.pillars.invalidate(&ctx.tenant);
        result
    }

    pub fn reader(&self) -> CapabilityMapReader {
        let gateway: Arc<dyn PillarGateway> = self.pillars.clone();
        CapabilityMapReader::new(Arc::clone(&self.db), gateway, self.gap)
    }

    pub fn pillars(&self) -> &CachedPillarGateway<SqlitePillarGateway> {
        &self.pillars
    }

    pub fn database(&self) -> &Arc<DatabaseManager> {
        &self.db
    }

    pub fn gap_policy(&self) -> GapPolicy {
        self.gap
    }

    /// Registered projector names in dispatch order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.dispatcher.handler_names()
    }
}
