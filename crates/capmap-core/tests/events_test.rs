//! Tests for event serialization and the dispatcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use capmap_core::context::{ProjectionContext, TenantContext};
use capmap_core::errors::{ErrorKind, ProjectionError};
use capmap_core::events::*;
use capmap_core::ids::{BusinessDomainId, CapabilityId, PillarId};
use capmap_core::models::{CapabilityLevel, Importance};
use rusqlite::Connection;

struct RecordingHandler {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl CapabilityEventHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_capability_created(
        &self,
        _ctx: &ProjectionContext<'_>,
        event: &CapabilityCreatedEvent,
    ) -> HandlerResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, event.capability_id));
        Ok(Vec::new())
    }

    fn on_strategy_importance_set(
        &self,
        _ctx: &ProjectionContext<'_>,
        event: &StrategyImportanceSetEvent,
    ) -> HandlerResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:importance:{}", self.name, event.importance));
        Ok(Vec::new())
    }
}

struct FollowUpHandler;

impl CapabilityEventHandler for FollowUpHandler {
    fn name(&self) -> &'static str {
        "follow-up"
    }

    fn on_capability_deleted(
        &self,
        _ctx: &ProjectionContext<'_>,
        event: &CapabilityDeletedEvent,
    ) -> HandlerResult {
        Ok(vec![DomainEvent::CapabilityUnassignedFromDomain(DomainAssignmentEvent {
            domain_id: BusinessDomainId::new("d1"),
            capability_id: event.capability_id.clone(),
        })])
    }
}

struct PanickingHandler {
    calls: AtomicUsize,
}

impl CapabilityEventHandler for PanickingHandler {
    fn name(&self) -> &'static str {
        "panicker"
    }

    fn on_capability_deleted(
        &self,
        _ctx: &ProjectionContext<'_>,
        _event: &CapabilityDeletedEvent,
    ) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        panic!("boom");
    }
}

fn created(id: &str) -> DomainEvent {
    DomainEvent::CapabilityCreated(CapabilityCreatedEvent {
        capability_id: CapabilityId::new(id),
        name: id.to_uppercase(),
        parent_id: None,
        level: CapabilityLevel::L1,
    })
}

#[test]
fn test_handlers_run_in_registration_order() {
    let conn = Connection::open_in_memory().unwrap();
    let tenant = TenantContext::new("t1");
    let ctx = ProjectionContext::new(&conn, &tenant);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(RecordingHandler { name: "first", log: log.clone() }));
    dispatcher.register(Arc::new(RecordingHandler { name: "second", log: log.clone() }));
    assert_eq!(dispatcher.handler_names(), vec!["first", "second"]);

    let follow_ups = dispatcher.dispatch(&ctx, &created("c1")).unwrap();
    assert!(follow_ups.is_empty());
    assert_eq!(*log.lock().unwrap(), vec!["first:c1", "second:c1"]);
}

#[test]
fn test_set_and_updated_share_a_handler() {
    let conn = Connection::open_in_memory().unwrap();
    let tenant = TenantContext::new("t1");
    let ctx = ProjectionContext::new(&conn, &tenant);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(RecordingHandler { name: "h", log: log.clone() }));

    let payload = StrategyImportanceSetEvent {
        domain_id: BusinessDomainId::new("d1"),
        capability_id: CapabilityId::new("c1"),
        pillar_id: PillarId::new("p1"),
        importance: Importance::new(3).unwrap(),
        rationale: None,
    };
    dispatcher
        .dispatch(&ctx, &DomainEvent::StrategyImportanceSet(payload.clone()))
        .unwrap();
    dispatcher
        .dispatch(&ctx, &DomainEvent::StrategyImportanceUpdated(payload))
        .unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_follow_up_events_are_collected() {
    let conn = Connection::open_in_memory().unwrap();
    let tenant = TenantContext::new("t1");
    let ctx = ProjectionContext::new(&conn, &tenant);

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(FollowUpHandler));
    let follow_ups = dispatcher
        .dispatch(
            &ctx,
            &DomainEvent::CapabilityDeleted(CapabilityDeletedEvent {
                capability_id: CapabilityId::new("c9"),
            }),
        )
        .unwrap();
    assert_eq!(follow_ups.len(), 1);
    assert_eq!(follow_ups[0].event_type(), "CapabilityUnassignedFromDomain");
}

#[test]
fn test_panicking_handler_is_reported_not_propagated() {
    let conn = Connection::open_in_memory().unwrap();
    let tenant = TenantContext::new("t1");
    let ctx = ProjectionContext::new(&conn, &tenant);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(PanickingHandler { calls: AtomicUsize::new(0) }));
    dispatcher.register(Arc::new(RecordingHandler { name: "after", log: log.clone() }));

    let err = dispatcher
        .dispatch(
            &ctx,
            &DomainEvent::CapabilityDeleted(CapabilityDeletedEvent {
                capability_id: CapabilityId::new("c1"),
            }),
        )
        .unwrap_err();
    assert!(matches!(err, ProjectionError::HandlerPanicked { handler: "panicker", .. }));
    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
}

#[test]
fn test_event_json_uses_type_tag_and_camel_case() {
    let event = DomainEvent::CapabilityParentChanged(CapabilityParentChangedEvent {
        capability_id: CapabilityId::new("c2"),
        old_parent_id: Some(CapabilityId::new("c1")),
        new_parent_id: None,
    });
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "CapabilityParentChanged");
    assert_eq!(json["data"]["capabilityId"], "c2");
    assert_eq!(json["data"]["oldParentId"], "c1");
    assert!(json["data"]["newParentId"].is_null());

    let back: DomainEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_out_of_range_importance_is_rejected_at_the_boundary() {
    let raw = r#"{"type":"StrategyImportanceSet","data":{"domainId":"d","capabilityId":"c","pillarId":"p","importance":7,"rationale":null}}"#;
    assert!(serde_json::from_str::<DomainEvent>(raw).is_err());
}
