//! Domain assignments: catalog bookkeeping, command validation, and the
//! hand-over performed when an assigned root is moved under another tree.

mod common;

use capmap_core::commands::{CommandBus, DomainCommand};
use capmap_core::context::ProjectionContext;
use capmap_core::errors::{CommandError, ErrorKind};
use capmap_core::ids::{BusinessDomainId, CapabilityId};
use capmap_core::models::CapabilityLevel;
use capmap_engine::StoreCommandBus;
use capmap_storage::queries::domains;
use common::*;

fn count(h: &Harness, domain: &str) -> u32 {
    h.runtime
        .reader()
        .business_domain(h.tenant(), &BusinessDomainId::new(domain))
        .unwrap()
        .unwrap()
        .capability_count
}

fn bus_dispatch(h: &Harness, command: DomainCommand) -> Result<Vec<capmap_core::DomainEvent>, CommandError> {
    h.runtime
        .database()
        .with_write_transaction(|tx| {
            let ctx = ProjectionContext::new(tx, &h.ctx);
            Ok::<_, capmap_core::ProjectionError>(StoreCommandBus.dispatch(&ctx, command))
        })
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn capability_count_tracks_assignment_rows() {
    let h = Harness::new();
    h.domain("d1");
    h.capability("a", None);
    h.capability("b", None);

    h.assign("d1", "a");
    h.assign("d1", "b");
    assert_eq!(count(&h, "d1"), 2);

    // Repeated delivery does not double count.
    h.assign("d1", "b");
    assert_eq!(count(&h, "d1"), 2);

    h.unassign("d1", "a");
    assert_eq!(count(&h, "d1"), 1);
    let truth = h.read(|conn, t| domains::count_assignments(conn, t, &BusinessDomainId::new("d1")));
    assert_eq!(truth, 1);
}

#[test]
fn only_roots_can_be_assigned() {
    let h = Harness::new();
    h.domain("d1");
    h.chain("c", 2);

    let report = h.assign("d1", "c2");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].kind, ErrorKind::InvariantViolation.to_string());
    assert!(h.assigned("d1").is_empty());
}

#[test]
fn assignment_to_unknown_domain_is_a_no_op() {
    let h = Harness::new();
    h.capability("a", None);
    let report = h.assign("ghost", "a");
    assert_eq!(report.no_ops, 1);
    assert!(report.skipped.is_empty());
}

#[test]
fn deleting_a_capability_drops_its_assignments() {
    let h = Harness::new();
    h.domain("d1");
    h.capability("a", None);
    h.assign("d1", "a");
    h.delete("a");
    assert!(h.assigned("d1").is_empty());
    assert_eq!(count(&h, "d1"), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// REASSIGNMENT ON MOVE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn moved_root_hands_assignment_to_new_root() {
    let h = Harness::new();
    h.domain("d1");
    h.capability("x", None);
    h.capability("y", None);
    h.assign("d1", "x");

    let report = h.move_to("x", Some("y"));

    assert_eq!(h.level_of("x"), CapabilityLevel::L2);
    assert_eq!(h.assigned("d1"), vec!["y".to_string()]);
    assert_eq!(report.follow_ups, 2);
    assert_eq!(report.events_applied, 3);
    assert_eq!(count(&h, "d1"), 1);
}

#[test]
fn move_under_already_assigned_root_leaves_no_duplicate() {
    let h = Harness::new();
    h.domain("d1");
    h.capability("x", None);
    h.capability("y", None);
    h.assign("d1", "x");
    h.assign("d1", "y");

    let report = h.move_to("x", Some("y"));

    assert_eq!(h.assigned("d1"), vec!["y".to_string()]);
    assert_eq!(report.follow_ups, 1);
    assert!(report.skipped.is_empty());
}

#[test]
fn deep_move_assigns_the_dominating_l1() {
    let h = Harness::new();
    h.domain("d1");
    h.domain("d2");
    h.chain("z", 3);
    h.capability("x", None);
    h.assign("d1", "x");
    h.assign("d2", "x");

    h.move_to("x", Some("z3"));

    assert_eq!(h.level_of("x"), CapabilityLevel::L4);
    assert_eq!(h.assigned("d1"), vec!["z1".to_string()]);
    assert_eq!(h.assigned("d2"), vec!["z1".to_string()]);
}

#[test]
fn ratings_follow_the_transferred_scope() {
    let h = Harness::new();
    h.domain("d1");
    h.capability("x", None);
    h.capability("x2", Some("x"));
    h.capability("y", None);
    h.assign("d1", "x");
    h.rate("d1", "x", P1, 4);
    h.rate("d1", "y", P1, 2);
    assert!(h.effective("y", P1, "d1").is_none());

    h.move_to("x", Some("y"));

    assert_eq!(h.effective("y", P1, "d1").unwrap().importance.value(), 2);
    let x = h.effective("x", P1, "d1").unwrap();
    assert_eq!(x.importance.value(), 4);
    assert!(!x.is_inherited);
    assert_eq!(h.effective("x2", P1, "d1").unwrap().source_capability_id.as_str(), "x");
}

#[test]
fn moving_an_unassigned_capability_issues_nothing() {
    let h = Harness::new();
    h.domain("d1");
    h.chain("c", 3);
    h.capability("y", None);
    h.assign("d1", "y");

    let report = h.move_to("c2", Some("y"));
    assert_eq!(report.follow_ups, 0);
    assert_eq!(h.assigned("d1"), vec!["y".to_string()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// COMMAND BUS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bus_validates_assign() {
    let h = Harness::new();
    h.domain("d1");
    h.chain("c", 2);
    h.assign("d1", "c1");

    let assign = |domain: &str, cap: &str| DomainCommand::AssignCapabilityToDomain {
        domain_id: BusinessDomainId::new(domain),
        capability_id: CapabilityId::new(cap),
    };

    let err = bus_dispatch(&h, assign("nope", "c1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = bus_dispatch(&h, assign("d1", "nope")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = bus_dispatch(&h, assign("d1", "c2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    let err = bus_dispatch(&h, assign("d1", "c1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    h.capability("other", None);
    let events = bus_dispatch(&h, assign("d1", "other")).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), "CapabilityAssignedToDomain");
    // Validation only: the event still has to be applied.
    assert_eq!(h.assigned("d1"), vec!["c1".to_string()]);
}

#[test]
fn bus_requires_existing_assignment_to_unassign() {
    let h = Harness::new();
    h.domain("d1");
    h.capability("a", None);

    let unassign = DomainCommand::UnassignCapabilityFromDomain {
        domain_id: BusinessDomainId::new("d1"),
        capability_id: CapabilityId::new("a"),
    };
    let err = bus_dispatch(&h, unassign.clone()).unwrap_err();
    assert!(matches!(err, CommandError::NotFound { .. }));

    h.assign("d1", "a");
    let events = bus_dispatch(&h, unassign).unwrap();
    assert_eq!(events[0].event_type(), "CapabilityUnassignedFromDomain");
}
