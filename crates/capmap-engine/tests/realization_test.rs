//! Realization inheritance: Direct links propagate one Inherited copy per
//! strict ancestor and the copies follow every change to their sources.

mod common;

use capmap_core::events::{ApplicationComponentEvent, SystemRealizationUpdatedEvent};
use capmap_core::ids::{CapabilityId, ComponentId, RealizationId};
use capmap_core::models::{Realization, RealizationLevel, RealizationOrigin};
use capmap_core::DomainEvent;
use common::*;

fn only(rows: &[Realization]) -> &Realization {
    assert_eq!(rows.len(), 1, "expected exactly one row, got {rows:?}");
    &rows[0]
}

fn update(realization: &str, level: RealizationLevel) -> DomainEvent {
    DomainEvent::SystemRealizationUpdated(SystemRealizationUpdatedEvent {
        realization_id: RealizationId::new(realization),
        level,
        notes: Some("reviewed".to_string()),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPAGATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn link_propagates_to_every_strict_ancestor() {
    let h = Harness::new();
    h.chain("c", 3);
    h.link("r1", "c3", "k");

    assert_eq!(h.all_realizations().len(), 3);

    let direct = only(&h.realizations_at("c3")).clone();
    assert_eq!(direct.origin, RealizationOrigin::Direct);
    assert_eq!(direct.id.as_str(), "r1");
    assert!(direct.source_realization_id.is_none());

    for ancestor in ["c2", "c1"] {
        let rows = h.realizations_at(ancestor);
        let inherited = only(&rows);
        assert_eq!(inherited.origin, RealizationOrigin::Inherited);
        assert_eq!(inherited.source_realization_id.as_ref(), Some(&direct.id));
        assert_eq!(inherited.component_id.as_str(), "k");
        assert_eq!(inherited.level, RealizationLevel::Full);
        assert_eq!(inherited.linked_at, direct.linked_at);
    }
}

#[test]
fn unlink_retracts_all_copies() {
    let h = Harness::new();
    h.chain("c", 4);
    h.link("r1", "c4", "k");
    h.unlink("r1");
    assert!(h.all_realizations().is_empty());
}

#[test]
fn redelivered_link_is_idempotent() {
    let h = Harness::new();
    h.chain("c", 3);
    h.link("r1", "c3", "k");
    let before = h.all_realizations();

    let report = h.link("r1", "c3", "k");
    assert!(report.skipped.is_empty());
    assert_eq!(h.all_realizations(), before);
}

#[test]
fn second_direct_for_same_pair_conflicts() {
    let h = Harness::new();
    h.chain("c", 2);
    h.link("r1", "c2", "k");

    let report = h.link("r2", "c2", "k");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].kind, "conflict");
    assert_eq!(h.all_realizations().len(), 2);
}

#[test]
fn unlinking_unknown_realization_is_a_no_op() {
    let h = Harness::new();
    let report = h.unlink("ghost");
    assert_eq!(report.no_ops, 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROVENANCE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn copies_repoint_to_a_surviving_source() {
    let h = Harness::new();
    h.chain("c", 3);
    h.capability("c3b", Some("c2"));
    h.link("r1", "c3", "k");
    h.link("r2", "c3b", "k");

    // One copy per ancestor even with two sources below it.
    assert_eq!(h.realizations_at("c2").len(), 1);
    assert_eq!(h.all_realizations().len(), 4);

    h.unlink("r1");

    for ancestor in ["c2", "c1"] {
        let rows = h.realizations_at(ancestor);
        let inherited = only(&rows);
        assert_eq!(inherited.source_realization_id.as_ref().map(|id| id.as_str()), Some("r2"));
    }
}

#[test]
fn direct_link_supersedes_inherited_copy() {
    let h = Harness::new();
    h.chain("c", 3);
    h.link("r1", "c3", "k");
    h.link("r2", "c2", "k");

    let c2 = h.realizations_at("c2");
    let direct = only(&c2);
    assert_eq!(direct.origin, RealizationOrigin::Direct);
    assert_eq!(direct.id.as_str(), "r2");

    let c1 = h.realizations_at("c1");
    assert_eq!(only(&c1).origin, RealizationOrigin::Inherited);

    h.unlink("r2");
    let c2 = h.realizations_at("c2");
    let restored = only(&c2);
    assert_eq!(restored.origin, RealizationOrigin::Inherited);
    assert_eq!(restored.source_realization_id.as_ref().map(|id| id.as_str()), Some("r1"));
}

#[test]
fn components_are_tracked_independently() {
    let h = Harness::new();
    h.chain("c", 2);
    h.link("r1", "c2", "k");
    h.link("r2", "c2", "m");
    assert_eq!(h.realizations_at("c1").len(), 2);

    h.unlink("r1");
    let c1 = h.realizations_at("c1");
    assert_eq!(only(&c1).component_id.as_str(), "m");
}

// ═══════════════════════════════════════════════════════════════════════════
// UPDATES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn level_update_is_mirrored_to_copies() {
    let h = Harness::new();
    h.chain("c", 3);
    h.link("r1", "c3", "k");
    h.apply(update("r1", RealizationLevel::Partial));

    let rows = h.all_realizations();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.level == RealizationLevel::Partial));

    let direct = only(&h.realizations_at("c3")).clone();
    assert_eq!(direct.notes.as_deref(), Some("reviewed"));
    assert!(h.realizations_at("c1")[0].notes.is_none());
}

#[test]
fn inherited_rows_cannot_be_updated_directly() {
    let h = Harness::new();
    h.chain("c", 2);
    h.link("r1", "c2", "k");
    let copy_id = h.realizations_at("c1")[0].id.clone();

    let report = h.apply(update(copy_id.as_str(), RealizationLevel::Planned));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].kind, "invariant_violation");
    assert_eq!(h.realizations_at("c1")[0].level, RealizationLevel::Full);
}

// ═══════════════════════════════════════════════════════════════════════════
// HIERARCHY CHANGES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn moving_a_linked_capability_moves_its_copies() {
    let h = Harness::new();
    h.chain("c", 3);
    h.chain("y", 1);
    h.link("r1", "c3", "k");

    h.move_to("c3", Some("y1"));

    assert!(h.realizations_at("c2").is_empty());
    assert!(h.realizations_at("c1").is_empty());
    let y1 = h.realizations_at("y1");
    let copy = only(&y1);
    assert_eq!(copy.origin, RealizationOrigin::Inherited);
    assert_eq!(copy.source_realization_id.as_ref().map(|id| id.as_str()), Some("r1"));
    assert_eq!(h.all_realizations().len(), 2);
}

#[test]
fn moving_a_subtree_carries_deep_links() {
    let h = Harness::new();
    h.chain("c", 4);
    h.chain("y", 1);
    h.link("r1", "c4", "k");

    h.move_to("c3", Some("y1"));

    // c4 now sits under y1 > c3; c2 and c1 lose their copies.
    assert!(h.realizations_at("c1").is_empty());
    assert!(h.realizations_at("c2").is_empty());
    assert_eq!(only(&h.realizations_at("c3")).origin, RealizationOrigin::Inherited);
    assert_eq!(only(&h.realizations_at("y1")).origin, RealizationOrigin::Inherited);
}

#[test]
fn deleting_a_linked_leaf_withdraws_its_copies() {
    let h = Harness::new();
    h.chain("c", 3);
    h.capability("c3b", Some("c2"));
    h.link("r1", "c3", "k");
    h.link("r2", "c3b", "k");

    h.delete("c3");

    assert!(h.realizations_at("c3").is_empty());
    for ancestor in ["c2", "c1"] {
        let rows = h.realizations_at(ancestor);
        assert_eq!(only(&rows).source_realization_id.as_ref().map(|id| id.as_str()), Some("r2"));
    }

    h.delete("c3b");
    assert!(h.all_realizations().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// READ VIEW
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn views_carry_component_and_source_names() {
    let h = Harness::new();
    h.chain("c", 2);
    h.apply(DomainEvent::ApplicationComponentCreated(ApplicationComponentEvent {
        component_id: ComponentId::new("k"),
        name: "Ledger".to_string(),
    }));
    h.link("r1", "c2", "k");

    let views = h
        .runtime
        .reader()
        .realizations_for_capabilities(h.tenant(), &[CapabilityId::new("c1"), CapabilityId::new("c2")])
        .unwrap();
    assert_eq!(views.len(), 2);

    let c1 = &views[0];
    assert_eq!(c1.realization.capability_id.as_str(), "c1");
    assert_eq!(c1.component_name.as_deref(), Some("Ledger"));
    assert_eq!(c1.source_capability_id.as_ref().map(|id| id.as_str()), Some("c2"));
    assert_eq!(c1.source_capability_name.as_deref(), Some("c2 name"));

    let c2 = &views[1];
    assert_eq!(c2.realization.origin, RealizationOrigin::Direct);
    assert!(c2.source_capability_id.is_none());
}
