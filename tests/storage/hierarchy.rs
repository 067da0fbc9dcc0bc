//! Integration tests for the object hierarchy
//!
//! Tests attaching, re-parenting, detaching, and cycle rejection.

use assetgraph_foundation::ErrorKind;
use assetgraph_storage::Registry;

#[test]
fn attach_is_visible_from_both_sides() {
    let registry = Registry::new();
    let zone = registry.create_object("zone", "Zone");
    let object = registry.create_object("object", "Object");

    object.set_parent(Some(&zone)).unwrap();

    assert_eq!(object.parent().unwrap(), zone);
    assert_eq!(zone.children().unwrap(), vec![object]);
}

#[test]
fn reparent_updates_old_and_new_parent() {
    let registry = Registry::new();
    let zone_a = registry.create_object("a", "Zone");
    let zone_b = registry.create_object("b", "Zone");
    let object = registry.create_object("object", "Object");

    object.set_parent(Some(&zone_a)).unwrap();
    object.set_parent(Some(&zone_b)).unwrap();

    assert!(zone_a.children().unwrap().is_empty());
    assert_eq!(zone_b.children().unwrap(), vec![object]);
    assert_eq!(object.parent().unwrap(), zone_b);
}

#[test]
fn cycles_are_rejected() {
    let registry = Registry::new();
    let root = registry.create_object("root", "T");
    let mid = registry.create_object("mid", "T");
    let leaf = registry.create_object("leaf", "T");

    mid.set_parent(Some(&root)).unwrap();
    leaf.set_parent(Some(&mid)).unwrap();

    let err = root.set_parent(Some(&leaf)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HierarchyCycle { .. }));
    assert!(!root.parent().unwrap().is_valid());
}

#[test]
fn snapshot_reports_links() {
    let registry = Registry::new();
    let root = registry.create_object("root", "T");
    let a = registry.create_object("a", "T");
    let b = registry.create_object("b", "T");
    a.set_parent(Some(&root)).unwrap();
    b.set_parent(Some(&root)).unwrap();

    let snap = root.snapshot().unwrap();
    assert_eq!(snap.parent, None);
    assert_eq!(snap.children, vec![a.uid(), b.uid()]);
}
