//! Integration tests for object and property handles
//!
//! Tests property discovery, typed access, object lists, and edit sessions.

use assetgraph_foundation::{ErrorKind, ExternalPtr, ObjectId, PropertyValue, ValueKind};
use assetgraph_storage::{ObjectHandle, PropertyHandle, Registry};

// =============================================================================
// End-to-End Scenarios
// =============================================================================

#[test]
fn count_property_scenario() {
    let registry = Registry::new();
    let h = registry.create_object("Foo", "Bar");
    h.get_or_create_property("Count").unwrap().set(5u32).unwrap();

    assert_eq!(h.property("Count").unwrap().get::<u32>().unwrap(), 5);
    assert!(!h.property("Missing").unwrap().is_valid());
}

#[test]
fn children_list_scenario() {
    let registry = Registry::new();
    let parent = registry.create_object("parent", "Container");
    let child = registry.create_object("child", "Primitive");

    parent
        .get_or_create_property("Children")
        .unwrap()
        .set_object_list(&[child])
        .unwrap();

    assert_eq!(
        parent.property("Children").unwrap().object_list().unwrap(),
        vec![child]
    );
}

// =============================================================================
// Property Discovery
// =============================================================================

#[test]
fn missing_then_created_then_found() {
    let registry = Registry::new();
    let h = registry.create_object("a", "T");

    assert!(!h.property("missing").unwrap().is_valid());
    let created = h.get_or_create_property("missing").unwrap();
    assert!(created.is_valid());
    assert_eq!(h.property("missing").unwrap(), created);
}

#[test]
fn two_handles_to_one_property_share_writes() {
    let registry = Registry::new();
    let h = registry.create_object("a", "T");
    let a = h.get_or_create_property("Name").unwrap();
    let b = h.get_or_create_property("Name").unwrap();

    a.set("first".to_string()).unwrap();
    assert_eq!(b.get::<String>().unwrap(), "first");
    b.set("second".to_string()).unwrap();
    assert_eq!(a.get::<String>().unwrap(), "second");
}

#[test]
fn property_names_are_unique() {
    let registry = Registry::new();
    let h = registry.create_object("a", "T");
    for _ in 0..5 {
        h.get_or_create_property("Dup").unwrap();
    }
    assert_eq!(h.properties().unwrap().len(), 1);
}

// =============================================================================
// Typed Access
// =============================================================================

#[test]
fn mismatch_after_kind_change() {
    let registry = Registry::new();
    let h = registry.create_object("a", "T");
    let p = h.get_or_create_property("Value").unwrap();

    p.set(1i32).unwrap();
    p.set(1u64).unwrap();

    let err = p.get::<i32>().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: ValueKind::I32,
            actual: ValueKind::U64
        }
    ));
    assert_eq!(p.get::<u64>().unwrap(), 1);
}

#[test]
fn raw_value_access() {
    let registry = Registry::new();
    let h = registry.create_object("a", "T");
    let p = h.get_or_create_property("Ptr").unwrap();

    p.set_value(PropertyValue::ExternalPtr(ExternalPtr(0x1000)))
        .unwrap();
    assert_eq!(p.kind().unwrap(), ValueKind::ExternalPtr);
    assert_eq!(p.value().unwrap(), PropertyValue::ExternalPtr(ExternalPtr(0x1000)));
    assert_eq!(p.name().unwrap(), "Ptr");
    assert_eq!(p.object(), h);
}

#[test]
fn invalid_handles_never_no_op() {
    let p = PropertyHandle::null();
    assert!(p.set_value(PropertyValue::U8(1)).unwrap_err().is_invalid_handle());
    assert!(p.kind().unwrap_err().is_invalid_handle());

    let h = ObjectHandle::null();
    assert!(h.snapshot().unwrap_err().is_invalid_handle());
    assert!(h.children().unwrap_err().is_invalid_handle());
}

// =============================================================================
// Object Lists
// =============================================================================

#[test]
fn object_list_preserves_order_and_duplicates() {
    let registry = Registry::new();
    let holder = registry.create_object("holder", "T");
    let a = registry.create_object("a", "T");
    let b = registry.create_object("b", "T");
    let c = registry.create_object("c", "T");
    let list = vec![c, a, b, a];

    let p = holder.get_or_create_property("Refs").unwrap();
    p.set_object_list(&list).unwrap();
    assert_eq!(p.object_list().unwrap(), list);

    p.set_object_list(&[]).unwrap();
    assert!(p.object_list().unwrap().is_empty());
}

#[test]
fn edit_session_appends_atomically() {
    let registry = Registry::new();
    let holder = registry.create_object("holder", "T");
    let a = registry.create_object("a", "T");
    let b = registry.create_object("b", "T");

    holder
        .get_or_create_property("Refs")
        .unwrap()
        .set_object_list(&[a])
        .unwrap();

    {
        let mut session = holder.edit().unwrap();
        let mut current = session.object_list("Refs").unwrap();
        current.push(b);
        session
            .set("Refs", current.iter().map(ObjectHandle::id).collect::<Vec<_>>())
            .unwrap();
    }

    assert_eq!(
        holder.property("Refs").unwrap().object_list().unwrap(),
        vec![a, b]
    );
}

#[test]
fn session_rejects_stale_list_entries() {
    let registry = Registry::new();
    let other = Registry::new();
    let holder = registry.create_object("holder", "T");
    let a = registry.create_object("a", "T");
    let stranger = other.create_object("stranger", "T");

    let mut session = holder.edit().unwrap();
    let ids = vec![a.id(), stranger.id()];
    assert!(session.set("Refs", ids).unwrap_err().is_invalid_handle());
    assert!(session
        .set_value("Refs", PropertyValue::ObjectList(vec![ObjectId::null()]))
        .unwrap_err()
        .is_invalid_handle());
    drop(session);

    assert!(!holder.property("Refs").unwrap().is_valid());
}

#[test]
fn edit_pair_moves_reference_between_objects() {
    let registry = Registry::new();
    let from = registry.create_object("from", "T");
    let to = registry.create_object("to", "T");
    let item = registry.create_object("item", "T");

    from.get_or_create_property("Items")
        .unwrap()
        .set_object_list(&[item])
        .unwrap();

    {
        let (mut s_to, mut s_from) = registry.edit_pair(&to, &from).unwrap();
        assert!(s_from.remove_object("Items", &item).unwrap());
        s_to.push_object("Items", &item).unwrap();
    }

    assert!(from.property("Items").unwrap().object_list().unwrap().is_empty());
    assert_eq!(
        to.property("Items").unwrap().object_list().unwrap(),
        vec![item]
    );
}
