//! Node model behaviour across module boundaries: shared ownership,
//! dynamic members and content addressing.

use std::sync::Arc;

use proptest::prelude::*;
use spk_core::{Base, MemberKind, PropertyError, SchemaVersion, Value};

#[test]
fn shared_child_outlives_one_parent() {
    let child = Arc::new(Base::new("Objects.Geometry.Point"));
    let mut a = Base::default();
    let mut b = Base::default();
    a.set("point", Arc::clone(&child)).unwrap();
    b.set("point", Arc::clone(&child)).unwrap();
    assert_eq!(Arc::strong_count(&child), 3);

    drop(a);
    assert_eq!(Arc::strong_count(&child), 2);
    assert!(Arc::ptr_eq(b.get("point").and_then(Value::as_node).unwrap(), &child));
}

#[test]
fn declared_members_survive_removal_dynamic_do_not() {
    let mut wall = Base::with_members("Objects.BuiltElements.Wall", ["height"]);
    wall.set("height", 3.0).unwrap();
    wall.set("comment", "load bearing").unwrap();

    wall.remove("height");
    wall.remove("comment");
    assert!(wall.has_member("height"));
    assert_eq!(wall.get("height"), Some(&Value::Null));
    assert!(!wall.has_member("comment"));
    assert_eq!(wall.member_names(MemberKind::Dynamic), Vec::<&str>::new());
}

#[test]
fn invalid_names_are_rejected_without_mutation() {
    let mut b = Base::default();
    assert_eq!(b.set("", 1), Err(PropertyError::EmptyName));
    assert!(matches!(b.set("@@detached", 1), Err(PropertyError::ReservedPrefix(_))));
    assert!(b.set("a/b", 1).is_err());
    assert_eq!(b.member_count(), 0);
}

#[test]
fn id_depends_on_content_not_on_stored_id() {
    let mut a = Base::new("Objects.Geometry.Line");
    a.set("length", 2.5).unwrap();
    let mut b = a.clone();
    b.set_id(Some("anything".into()));
    assert_eq!(a.compute_id().unwrap(), b.compute_id().unwrap());

    b.set("length", 3.0).unwrap();
    assert_ne!(a.compute_id().unwrap(), b.compute_id().unwrap());
}

#[test]
fn schema_version_round_trips_through_the_node() {
    let mut b = Base::new("Kit.T");
    assert_eq!(b.schema_version().unwrap(), SchemaVersion::DEFAULT);
    b.set_schema_version(SchemaVersion::new(2, 1, 0));
    assert_eq!(b.schema_version().unwrap().to_string(), "2.1.0");
}

proptest! {
    /// Member insertion order does not change the object id.
    #[test]
    fn id_ignores_member_order(
        entries in proptest::collection::btree_map("m[a-z]{0,7}", any::<i64>(), 0..8),
    ) {
        let mut forward = Base::default();
        let mut backward = Base::default();
        for (k, v) in &entries {
            forward.set(k, *v).unwrap();
        }
        for (k, v) in entries.iter().rev() {
            backward.set(k, *v).unwrap();
        }
        prop_assert_eq!(forward.compute_id().unwrap(), backward.compute_id().unwrap());
    }
}
