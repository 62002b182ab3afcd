// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::env::Environment;
use crate::object::{DictKey, Frozen, Object, ObjectType};

#[test]
fn freezing_a_frozen_object_is_a_no_op() {
    let mut env = Environment::new();
    let frozen = env.freeze(Object::from("value"), None);
    let recorded = env.len();

    let again = env.freeze(Object::Frozen(frozen.clone()), None);
    assert!(again.ptr_eq(&frozen));
    assert_eq!(env.len(), recorded);
}

#[test]
fn keyed_freezes_are_deduplicated() {
    let mut env = Environment::new();
    let first = env.freeze(Object::from("shared"), Some("k"));
    let second = env.freeze(Object::from("ignored"), Some("k"));
    assert!(first.ptr_eq(&second));
    assert_eq!(second.repr(), "shared");
    assert_eq!(env.dedup_len(), 1);

    let other = env.freeze(Object::from("shared"), Some("other"));
    assert!(!other.ptr_eq(&first));
}

#[test]
fn graphs_freeze_recursively() {
    let inner = Object::list_from(vec![Object::from(1i64), Object::from(2i64)]);
    let dict = Object::new_dict();
    dict.set_key(DictKey::from("a"), inner.clone());
    dict.set_key(DictKey::from("b"), inner);

    let mut env = Environment::new();
    let frozen = env.freeze(dict, None);
    assert_eq!(frozen.type_of(), ObjectType::Dict);

    let entries = frozen.dict().expect("dict");
    let a = entries.get(&DictKey::from("a")).expect("a");
    let b = entries.get(&DictKey::from("b")).expect("b");
    // One live container freezes to one frozen node.
    assert!(a.ptr_eq(b));
    assert_eq!(a.list().map(<[_]>::len), Some(2));

    // Frozen containers reject mutation.
    let object = frozen.to_object();
    assert!(object.is_frozen());
    assert!(!object.set_key(DictKey::from("c"), Object::null()));
}

#[test]
fn cycles_are_cut() {
    let list = Object::new_list();
    list.push(Object::from("head"));
    list.push(list.clone());

    let mut env = Environment::new();
    let frozen = env.freeze(list.clone(), None);
    let items = frozen.list().expect("list");
    assert_eq!(items.len(), 2);
    assert!(matches!(items[1].value(), Frozen::Scalar(s) if s.type_of() == ObjectType::Null));

    // Break the live cycle so the test does not leak it.
    if let Object::List(l) = &list {
        l.borrow_mut().clear();
    }
}

#[test]
fn freeze_in_place_replaces_the_slot() {
    let mut env = Environment::new();
    let mut slot = Object::list_from(vec![Object::from(true)]);
    env.freeze_in_place(&mut slot, None);
    assert!(slot.is_frozen());
    assert_eq!(slot.len(), Some(1));
}

#[test]
fn move_and_clear() {
    let mut source = Environment::new();
    let kept = source.freeze(Object::from("x"), Some("x"));

    let mut target = Environment::new();
    target.move_from(&mut source);
    assert!(source.is_empty());
    assert_eq!(target.dedup_len(), 1);

    let before = kept.ref_count();
    target.clear();
    assert!(target.is_empty());
    assert!(kept.ref_count() < before);
    assert_eq!(kept.ref_count(), 1);
}

#[test]
fn clear_releases_the_arena() {
    let dict = Object::new_dict();
    dict.set_key(DictKey::from("a"), Object::list_from(vec![Object::from(1i64)]));

    let mut env = Environment::new();
    let root = env.freeze(dict, None);
    let child = root
        .dict()
        .and_then(|entries| entries.get(&DictKey::from("a")))
        .cloned()
        .expect("a");
    // Arena, parent and this test.
    assert_eq!(child.ref_count(), 3);

    env.clear();
    assert!(env.is_empty());
    assert_eq!(root.ref_count(), 1);
    assert_eq!(child.ref_count(), 2);

    drop(root);
    assert_eq!(child.ref_count(), 1);
}
