// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use filterx::{DictKey, Environment, FrozenObject, Object, StashSlot, StashedObject};

fn version_graph(version: i64) -> Object {
    let dict = Object::new_dict();
    dict.set_key(DictKey::from("version"), Object::from(version));
    dict.set_key(
        DictKey::from("items"),
        Object::list_from(vec![Object::from(version), Object::from(version)]),
    );
    dict
}

fn field(object: &FrozenObject, key: &str) -> Option<FrozenObject> {
    object.dict()?.get(&DictKey::from(key)).cloned()
}

fn integer(object: &FrozenObject) -> Option<i64> {
    object.to_object().extract_integer()
}

/// Every reader must see one whole published graph.
fn consistent_version(object: &FrozenObject) -> Option<i64> {
    let version = integer(&field(object, "version")?)?;
    let items = field(object, "items")?;
    let items = items.list()?;
    if items.len() != 2 || items.iter().any(|i| integer(i) != Some(version)) {
        return None;
    }
    Some(version)
}

#[test]
fn publish_and_read() -> Result<()> {
    let slot = StashSlot::new();
    assert!(slot.is_empty());
    assert_eq!(slot.read(consistent_version), None);

    assert!(slot.stash(version_graph(1), Environment::new()).is_none());
    assert_eq!(slot.read(consistent_version), Some(Some(1)));

    let previous = slot.stash(version_graph(2), Environment::new());
    let previous = previous.map(|cell| consistent_version(cell.object()));
    assert_eq!(previous, Some(Some(1)));
    assert_eq!(slot.read(consistent_version), Some(Some(2)));

    assert!(slot.clear().is_some());
    assert!(slot.is_empty());
    Ok(())
}

#[test]
fn cells_outlive_replacement() -> Result<()> {
    let slot = StashSlot::new();
    let mut env = Environment::new();
    let interned = env.freeze(Object::from("interned"), Some("name"));
    slot.stash(version_graph(1), env);

    let pinned = slot.load();
    slot.stash(version_graph(2), Environment::new());

    let pinned = pinned.expect("published");
    assert_eq!(consistent_version(pinned.object()), Some(1));
    assert_eq!(pinned.environment().dedup_len(), 1);
    assert!(interned.ref_count() > 1);

    // The last reference clears the environment it carries.
    drop(pinned);
    assert_eq!(interned.ref_count(), 1);
    Ok(())
}

#[test]
fn readers_see_whole_graphs() -> Result<()> {
    let slot = StashSlot::new();
    slot.stash(version_graph(0), Environment::new());
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        for _ in 0..4 {
            let slot = &slot;
            let done = &done;
            s.spawn(move || {
                let mut last = 0;
                while !done.load(Ordering::Acquire) {
                    let version = slot.read(consistent_version).flatten();
                    let version = version.expect("a consistent graph");
                    // Publications are monotonic.
                    assert!(version >= last);
                    last = version;

                    if let Some(cell) = slot.load() {
                        assert!(consistent_version(cell.object()).is_some());
                    }
                }
            });
        }

        for version in 1..=500i64 {
            let cell = StashedObject::stash(version_graph(version), Environment::new());
            slot.publish(cell);
        }
        done.store(true, Ordering::Release);
    });

    assert_eq!(slot.read(consistent_version).flatten(), Some(500));
    Ok(())
}
