// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::object::{Frozen, FrozenObject, Object};

/// Owner of frozen objects.
///
/// Every object frozen through an environment is recorded in its arena and
/// lives at least as long as the environment. Keyed freezes are
/// deduplicated: freezing under a key that is already known hands out the
/// recorded object again.
#[derive(Debug, Default)]
pub struct Environment {
    dedup: HashMap<String, FrozenObject>,
    frozen: Vec<FrozenObject>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze `object` and everything reachable from it.
    pub fn freeze(&mut self, object: Object, key: Option<&str>) -> FrozenObject {
        if let Some(key) = key {
            if let Some(existing) = self.dedup.get(key) {
                return existing.clone();
            }
        }

        let mut freezer = Freezer {
            env: self,
            done: HashMap::new(),
            in_progress: Vec::new(),
        };
        let frozen = freezer.freeze(object);

        if let Some(key) = key {
            self.dedup.insert(key.to_string(), frozen.clone());
        }
        frozen
    }

    /// Freeze the object held by `slot` and replace it with its frozen form.
    pub fn freeze_in_place(&mut self, slot: &mut Object, key: Option<&str>) {
        let object = core::mem::replace(slot, Object::null());
        *slot = Object::Frozen(self.freeze(object, key));
    }

    /// Take over everything `source` owns, leaving it empty.
    pub fn move_from(&mut self, source: &mut Environment) {
        self.dedup.extend(source.dedup.drain());
        self.frozen.append(&mut source.frozen);
    }

    /// Release the dedup table, then the arena.
    pub fn clear(&mut self) {
        self.dedup.clear();
        // Containers are recorded after their items, so walking the arena
        // newest first reaches every node after its parents let go of it.
        let mut outliving = 0usize;
        while let Some(frozen) = self.frozen.pop() {
            if !frozen.release() {
                outliving += 1;
            }
        }
        if outliving > 0 {
            log::debug!("{outliving} frozen objects outlive their environment");
        }
    }

    pub fn len(&self) -> usize {
        self.frozen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frozen.is_empty() && self.dedup.is_empty()
    }

    pub fn dedup_len(&self) -> usize {
        self.dedup.len()
    }

    fn record(&mut self, value: Frozen) -> FrozenObject {
        let frozen = FrozenObject::new(value);
        self.frozen.push(frozen.clone());
        frozen
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        self.clear();
    }
}

/// One freeze walk. Shared live containers freeze to a shared frozen node;
/// a container reached again while it is still being frozen (a cycle) is
/// cut and replaced by null.
struct Freezer<'a> {
    env: &'a mut Environment,
    done: HashMap<usize, FrozenObject>,
    in_progress: Vec<usize>,
}

impl Freezer<'_> {
    fn freeze(&mut self, object: Object) -> FrozenObject {
        match object {
            Object::Frozen(frozen) => frozen,
            Object::Scalar(scalar) => self.env.record(Frozen::Scalar(scalar)),
            Object::Ref(referent) => {
                let inner = referent.borrow().clone();
                self.freeze(inner)
            }
            Object::List(list) => {
                let id = list.as_ptr() as *const () as usize;
                if let Some(frozen) = self.enter(id) {
                    return frozen;
                }
                let items: Vec<Object> = list.borrow().clone();
                let items = items.into_iter().map(|item| self.freeze(item)).collect();
                self.leave(id, Frozen::List(items))
            }
            Object::Dict(dict) => {
                let id = dict.as_ptr() as *const () as usize;
                if let Some(frozen) = self.enter(id) {
                    return frozen;
                }
                let entries: Vec<_> = dict
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                let entries: IndexMap<_, _> = entries
                    .into_iter()
                    .map(|(k, v)| (k, self.freeze(v)))
                    .collect();
                self.leave(id, Frozen::Dict(entries))
            }
        }
    }

    fn enter(&mut self, id: usize) -> Option<FrozenObject> {
        if let Some(frozen) = self.done.get(&id) {
            return Some(frozen.clone());
        }
        if self.in_progress.contains(&id) {
            log::warn!("cycle detected while freezing, replacing back reference with null");
            return Some(self.env.record(Frozen::Scalar(crate::object::Scalar::Null)));
        }
        self.in_progress.push(id);
        None
    }

    fn leave(&mut self, id: usize, value: Frozen) -> FrozenObject {
        self.in_progress.retain(|&p| p != id);
        let frozen = self.env.record(value);
        self.done.insert(id, frozen.clone());
        frozen
    }
}
