// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::env::Environment;
use crate::object::{FrozenObject, Object};

/// A frozen object graph together with the environment that owns it.
///
/// Cells are created once per publication and are shared through `Arc`;
/// the embedded environment is cleared when the last reader lets go.
#[derive(Debug)]
pub struct StashedObject {
    env: Environment,
    object: FrozenObject,
}

impl StashedObject {
    /// Move `env` into a new cell and freeze `object` through it.
    pub fn stash(object: Object, mut env: Environment) -> Arc<StashedObject> {
        let mut owned = Environment::new();
        owned.move_from(&mut env);
        let object = owned.freeze(object, None);
        Arc::new(StashedObject { env: owned, object })
    }

    pub fn object(&self) -> &FrozenObject {
        &self.object
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }
}

impl Drop for StashedObject {
    fn drop(&mut self) {
        log::trace!("releasing stashed object ({} frozen)", self.env.len());
        self.env.clear();
    }
}

/// Publication point for a stashed object.
///
/// There is one writer (configuration reload) and any number of readers.
/// Readers always hold a strong reference to the cell before touching the
/// object; a swapped out cell is released only after the swap is visible.
#[derive(Debug, Default)]
pub struct StashSlot {
    current: ArcSwapOption<StashedObject>,
}

impl StashSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `cell`, returning the previously published one.
    pub fn publish(&self, cell: Arc<StashedObject>) -> Option<Arc<StashedObject>> {
        log::trace!("publishing stashed object");
        self.current.swap(Some(cell))
    }

    /// Stash `object` through `env` and publish it.
    pub fn stash(&self, object: Object, env: Environment) -> Option<Arc<StashedObject>> {
        self.publish(StashedObject::stash(object, env))
    }

    /// A strong reference to the current cell.
    pub fn load(&self) -> Option<Arc<StashedObject>> {
        self.current.load_full()
    }

    /// Run `f` on the published object while the cell is pinned.
    pub fn read<R>(&self, f: impl FnOnce(&FrozenObject) -> R) -> Option<R> {
        let guard = self.current.load();
        match &*guard {
            Some(cell) => Some(f(cell.object())),
            None => None,
        }
    }

    pub fn clear(&self) -> Option<Arc<StashedObject>> {
        self.current.swap(None)
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_none()
    }
}
