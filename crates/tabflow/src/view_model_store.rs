#![forbid(unsafe_code)]

//! Per-route view-model cache with weak-reference lifetime semantics.
//!
//! # Design
//!
//! The store maps an erased route identity to a `Weak` handle on a
//! view-model. It never holds a strong reference on the cache's behalf —
//! only the active rendering tree keeps an instance alive. An entry dies
//! three ways: its route is popped, pop-to-root clears the flow, or the
//! rendering tree drops the instance and a later compaction sweep
//! observes the dead weak.
//!
//! # Invariants
//!
//! 1. At most one live instance per key is observable at a time.
//! 2. Every structural mutation (insert/remove) not itself caused by
//!    compaction is followed by a dead-entry sweep.
//! 3. Compaction never nests (guarded), and is pure bookkeeping — it is
//!    not surfaced as a mutation of its own.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::intent::FlowViewModel;
use crate::route::RouteKey;

/// Weak per-route view-model cache.
#[derive(Default)]
pub struct ViewModelStore {
    entries: RefCell<HashMap<RouteKey, Weak<dyn Any>>>,
    compacting: Cell<bool>,
}

impl ViewModelStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live view-model for `key`, or create, cache (weakly),
    /// and return a new one.
    ///
    /// A live entry of a different concrete type is treated as absent and
    /// replaced by what `create` produces.
    pub fn resolve<VM: FlowViewModel>(
        &self,
        key: &RouteKey,
        create: impl FnOnce() -> Rc<VM>,
    ) -> Rc<VM> {
        let live = self
            .entries
            .borrow()
            .get(key)
            .and_then(Weak::upgrade)
            .and_then(|any| any.downcast::<VM>().ok());
        if let Some(existing) = live {
            return existing;
        }

        debug!(?key, "create view-model");
        let created = create();
        let erased: Rc<dyn Any> = Rc::clone(&created) as Rc<dyn Any>;
        self.entries
            .borrow_mut()
            .insert(key.clone(), Rc::downgrade(&erased));
        self.compact();
        created
    }

    /// Drop the entry for `key`, live or not. No-op when absent.
    pub fn remove(&self, key: &RouteKey) {
        let removed = self.entries.borrow_mut().remove(key);
        if removed.is_some() {
            debug!(?key, "evict view-model");
        }
        self.compact();
    }

    /// Drop every entry.
    pub fn remove_all(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Whether an entry (live or dead) exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Number of entries, dead ones included until the next sweep.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Sweep entries whose weak target is gone. Guarded against
    /// reentrancy so a sweep never triggers another sweep.
    fn compact(&self) {
        if self.compacting.get() {
            return;
        }
        self.compacting.set(true);
        self.entries
            .borrow_mut()
            .retain(|_, entry| entry.strong_count() > 0);
        self.compacting.set(false);
    }
}
