#![forbid(unsafe_code)]

//! Observable value wrapper with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] holds a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Mutations that change the value (by `PartialEq`)
//! notify all registered subscribers in registration order. Cloning an
//! `Observable` yields another handle to the same inner state.
//!
//! Subscribers are keyed by a monotonically increasing id and removed
//! eagerly when their [`Subscription`] guard drops: after the drop
//! returns, the callback is out of the list and will not run on the next
//! notification. The callback list is snapshotted per notification, so a
//! notification already in flight finishes with the set of subscribers it
//! started with.
//!
//! # Invariants
//!
//! 1. Setting a value equal to the current one is a no-op: no
//!    notification.
//! 2. Subscribers run in registration order.
//! 3. Dropping a [`Subscription`] removes its callback immediately.
//!
//! # Failure Modes
//!
//! Calling `set`/`update` from inside a subscriber callback panics
//! (`RefCell` borrow rules). Reactions belong on the [`Scheduler`], not
//! inline — see `crate::reactive::scheduler`.

use std::cell::RefCell;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A shared value with change notification.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

// Manual Clone: shares the same inner state.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. Notifies subscribers iff the new value differs
    /// from the current one.
    pub fn set(&self, value: T) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            true
        };
        if changed {
            self.notify();
        }
    }

    /// Mutate the value in place. Notifies subscribers iff the closure
    /// changed the value (compared against a pre-mutation snapshot).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value.clone();
            f(&mut inner.value);
            inner.value != before
        };
        if changed {
            self.notify();
        }
    }

    /// Register a change callback. The returned guard unsubscribes the
    /// callback when dropped.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::new(callback)));
            id
        };
        let weak = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            }),
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        // Snapshot callbacks so the borrow is released before any runs;
        // a callback may subscribe or drop guards, never mutate the value.
        let callbacks: Vec<Callback<T>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        let value = self.inner.borrow().value.clone();
        for callback in &callbacks {
            callback(&value);
        }
    }
}

/// RAII guard for a registered callback. Dropping it removes the callback
/// from the observable's subscriber list immediately.
pub struct Subscription {
    cancel: Box<dyn Fn()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
