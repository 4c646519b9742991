#![forbid(unsafe_code)]

//! Presentation back-stack.
//!
//! The [`NavigationStore`] owns the route stack the rendering layer binds
//! to — the single source of truth for what is on screen. The host reads
//! (and renders from) the observable path, and reports interactive back
//! gestures by shrinking it directly; the owning flow coordinator watches
//! the path and reconciles its own tracking stack afterwards.

use tracing::trace;

use crate::reactive::Observable;
use crate::route::RouteKey;

/// The UI-visible navigation path for one flow.
#[derive(Debug)]
pub struct NavigationStore {
    path: Observable<Vec<RouteKey>>,
}

impl NavigationStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: Observable::new(Vec::new()),
        }
    }

    /// The observable path. The rendering layer binds this; shrinking it
    /// is how the host reports an interactive back gesture.
    #[must_use]
    pub fn path(&self) -> &Observable<Vec<RouteKey>> {
        &self.path
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.with(Vec::len)
    }

    pub fn push(&self, key: RouteKey) {
        trace!(?key, "push route");
        self.path.update(|path| path.push(key));
    }

    /// Remove the top route. No-op on an empty path.
    pub fn pop(&self) {
        self.path.update(|path| {
            path.pop();
        });
    }

    /// Clear the whole path. No-op when already empty.
    pub fn pop_to_root(&self) {
        self.path.update(Vec::clear);
    }
}

impl Default for NavigationStore {
    fn default() -> Self {
        Self::new()
    }
}
