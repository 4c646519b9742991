#![forbid(unsafe_code)]

//! Navigation intents and the view-model contract.
//!
//! A view-model owns exactly one [`IntentSlot`]. Emitting fills the slot;
//! the owning flow coordinator observes the slot, takes the intent
//! (clearing the slot before acting), and re-subscribes for the next one.
//! At most one intent is pending at a time — a second emission before the
//! coordinator's turn replaces the first.

use std::rc::Rc;

use crate::reactive::{Observable, Subscription};
use crate::route::{DynEq, Route, RouteKey};
use crate::tabs::TabId;

/// What the currently visible view-model wants to happen next.
#[derive(Clone)]
pub enum NavigationIntent {
    /// Push a route onto the owning flow's stack.
    Push(Rc<dyn Route>),
    /// Pop the top route. No-op on an empty stack.
    Pop,
    /// Clear the owning flow's stack back to its initial route.
    PopToRoot,
    /// Select another tab. The id is not validated here.
    SwitchTab(TabId),
    /// Present a route as a sheet over the owning flow.
    PresentSheet(Rc<dyn Route>),
    /// Present a route fullscreen over the owning flow.
    PresentFullscreen(Rc<dyn Route>),
    /// Clear both modal slots. No-op when nothing is presented.
    DismissModal,
}

fn route_eq(a: &Rc<dyn Route>, b: &Rc<dyn Route>) -> bool {
    let a: &dyn DynEq = a.as_ref();
    let b: &dyn DynEq = b.as_ref();
    a.dyn_eq(b)
}

impl PartialEq for NavigationIntent {
    fn eq(&self, other: &Self) -> bool {
        use NavigationIntent::{
            DismissModal, Pop, PopToRoot, PresentFullscreen, PresentSheet, Push, SwitchTab,
        };
        match (self, other) {
            (Pop, Pop) | (PopToRoot, PopToRoot) | (DismissModal, DismissModal) => true,
            (Push(l), Push(r))
            | (PresentSheet(l), PresentSheet(r))
            | (PresentFullscreen(l), PresentFullscreen(r)) => route_eq(l, r),
            (SwitchTab(l), SwitchTab(r)) => l == r,
            _ => false,
        }
    }
}

impl std::fmt::Debug for NavigationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(route) => {
                let key = RouteKey::erase(Rc::clone(route));
                f.debug_tuple("Push").field(&key).finish()
            }
            Self::Pop => f.write_str("Pop"),
            Self::PopToRoot => f.write_str("PopToRoot"),
            Self::SwitchTab(id) => f.debug_tuple("SwitchTab").field(id).finish(),
            Self::PresentSheet(_) => f.write_str("PresentSheet(..)"),
            Self::PresentFullscreen(_) => f.write_str("PresentFullscreen(..)"),
            Self::DismissModal => f.write_str("DismissModal"),
        }
    }
}

/// The single pending-intent slot every view-model exposes.
///
/// Built on [`Observable`] so the coordinator can watch it; `take`
/// delivers at most once per emission.
#[derive(Debug)]
pub struct IntentSlot {
    inner: Observable<Option<NavigationIntent>>,
}

impl Default for IntentSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentSlot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Observable::new(None),
        }
    }

    /// Fill the slot. Replaces any intent the coordinator has not yet
    /// taken.
    pub fn emit(&self, intent: NavigationIntent) {
        self.inner.set(Some(intent));
    }

    /// Take and clear the pending intent, if any.
    pub fn take(&self) -> Option<NavigationIntent> {
        let pending = self.inner.get();
        if pending.is_some() {
            self.inner.set(None);
        }
        pending
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.with(Option::is_some)
    }

    /// Watch for slot changes (both fills and clears).
    #[must_use]
    pub fn changed(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.subscribe(move |_| callback())
    }
}

/// Capability contract for view-models participating in navigation.
pub trait FlowViewModel: 'static {
    fn intent(&self) -> &IntentSlot;
}
