#![forbid(unsafe_code)]

//! Per-tab flow coordinator.
//!
//! # Design
//!
//! A flow owns one navigation stack, twice: the [`NavigationStore`]'s
//! observable path (what the rendering layer binds to) and an
//! authoritative tracking stack (what eviction is computed from). At
//! every settled point the two agree on length and identities; they
//! diverge only transiently inside intent handling.
//!
//! The coordinator watches the currently visible view-model's intent
//! slot with a one-shot subscription. A change schedules a handling turn
//! on the [`Scheduler`]; the turn drops the subscription, takes and
//! clears the intent, acts, then re-subscribes — so no intent is handled
//! twice and no two cycles overlap. An intent emitted while nobody was
//! watching is picked up right after re-subscription.
//!
//! Back-pressure: the host may shrink the presentation path directly
//! (interactive back gesture). The coordinator watches the path and
//! schedules a reconciliation turn that evicts the view-models of exactly
//! the trailing routes the authoritative stack has in excess. Growth from
//! the rendering side is not a recognized signal and is ignored here —
//! the stack only grows through [`NavigationIntent::Push`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use tabflow_di::DiContainer;

use crate::factory::ViewModelFactory;
use crate::intent::{FlowViewModel, NavigationIntent};
use crate::navigation_store::NavigationStore;
use crate::reactive::{Observable, Scheduler, Subscription};
use crate::route::{Route, RouteKey, RouteScreen};
use crate::tabs::TabCoordinator;
use crate::view_model_store::ViewModelStore;

/// Coordinator for one tab's navigation stack and modal state.
pub struct FlowCoordinator {
    view_models: ViewModelStore,
    navigation: NavigationStore,
    factory: ViewModelFactory,
    presented_sheet: Observable<Option<RouteKey>>,
    presented_fullscreen: Observable<Option<RouteKey>>,
    /// Authoritative pushed-route stack; excludes the initial route.
    route_stack: RefCell<Vec<RouteKey>>,
    initial_route: Rc<dyn Route>,
    parent: Weak<TabCoordinator>,
    scheduler: Scheduler,
    /// Self-reference handed to subscription callbacks and queued turns,
    /// so neither keeps the coordinator alive.
    weak_self: Weak<FlowCoordinator>,
    intent_watch: RefCell<Option<Subscription>>,
    path_watch: RefCell<Option<Subscription>>,
}

impl FlowCoordinator {
    pub fn new(
        initial_route: Rc<dyn Route>,
        parent: Weak<TabCoordinator>,
        container: Rc<DiContainer>,
        scheduler: Scheduler,
    ) -> Rc<Self> {
        let flow = Rc::new_cyclic(|weak_self| Self {
            view_models: ViewModelStore::new(),
            navigation: NavigationStore::new(),
            factory: ViewModelFactory::new(container),
            presented_sheet: Observable::new(None),
            presented_fullscreen: Observable::new(None),
            route_stack: RefCell::new(Vec::new()),
            initial_route,
            parent,
            scheduler,
            weak_self: weak_self.clone(),
            intent_watch: RefCell::new(None),
            path_watch: RefCell::new(None),
        });
        flow.install_path_watch();
        flow
    }

    /// Build the initial route's screen under its erased key.
    #[must_use]
    pub fn start(&self) -> RouteScreen {
        let key = RouteKey::erase(Rc::clone(&self.initial_route));
        self.initial_route.build(self, &key)
    }

    /// A non-owning handle for hosts that retain a reference to this
    /// flow inside screens or callbacks.
    #[must_use]
    pub fn downgrade(&self) -> Weak<FlowCoordinator> {
        self.weak_self.clone()
    }

    /// Watch `vm`'s intent slot. Called by the host whenever a screen's
    /// view-model becomes the visible one; replaces any previous watch.
    pub fn observe(&self, vm: Rc<dyn FlowViewModel>) {
        let flow = self.weak_self.clone();
        let watched = Rc::downgrade(&vm);
        let watch = vm.intent().changed(move || {
            if let (Some(flow), Some(vm)) = (flow.upgrade(), watched.upgrade()) {
                flow.schedule_cycle(&vm);
            }
        });
        *self.intent_watch.borrow_mut() = Some(watch);

        // An intent emitted while nobody was watching (or during the
        // handling cycle that just ended) is still pending in the slot;
        // pick it up on the next turn instead of dropping it.
        if vm.intent().is_pending() {
            self.schedule_cycle(&vm);
        }
    }

    fn schedule_cycle(&self, vm: &Rc<dyn FlowViewModel>) {
        let flow = self.weak_self.clone();
        let vm = Rc::downgrade(vm);
        self.scheduler.post(move || {
            if let (Some(flow), Some(vm)) = (flow.upgrade(), vm.upgrade()) {
                flow.handle_cycle(&vm);
            }
        });
    }

    /// One observation cycle: stop watching, take-and-clear, act,
    /// re-subscribe.
    fn handle_cycle(&self, vm: &Rc<dyn FlowViewModel>) {
        self.intent_watch.borrow_mut().take();
        if let Some(intent) = vm.intent().take() {
            self.handle(intent);
        }
        self.observe(Rc::clone(vm));
    }

    fn handle(&self, intent: NavigationIntent) {
        debug!(?intent, "handle intent");
        match intent {
            NavigationIntent::Push(route) => {
                let key = RouteKey::erase(route);
                self.route_stack.borrow_mut().push(key.clone());
                self.navigation.push(key);
            }
            NavigationIntent::Pop => {
                let popped = self.route_stack.borrow_mut().pop();
                if let Some(key) = popped {
                    self.view_models.remove(&key);
                }
                self.navigation.pop();
            }
            NavigationIntent::PopToRoot => {
                let drained: Vec<RouteKey> = self.route_stack.borrow_mut().drain(..).collect();
                for key in &drained {
                    self.view_models.remove(key);
                }
                self.navigation.pop_to_root();
            }
            delegated => {
                if let Some(parent) = self.parent.upgrade() {
                    parent.handle_intent(delegated, self);
                }
            }
        }
    }

    fn install_path_watch(&self) {
        let flow = self.weak_self.clone();
        let scheduler = self.scheduler.clone();
        let watch = self.navigation.path().subscribe(move |_| {
            let task = flow.clone();
            scheduler.post(move || {
                if let Some(flow) = task.upgrade() {
                    flow.reconcile();
                }
            });
        });
        *self.path_watch.borrow_mut() = Some(watch);
    }

    /// Shrink the authoritative stack to the presented depth, evicting
    /// the view-models of the trailing excess. Idempotent: after a
    /// coordinator-driven mutation the stacks already agree and this is
    /// a no-op. Presentation-side growth is ignored.
    fn reconcile(&self) {
        let presented = self.navigation.depth();
        let mut evicted = 0usize;
        loop {
            let excess = {
                let mut stack = self.route_stack.borrow_mut();
                if stack.len() > presented {
                    stack.pop()
                } else {
                    None
                }
            };
            match excess {
                Some(key) => {
                    self.view_models.remove(&key);
                    evicted += 1;
                }
                None => break,
            }
        }
        if evicted > 0 {
            debug!(evicted, presented, "reconciled external shrink");
        }
    }

    // --- modal slots, mutated by the owning TabCoordinator -------------

    pub(crate) fn set_sheet(&self, key: Option<RouteKey>) {
        self.presented_sheet.set(key);
    }

    pub(crate) fn set_fullscreen(&self, key: Option<RouteKey>) {
        self.presented_fullscreen.set(key);
    }

    pub(crate) fn clear_modals(&self) {
        self.presented_sheet.set(None);
        self.presented_fullscreen.set(None);
    }

    // --- accessors ------------------------------------------------------

    #[must_use]
    pub fn view_models(&self) -> &ViewModelStore {
        &self.view_models
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationStore {
        &self.navigation
    }

    #[must_use]
    pub fn factory(&self) -> &ViewModelFactory {
        &self.factory
    }

    /// Sheet slot the host binds its sheet presentation to.
    #[must_use]
    pub fn presented_sheet(&self) -> &Observable<Option<RouteKey>> {
        &self.presented_sheet
    }

    /// Fullscreen slot the host binds its fullscreen presentation to.
    #[must_use]
    pub fn presented_fullscreen(&self) -> &Observable<Option<RouteKey>> {
        &self.presented_fullscreen
    }

    /// Snapshot of the authoritative pushed-route stack.
    #[must_use]
    pub fn tracked_routes(&self) -> Vec<RouteKey> {
        self.route_stack.borrow().clone()
    }
}
