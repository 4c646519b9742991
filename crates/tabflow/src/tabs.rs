#![forbid(unsafe_code)]

//! Tab-level coordination.
//!
//! The [`TabCoordinator`] sits at the top of the ownership tree: it owns
//! the single [`DiContainer`] for the whole app, one [`FlowCoordinator`]
//! per declared tab (constructed eagerly), and the selected-tab slot the
//! tab-bar chrome binds to. Cross-flow intents (tab switch, modal
//! present/dismiss) are routed here by the originating flow.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use tracing::debug;

use tabflow_di::{Assembly, DiContainer};

use crate::flow::FlowCoordinator;
use crate::intent::NavigationIntent;
use crate::reactive::{Observable, Scheduler};
use crate::route::{Route, RouteKey};

/// Stable identifier of a declared tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u32);

/// A declared tab: identity, chrome, and where its flow starts.
#[derive(Clone)]
pub struct TabDescriptor {
    pub id: TabId,
    pub title: String,
    pub icon: String,
    pub initial_route: Rc<dyn Route>,
}

impl TabDescriptor {
    pub fn new(
        id: TabId,
        title: impl Into<String>,
        icon: impl Into<String>,
        initial_route: Rc<dyn Route>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            icon: icon.into(),
            initial_route,
        }
    }
}

impl PartialEq for TabDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.icon == other.icon
            && RouteKey::erase(Rc::clone(&self.initial_route))
                == RouteKey::erase(Rc::clone(&other.initial_route))
    }
}

impl Eq for TabDescriptor {}

impl Hash for TabDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        RouteKey::erase(Rc::clone(&self.initial_route)).hash(state);
    }
}

impl std::fmt::Debug for TabDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Root coordinator: one container, one flow per tab.
pub struct TabCoordinator {
    container: Rc<DiContainer>,
    selected_tab: Observable<TabId>,
    tabs: Vec<TabDescriptor>,
    flows: HashMap<TabId, Rc<FlowCoordinator>>,
    scheduler: Scheduler,
}

impl TabCoordinator {
    /// Construct the root coordinator. Assemblies populate the shared
    /// container first (in order, later wins), then every tab's flow is
    /// built eagerly from its declared initial route. Selection defaults
    /// to the first declared tab.
    pub fn new(tabs: Vec<TabDescriptor>, assemblies: &[Box<dyn Assembly>]) -> Rc<Self> {
        Rc::new_cyclic(|coordinator| {
            let container = Rc::new(DiContainer::new());
            container.apply(assemblies);

            let scheduler = Scheduler::new();
            let mut flows = HashMap::new();
            for tab in &tabs {
                flows.insert(
                    tab.id,
                    FlowCoordinator::new(
                        Rc::clone(&tab.initial_route),
                        coordinator.clone(),
                        Rc::clone(&container),
                        scheduler.clone(),
                    ),
                );
            }

            let selected = tabs.first().map_or(TabId(0), |tab| tab.id);
            Self {
                container,
                selected_tab: Observable::new(selected),
                tabs,
                flows,
                scheduler,
            }
        })
    }

    /// Route a delegated intent from `flow`. Stack-local intents never
    /// reach here; they are handled by the flow itself.
    pub(crate) fn handle_intent(&self, intent: NavigationIntent, flow: &FlowCoordinator) {
        match intent {
            NavigationIntent::SwitchTab(id) => {
                debug!(?id, "switch tab");
                // Unconditional by contract: unknown ids are the
                // caller's wiring bug, surfaced when the id is indexed.
                self.selected_tab.set(id);
            }
            NavigationIntent::PresentSheet(route) => {
                flow.set_sheet(Some(RouteKey::erase(route)));
            }
            NavigationIntent::PresentFullscreen(route) => {
                flow.set_fullscreen(Some(RouteKey::erase(route)));
            }
            NavigationIntent::DismissModal => {
                flow.clear_modals();
            }
            NavigationIntent::Push(_) | NavigationIntent::Pop | NavigationIntent::PopToRoot => {}
        }
    }

    /// The flow coordinator for `tab`.
    ///
    /// # Panics
    ///
    /// Panics for an undeclared tab id — a wiring bug, not a runtime
    /// condition.
    #[must_use]
    pub fn flow(&self, tab: TabId) -> &Rc<FlowCoordinator> {
        self.flows
            .get(&tab)
            .unwrap_or_else(|| panic!("no flow coordinator for {tab:?}"))
    }

    /// The flow of the currently selected tab.
    #[must_use]
    pub fn selected_flow(&self) -> &Rc<FlowCoordinator> {
        self.flow(self.selected_tab.get())
    }

    /// Selected-tab slot the tab-bar chrome binds to.
    #[must_use]
    pub fn selected_tab(&self) -> &Observable<TabId> {
        &self.selected_tab
    }

    #[must_use]
    pub fn container(&self) -> &Rc<DiContainer> {
        &self.container
    }

    #[must_use]
    pub fn tabs(&self) -> &[TabDescriptor] {
        &self.tabs
    }

    /// The shared cooperative-turn queue. The host drains it once per UI
    /// turn; tests drain it explicitly.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
