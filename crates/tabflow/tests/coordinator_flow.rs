#![forbid(unsafe_code)]

//! End-to-end coordinator scenarios: intents emitted by view-models,
//! handled over cooperative turns, observed through the host-facing
//! surface (observable path, modal slots, selected tab).
//!
//! Weak caches hold nothing alive on their own, so every resolved
//! view-model is kept in a strong binding for the duration of a test.

use std::rc::Rc;

use tabflow::{
    Assembly, DiContainer, FlowCoordinator, FlowViewModel, IntentSlot, NavigationIntent, Route,
    RouteKey, RouteScreen, Scope, TabCoordinator, TabDescriptor, TabId,
};

#[derive(PartialEq, Hash)]
struct AppRoute {
    name: &'static str,
}

impl AppRoute {
    fn boxed(name: &'static str) -> Rc<dyn Route> {
        Rc::new(Self { name })
    }

    fn key(name: &'static str) -> RouteKey {
        RouteKey::erase(Self::boxed(name))
    }
}

impl Route for AppRoute {
    fn build(&self, _flow: &FlowCoordinator, key: &RouteKey) -> RouteScreen {
        let name = self.name;
        RouteScreen::new(key.clone(), move || name)
    }
}

struct Analytics {
    session: u32,
}

struct ScreenVm {
    intent: IntentSlot,
    session: u32,
}

impl ScreenVm {
    fn resolve(flow: &Rc<FlowCoordinator>, name: &'static str) -> Rc<Self> {
        let key = AppRoute::key(name);
        flow.factory().make(&key, flow.view_models(), |di| {
            Rc::new(Self {
                intent: IntentSlot::new(),
                session: di.resolve::<Analytics>().session,
            })
        })
    }
}

impl FlowViewModel for ScreenVm {
    fn intent(&self) -> &IntentSlot {
        &self.intent
    }
}

struct AppWiring;

impl Assembly for AppWiring {
    fn assemble(&self, container: &DiContainer) {
        container.register(Scope::Singleton, |_| Rc::new(Analytics { session: 7 }));
    }
}

fn app() -> Rc<TabCoordinator> {
    TabCoordinator::new(
        vec![
            TabDescriptor::new(TabId(0), "Library", "books", AppRoute::boxed("library")),
            TabDescriptor::new(TabId(1), "Profile", "person", AppRoute::boxed("profile")),
        ],
        &[Box::new(AppWiring)],
    )
}

#[test]
fn push_pop_scenario_restores_root() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));

    // The root screen's view-model becomes visible and pushes A.
    let root_vm = ScreenVm::resolve(&flow, "library");
    flow.observe(root_vm.clone());
    root_vm
        .intent()
        .emit(NavigationIntent::Push(AppRoute::boxed("album")));
    coordinator.scheduler().run_until_idle();

    assert_eq!(flow.navigation().path().get(), vec![AppRoute::key("album")]);
    let album_vm = ScreenVm::resolve(&flow, "album");
    assert!(flow.view_models().contains(&AppRoute::key("album")));

    // The album screen pops itself.
    flow.observe(album_vm.clone());
    album_vm.intent().emit(NavigationIntent::Pop);
    coordinator.scheduler().run_until_idle();

    assert!(flow.navigation().path().get().is_empty());
    assert!(!flow.view_models().contains(&AppRoute::key("album")));
    // The root's own view-model is untouched by the pop.
    assert!(flow.view_models().contains(&AppRoute::key("library")));
}

#[test]
fn view_models_draw_from_the_shared_container() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let vm = ScreenVm::resolve(&flow, "library");
    assert_eq!(vm.session, 7);

    // Same singleton reaches the other tab's flow.
    let other = Rc::clone(coordinator.flow(TabId(1)));
    let other_vm = ScreenVm::resolve(&other, "profile");
    assert_eq!(other_vm.session, 7);
}

#[test]
fn pop_to_root_from_depth_three() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let root_vm = ScreenVm::resolve(&flow, "library");
    flow.observe(root_vm.clone());

    let mut held = Vec::new();
    for name in ["album", "track", "lyrics"] {
        root_vm
            .intent()
            .emit(NavigationIntent::Push(AppRoute::boxed(name)));
        coordinator.scheduler().run_until_idle();
        held.push(ScreenVm::resolve(&flow, name));
    }
    assert_eq!(flow.navigation().depth(), 3);

    root_vm.intent().emit(NavigationIntent::PopToRoot);
    coordinator.scheduler().run_until_idle();

    assert_eq!(flow.navigation().depth(), 0);
    for name in ["album", "track", "lyrics"] {
        assert!(!flow.view_models().contains(&AppRoute::key(name)));
    }
    drop(held);
}

#[test]
fn interactive_back_gesture_reconciles_cache() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let root_vm = ScreenVm::resolve(&flow, "library");
    flow.observe(root_vm.clone());

    let names = ["a", "b", "c", "d", "e"];
    let mut held = Vec::new();
    for name in names {
        root_vm
            .intent()
            .emit(NavigationIntent::Push(AppRoute::boxed(name)));
        coordinator.scheduler().run_until_idle();
        held.push(ScreenVm::resolve(&flow, name));
    }

    // Host-side gesture pops three screens at once (depth 5 -> 2).
    flow.navigation().path().update(|path| path.truncate(2));
    coordinator.scheduler().run_until_idle();

    assert_eq!(flow.navigation().depth(), 2);
    assert_eq!(flow.tracked_routes().len(), 2);
    for name in ["a", "b"] {
        assert!(flow.view_models().contains(&AppRoute::key(name)));
    }
    for name in ["c", "d", "e"] {
        assert!(!flow.view_models().contains(&AppRoute::key(name)));
    }
    drop(held);
}

#[test]
fn sheet_then_dismiss_clears_both_modal_slots() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let vm = ScreenVm::resolve(&flow, "library");
    flow.observe(vm.clone());

    vm.intent()
        .emit(NavigationIntent::PresentSheet(AppRoute::boxed("paywall")));
    coordinator.scheduler().run_until_idle();
    assert_eq!(flow.presented_sheet().get(), Some(AppRoute::key("paywall")));

    vm.intent()
        .emit(NavigationIntent::PresentFullscreen(AppRoute::boxed("player")));
    coordinator.scheduler().run_until_idle();
    assert_eq!(
        flow.presented_fullscreen().get(),
        Some(AppRoute::key("player"))
    );

    vm.intent().emit(NavigationIntent::DismissModal);
    coordinator.scheduler().run_until_idle();
    assert!(flow.presented_sheet().get().is_none());
    assert!(flow.presented_fullscreen().get().is_none());
}

#[test]
fn dismiss_without_modal_is_silent() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let vm = ScreenVm::resolve(&flow, "library");
    flow.observe(vm.clone());

    vm.intent().emit(NavigationIntent::DismissModal);
    coordinator.scheduler().run_until_idle();
    assert!(flow.presented_sheet().get().is_none());
    assert!(flow.presented_fullscreen().get().is_none());
}

#[test]
fn switch_tab_updates_selection_and_flows_stay_independent() {
    let coordinator = app();
    let library = Rc::clone(coordinator.flow(TabId(0)));
    let vm = ScreenVm::resolve(&library, "library");
    library.observe(vm.clone());

    vm.intent()
        .emit(NavigationIntent::Push(AppRoute::boxed("album")));
    coordinator.scheduler().run_until_idle();
    let _album_vm = ScreenVm::resolve(&library, "album");

    vm.intent().emit(NavigationIntent::SwitchTab(TabId(1)));
    coordinator.scheduler().run_until_idle();

    assert_eq!(coordinator.selected_tab().get(), TabId(1));
    // Switching tabs does not disturb either stack.
    assert_eq!(coordinator.flow(TabId(0)).navigation().depth(), 1);
    assert_eq!(coordinator.flow(TabId(1)).navigation().depth(), 0);
    assert_eq!(coordinator.selected_flow().navigation().depth(), 0);
}

#[test]
fn unreferenced_view_model_is_collected_not_cached() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let key = AppRoute::key("library");
    let created = Rc::new(std::cell::Cell::new(0u32));

    let build = |counter: &Rc<std::cell::Cell<u32>>| {
        let counter = Rc::clone(counter);
        move |_: &DiContainer| {
            counter.set(counter.get() + 1);
            Rc::new(ScreenVm {
                intent: IntentSlot::new(),
                session: 0,
            })
        }
    };

    // Resolve and immediately drop: the weak cache must not keep it.
    drop(flow.factory().make(&key, flow.view_models(), build(&created)));
    let held = flow.factory().make(&key, flow.view_models(), build(&created));
    let cached = flow.factory().make(&key, flow.view_models(), build(&created));

    // The dropped instance forced a second creation; the held one did not.
    assert_eq!(created.get(), 2);
    assert!(Rc::ptr_eq(&held, &cached));
}

#[test]
fn start_builds_initial_screen_with_stable_identity() {
    let coordinator = app();
    let flow = Rc::clone(coordinator.flow(TabId(0)));
    let screen = flow.start();
    assert_eq!(*screen.identity(), AppRoute::key("library"));
    let payload = screen.materialize();
    assert_eq!(*payload.downcast::<&'static str>().unwrap(), "library");
}
