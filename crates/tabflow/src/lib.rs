#![forbid(unsafe_code)]

//! Navigation coordination for tabbed, stack-based UIs.
//!
//! # Role in tabflow
//! This crate decouples "what screen comes next" from "how a screen is
//! rendered" and from "how its dependencies are constructed". It carries
//! no rendering code: the host binds the observable navigation state and
//! paints however it likes.
//!
//! # Primary responsibilities
//! - **Route erasure**: heterogeneous route types behind one hashable
//!   [`RouteKey`], shared by stack, cache, and screen identity.
//! - **View-model cache**: weak per-route instances, compacted lazily;
//!   the cache is never the reason a view-model stays alive.
//! - **Flow coordination**: per-tab stack mutation driven by observed
//!   [`NavigationIntent`]s, with reconciliation against host-driven
//!   back-stack shrinkage.
//! - **Tab coordination**: one [`DiContainer`] and one flow per tab,
//!   cross-flow intent routing.
//!
//! # Concurrency
//! Single logical UI thread, cooperative turns: reactions to observed
//! changes are queued on a [`Scheduler`] and handled strictly
//! sequentially. Nothing in this crate is `Send`.
//!
//! # Host contract
//! The rendering layer builds screens via [`RouteKey::build`], binds
//! [`NavigationStore::path`] (shrinking it to report interactive back
//! gestures), hosts modal presentation from the flow's modal slots, and
//! calls [`FlowCoordinator::observe`] when a screen's view-model becomes
//! visible.

pub mod factory;
pub mod flow;
pub mod intent;
pub mod navigation_store;
pub mod reactive;
pub mod route;
pub mod tabs;
pub mod view_model_store;

pub use factory::ViewModelFactory;
pub use flow::FlowCoordinator;
pub use intent::{FlowViewModel, IntentSlot, NavigationIntent};
pub use navigation_store::NavigationStore;
pub use reactive::{Observable, Scheduler, Subscription};
pub use route::{DynEq, DynHash, Route, RouteKey, RouteScreen};
pub use tabs::{TabCoordinator, TabDescriptor, TabId};
pub use view_model_store::ViewModelStore;

// Re-export the DI surface so hosts depend on one crate.
pub use tabflow_di::{Assembly, DiContainer, Scope};
