#![forbid(unsafe_code)]

//! View-model factory: binds the DI container to the store's creation
//! path. Thin by design — the store decides whether to create, the
//! builder decides how, the container supplies the dependencies.

use std::rc::Rc;

use tabflow_di::DiContainer;

use crate::intent::FlowViewModel;
use crate::route::RouteKey;
use crate::view_model_store::ViewModelStore;

pub struct ViewModelFactory {
    container: Rc<DiContainer>,
}

impl ViewModelFactory {
    #[must_use]
    pub fn new(container: Rc<DiContainer>) -> Self {
        Self { container }
    }

    /// Resolve the view-model for `key` through `store`, building it with
    /// `build` (and the shared container) on a cache miss.
    pub fn make<VM: FlowViewModel>(
        &self,
        key: &RouteKey,
        store: &ViewModelStore,
        build: impl FnOnce(&DiContainer) -> Rc<VM>,
    ) -> Rc<VM> {
        store.resolve(key, || build(&self.container))
    }

    #[must_use]
    pub fn container(&self) -> &Rc<DiContainer> {
        &self.container
    }
}
