#![forbid(unsafe_code)]

//! Type-keyed factory container with scoped instance caching.
//!
//! # Design
//!
//! Registrations are keyed by [`TypeId`] and hold a factory closure plus a
//! [`Scope`]. Resolution is lazy: nothing is constructed until the first
//! `resolve` for a type, and what happens to the constructed instance is
//! entirely determined by the registration's scope.
//!
//! # Invariants
//!
//! 1. Last registration for a type wins; earlier factories for the same
//!    type are unreachable afterwards.
//! 2. Singleton and weak caches are scoped to one container instance.
//! 3. A factory may resolve its own dependencies recursively; the
//!    container never holds a registry borrow across a factory call.
//!
//! # Failure Modes
//!
//! Resolving a type that was never registered is a wiring bug, not a
//! runtime condition, and panics. There is no fallible variant.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::trace;

/// Lifetime policy for a registered factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A fresh instance on every resolve.
    Transient,
    /// One instance, cached strongly for the container's lifetime.
    Singleton,
    /// Cached weakly; the factory runs again once the previous instance
    /// has been dropped by every external holder.
    WeakCached,
}

type Factory = Rc<dyn Fn(&DiContainer) -> Rc<dyn Any>>;

#[derive(Clone)]
struct Registration {
    scope: Scope,
    factory: Factory,
}

/// A single-threaded dependency-injection container.
///
/// Constructed once at the top of the ownership tree and passed down by
/// explicit reference. Interior mutability lets registration and
/// resolution share one `&self` surface.
#[derive(Default)]
pub struct DiContainer {
    registrations: RefCell<HashMap<TypeId, Registration>>,
    singletons: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    weak_cache: RefCell<HashMap<TypeId, Weak<dyn Any>>>,
}

impl DiContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `T` under the given scope.
    ///
    /// Replaces any prior registration for `T`. The scope caches of a
    /// replaced registration are left untouched: a singleton already
    /// materialized under the old factory keeps being returned.
    pub fn register<T: 'static>(
        &self,
        scope: Scope,
        factory: impl Fn(&DiContainer) -> Rc<T> + 'static,
    ) {
        trace!(ty = type_name::<T>(), ?scope, "register");
        let erased: Factory = Rc::new(move |container| factory(container) as Rc<dyn Any>);
        self.registrations.borrow_mut().insert(
            TypeId::of::<T>(),
            Registration {
                scope,
                factory: erased,
            },
        );
    }

    /// Resolve an instance of `T` under its registered scope.
    ///
    /// # Panics
    ///
    /// Panics if no factory was registered for `T`. An unregistered
    /// resolve indicates a missing assembly, discoverable at development
    /// time; the container deliberately does not degrade gracefully.
    #[must_use]
    pub fn resolve<T: 'static>(&self) -> Rc<T> {
        let key = TypeId::of::<T>();
        // Clone the registration out so the registry borrow is released
        // before the factory runs; factories resolve recursively.
        let registration = self
            .registrations
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| panic!("no registration for {}", type_name::<T>()));

        match registration.scope {
            Scope::Transient => {
                trace!(ty = type_name::<T>(), "resolve transient");
                downcast::<T>((registration.factory)(self))
            }
            Scope::Singleton => {
                if let Some(existing) = self.singletons.borrow().get(&key) {
                    return downcast::<T>(Rc::clone(existing));
                }
                trace!(ty = type_name::<T>(), "materialize singleton");
                let instance = (registration.factory)(self);
                self.singletons.borrow_mut().insert(key, Rc::clone(&instance));
                downcast::<T>(instance)
            }
            Scope::WeakCached => {
                if let Some(live) = self.weak_cache.borrow().get(&key).and_then(Weak::upgrade) {
                    return downcast::<T>(live);
                }
                trace!(ty = type_name::<T>(), "materialize weak-cached");
                let instance = (registration.factory)(self);
                self.weak_cache.borrow_mut().insert(key, Rc::downgrade(&instance));
                downcast::<T>(instance)
            }
        }
    }

    /// Whether a registration exists for `T`.
    #[must_use]
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registrations.borrow().contains_key(&TypeId::of::<T>())
    }
}

fn downcast<T: 'static>(instance: Rc<dyn Any>) -> Rc<T> {
    instance
        .downcast::<T>()
        .unwrap_or_else(|_| panic!("registration for {} produced another type", type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Repo {
        tag: u32,
    }

    struct Service {
        repo: Rc<Repo>,
    }

    #[test]
    fn transient_returns_fresh_instances() {
        let container = DiContainer::new();
        let counter = Rc::new(Cell::new(0u32));
        let tags = Rc::clone(&counter);
        container.register(Scope::Transient, move |_| {
            tags.set(tags.get() + 1);
            Rc::new(Repo { tag: tags.get() })
        });

        let a = container.resolve::<Repo>();
        let b = container.resolve::<Repo>();
        let c = container.resolve::<Repo>();

        assert_eq!((a.tag, b.tag, c.tag), (1, 2, 3));
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn singleton_returns_identical_instance() {
        let container = DiContainer::new();
        container.register(Scope::Singleton, |_| Rc::new(Repo { tag: 7 }));

        let a = container.resolve::<Repo>();
        let b = container.resolve::<Repo>();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn singleton_survives_external_drop() {
        let container = DiContainer::new();
        let calls = Rc::new(Cell::new(0u32));
        let count = Rc::clone(&calls);
        container.register(Scope::Singleton, move |_| {
            count.set(count.get() + 1);
            Rc::new(Repo { tag: 0 })
        });

        drop(container.resolve::<Repo>());
        let _again = container.resolve::<Repo>();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn weak_cached_identity_while_held() {
        let container = DiContainer::new();
        container.register(Scope::WeakCached, |_| Rc::new(Repo { tag: 1 }));

        let held = container.resolve::<Repo>();
        let again = container.resolve::<Repo>();
        assert!(Rc::ptr_eq(&held, &again));
    }

    #[test]
    fn weak_cached_recreates_after_drop() {
        let container = DiContainer::new();
        let calls = Rc::new(Cell::new(0u32));
        let count = Rc::clone(&calls);
        container.register(Scope::WeakCached, move |_| {
            count.set(count.get() + 1);
            Rc::new(Repo { tag: count.get() })
        });

        let first = container.resolve::<Repo>();
        assert_eq!(first.tag, 1);
        drop(first);

        let second = container.resolve::<Repo>();
        assert_eq!(second.tag, 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn last_registration_wins() {
        let container = DiContainer::new();
        container.register(Scope::Transient, |_| Rc::new(Repo { tag: 1 }));
        container.register(Scope::Transient, |_| Rc::new(Repo { tag: 2 }));

        assert_eq!(container.resolve::<Repo>().tag, 2);
    }

    #[test]
    fn factories_resolve_recursively() {
        let container = DiContainer::new();
        container.register(Scope::Singleton, |_| Rc::new(Repo { tag: 9 }));
        container.register(Scope::Transient, |c| {
            Rc::new(Service {
                repo: c.resolve::<Repo>(),
            })
        });

        let service = container.resolve::<Service>();
        assert_eq!(service.repo.tag, 9);
        assert!(Rc::ptr_eq(&service.repo, &container.resolve::<Repo>()));
    }

    #[test]
    fn fresh_container_has_empty_caches() {
        let shared = DiContainer::new();
        shared.register(Scope::Singleton, |_| Rc::new(Repo { tag: 1 }));
        let _warm = shared.resolve::<Repo>();

        let fresh = DiContainer::new();
        assert!(!fresh.is_registered::<Repo>());
    }

    #[test]
    #[should_panic(expected = "no registration for")]
    fn unregistered_resolve_is_fatal() {
        let container = DiContainer::new();
        let _ = container.resolve::<Repo>();
    }
}
