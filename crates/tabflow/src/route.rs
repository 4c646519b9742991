#![forbid(unsafe_code)]

//! Route identity and type erasure.
//!
//! # Design
//!
//! Many concrete route types share one navigation stack and one cache key
//! space; all the system needs from them is equality, hashing, and the
//! ability to build a screen. [`Route`] captures exactly that capability,
//! and [`RouteKey`] erases any route behind a uniform hashable/equatable
//! handle.
//!
//! Equality and hashing delegate to the wrapped route's own `PartialEq`/
//! `Hash` via the object-safe [`DynEq`]/[`DynHash`] supertraits. Routes of
//! different concrete types are never equal (the downcast fails). The hash
//! is computed once, at erasure time, with a deterministic hasher — two
//! erasures of equal routes hash identically regardless of erasure order,
//! and a key's identity never changes while it sits on a stack.

use std::any::Any;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

use crate::flow::FlowCoordinator;

/// Object-safe equality. Blanket-implemented for every `PartialEq` type;
/// values of different concrete types compare unequal.
pub trait DynEq: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DynEq) -> bool;
}

impl<T: PartialEq + Any> DynEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynEq) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Object-safe hashing. Blanket-implemented for every `Hash` type.
pub trait DynHash: Any {
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: Hash + Any> DynHash for T {
    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// A value describing which screen to show and how to build it.
///
/// Implementors are ordinary `PartialEq + Hash + 'static` values; the
/// `DynEq`/`DynHash` supertraits come for free from the blanket impls.
pub trait Route: DynEq + DynHash {
    /// Build the screen for this route. Called by the rendering layer,
    /// never by the coordinator itself.
    fn build(&self, flow: &FlowCoordinator, key: &RouteKey) -> RouteScreen;
}

/// Uniform, hashable handle around any [`Route`] value.
///
/// Used as the navigation stack element, the view-model cache key, and
/// the rendering layer's per-screen identity.
#[derive(Clone)]
pub struct RouteKey {
    route: Rc<dyn Route>,
    hash: u64,
}

impl RouteKey {
    /// Erase a route. The hash is precomputed here and never recomputed.
    #[must_use]
    pub fn erase(route: Rc<dyn Route>) -> Self {
        let mut hasher = DefaultHasher::new();
        route.dyn_hash(&mut hasher);
        Self {
            hash: hasher.finish(),
            route,
        }
    }

    #[must_use]
    pub fn route(&self) -> &Rc<dyn Route> {
        &self.route
    }

    /// Build the wrapped route's screen under this identity.
    #[must_use]
    pub fn build(&self, flow: &FlowCoordinator) -> RouteScreen {
        self.route.build(flow, self)
    }
}

impl PartialEq for RouteKey {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        let lhs: &dyn DynEq = self.route.as_ref();
        let rhs: &dyn DynEq = other.route.as_ref();
        lhs.dyn_eq(rhs)
    }
}

impl Eq for RouteKey {}

impl Hash for RouteKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl std::fmt::Debug for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteKey")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

/// A built screen: a type-erased widget constructor tagged with the route
/// identity the rendering layer keys re-renders on.
///
/// The payload type is the host's business — the coordinator never looks
/// inside. Hosts downcast the materialized box to their own widget type.
pub struct RouteScreen {
    identity: RouteKey,
    make: Box<dyn Fn() -> Box<dyn Any>>,
}

impl RouteScreen {
    pub fn new<V: 'static>(identity: RouteKey, build: impl Fn() -> V + 'static) -> Self {
        Self {
            identity,
            make: Box::new(move || Box::new(build())),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &RouteKey {
        &self.identity
    }

    /// Construct the widget payload.
    #[must_use]
    pub fn materialize(&self) -> Box<dyn Any> {
        (self.make)()
    }
}

impl std::fmt::Debug for RouteScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteScreen")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
