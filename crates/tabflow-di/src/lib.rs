#![forbid(unsafe_code)]

//! DI: scoped factory registration and resolution for the coordinator layer.
//!
//! # Role in tabflow
//! `tabflow-di` is the wiring layer. It owns nothing about navigation; it
//! maps requested types to factories and governs how long resolved
//! instances live.
//!
//! # Primary responsibilities
//! - **DiContainer**: type-keyed factory registry with three lifetime
//!   scopes (transient, singleton, weak-cached).
//! - **Assembly**: the registration seam — external collaborators populate
//!   a container in caller-supplied order, later registrations winning.
//!
//! # How it fits in the system
//! The tab coordinator (`tabflow`) constructs exactly one container at the
//! top of its ownership tree and hands explicit references down to every
//! flow coordinator. Nothing here is ambient or global; a fresh container
//! has empty caches.
//!
//! # Threading
//! Single-threaded by construction (`Rc`, `RefCell`). Sharing a container
//! across threads is a caller contract violation, not an enforced
//! invariant.

pub mod assembly;
pub mod container;

pub use assembly::Assembly;
pub use container::{DiContainer, Scope};
