#![forbid(unsafe_code)]

//! Reactive plumbing for the coordinator layer.
//!
//! - [`Observable`]: a shared value with change notification; the
//!   presentation back-stack, modal slots, and intent slots are all
//!   observables the host binds to.
//! - [`Subscription`]: RAII guard; dropping it unsubscribes eagerly.
//! - [`Scheduler`]: a FIFO queue of deferred closures — the "next
//!   cooperative turn". Reactions to observed changes are posted here
//!   rather than run inline, so no two handling cycles overlap.
//!
//! Everything is single-threaded (`Rc`/`RefCell`); nothing here is `Send`.

pub mod observable;
pub mod scheduler;

pub use observable::{Observable, Subscription};
pub use scheduler::Scheduler;
