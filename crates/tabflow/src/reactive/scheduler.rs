#![forbid(unsafe_code)]

//! Cooperative deferred-work queue.
//!
//! Observed state changes are never handled inline: the reaction is
//! posted here and runs on the next drain. This is what keeps handling
//! cycles strictly sequential — a second cycle cannot start while the
//! first is mid-flight, because both are just closures in one FIFO queue
//! drained on one thread.
//!
//! The host drains the queue once per UI turn; tests call
//! [`Scheduler::run_until_idle`] to settle all pending work, including
//! work posted by the work being drained.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

type Task = Box<dyn FnOnce()>;

/// A FIFO queue of deferred closures. Cheap to clone; clones share the
/// same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a closure for the next cooperative turn.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Run queued tasks until the queue is empty. Tasks posted while
    /// draining run in the same call, in posting order.
    pub fn run_until_idle(&self) {
        loop {
            // Release the borrow before running: tasks post more tasks.
            let task = self.queue.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
        trace!("scheduler idle");
    }

    /// Number of tasks currently queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
