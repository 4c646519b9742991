#![forbid(unsafe_code)]

//! Assembly: the registration seam between application wiring and the
//! container.
//!
//! Call sites that know concrete types implement [`Assembly`] and are
//! applied in caller-supplied order. Because registration is
//! last-writer-wins, a later assembly can override an earlier one for the
//! same type (useful for test doubles layered over production wiring).

use crate::container::DiContainer;

/// A collaborator that registers factories into a container.
pub trait Assembly {
    fn assemble(&self, container: &DiContainer);
}

impl DiContainer {
    /// Apply assemblies in order. Later assemblies win ties.
    pub fn apply(&self, assemblies: &[Box<dyn Assembly>]) {
        for assembly in assemblies {
            assembly.assemble(self);
        }
    }
}
