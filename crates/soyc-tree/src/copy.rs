//! Two-phase structural copy.
//!
//! Phase 1 (`Tree::copy`) builds the new subtree and records every
//! old id to new id pair. Payloads that hold cross references register a
//! fixup keyed by the *original* target. Phase 2 (`CopyState::finish`)
//! runs the fixups in registration order, each receiving the copy of its
//! target. A fixup whose target was not part of the copied subtree is
//! dropped and the payload keeps referring to the original node.

use crate::base::NodeId;
use crate::payload::NodePayload;
use crate::tree::Tree;
use rustc_hash::FxHashMap;

/// Deferred rebind: receives the tree and the new id of the fixup's target.
pub type Fixup<P> = Box<dyn FnOnce(&mut Tree<P>, NodeId)>;

/// Context for a single copy operation.
pub struct CopyState<P> {
    mapping: FxHashMap<NodeId, NodeId>,
    fixups: Vec<(NodeId, Fixup<P>)>,
}

impl<P: NodePayload> CopyState<P> {
    pub fn new() -> Self {
        CopyState {
            mapping: FxHashMap::default(),
            fixups: Vec::new(),
        }
    }

    /// Record that `old` was copied as `new`.
    ///
    /// # Panics
    /// If `old` was already copied within this state.
    pub(crate) fn record(&mut self, old: NodeId, new: NodeId) {
        let previous = self.mapping.insert(old, new);
        assert!(
            previous.is_none(),
            "node {old} copied twice within one copy operation"
        );
    }

    /// The copy of `old`, if it has been copied in this operation.
    pub fn mapped(&self, old: NodeId) -> Option<NodeId> {
        self.mapping.get(&old).copied()
    }

    /// Number of nodes copied so far.
    pub fn copied_count(&self) -> usize {
        self.mapping.len()
    }

    /// Number of fixups waiting for `finish`.
    pub fn pending_fixups(&self) -> usize {
        self.fixups.len()
    }

    /// Defer `fixup` until the whole copy has been built.
    ///
    /// `old_target` is the id of the referenced node in the original tree.
    pub fn register_fixup(
        &mut self,
        old_target: NodeId,
        fixup: impl FnOnce(&mut Tree<P>, NodeId) + 'static,
    ) {
        self.fixups.push((old_target, Box::new(fixup)));
    }

    /// Run every registered fixup whose target was copied, in registration
    /// order. Returns the number of fixups run.
    pub fn finish(self, tree: &mut Tree<P>) -> usize {
        let CopyState { mapping, fixups } = self;
        let mut ran = 0;
        for (old_target, fixup) in fixups {
            match mapping.get(&old_target) {
                Some(&new_target) => {
                    fixup(tree, new_target);
                    ran += 1;
                }
                None => {
                    tracing::trace!(target_node = %old_target, "reference leaves copied subtree; kept");
                }
            }
        }
        ran
    }
}

impl<P: NodePayload> Default for CopyState<P> {
    fn default() -> Self {
        Self::new()
    }
}
