//! The node arena and its structural operations.
//!
//! All operations take the parent id first. Structural misuse (an index out
//! of range, removing a node that is not a child, inserting a node that
//! already has a parent, creating a cycle) is a compiler defect and panics.

use crate::base::{ChildList, NodeId};
use crate::copy::CopyState;
use crate::payload::NodePayload;
use soyc_common::SourceLocation;

struct NodeSlot<P> {
    location: SourceLocation,
    parent: Option<NodeId>,
    children: ChildList,
    payload: P,
}

/// Arena of nodes for one compilation unit.
pub struct Tree<P> {
    nodes: Vec<NodeSlot<P>>,
}

impl<P: NodePayload> Tree<P> {
    pub fn new() -> Self {
        Tree { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The id the next `add_node` call will return.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    /// Allocate a detached node.
    pub fn add_node(&mut self, location: SourceLocation, payload: P) -> NodeId {
        let id = self.next_id();
        self.nodes.push(NodeSlot {
            location,
            parent: None,
            children: ChildList::new(),
            payload,
        });
        id
    }

    #[inline]
    fn slot(&self, id: NodeId) -> &NodeSlot<P> {
        match self.nodes.get(id.index()) {
            Some(slot) => slot,
            None => panic!("node {id} does not belong to this tree"),
        }
    }

    #[inline]
    fn slot_mut(&mut self, id: NodeId) -> &mut NodeSlot<P> {
        match self.nodes.get_mut(id.index()) {
            Some(slot) => slot,
            None => panic!("node {id} does not belong to this tree"),
        }
    }

    pub fn payload(&self, id: NodeId) -> &P {
        &self.slot(id).payload
    }

    pub fn payload_mut(&mut self, id: NodeId) -> &mut P {
        &mut self.slot_mut(id).payload
    }

    pub fn location(&self, id: NodeId) -> &SourceLocation {
        &self.slot(id).location
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    // -------------------------------------------------------------------------
    // Child list
    // -------------------------------------------------------------------------

    pub fn num_children(&self, parent: NodeId) -> usize {
        self.slot(parent).children.len()
    }

    /// # Panics
    /// If `index` is out of range.
    pub fn child(&self, parent: NodeId, index: usize) -> NodeId {
        let children = &self.slot(parent).children;
        match children.get(index) {
            Some(&child) => child,
            None => panic!(
                "child index {index} out of range for node {parent} with {} children",
                children.len()
            ),
        }
    }

    /// The live ordered children of `parent`.
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        &self.slot(parent).children
    }

    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.slot(parent).children.iter().position(|&c| c == child)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let end = self.num_children(parent);
        self.add_child_at(parent, end, child);
    }

    /// # Panics
    /// If `child` already has a parent, if `index > num_children(parent)`,
    /// or if `child` is `parent` or one of its ancestors.
    pub fn add_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.check_attachable(parent, child);
        let count = self.num_children(parent);
        assert!(
            index <= count,
            "insertion index {index} out of range for node {parent} with {count} children"
        );
        self.slot_mut(parent).children.insert(index, child);
        self.slot_mut(child).parent = Some(parent);
    }

    pub fn add_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.add_child(parent, child);
        }
    }

    /// Detach and return the child at `index`.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> NodeId {
        let count = self.num_children(parent);
        assert!(
            index < count,
            "child index {index} out of range for node {parent} with {count} children"
        );
        let child = self.slot_mut(parent).children.remove(index);
        self.slot_mut(child).parent = None;
        child
    }

    /// # Panics
    /// If `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.child_index(parent, child) else {
            panic!("node {child} is not a child of {parent}");
        };
        self.remove_child_at(parent, index);
    }

    /// Put `new_child` in the position of `old_child`, detaching the latter.
    pub fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: NodeId) {
        let Some(index) = self.child_index(parent, old_child) else {
            panic!("node {old_child} is not a child of {parent}");
        };
        self.replace_child_at(parent, index, new_child);
    }

    /// Replace the child at `index`, returning the detached old child.
    pub fn replace_child_at(&mut self, parent: NodeId, index: usize, new_child: NodeId) -> NodeId {
        let old_child = self.child(parent, index);
        if old_child == new_child {
            return old_child;
        }
        self.check_attachable(parent, new_child);
        self.slot_mut(parent).children[index] = new_child;
        self.slot_mut(old_child).parent = None;
        self.slot_mut(new_child).parent = Some(parent);
        old_child
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.slot_mut(parent).children);
        for child in children {
            self.slot_mut(child).parent = None;
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) {
        if let Some(existing) = self.slot(child).parent {
            panic!("node {child} already has parent {existing}; remove it before inserting");
        }
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            assert!(node != child, "inserting {child} under {parent} would create a cycle");
            cursor = self.slot(node).parent;
        }
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&node| self.parent(node))
    }

    /// `root` and all its descendants in pre-order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Pre-order walk over `root` and its descendants.
    pub fn walk(&self, root: NodeId, visit: &mut impl FnMut(NodeId, &P)) {
        for node in self.descendants(root) {
            visit(node, self.payload(node));
        }
    }

    /// All nodes under `root` (inclusive) whose payload matches `predicate`.
    pub fn all_nodes_matching(&self, root: NodeId, predicate: impl Fn(&P) -> bool) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&node| predicate(self.payload(node)))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Source text
    // -------------------------------------------------------------------------

    /// Append the source text of every child of `parent` to `out`.
    pub fn append_source_text(&self, parent: NodeId, out: &mut String) {
        let separator = self.payload(parent).child_separator();
        for &child in self.children(parent) {
            out.push_str(separator);
            self.write_source(child, out);
        }
    }

    pub fn to_source_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_source(id, &mut out);
        out
    }

    fn write_source(&self, id: NodeId, out: &mut String) {
        let payload = self.payload(id);
        payload.write_source_open(out);
        self.append_source_text(id, out);
        payload.write_source_close(out);
    }

    // -------------------------------------------------------------------------
    // Copy
    // -------------------------------------------------------------------------

    /// Phase 1 of a copy: build a detached copy of the subtree at `root`,
    /// recording the id mapping and fixups in `state`.
    ///
    /// Several roots may be copied into one state before calling
    /// [`CopyState::finish`], so references between them are rebound too.
    pub fn copy(&mut self, root: NodeId, state: &mut CopyState<P>) -> NodeId {
        let new_id = self.next_id();
        let (location, payload, old_children) = {
            let slot = self.slot(root);
            (
                slot.location.clone(),
                slot.payload.copy_payload(new_id, state),
                slot.children.clone(),
            )
        };
        let allocated = self.add_node(location, payload);
        debug_assert_eq!(allocated, new_id);
        state.record(root, new_id);

        for old_child in old_children {
            let new_child = self.copy(old_child, state);
            self.slot_mut(new_id).children.push(new_child);
            self.slot_mut(new_child).parent = Some(new_id);
        }
        new_id
    }

    /// Copy the subtree at `root` and rebind its internal references.
    pub fn copy_subtree(&mut self, root: NodeId) -> NodeId {
        let mut state = CopyState::new();
        let new_root = self.copy(root, &mut state);
        let copied = state.copied_count();
        let fixups = state.finish(self);
        tracing::debug!(root = %root, new_root = %new_root, copied, fixups, "copied subtree");
        new_root
    }
}

impl<P: NodePayload> Default for Tree<P> {
    fn default() -> Self {
        Self::new()
    }
}
