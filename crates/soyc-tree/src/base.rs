//! Base identifiers for the node arena.

use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Index of a node in its `Tree`.
///
/// Ids are handed out in increasing order and never reused, so an id stays
/// a valid identity for the whole compilation unit even after the node has
/// been detached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered children of a node. Most template nodes have a handful.
pub type ChildList = SmallVec<[NodeId; 4]>;
