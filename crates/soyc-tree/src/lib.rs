//! Generic mutable node tree for the soyc template compiler.
//!
//! Nodes live in an arena (`Tree<P>`) and are addressed by `NodeId`. Each
//! node owns an ordered child list and a non-owning parent link; the
//! payload type `P` carries the node kind. Structural copy is two-phase:
//! `CopyState` records the old to new id mapping while the subtree is
//! built, then runs deferred fixups so cross references (ids held in
//! payloads that are not tree edges) point at the copies.

pub mod base;
pub use base::{ChildList, NodeId};

pub mod payload;
pub use payload::NodePayload;

pub mod copy;
pub use copy::{CopyState, Fixup};

pub mod tree;
pub use tree::Tree;

#[cfg(test)]
#[path = "../tests/test_payload.rs"]
mod test_payload;
#[cfg(test)]
#[path = "../tests/tree_tests.rs"]
mod tree_tests;
#[cfg(test)]
#[path = "../tests/copy_tests.rs"]
mod copy_tests;
