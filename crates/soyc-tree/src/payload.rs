//! The node-kind seam of the generic tree.

use crate::base::NodeId;
use crate::copy::CopyState;

/// Per-node data stored in a `Tree`.
///
/// Implementors describe how a node kind is copied and how it is written
/// back to template source. Children are handled by the tree itself.
pub trait NodePayload: Sized + 'static {
    /// Deep-copy this payload for the node that will be allocated as `new_id`.
    ///
    /// Payloads holding ids of other nodes must not translate them here;
    /// they register a fixup with [`CopyState::register_fixup`] against the
    /// original target instead.
    fn copy_payload(&self, new_id: NodeId, state: &mut CopyState<Self>) -> Self;

    /// Source text emitted before the children.
    fn write_source_open(&self, out: &mut String);

    /// Source text emitted after the children.
    fn write_source_close(&self, _out: &mut String) {}

    /// Text placed before each child, e.g. the space between attributes of
    /// an HTML open tag.
    fn child_separator(&self) -> &'static str {
        ""
    }
}
