//! Queries over template trees.

use crate::SoyTree;
use crate::expr::Expr;
use crate::nodes::{SoyNode, SoyNodeKind, VeLogNode};
use soyc_tree::NodeId;
use std::hash::{Hash, Hasher};

/// All nodes of `kind` under `root`, in pre-order.
pub fn all_nodes_of_kind(tree: &SoyTree, root: NodeId, kind: SoyNodeKind) -> Vec<NodeId> {
    tree.all_nodes_matching(root, |node| node.kind() == kind)
}

/// The nearest enclosing file node.
pub fn enclosing_file(tree: &SoyTree, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&id| matches!(tree.payload(id), SoyNode::File(_)))
}

/// Fully qualified name of a template: partial names (`.foo`) are joined
/// to the namespace of the enclosing file.
///
/// # Panics
/// If `template` is not a template node.
pub fn template_full_name(tree: &SoyTree, template: NodeId) -> String {
    let SoyNode::Template(node) = tree.payload(template) else {
        panic!("node {template} is not a template");
    };
    if !node.name.starts_with('.') {
        return node.name.clone();
    }
    let namespace = enclosing_file(tree, template).and_then(|file| match tree.payload(file) {
        SoyNode::File(file) => Some(file.namespace.as_str()),
        _ => None,
    });
    match namespace {
        Some(namespace) if !namespace.is_empty() => format!("{namespace}{}", node.name),
        _ => node.name[1..].to_string(),
    }
}

/// The attribute named `name` among the direct children of an open tag.
pub fn direct_attribute_named(tree: &SoyTree, open_tag: NodeId, name: &str) -> Option<NodeId> {
    tree.children(open_tag).iter().copied().find(|&child| {
        matches!(tree.payload(child), SoyNode::HtmlAttribute(attribute) if attribute.name == name)
    })
}

pub fn tagged_pairs(tree: &SoyTree, tag: NodeId) -> &[NodeId] {
    tree.payload(tag)
        .as_html_tag()
        .map(|tag| tag.tagged_pairs.as_slice())
        .unwrap_or(&[])
}

// =============================================================================
// Velog
// =============================================================================

/// The open tag of a `{velog}` block, looking through message placeholders
/// and skipping nodes that do not render.
pub fn velog_open_tag(tree: &SoyTree, velog: NodeId) -> Option<NodeId> {
    let first = tree.children(velog).first().copied()?;
    html_tag_through(tree, first, SoyNodeKind::HtmlOpenTag)
}

/// The close tag of a `{velog}` block.
pub fn velog_close_tag(tree: &SoyTree, velog: NodeId) -> Option<NodeId> {
    let children = tree.children(velog);
    if children.len() < 2 {
        return None;
    }
    html_tag_through(tree, children[children.len() - 1], SoyNodeKind::HtmlCloseTag)
}

fn html_tag_through(tree: &SoyTree, node: NodeId, tag_kind: SoyNodeKind) -> Option<NodeId> {
    let payload = tree.payload(node);
    if !payload.is_rendered() {
        return html_tag_through(tree, tree.next_sibling(node)?, tag_kind);
    }
    if payload.kind() == tag_kind {
        return Some(node);
    }
    if let SoyNode::MsgPlaceholder { .. } = payload {
        if let [wrapped] = tree.children(node) {
            if tree.payload(*wrapped).kind() == tag_kind {
                return Some(*wrapped);
            }
        }
    }
    None
}

/// Equivalence key for velog nodes: two velogs are the same placeholder
/// when their ve data and logonly expressions are equivalent.
#[derive(Clone, Copy, Debug)]
pub struct SamenessKey<'t> {
    delegate: &'t VeLogNode,
}

impl SamenessKey<'_> {
    fn expressions(&self) -> (&Expr, Option<&Expr>) {
        (&self.delegate.ve_data, self.delegate.logonly.as_ref())
    }
}

impl PartialEq for SamenessKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (data, logonly) = self.expressions();
        let (other_data, other_logonly) = other.expressions();
        data.equivalent(other_data)
            && match (logonly, other_logonly) {
                (Some(a), Some(b)) => a.equivalent(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for SamenessKey<'_> {}

impl Hash for SamenessKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (data, logonly) = self.expressions();
        data.to_string().hash(state);
        logonly.map(|e| e.to_string()).hash(state);
    }
}

/// The sameness key of a velog node, resolved through the node it refers to.
///
/// # Panics
/// If `velog` or its key target is not a velog node.
pub fn sameness_key(tree: &SoyTree, velog: NodeId) -> SamenessKey<'_> {
    let SoyNode::VeLog(node) = tree.payload(velog) else {
        panic!("node {velog} is not a velog");
    };
    let key = node.sameness_key;
    let SoyNode::VeLog(delegate) = tree.payload(key) else {
        panic!("sameness key of {velog} refers to {key}, which is not a velog");
    };
    SamenessKey { delegate }
}
