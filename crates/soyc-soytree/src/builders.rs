//! Constructors for template nodes.
//!
//! The template parser and tests build trees through these so that node
//! invariants that span the tree (self-referencing velog keys, symmetric
//! tag pairing) hold from the start.

use crate::SoyTree;
use crate::attribute::{CommandTagAttribute, velog_logonly};
use crate::expr::Expr;
use crate::nodes::*;
use soyc_common::{ErrorReporter, SourceLocation};
use soyc_tree::NodeId;
use soyc_types::TypeNode;

pub fn file(tree: &mut SoyTree, path: &str, namespace: &str) -> NodeId {
    let location = SourceLocation::new(path.into(), 0, 0);
    tree.add_node(
        location,
        SoyNode::File(FileNode {
            path: path.to_string(),
            namespace: namespace.to_string(),
        }),
    )
}

pub fn template(tree: &mut SoyTree, location: SourceLocation, name: &str) -> NodeId {
    tree.add_node(
        location,
        SoyNode::Template(TemplateNode {
            name: name.to_string(),
            params: Vec::new(),
        }),
    )
}

/// Declare a parameter on an existing template node.
///
/// # Panics
/// If `template` is not a template node.
pub fn add_template_param(
    tree: &mut SoyTree,
    template: NodeId,
    name: &str,
    type_node: Option<TypeNode>,
    required: bool,
) {
    let SoyNode::Template(node) = tree.payload_mut(template) else {
        panic!("node {template} is not a template");
    };
    node.params.push(TemplateParam {
        name: name.to_string(),
        type_node,
        required,
        type_id: None,
    });
}

pub fn raw_text(tree: &mut SoyTree, location: SourceLocation, text: &str) -> NodeId {
    tree.add_node(location, SoyNode::RawText(text.to_string()))
}

pub fn print(tree: &mut SoyTree, location: SourceLocation, expr: Expr) -> NodeId {
    tree.add_node(location, SoyNode::Print(expr))
}

pub fn constant(
    tree: &mut SoyTree,
    location: SourceLocation,
    name: &str,
    expr: Expr,
    exported: bool,
    type_node: Option<TypeNode>,
) -> NodeId {
    tree.add_node(
        location,
        SoyNode::Const(ConstNode {
            name: name.to_string(),
            expr,
            exported,
            type_node,
            type_id: None,
        }),
    )
}

/// Create a `{velog}` node. Attributes other than `logonly` are reported.
pub fn velog(
    tree: &mut SoyTree,
    location: SourceLocation,
    ve_data: Expr,
    attributes: Vec<CommandTagAttribute>,
    reporter: &mut ErrorReporter,
) -> NodeId {
    let logonly = velog_logonly(&attributes, reporter);
    let id = tree.next_id();
    tree.add_node(
        location,
        SoyNode::VeLog(VeLogNode {
            ve_data,
            attributes,
            logonly,
            needs_synthetic_velog: false,
            sameness_key: id,
        }),
    )
}

pub fn msg_placeholder(tree: &mut SoyTree, location: SourceLocation, name: &str) -> NodeId {
    tree.add_node(
        location,
        SoyNode::MsgPlaceholder {
            name: name.to_string(),
        },
    )
}

pub fn key(tree: &mut SoyTree, location: SourceLocation, expr: Expr) -> NodeId {
    tree.add_node(location, SoyNode::Key(expr))
}

pub fn open_tag(tree: &mut SoyTree, location: SourceLocation, tag_name: &str) -> NodeId {
    tree.add_node(
        location,
        SoyNode::HtmlOpenTag(HtmlTagNode {
            tag_name: tag_name.to_string(),
            self_closing: false,
            tagged_pairs: Vec::new(),
        }),
    )
}

pub fn self_closing_tag(tree: &mut SoyTree, location: SourceLocation, tag_name: &str) -> NodeId {
    tree.add_node(
        location,
        SoyNode::HtmlOpenTag(HtmlTagNode {
            tag_name: tag_name.to_string(),
            self_closing: true,
            tagged_pairs: Vec::new(),
        }),
    )
}

pub fn close_tag(tree: &mut SoyTree, location: SourceLocation, tag_name: &str) -> NodeId {
    tree.add_node(
        location,
        SoyNode::HtmlCloseTag(HtmlTagNode {
            tag_name: tag_name.to_string(),
            self_closing: false,
            tagged_pairs: Vec::new(),
        }),
    )
}

pub fn attribute(
    tree: &mut SoyTree,
    location: SourceLocation,
    name: &str,
    value: Option<&str>,
) -> NodeId {
    tree.add_node(
        location,
        SoyNode::HtmlAttribute(HtmlAttributeNode {
            name: name.to_string(),
            value: value.map(str::to_string),
        }),
    )
}

pub fn switch(tree: &mut SoyTree, location: SourceLocation, expr: Expr) -> NodeId {
    tree.add_node(location, SoyNode::Switch(expr))
}

pub fn case(tree: &mut SoyTree, location: SourceLocation, exprs: Vec<Expr>) -> NodeId {
    tree.add_node(location, SoyNode::Case(exprs))
}

pub fn default_case(tree: &mut SoyTree, location: SourceLocation) -> NodeId {
    tree.add_node(location, SoyNode::Default)
}

/// Record that `open` and `close` delimit the same element.
///
/// # Panics
/// If `open` is not an open tag or `close` is not a close tag.
pub fn pair_tags(tree: &mut SoyTree, open: NodeId, close: NodeId) {
    match tree.payload_mut(open) {
        SoyNode::HtmlOpenTag(tag) => tag.tagged_pairs.push(close),
        other => panic!("node {open} is a {}, not an open tag", other.kind()),
    }
    match tree.payload_mut(close) {
        SoyNode::HtmlCloseTag(tag) => tag.tagged_pairs.push(open),
        other => panic!("node {close} is a {}, not a close tag", other.kind()),
    }
}
