//! Template node kinds.
//!
//! `SoyNode` is the payload of a `Tree<SoyNode>`. Children are tree edges;
//! ids held inside a payload (`tagged_pairs`, the velog sameness key) are
//! cross references and are rebound through `CopyState` fixups when a
//! subtree is copied.

use crate::attribute::CommandTagAttribute;
use crate::expr::Expr;
use soyc_tree::{CopyState, NodeId, NodePayload};
use soyc_types::{TypeId, TypeNode};
use std::fmt;

/// Discriminant of a [`SoyNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoyNodeKind {
    File,
    Template,
    RawText,
    Print,
    Const,
    VeLog,
    MsgPlaceholder,
    Key,
    HtmlOpenTag,
    HtmlCloseTag,
    HtmlAttribute,
    Switch,
    Case,
    Default,
}

impl fmt::Display for SoyNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoyNodeKind::File => "file",
            SoyNodeKind::Template => "template",
            SoyNodeKind::RawText => "raw text",
            SoyNodeKind::Print => "print",
            SoyNodeKind::Const => "const",
            SoyNodeKind::VeLog => "velog",
            SoyNodeKind::MsgPlaceholder => "msg placeholder",
            SoyNodeKind::Key => "key",
            SoyNodeKind::HtmlOpenTag => "html open tag",
            SoyNodeKind::HtmlCloseTag => "html close tag",
            SoyNodeKind::HtmlAttribute => "html attribute",
            SoyNodeKind::Switch => "switch",
            SoyNodeKind::Case => "case",
            SoyNodeKind::Default => "default",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct FileNode {
    pub path: String,
    /// Empty for files without a `{namespace}` declaration.
    pub namespace: String,
}

#[derive(Clone, Debug)]
pub struct TemplateParam {
    pub name: String,
    pub type_node: Option<TypeNode>,
    pub required: bool,
    /// Set by type resolution.
    pub type_id: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct TemplateNode {
    /// Name as declared: `.partial` or fully qualified.
    pub name: String,
    pub params: Vec<TemplateParam>,
}

#[derive(Clone, Debug)]
pub struct ConstNode {
    pub name: String,
    pub expr: Expr,
    pub exported: bool,
    pub type_node: Option<TypeNode>,
    /// Set by type resolution.
    pub type_id: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct VeLogNode {
    pub ve_data: Expr,
    pub attributes: Vec<CommandTagAttribute>,
    pub logonly: Option<Expr>,
    pub needs_synthetic_velog: bool,
    /// Velog node whose expressions decide placeholder sameness. Always the
    /// node itself; copies are rebound to the copy.
    pub(crate) sameness_key: NodeId,
}

impl VeLogNode {
    pub fn sameness_key_node(&self) -> NodeId {
        self.sameness_key
    }
}

#[derive(Clone, Debug)]
pub struct HtmlTagNode {
    pub tag_name: String,
    pub self_closing: bool,
    /// The tags this one pairs with: close tags for an open tag and vice
    /// versa. More than one entry means the pairing depends on control flow.
    pub tagged_pairs: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct HtmlAttributeNode {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug)]
pub enum SoyNode {
    File(FileNode),
    Template(TemplateNode),
    RawText(String),
    Print(Expr),
    Const(ConstNode),
    /// Children: the open tag, the body, the close tag.
    VeLog(VeLogNode),
    /// A message placeholder wrapping the node it stands for.
    MsgPlaceholder { name: String },
    Key(Expr),
    HtmlOpenTag(HtmlTagNode),
    HtmlCloseTag(HtmlTagNode),
    HtmlAttribute(HtmlAttributeNode),
    Switch(Expr),
    Case(Vec<Expr>),
    Default,
}

impl SoyNode {
    pub fn kind(&self) -> SoyNodeKind {
        match self {
            SoyNode::File(_) => SoyNodeKind::File,
            SoyNode::Template(_) => SoyNodeKind::Template,
            SoyNode::RawText(_) => SoyNodeKind::RawText,
            SoyNode::Print(_) => SoyNodeKind::Print,
            SoyNode::Const(_) => SoyNodeKind::Const,
            SoyNode::VeLog(_) => SoyNodeKind::VeLog,
            SoyNode::MsgPlaceholder { .. } => SoyNodeKind::MsgPlaceholder,
            SoyNode::Key(_) => SoyNodeKind::Key,
            SoyNode::HtmlOpenTag(_) => SoyNodeKind::HtmlOpenTag,
            SoyNode::HtmlCloseTag(_) => SoyNodeKind::HtmlCloseTag,
            SoyNode::HtmlAttribute(_) => SoyNodeKind::HtmlAttribute,
            SoyNode::Switch(_) => SoyNodeKind::Switch,
            SoyNode::Case(_) => SoyNodeKind::Case,
            SoyNode::Default => SoyNodeKind::Default,
        }
    }

    /// Whether the node produces output. Declarations do not.
    pub fn is_rendered(&self) -> bool {
        !matches!(self, SoyNode::Const(_))
    }

    pub fn as_html_tag(&self) -> Option<&HtmlTagNode> {
        match self {
            SoyNode::HtmlOpenTag(tag) | SoyNode::HtmlCloseTag(tag) => Some(tag),
            _ => None,
        }
    }

    fn as_html_tag_mut(&mut self) -> Option<&mut HtmlTagNode> {
        match self {
            SoyNode::HtmlOpenTag(tag) | SoyNode::HtmlCloseTag(tag) => Some(tag),
            _ => None,
        }
    }
}

// =============================================================================
// Copy
// =============================================================================

fn copy_tag(tag: &HtmlTagNode, new_id: NodeId, state: &mut CopyState<SoyNode>) -> HtmlTagNode {
    for (index, &pair) in tag.tagged_pairs.iter().enumerate() {
        state.register_fixup(pair, move |tree, new_pair| {
            if let Some(tag) = tree.payload_mut(new_id).as_html_tag_mut() {
                tag.tagged_pairs[index] = new_pair;
            }
        });
    }
    tag.clone()
}

fn copy_type_node(
    type_node: &Option<TypeNode>,
    state: &mut CopyState<SoyNode>,
) -> Option<TypeNode> {
    type_node.as_ref().map(|node| node.copy(state))
}

impl NodePayload for SoyNode {
    fn copy_payload(&self, new_id: NodeId, state: &mut CopyState<Self>) -> Self {
        match self {
            SoyNode::Template(template) => SoyNode::Template(TemplateNode {
                name: template.name.clone(),
                params: template
                    .params
                    .iter()
                    .map(|param| TemplateParam {
                        name: param.name.clone(),
                        type_node: copy_type_node(&param.type_node, state),
                        required: param.required,
                        type_id: param.type_id,
                    })
                    .collect(),
            }),
            SoyNode::Const(node) => SoyNode::Const(ConstNode {
                name: node.name.clone(),
                expr: node.expr.clone(),
                exported: node.exported,
                type_node: copy_type_node(&node.type_node, state),
                type_id: node.type_id,
            }),
            SoyNode::VeLog(velog) => {
                state.register_fixup(velog.sameness_key, move |tree, new_key| {
                    if let SoyNode::VeLog(velog) = tree.payload_mut(new_id) {
                        velog.sameness_key = new_key;
                    }
                });
                SoyNode::VeLog(velog.clone())
            }
            SoyNode::HtmlOpenTag(tag) => SoyNode::HtmlOpenTag(copy_tag(tag, new_id, state)),
            SoyNode::HtmlCloseTag(tag) => SoyNode::HtmlCloseTag(copy_tag(tag, new_id, state)),
            SoyNode::File(_)
            | SoyNode::RawText(_)
            | SoyNode::Print(_)
            | SoyNode::MsgPlaceholder { .. }
            | SoyNode::Key(_)
            | SoyNode::HtmlAttribute(_)
            | SoyNode::Switch(_)
            | SoyNode::Case(_)
            | SoyNode::Default => self.clone(),
        }
    }

    fn write_source_open(&self, out: &mut String) {
        match self {
            SoyNode::File(file) => {
                if !file.namespace.is_empty() {
                    out.push_str("{namespace ");
                    out.push_str(&file.namespace);
                    out.push_str("}\n");
                }
            }
            SoyNode::Template(template) => {
                out.push_str("{template ");
                out.push_str(&template.name);
                out.push_str("}\n");
                for param in &template.params {
                    out.push_str("  {@param");
                    if !param.required {
                        out.push('?');
                    }
                    out.push(' ');
                    out.push_str(&param.name);
                    if let Some(type_node) = &param.type_node {
                        out.push_str(": ");
                        out.push_str(&type_node.to_string());
                    }
                    out.push_str("}\n");
                }
            }
            SoyNode::RawText(text) => out.push_str(text),
            SoyNode::Print(expr) => {
                out.push('{');
                out.push_str(&expr.to_string());
                out.push('}');
            }
            SoyNode::Const(node) => {
                out.push('{');
                if node.exported {
                    out.push_str("export ");
                }
                out.push_str("const ");
                out.push_str(&node.name);
                if let Some(type_node) = &node.type_node {
                    out.push_str(": ");
                    out.push_str(&type_node.to_string());
                }
                out.push_str(" = ");
                out.push_str(&node.expr.to_string());
                out.push_str(" /}");
            }
            SoyNode::VeLog(velog) => {
                out.push_str("{velog ");
                out.push_str(&velog.ve_data.to_string());
                for attribute in &velog.attributes {
                    out.push(' ');
                    out.push_str(&attribute.to_string());
                }
                out.push('}');
            }
            SoyNode::MsgPlaceholder { .. } => {}
            SoyNode::Key(expr) => {
                out.push_str("{key ");
                out.push_str(&expr.to_string());
                out.push('}');
            }
            SoyNode::HtmlOpenTag(tag) => {
                out.push('<');
                out.push_str(&tag.tag_name);
            }
            SoyNode::HtmlCloseTag(tag) => {
                out.push_str("</");
                out.push_str(&tag.tag_name);
                out.push('>');
            }
            SoyNode::HtmlAttribute(attribute) => {
                out.push_str(&attribute.name);
                if let Some(value) = &attribute.value {
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
            }
            SoyNode::Switch(expr) => {
                out.push_str("{switch ");
                out.push_str(&expr.to_string());
                out.push('}');
            }
            SoyNode::Case(exprs) => {
                out.push_str("{case ");
                let joined: Vec<String> = exprs.iter().map(|e| e.to_string()).collect();
                out.push_str(&joined.join(", "));
                out.push('}');
            }
            SoyNode::Default => out.push_str("{default}"),
        }
    }

    fn write_source_close(&self, out: &mut String) {
        match self {
            SoyNode::Template(_) => out.push_str("{/template}\n"),
            SoyNode::VeLog(_) => out.push_str("{/velog}"),
            SoyNode::Switch(_) => out.push_str("{/switch}"),
            SoyNode::HtmlOpenTag(tag) => {
                out.push_str(if tag.self_closing { "/>" } else { ">" });
            }
            _ => {}
        }
    }

    fn child_separator(&self) -> &'static str {
        match self {
            SoyNode::HtmlOpenTag(_) => " ",
            _ => "",
        }
    }
}
