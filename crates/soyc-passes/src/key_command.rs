//! Validation of `{key}` commands.
//!
//! A key must sit directly inside an HTML open tag whose element pairs one
//! to one with its close tag, must not be combined with the deprecated
//! `key` HTML attribute, and must evaluate to a string or an int.

use crate::CompilerFilePass;
use soyc_common::ErrorReporter;
use soyc_common::diagnostics::diagnostic_messages;
use soyc_soytree::utils::{all_nodes_of_kind, direct_attribute_named, tagged_pairs};
use soyc_soytree::{Expr, SoyNode, SoyNodeKind, SoyTree};
use soyc_tree::NodeId;
use soyc_types::{TypeId, TypeInterner};

pub struct KeyCommandPass<'a> {
    types: &'a TypeInterner,
}

impl<'a> KeyCommandPass<'a> {
    pub fn new(types: &'a TypeInterner) -> Self {
        KeyCommandPass { types }
    }

    fn check_direct_child_of_open_tag(
        &self,
        tree: &SoyTree,
        key: NodeId,
        reporter: &mut ErrorReporter,
    ) {
        let open_tag = match tree.parent(key) {
            Some(parent) if tree.payload(parent).kind() == SoyNodeKind::HtmlOpenTag => parent,
            _ => {
                reporter.report(
                    tree.location(key),
                    &diagnostic_messages::KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG,
                    &[],
                );
                return;
            }
        };
        let pairs = tagged_pairs(tree, open_tag);
        if pairs.len() > 1 {
            reporter.report(
                tree.location(key),
                &diagnostic_messages::KEY_ELEMENT_AMBIGUOUS,
                &[],
            );
            return;
        }
        // Unpaired tags (e.g. self-closing ones) are fine.
        if let [close_tag] = pairs {
            let one_to_one =
                matches!(tagged_pairs(tree, *close_tag), [only] if *only == open_tag);
            if !one_to_one {
                reporter.report(
                    tree.location(open_tag),
                    &diagnostic_messages::KEY_ELEMENT_AMBIGUOUS,
                    &[],
                );
            }
        }
    }

    fn check_no_key_attribute(&self, tree: &SoyTree, key: NodeId, reporter: &mut ErrorReporter) {
        let Some(parent) = tree.parent(key) else {
            return;
        };
        if tree.payload(parent).kind() != SoyNodeKind::HtmlOpenTag {
            return;
        }
        if let Some(attribute) = direct_attribute_named(tree, parent, "key") {
            reporter.report(
                tree.location(attribute),
                &diagnostic_messages::DUPLICATE_KEY_ATTR,
                &[],
            );
        }
    }

    fn check_supported_type(&self, tree: &SoyTree, key: NodeId, reporter: &mut ErrorReporter) {
        let SoyNode::Key(expr) = tree.payload(key) else {
            return;
        };
        let supported = match expr {
            Expr::Int(_) | Expr::String(_) => true,
            Expr::VarRef { type_id, .. } => {
                // Unresolved variables are typed `?`; the check is left to
                // the runtime.
                let type_id = type_id.unwrap_or(TypeId::UNKNOWN);
                self.types.is_assignable_from(type_id, TypeId::INT)
                    || self.types.is_assignable_from(type_id, TypeId::STRING)
            }
            Expr::Null | Expr::Bool(_) | Expr::Float(_) | Expr::Other(_) => false,
        };
        if !supported {
            reporter.report(
                tree.location(key),
                &diagnostic_messages::UNSUPPORTED_KEY_TYPE,
                &[],
            );
        }
    }
}

impl CompilerFilePass for KeyCommandPass<'_> {
    fn name(&self) -> &'static str {
        "KeyCommand"
    }

    fn run(&mut self, tree: &mut SoyTree, file: NodeId, reporter: &mut ErrorReporter) {
        for key in all_nodes_of_kind(tree, file, SoyNodeKind::Key) {
            self.check_direct_child_of_open_tag(tree, key, reporter);
            self.check_no_key_attribute(tree, key, reporter);
            self.check_supported_type(tree, key, reporter);
        }
    }
}
