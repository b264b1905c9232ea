//! Resolves declared types and types variable references.
//!
//! Template parameter and const annotations are lowered against the
//! `TypeRegistry`. References to parameters and file-level consts then
//! receive the declared type; anything else stays untyped.

use crate::CompilerFilePass;
use rustc_hash::FxHashMap;
use soyc_common::ErrorReporter;
use soyc_soytree::utils::all_nodes_of_kind;
use soyc_soytree::{Expr, SoyNode, SoyNodeKind, SoyTree};
use soyc_tree::NodeId;
use soyc_types::{TypeId, TypeInterner, TypeLowering, TypeRegistry};

pub struct ResolveTypesPass<'a> {
    types: &'a TypeInterner,
    registry: &'a TypeRegistry,
}

impl<'a> ResolveTypesPass<'a> {
    pub fn new(types: &'a TypeInterner, registry: &'a TypeRegistry) -> Self {
        ResolveTypesPass { types, registry }
    }

    fn resolve_consts(
        &self,
        tree: &mut SoyTree,
        file: NodeId,
        reporter: &mut ErrorReporter,
    ) -> FxHashMap<String, TypeId> {
        let mut scope = FxHashMap::default();
        for node in all_nodes_of_kind(tree, file, SoyNodeKind::Const) {
            let SoyNode::Const(constant) = tree.payload_mut(node) else {
                continue;
            };
            if let Some(type_node) = &constant.type_node {
                let type_id = TypeLowering::new(self.types, self.registry, reporter).lower(type_node);
                constant.type_id = Some(type_id);
                scope.insert(constant.name.clone(), type_id);
            }
        }
        scope
    }

    fn resolve_template(
        &self,
        tree: &mut SoyTree,
        template: NodeId,
        file_scope: &FxHashMap<String, TypeId>,
        reporter: &mut ErrorReporter,
    ) {
        let mut scope = file_scope.clone();
        if let SoyNode::Template(node) = tree.payload_mut(template) {
            for param in &mut node.params {
                // Untyped parameters are inferred elsewhere; treat them as `?`.
                let type_id = match &param.type_node {
                    Some(type_node) => {
                        TypeLowering::new(self.types, self.registry, reporter).lower(type_node)
                    }
                    None => TypeId::UNKNOWN,
                };
                param.type_id = Some(type_id);
                scope.insert(param.name.clone(), type_id);
            }
        }

        let mut typed = 0usize;
        for node in tree.descendants(template) {
            match tree.payload_mut(node) {
                SoyNode::Print(expr) | SoyNode::Key(expr) | SoyNode::Switch(expr) => {
                    typed += assign_var_type(expr, &scope);
                }
                SoyNode::Case(exprs) => {
                    for expr in exprs {
                        typed += assign_var_type(expr, &scope);
                    }
                }
                SoyNode::VeLog(velog) => {
                    typed += assign_var_type(&mut velog.ve_data, &scope);
                    if let Some(logonly) = &mut velog.logonly {
                        typed += assign_var_type(logonly, &scope);
                    }
                }
                _ => {}
            }
        }
        tracing::trace!(template = %template, typed, "typed variable references");
    }
}

fn assign_var_type(expr: &mut Expr, scope: &FxHashMap<String, TypeId>) -> usize {
    match expr {
        Expr::VarRef { name, type_id } if type_id.is_none() => match scope.get(name.as_str()) {
            Some(&declared) => {
                *type_id = Some(declared);
                1
            }
            None => 0,
        },
        _ => 0,
    }
}

impl CompilerFilePass for ResolveTypesPass<'_> {
    fn name(&self) -> &'static str {
        "ResolveTypes"
    }

    fn run(&mut self, tree: &mut SoyTree, file: NodeId, reporter: &mut ErrorReporter) {
        let file_scope = self.resolve_consts(tree, file, reporter);
        for template in all_nodes_of_kind(tree, file, SoyNodeKind::Template) {
            self.resolve_template(tree, template, &file_scope, reporter);
        }
    }
}
