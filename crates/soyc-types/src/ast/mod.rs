//! Syntax-level type expressions.
//!
//! A `TypeNode` is what the parser produces for a type annotation. It is
//! printed back with `Display` and resolved into a `TypeId` by
//! `TypeLowering`. Nodes are immutable after parsing; program-tree copies
//! deep-copy them with [`TypeNode::copy`].

mod parser;
mod printer;

pub use parser::{parse_type, parse_type_in_file};

use crate::types::ParameterKind;
use soyc_common::SourceLocation;
use soyc_tree::{CopyState, NodePayload};

#[derive(Clone, Debug)]
pub struct TypeNode {
    pub location: SourceLocation,
    pub kind: TypeNodeKind,
}

#[derive(Clone, Debug)]
pub enum TypeNodeKind {
    /// A builtin, alias or proto name, possibly dotted; `?` for unknown.
    Named(String),
    Generic {
        name: String,
        arguments: Vec<TypeNode>,
    },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Record(Vec<RecordPropertyNode>),
    Template {
        parameters: Vec<TemplateParameterNode>,
        return_type: Box<TypeNode>,
    },
    Function {
        parameters: Vec<FunctionParameterNode>,
        return_type: Box<TypeNode>,
    },
    /// `T.prop`
    Indexed {
        base: Box<TypeNode>,
        property: String,
    },
    Literal(LiteralTypeValue),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LiteralTypeValue {
    Null,
    Undefined,
    String(String),
    /// Any other literal the grammar accepts (numbers, booleans). Resolution
    /// rejects these.
    Other(String),
}

#[derive(Clone, Debug)]
pub struct RecordPropertyNode {
    pub name: String,
    pub name_location: SourceLocation,
    pub optional: bool,
    pub type_node: TypeNode,
}

#[derive(Clone, Debug)]
pub struct TemplateParameterNode {
    /// Parameter name; camel case for attributes.
    pub name: String,
    /// Name as written, including the `@` of attributes.
    pub source_name: String,
    pub name_location: SourceLocation,
    pub kind: ParameterKind,
    pub type_node: TypeNode,
    pub required: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionParameterNode {
    pub name: String,
    /// Name as written, without the `...` of a var-args parameter.
    pub source_name: String,
    pub name_location: SourceLocation,
    pub type_node: TypeNode,
    pub is_var_args: bool,
}

impl TypeNode {
    pub fn new(location: SourceLocation, kind: TypeNodeKind) -> Self {
        TypeNode { location, kind }
    }

    /// A synthesized node without a source location.
    pub fn synthetic(kind: TypeNodeKind) -> Self {
        TypeNode::new(SourceLocation::UNKNOWN, kind)
    }

    pub fn named(name: &str) -> Self {
        TypeNode::synthetic(TypeNodeKind::Named(name.to_string()))
    }

    pub fn generic(name: &str, arguments: Vec<TypeNode>) -> Self {
        TypeNode::synthetic(TypeNodeKind::Generic {
            name: name.to_string(),
            arguments,
        })
    }

    /// Deep copy as part of a program-tree copy.
    pub fn copy<P: NodePayload>(&self, state: &mut CopyState<P>) -> TypeNode {
        let kind = match &self.kind {
            TypeNodeKind::Named(name) => TypeNodeKind::Named(name.clone()),
            TypeNodeKind::Generic { name, arguments } => TypeNodeKind::Generic {
                name: name.clone(),
                arguments: arguments.iter().map(|a| a.copy(state)).collect(),
            },
            TypeNodeKind::Union(candidates) => {
                TypeNodeKind::Union(candidates.iter().map(|c| c.copy(state)).collect())
            }
            TypeNodeKind::Intersection(candidates) => {
                TypeNodeKind::Intersection(candidates.iter().map(|c| c.copy(state)).collect())
            }
            TypeNodeKind::Record(properties) => TypeNodeKind::Record(
                properties
                    .iter()
                    .map(|p| RecordPropertyNode {
                        name: p.name.clone(),
                        name_location: p.name_location.clone(),
                        optional: p.optional,
                        type_node: p.type_node.copy(state),
                    })
                    .collect(),
            ),
            TypeNodeKind::Template {
                parameters,
                return_type,
            } => TypeNodeKind::Template {
                parameters: parameters
                    .iter()
                    .map(|p| TemplateParameterNode {
                        name: p.name.clone(),
                        source_name: p.source_name.clone(),
                        name_location: p.name_location.clone(),
                        kind: p.kind,
                        type_node: p.type_node.copy(state),
                        required: p.required,
                    })
                    .collect(),
                return_type: Box::new(return_type.copy(state)),
            },
            TypeNodeKind::Function {
                parameters,
                return_type,
            } => TypeNodeKind::Function {
                parameters: parameters
                    .iter()
                    .map(|p| FunctionParameterNode {
                        name: p.name.clone(),
                        source_name: p.source_name.clone(),
                        name_location: p.name_location.clone(),
                        type_node: p.type_node.copy(state),
                        is_var_args: p.is_var_args,
                    })
                    .collect(),
                return_type: Box::new(return_type.copy(state)),
            },
            TypeNodeKind::Indexed { base, property } => TypeNodeKind::Indexed {
                base: Box::new(base.copy(state)),
                property: property.clone(),
            },
            TypeNodeKind::Literal(value) => TypeNodeKind::Literal(value.clone()),
        };
        TypeNode::new(self.location.clone(), kind)
    }

    /// Equality of the trees, ignoring source locations.
    pub fn structurally_equal(&self, other: &TypeNode) -> bool {
        fn all_equal(a: &[TypeNode], b: &[TypeNode]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_equal(y))
        }

        match (&self.kind, &other.kind) {
            (TypeNodeKind::Named(a), TypeNodeKind::Named(b)) => a == b,
            (
                TypeNodeKind::Generic { name, arguments },
                TypeNodeKind::Generic {
                    name: other_name,
                    arguments: other_arguments,
                },
            ) => name == other_name && all_equal(arguments, other_arguments),
            (TypeNodeKind::Union(a), TypeNodeKind::Union(b))
            | (TypeNodeKind::Intersection(a), TypeNodeKind::Intersection(b)) => all_equal(a, b),
            (TypeNodeKind::Record(a), TypeNodeKind::Record(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        x.name == y.name
                            && x.optional == y.optional
                            && x.type_node.structurally_equal(&y.type_node)
                    })
            }
            (
                TypeNodeKind::Template {
                    parameters,
                    return_type,
                },
                TypeNodeKind::Template {
                    parameters: other_parameters,
                    return_type: other_return,
                },
            ) => {
                parameters.len() == other_parameters.len()
                    && parameters.iter().zip(other_parameters).all(|(x, y)| {
                        x.name == y.name
                            && x.source_name == y.source_name
                            && x.kind == y.kind
                            && x.required == y.required
                            && x.type_node.structurally_equal(&y.type_node)
                    })
                    && return_type.structurally_equal(other_return)
            }
            (
                TypeNodeKind::Function {
                    parameters,
                    return_type,
                },
                TypeNodeKind::Function {
                    parameters: other_parameters,
                    return_type: other_return,
                },
            ) => {
                parameters.len() == other_parameters.len()
                    && parameters.iter().zip(other_parameters).all(|(x, y)| {
                        x.name == y.name
                            && x.source_name == y.source_name
                            && x.is_var_args == y.is_var_args
                            && x.type_node.structurally_equal(&y.type_node)
                    })
                    && return_type.structurally_equal(other_return)
            }
            (
                TypeNodeKind::Indexed { base, property },
                TypeNodeKind::Indexed {
                    base: other_base,
                    property: other_property,
                },
            ) => property == other_property && base.structurally_equal(other_base),
            (TypeNodeKind::Literal(a), TypeNodeKind::Literal(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self.kind,
            TypeNodeKind::Function { .. } | TypeNodeKind::Template { .. }
        )
    }
}
