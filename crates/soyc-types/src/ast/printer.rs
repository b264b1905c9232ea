// Type syntax printer. Output reparses to a structurally equal tree.

use super::{LiteralTypeValue, TypeNode, TypeNodeKind};
use crate::format::{write_parameter_list, write_quoted};
use std::fmt;

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_node(&mut out, self);
        f.write_str(&out)
    }
}

fn write_node(out: &mut String, node: &TypeNode) {
    match &node.kind {
        TypeNodeKind::Named(name) => out.push_str(name),
        TypeNodeKind::Generic { name, arguments } => {
            out.push_str(name);
            out.push('<');
            for (i, arg) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_node(out, arg);
            }
            out.push('>');
        }
        TypeNodeKind::Union(candidates) => {
            for (i, candidate) in candidates.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                let parens = candidate.is_function_like()
                    || matches!(candidate.kind, TypeNodeKind::Union(_));
                write_maybe_parenthesized(out, candidate, parens);
            }
        }
        TypeNodeKind::Intersection(candidates) => {
            for (i, candidate) in candidates.iter().enumerate() {
                if i > 0 {
                    out.push_str(" & ");
                }
                let parens = candidate.is_function_like()
                    || matches!(
                        candidate.kind,
                        TypeNodeKind::Union(_) | TypeNodeKind::Intersection(_)
                    );
                write_maybe_parenthesized(out, candidate, parens);
            }
        }
        TypeNodeKind::Record(properties) => {
            out.push('[');
            for (i, prop) in properties.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&prop.name);
                if prop.optional {
                    out.push('?');
                }
                out.push_str(": ");
                write_node(out, &prop.type_node);
            }
            out.push(']');
        }
        TypeNodeKind::Template {
            parameters,
            return_type,
        } => {
            let params: Vec<String> = parameters
                .iter()
                .map(|p| {
                    let optional = if p.required { "" } else { "?" };
                    format!("{}{optional}: {}", p.source_name, p.type_node)
                })
                .collect();
            out.push_str("template ");
            write_parameter_list(out, &params);
            out.push_str(" => ");
            write_node(out, return_type);
        }
        TypeNodeKind::Function {
            parameters,
            return_type,
        } => {
            let params: Vec<String> = parameters
                .iter()
                .map(|p| {
                    let prefix = if p.is_var_args { "..." } else { "" };
                    format!("{prefix}{}: {}", p.source_name, p.type_node)
                })
                .collect();
            write_parameter_list(out, &params);
            out.push_str(" => ");
            write_node(out, return_type);
        }
        TypeNodeKind::Indexed { base, property } => {
            // A bare name or keyword literal would merge with the property into
            // one dotted name; a bare number would absorb the dot.
            let parens = base.is_function_like()
                || match &base.kind {
                    TypeNodeKind::Named(_)
                    | TypeNodeKind::Union(_)
                    | TypeNodeKind::Intersection(_) => true,
                    TypeNodeKind::Literal(value) => !matches!(value, LiteralTypeValue::String(_)),
                    _ => false,
                };
            write_maybe_parenthesized(out, base, parens);
            out.push('.');
            out.push_str(property);
        }
        TypeNodeKind::Literal(value) => match value {
            LiteralTypeValue::Null => out.push_str("null"),
            LiteralTypeValue::Undefined => out.push_str("undefined"),
            LiteralTypeValue::String(text) => write_quoted(out, text),
            LiteralTypeValue::Other(text) => out.push_str(text),
        },
    }
}

fn write_maybe_parenthesized(out: &mut String, node: &TypeNode, parens: bool) {
    if parens {
        out.push('(');
        write_node(out, node);
        out.push(')');
    } else {
        write_node(out, node);
    }
}
