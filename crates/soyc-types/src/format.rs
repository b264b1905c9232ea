//! Rendering resolved types back to type syntax for diagnostics.
//!
//! Union members are printed sorted by their rendered text, so the output
//! is stable regardless of interning order.

use crate::TypeInterner;
use crate::proto::Named;
use crate::types::*;
use soyc_common::limits::MULTILINE_PARAMETER_THRESHOLD;
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter { interner }
    }

    pub fn format(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, id);
        out
    }

    fn write(&self, out: &mut String, id: TypeId) {
        match self.interner.data(id) {
            TypeData::Error => out.push_str("<error>"),
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Element(tag) => match tag {
                ElementTag::Wildcard => out.push_str("html<?>"),
                ElementTag::Any => out.push_str("html<any>"),
                ElementTag::Named(atom) => {
                    let _ = write!(out, "html<{}>", self.interner.resolve_atom(atom));
                }
            },
            TypeData::List(elem) => self.write_generic(out, "list", &[elem]),
            TypeData::Set(elem) => self.write_generic(out, "set", &[elem]),
            TypeData::Iterable(elem) => self.write_generic(out, "iterable", &[elem]),
            TypeData::Map(key, value) => self.write_generic(out, "map", &[key, value]),
            TypeData::LegacyObjectMap(key, value) => {
                self.write_generic(out, "legacy_object_map", &[key, value]);
            }
            TypeData::Record(shape_id) => {
                let shape = self.interner.record_shape(shape_id);
                out.push('[');
                for (i, prop) in shape.properties.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.interner.resolve_atom(prop.name));
                    if prop.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    self.write(out, prop.type_id);
                }
                out.push(']');
            }
            TypeData::Template(shape_id) => {
                let shape = self.interner.template_shape(shape_id);
                let params: Vec<String> = shape
                    .parameters
                    .iter()
                    .map(|p| {
                        let name = self.interner.resolve_atom(p.name);
                        let mut text = match p.kind {
                            ParameterKind::Param => name.to_string(),
                            ParameterKind::Attribute => format!("@{}", param_to_attribute_name(&name)),
                        };
                        if !p.required {
                            text.push('?');
                        }
                        text.push_str(": ");
                        text.push_str(&self.format(p.type_id));
                        text
                    })
                    .collect();
                out.push_str("template ");
                write_parameter_list(out, &params);
                out.push_str(" => ");
                self.write(out, shape.return_type);
            }
            TypeData::Function(shape_id) => {
                let shape = self.interner.function_shape(shape_id);
                let params: Vec<String> = shape
                    .parameters
                    .iter()
                    .map(|p| {
                        let prefix = if p.is_var_args { "..." } else { "" };
                        format!(
                            "{prefix}{}: {}",
                            self.interner.resolve_atom(p.name),
                            self.format(p.type_id)
                        )
                    })
                    .collect();
                write_parameter_list(out, &params);
                out.push_str(" => ");
                self.write(out, shape.return_type);
            }
            TypeData::Union(list) => {
                let mut members: Vec<String> = self
                    .interner
                    .type_list(list)
                    .iter()
                    .map(|&m| self.format_member(m, false))
                    .collect();
                members.sort();
                out.push_str(&members.join("|"));
            }
            TypeData::Intersection(list) => {
                let members: Vec<String> = self
                    .interner
                    .type_list(list)
                    .iter()
                    .map(|&m| self.format_member(m, true))
                    .collect();
                out.push_str(&members.join(" & "));
            }
            TypeData::Literal(atom) => write_quoted(out, &self.interner.resolve_atom(atom)),
            TypeData::ProtoMessage(descriptor) => {
                out.push_str(descriptor.full_name());
            }
            TypeData::ProtoEnum(enum_ref) => match enum_ref {
                EnumRef::Any => out.push_str("enum<any>"),
                EnumRef::Unknown => out.push_str("enum<?>"),
                EnumRef::Descriptor(descriptor) => {
                    out.push_str(descriptor.full_name());
                }
            },
        }
    }

    fn write_generic(&self, out: &mut String, name: &str, args: &[TypeId]) {
        out.push_str(name);
        out.push('<');
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(out, arg);
        }
        out.push('>');
    }

    /// A union or intersection member, parenthesized where the bare text
    /// would parse differently.
    fn format_member(&self, id: TypeId, in_intersection: bool) -> String {
        let text = self.format(id);
        let needs_parens = match self.interner.kind(id) {
            Kind::Template | Kind::Function => true,
            Kind::Union => in_intersection,
            _ => false,
        };
        if needs_parens { format!("({text})") } else { text }
    }
}

/// `(a, b)` on one line, or one parameter per line from the threshold on.
pub(crate) fn write_parameter_list(out: &mut String, params: &[String]) {
    if params.len() < MULTILINE_PARAMETER_THRESHOLD {
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');
    } else {
        out.push_str("(\n  ");
        out.push_str(&params.join(",\n  "));
        out.push_str("\n)");
    }
}

/// Single-quoted string literal with escapes.
pub(crate) fn write_quoted(out: &mut String, value: &str) {
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

impl TypeInterner {
    /// Render `id` as type syntax.
    pub fn display(&self, id: TypeId) -> String {
        TypeFormatter::new(self).format(id)
    }
}
