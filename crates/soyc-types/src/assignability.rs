//! The assignability relation over interned types.
//!
//! `is_assignable_from(target, source)` answers whether every value of
//! `source` is valid where `target` is expected. The relation is
//! reflexive and directional. Unions and intersections are distributed
//! first; the remaining cases dispatch on the target's `TypeData`.
//!
//! The error sentinel is assignable in both directions so that one
//! unresolved annotation does not produce follow-on diagnostics.

use crate::TypeInterner;
use crate::types::*;
use soyc_common::limits::MAX_ASSIGNABILITY_DEPTH;

/// How the user-visible unknown type `?` behaves as a source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssignabilityMode {
    /// `?` is assignable to everything.
    #[default]
    Loose,
    /// `?` is only assignable to `any` and `?`.
    Strict,
}

pub struct AssignabilityChecker<'a> {
    interner: &'a TypeInterner,
    mode: AssignabilityMode,
    depth: u32,
}

impl<'a> AssignabilityChecker<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self::with_mode(interner, AssignabilityMode::Loose)
    }

    pub fn with_mode(interner: &'a TypeInterner, mode: AssignabilityMode) -> Self {
        AssignabilityChecker {
            interner,
            mode,
            depth: 0,
        }
    }

    pub fn is_assignable_from(&mut self, target: TypeId, source: TypeId) -> bool {
        if target == source {
            return true;
        }
        if self.depth >= MAX_ASSIGNABILITY_DEPTH {
            tracing::debug!(?target, ?source, "assignability depth limit reached");
            return false;
        }
        self.depth += 1;
        let result = self.check(target, source);
        self.depth -= 1;
        result
    }

    fn check(&mut self, target: TypeId, source: TypeId) -> bool {
        if target.is_top() {
            return true;
        }
        if source == TypeId::ERROR || source == TypeId::NEVER {
            return true;
        }
        if source == TypeId::UNKNOWN {
            return self.mode == AssignabilityMode::Loose;
        }

        let interner = self.interner;
        let target_data = interner.data(target);
        let source_data = interner.data(source);

        // Every member of a union source must be accepted.
        if let TypeData::Union(list) = &source_data {
            return interner
                .type_list(*list)
                .iter()
                .all(|&member| self.is_assignable_from(target, member));
        }
        if let TypeData::Union(list) = &target_data {
            return interner
                .type_list(*list)
                .iter()
                .any(|&member| self.is_assignable_from(member, source));
        }
        if let TypeData::Intersection(list) = &target_data {
            return interner
                .type_list(*list)
                .iter()
                .all(|&member| self.is_assignable_from(member, source));
        }
        if let TypeData::Intersection(list) = &source_data {
            return interner
                .type_list(*list)
                .iter()
                .any(|&member| self.is_assignable_from(target, member));
        }

        match target_data {
            TypeData::Error => true,
            TypeData::Intrinsic(kind) => self.check_intrinsic(kind, &source_data),
            TypeData::Element(target_tag) => match source_data {
                TypeData::Element(source_tag) => {
                    target_tag == ElementTag::Wildcard
                        || source_tag == ElementTag::Any
                        || target_tag == source_tag
                }
                _ => false,
            },
            TypeData::List(t) => match source_data {
                TypeData::List(s) => self.is_assignable_from(t, s),
                _ => false,
            },
            TypeData::Set(t) => match source_data {
                TypeData::Set(s) => self.is_assignable_from(t, s),
                _ => false,
            },
            TypeData::Iterable(t) => match source_data {
                TypeData::Iterable(s) | TypeData::List(s) | TypeData::Set(s) => {
                    self.is_assignable_from(t, s)
                }
                _ => false,
            },
            TypeData::Map(tk, tv) => match source_data {
                TypeData::Map(sk, sv) => {
                    self.is_assignable_from(tk, sk) && self.is_assignable_from(tv, sv)
                }
                _ => false,
            },
            TypeData::LegacyObjectMap(tk, tv) => match source_data {
                TypeData::LegacyObjectMap(sk, sv) => {
                    self.is_assignable_from(tk, sk) && self.is_assignable_from(tv, sv)
                }
                _ => false,
            },
            TypeData::Record(target_shape) => match source_data {
                TypeData::Record(source_shape) => self.check_record(target_shape, source_shape),
                _ => false,
            },
            TypeData::Template(target_shape) => match source_data {
                TypeData::Template(source_shape) => {
                    self.check_template(target_shape, source_shape)
                }
                _ => false,
            },
            TypeData::Function(target_shape) => match source_data {
                TypeData::Function(source_shape) => {
                    self.check_function(target_shape, source_shape)
                }
                _ => false,
            },
            // Identical literals have identical ids and were handled above.
            TypeData::Literal(_) => false,
            TypeData::ProtoMessage(target_desc) => match source_data {
                TypeData::ProtoMessage(source_desc) => target_desc == source_desc,
                _ => false,
            },
            TypeData::ProtoEnum(target_enum) => match source_data {
                TypeData::ProtoEnum(source_enum) => match (&target_enum, &source_enum) {
                    (EnumRef::Any | EnumRef::Unknown, _) | (_, EnumRef::Any | EnumRef::Unknown) => {
                        true
                    }
                    (EnumRef::Descriptor(t), EnumRef::Descriptor(s)) => t == s,
                },
                _ => false,
            },
            TypeData::Union(_) | TypeData::Intersection(_) => {
                unreachable!("composite targets are distributed before dispatch")
            }
        }
    }

    fn check_intrinsic(&mut self, target: IntrinsicKind, source: &TypeData) -> bool {
        match target {
            // Top types were accepted before dispatch.
            IntrinsicKind::Any | IntrinsicKind::Unknown => true,
            IntrinsicKind::String => matches!(source, TypeData::Literal(_)),
            IntrinsicKind::Html => matches!(source, TypeData::Element(_)),
            IntrinsicKind::Uri => matches!(
                source,
                TypeData::Intrinsic(IntrinsicKind::TrustedResourceUri)
            ),
            IntrinsicKind::Message => matches!(source, TypeData::ProtoMessage(_)),
            // Only reachable for distinct ids, i.e. a different type.
            IntrinsicKind::Never
            | IntrinsicKind::Null
            | IntrinsicKind::Undefined
            | IntrinsicKind::Bool
            | IntrinsicKind::Int
            | IntrinsicKind::Float
            | IntrinsicKind::Css
            | IntrinsicKind::Js
            | IntrinsicKind::TrustedResourceUri
            | IntrinsicKind::Attributes => false,
        }
    }

    fn check_record(&mut self, target: RecordShapeId, source: RecordShapeId) -> bool {
        let target = self.interner.record_shape(target);
        let source = self.interner.record_shape(source);
        target.properties.iter().all(|tp| match source.property(tp.name) {
            None => tp.optional,
            Some(sp) if sp.optional && !tp.optional => false,
            Some(sp) => self.is_assignable_from(tp.type_id, sp.type_id),
        })
    }

    /// A template of the source type can be called wherever the target's
    /// signature is expected.
    fn check_template(&mut self, target: TemplateShapeId, source: TemplateShapeId) -> bool {
        let target = self.interner.template_shape(target);
        let source = self.interner.template_shape(source);

        let params_accepted = target.parameters.iter().all(|tp| {
            match source
                .parameters
                .iter()
                .find(|sp| sp.name == tp.name && sp.kind == tp.kind)
            {
                None => false,
                Some(sp) if sp.required && !tp.required => false,
                Some(sp) => self.is_assignable_from(sp.type_id, tp.type_id),
            }
        });
        let required_declared = source.parameters.iter().filter(|sp| sp.required).all(|sp| {
            target
                .parameters
                .iter()
                .any(|tp| tp.name == sp.name && tp.kind == sp.kind)
        });

        params_accepted
            && required_declared
            && self.is_assignable_from(target.return_type, source.return_type)
    }

    fn check_function(&mut self, target: FunctionShapeId, source: FunctionShapeId) -> bool {
        let target = self.interner.function_shape(target);
        let source = self.interner.function_shape(source);

        let source_var_args = source.parameters.last().filter(|p| p.is_var_args);
        let fixed = source.parameters.len() - usize::from(source_var_args.is_some());

        if target.parameters.len() < fixed {
            return false;
        }
        if source_var_args.is_none() && target.parameters.len() > fixed {
            return false;
        }

        let params_ok = target.parameters.iter().enumerate().all(|(i, tp)| {
            let sp = source.parameters.get(i).filter(|p| !p.is_var_args).or(source_var_args);
            match sp {
                Some(sp) => self.is_assignable_from(sp.type_id, tp.type_id),
                None => false,
            }
        });
        params_ok && self.is_assignable_from(target.return_type, source.return_type)
    }
}

impl TypeInterner {
    /// Whether a value of type `source` may be used where `target` is expected.
    pub fn is_assignable_from(&self, target: TypeId, source: TypeId) -> bool {
        AssignabilityChecker::new(self).is_assignable_from(target, source)
    }

    /// Like [`Self::is_assignable_from`], but `?` is only accepted by `any` and `?`.
    pub fn is_assignable_from_strict(&self, target: TypeId, source: TypeId) -> bool {
        AssignabilityChecker::with_mode(self, AssignabilityMode::Strict)
            .is_assignable_from(target, source)
    }
}
