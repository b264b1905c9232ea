//! Runtime values and type membership checks.
//!
//! Interpreting backends use `is_instance` to validate template
//! parameters at render time. The check is loose where the runtime
//! representation is: numbers are interchangeable and sanitized content is
//! matched by content kind only.

use crate::TypeInterner;
use crate::proto::{DescriptorRef, MessageDescriptor};
use crate::sanitized::SanitizedContentKind;
use crate::types::*;
use indexmap::IndexMap;

#[derive(Clone, Debug, PartialEq)]
pub struct SanitizedContent {
    pub kind: SanitizedContentKind,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProtoValue {
    pub descriptor: DescriptorRef<MessageDescriptor>,
    pub fields: IndexMap<String, SoyValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SoyValue {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sanitized(SanitizedContent),
    List(Vec<SoyValue>),
    Set(Vec<SoyValue>),
    Map(Vec<(SoyValue, SoyValue)>),
    LegacyObjectMap(IndexMap<String, SoyValue>),
    Record(IndexMap<String, SoyValue>),
    Proto(ProtoValue),
    /// A reference to a template by fully qualified name.
    Template(String),
    /// A reference to an extern function by name.
    Function(String),
}

impl SoyValue {
    pub fn sanitized(kind: SanitizedContentKind, content: &str) -> Self {
        SoyValue::Sanitized(SanitizedContent {
            kind,
            content: content.to_string(),
        })
    }

    fn is_sanitized_of(&self, kind: SanitizedContentKind) -> bool {
        matches!(self, SoyValue::Sanitized(content) if content.kind == kind)
    }
}

/// Whether `value` is a member of `type_id`.
pub fn is_instance(types: &TypeInterner, type_id: TypeId, value: &SoyValue) -> bool {
    match types.data(type_id) {
        TypeData::Error => true,
        TypeData::Intrinsic(kind) => match kind {
            IntrinsicKind::Any | IntrinsicKind::Unknown => true,
            IntrinsicKind::Never => false,
            IntrinsicKind::Null => matches!(value, SoyValue::Null),
            IntrinsicKind::Undefined => matches!(value, SoyValue::Undefined),
            IntrinsicKind::Bool => matches!(value, SoyValue::Bool(_)),
            IntrinsicKind::Int | IntrinsicKind::Float => {
                matches!(value, SoyValue::Int(_) | SoyValue::Float(_))
            }
            IntrinsicKind::String => matches!(value, SoyValue::String(_)),
            IntrinsicKind::Html => value.is_sanitized_of(SanitizedContentKind::Html),
            IntrinsicKind::Css => value.is_sanitized_of(SanitizedContentKind::Css),
            IntrinsicKind::Js => value.is_sanitized_of(SanitizedContentKind::Js),
            IntrinsicKind::Uri => {
                value.is_sanitized_of(SanitizedContentKind::Uri)
                    || value.is_sanitized_of(SanitizedContentKind::TrustedResourceUri)
            }
            IntrinsicKind::TrustedResourceUri => {
                value.is_sanitized_of(SanitizedContentKind::TrustedResourceUri)
            }
            IntrinsicKind::Attributes => value.is_sanitized_of(SanitizedContentKind::Attributes),
            IntrinsicKind::Message => matches!(value, SoyValue::Proto(_)),
        },
        // Elements render as html; the tag is not tracked at runtime.
        TypeData::Element(_) => {
            value.is_sanitized_of(SanitizedContentKind::Html)
                || value.is_sanitized_of(SanitizedContentKind::HtmlElement)
        }
        TypeData::List(_) => matches!(value, SoyValue::List(_)),
        TypeData::Set(_) => matches!(value, SoyValue::Set(_)),
        TypeData::Iterable(_) => matches!(value, SoyValue::List(_) | SoyValue::Set(_)),
        TypeData::Map(..) => matches!(value, SoyValue::Map(_)),
        TypeData::LegacyObjectMap(..) => matches!(value, SoyValue::LegacyObjectMap(_)),
        TypeData::Record(_) => matches!(value, SoyValue::Record(_)),
        TypeData::Template(_) => matches!(value, SoyValue::Template(_)),
        TypeData::Function(_) => matches!(value, SoyValue::Function(_)),
        TypeData::Union(list) => types
            .type_list(list)
            .iter()
            .any(|&member| is_instance(types, member, value)),
        TypeData::Intersection(list) => types
            .type_list(list)
            .iter()
            .all(|&member| is_instance(types, member, value)),
        TypeData::Literal(atom) => {
            matches!(value, SoyValue::String(s) if *s == *types.resolve_atom(atom))
        }
        TypeData::ProtoMessage(descriptor) => {
            matches!(value, SoyValue::Proto(proto) if proto.descriptor == descriptor)
        }
        // Enum values are carried as their numbers.
        TypeData::ProtoEnum(_) => matches!(value, SoyValue::Int(_)),
    }
}
