//! Structural persistence of resolved types.
//!
//! `SoyTypeP` is a self-contained description of a type that does not
//! depend on interner ids, so it can be written to disk (as JSON) and
//! imported into a different interner. Protos are stored by full name and
//! re-bound against a `DescriptorPool` on import.

use crate::TypeInterner;
use crate::proto::{DescriptorPool, Named};
use crate::types::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoyTypeP {
    Error,
    Primitive {
        name: String,
    },
    /// `tag` is `?` for the wildcard element and `any` for the unknown one.
    Element {
        tag: String,
    },
    List {
        element: Box<SoyTypeP>,
    },
    Set {
        element: Box<SoyTypeP>,
    },
    Iterable {
        element: Box<SoyTypeP>,
    },
    Map {
        key: Box<SoyTypeP>,
        value: Box<SoyTypeP>,
    },
    LegacyObjectMap {
        key: Box<SoyTypeP>,
        value: Box<SoyTypeP>,
    },
    Record {
        properties: Vec<RecordPropertyP>,
    },
    Template {
        parameters: Vec<TemplateParameterP>,
        return_type: Box<SoyTypeP>,
    },
    Function {
        parameters: Vec<FunctionParameterP>,
        return_type: Box<SoyTypeP>,
    },
    Union {
        members: Vec<SoyTypeP>,
    },
    Intersection {
        members: Vec<SoyTypeP>,
    },
    Literal {
        value: String,
    },
    Proto {
        name: String,
    },
    ProtoEnum {
        name: String,
    },
    AnyEnum,
    UnknownEnum,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPropertyP {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(rename = "type")]
    pub type_p: SoyTypeP,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParameterP {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub attribute: bool,
    pub required: bool,
    #[serde(rename = "type")]
    pub type_p: SoyTypeP,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameterP {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub var_args: bool,
    #[serde(rename = "type")]
    pub type_p: SoyTypeP,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unknown primitive type '{0}'")]
    UnknownPrimitive(String),
    #[error("proto message '{0}' is not in the descriptor pool")]
    UnknownMessage(String),
    #[error("proto enum '{0}' is not in the descriptor pool")]
    UnknownEnum(String),
    #[error("record property '{0}' is declared more than once")]
    DuplicateProperty(String),
    #[error("malformed type descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Export
// =============================================================================

/// Describe `type_id` structurally.
pub fn to_proto(types: &TypeInterner, type_id: TypeId) -> SoyTypeP {
    let boxed = |id| Box::new(to_proto(types, id));
    match types.data(type_id) {
        TypeData::Error => SoyTypeP::Error,
        TypeData::Intrinsic(kind) => SoyTypeP::Primitive {
            name: kind.name().to_string(),
        },
        TypeData::Element(tag) => SoyTypeP::Element {
            tag: match tag {
                ElementTag::Wildcard => "?".to_string(),
                ElementTag::Any => "any".to_string(),
                ElementTag::Named(atom) => types.resolve_atom(atom).to_string(),
            },
        },
        TypeData::List(element) => SoyTypeP::List {
            element: boxed(element),
        },
        TypeData::Set(element) => SoyTypeP::Set {
            element: boxed(element),
        },
        TypeData::Iterable(element) => SoyTypeP::Iterable {
            element: boxed(element),
        },
        TypeData::Map(key, value) => SoyTypeP::Map {
            key: boxed(key),
            value: boxed(value),
        },
        TypeData::LegacyObjectMap(key, value) => SoyTypeP::LegacyObjectMap {
            key: boxed(key),
            value: boxed(value),
        },
        TypeData::Record(shape) => SoyTypeP::Record {
            properties: types
                .record_shape(shape)
                .properties
                .iter()
                .map(|p| RecordPropertyP {
                    name: types.resolve_atom(p.name).to_string(),
                    optional: p.optional,
                    type_p: to_proto(types, p.type_id),
                })
                .collect(),
        },
        TypeData::Template(shape) => {
            let shape = types.template_shape(shape);
            SoyTypeP::Template {
                parameters: shape
                    .parameters
                    .iter()
                    .map(|p| TemplateParameterP {
                        name: types.resolve_atom(p.name).to_string(),
                        attribute: p.kind == ParameterKind::Attribute,
                        required: p.required,
                        type_p: to_proto(types, p.type_id),
                    })
                    .collect(),
                return_type: boxed(shape.return_type),
            }
        }
        TypeData::Function(shape) => {
            let shape = types.function_shape(shape);
            SoyTypeP::Function {
                parameters: shape
                    .parameters
                    .iter()
                    .map(|p| FunctionParameterP {
                        name: types.resolve_atom(p.name).to_string(),
                        var_args: p.is_var_args,
                        type_p: to_proto(types, p.type_id),
                    })
                    .collect(),
                return_type: boxed(shape.return_type),
            }
        }
        TypeData::Union(list) => SoyTypeP::Union {
            members: members_in_display_order(types, &types.type_list(list)),
        },
        TypeData::Intersection(list) => SoyTypeP::Intersection {
            members: members_in_display_order(types, &types.type_list(list)),
        },
        TypeData::Literal(atom) => SoyTypeP::Literal {
            value: types.resolve_atom(atom).to_string(),
        },
        TypeData::ProtoMessage(descriptor) => SoyTypeP::Proto {
            name: descriptor.full_name().to_string(),
        },
        TypeData::ProtoEnum(EnumRef::Descriptor(descriptor)) => SoyTypeP::ProtoEnum {
            name: descriptor.full_name().to_string(),
        },
        TypeData::ProtoEnum(EnumRef::Any) => SoyTypeP::AnyEnum,
        TypeData::ProtoEnum(EnumRef::Unknown) => SoyTypeP::UnknownEnum,
    }
}

/// Interner ids depend on interning order, so members are written sorted by
/// their display text to keep the output independent of it.
fn members_in_display_order(types: &TypeInterner, members: &[TypeId]) -> Vec<SoyTypeP> {
    let mut sorted = members.to_vec();
    sorted.sort_by_cached_key(|&member| types.display(member));
    sorted.into_iter().map(|member| to_proto(types, member)).collect()
}

// =============================================================================
// Import
// =============================================================================

/// Rebuild a type described by `to_proto` in `types`, binding protos by
/// name against `pool`.
pub fn from_proto(
    types: &TypeInterner,
    pool: &DescriptorPool,
    proto: &SoyTypeP,
) -> Result<TypeId, ImportError> {
    let import = |p: &SoyTypeP| from_proto(types, pool, p);
    Ok(match proto {
        SoyTypeP::Error => TypeId::ERROR,
        SoyTypeP::Primitive { name } => IntrinsicKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name.as_str())
            .map(IntrinsicKind::to_type_id)
            .ok_or_else(|| ImportError::UnknownPrimitive(name.clone()))?,
        SoyTypeP::Element { tag } => types.element(tag),
        SoyTypeP::List { element } => types.list(import(element)?),
        SoyTypeP::Set { element } => types.set(import(element)?),
        SoyTypeP::Iterable { element } => types.iterable(import(element)?),
        SoyTypeP::Map { key, value } => types.map(import(key)?, import(value)?),
        SoyTypeP::LegacyObjectMap { key, value } => {
            types.legacy_object_map(import(key)?, import(value)?)
        }
        SoyTypeP::Record { properties } => {
            let mut seen = FxHashSet::default();
            if let Some(duplicate) = properties.iter().find(|p| !seen.insert(p.name.as_str())) {
                return Err(ImportError::DuplicateProperty(duplicate.name.clone()));
            }
            let properties = properties
                .iter()
                .map(|p| {
                    Ok(RecordProperty {
                        name: types.intern_string(&p.name),
                        optional: p.optional,
                        type_id: import(&p.type_p)?,
                    })
                })
                .collect::<Result<Vec<_>, ImportError>>()?;
            types.record(properties)
        }
        SoyTypeP::Template {
            parameters,
            return_type,
        } => {
            let parameters = parameters
                .iter()
                .map(|p| {
                    Ok(TemplateParameter {
                        name: types.intern_string(&p.name),
                        kind: if p.attribute {
                            ParameterKind::Attribute
                        } else {
                            ParameterKind::Param
                        },
                        type_id: import(&p.type_p)?,
                        required: p.required,
                    })
                })
                .collect::<Result<Vec<_>, ImportError>>()?;
            types.template(parameters, import(return_type)?)
        }
        SoyTypeP::Function {
            parameters,
            return_type,
        } => {
            let parameters = parameters
                .iter()
                .map(|p| {
                    Ok(FunctionParameter {
                        name: types.intern_string(&p.name),
                        type_id: import(&p.type_p)?,
                        is_var_args: p.var_args,
                    })
                })
                .collect::<Result<Vec<_>, ImportError>>()?;
            types.function(parameters, import(return_type)?)
        }
        SoyTypeP::Union { members } => {
            types.union(members.iter().map(import).collect::<Result<_, _>>()?)
        }
        SoyTypeP::Intersection { members } => {
            types.intersection(members.iter().map(import).collect::<Result<_, _>>()?)
        }
        SoyTypeP::Literal { value } => types.literal_string(value),
        SoyTypeP::Proto { name } => types.proto_message(
            pool.find_message(name)
                .ok_or_else(|| ImportError::UnknownMessage(name.clone()))?,
        ),
        SoyTypeP::ProtoEnum { name } => types.proto_enum(
            pool.find_enum(name)
                .ok_or_else(|| ImportError::UnknownEnum(name.clone()))?,
        ),
        SoyTypeP::AnyEnum => TypeId::ANY_ENUM,
        SoyTypeP::UnknownEnum => TypeId::UNKNOWN_ENUM,
    })
}

pub fn to_json(types: &TypeInterner, type_id: TypeId) -> Result<String, serde_json::Error> {
    serde_json::to_string(&to_proto(types, type_id))
}

pub fn from_json(
    types: &TypeInterner,
    pool: &DescriptorPool,
    json: &str,
) -> Result<TypeId, ImportError> {
    let proto: SoyTypeP = serde_json::from_str(json)?;
    from_proto(types, pool, &proto)
}
