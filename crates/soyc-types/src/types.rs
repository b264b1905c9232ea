//! Core type definitions for the type lattice.
//!
//! Types are represented as lightweight `TypeId` handles that point into an
//! interning table (`TypeInterner`). Structural data lives in `TypeData`.
//! Primitive and sanitized-content singletons have fixed ids, so they can
//! be compared without touching the interner.

use crate::proto::{DescriptorRef, EnumDescriptor, MessageDescriptor};
use serde::Serialize;
use smallvec::SmallVec;
use soyc_common::Atom;
use std::hash::{Hash, Hasher};

/// A type identifier - just a u32 index into the interner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Resolution-error sentinel. Assignable in both directions so one
    /// unresolved type does not cascade into unrelated diagnostics.
    pub const ERROR: TypeId = TypeId(0);

    pub const ANY: TypeId = TypeId(1);
    /// The user-visible unknown type, written `?`.
    pub const UNKNOWN: TypeId = TypeId(2);
    pub const NEVER: TypeId = TypeId(3);
    pub const NULL: TypeId = TypeId(4);
    pub const UNDEFINED: TypeId = TypeId(5);
    pub const BOOL: TypeId = TypeId(6);
    pub const INT: TypeId = TypeId(7);
    pub const FLOAT: TypeId = TypeId(8);
    pub const STRING: TypeId = TypeId(9);

    pub const HTML: TypeId = TypeId(10);
    pub const CSS: TypeId = TypeId(11);
    pub const JS: TypeId = TypeId(12);
    pub const URI: TypeId = TypeId(13);
    pub const TRUSTED_RESOURCE_URI: TypeId = TypeId(14);
    pub const ATTRIBUTES: TypeId = TypeId(15);
    /// `html<?>`: an element with any tag.
    pub const ELEMENT: TypeId = TypeId(16);
    /// `html<any>`: an element whose tag is not statically known.
    pub const ANY_ELEMENT: TypeId = TypeId(17);

    /// Any proto message, written `Message`.
    pub const MESSAGE: TypeId = TypeId(18);
    /// `enum<any>`, compatible with every enum.
    pub const ANY_ENUM: TypeId = TypeId(19);
    /// `enum<?>`, compatible with every enum.
    pub const UNKNOWN_ENUM: TypeId = TypeId(20);

    /// First id available for interned structural types.
    pub const FIRST_USER: u32 = 64;

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }

    /// Types that every other type is assignable to.
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, Self::ANY | Self::UNKNOWN | Self::ERROR)
    }
}

/// Kinds of primitive and sanitized-content singletons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Bool,
    Int,
    Float,
    String,
    Html,
    Css,
    Js,
    Uri,
    TrustedResourceUri,
    Attributes,
    Message,
}

impl IntrinsicKind {
    pub const fn to_type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Unknown => TypeId::UNKNOWN,
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::Null => TypeId::NULL,
            IntrinsicKind::Undefined => TypeId::UNDEFINED,
            IntrinsicKind::Bool => TypeId::BOOL,
            IntrinsicKind::Int => TypeId::INT,
            IntrinsicKind::Float => TypeId::FLOAT,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Html => TypeId::HTML,
            IntrinsicKind::Css => TypeId::CSS,
            IntrinsicKind::Js => TypeId::JS,
            IntrinsicKind::Uri => TypeId::URI,
            IntrinsicKind::TrustedResourceUri => TypeId::TRUSTED_RESOURCE_URI,
            IntrinsicKind::Attributes => TypeId::ATTRIBUTES,
            IntrinsicKind::Message => TypeId::MESSAGE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "?",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Bool => "bool",
            IntrinsicKind::Int => "int",
            IntrinsicKind::Float => "float",
            IntrinsicKind::String => "string",
            IntrinsicKind::Html => "html",
            IntrinsicKind::Css => "css",
            IntrinsicKind::Js => "js",
            IntrinsicKind::Uri => "uri",
            IntrinsicKind::TrustedResourceUri => "trusted_resource_uri",
            IntrinsicKind::Attributes => "attributes",
            IntrinsicKind::Message => "Message",
        }
    }

    pub const ALL: [IntrinsicKind; 16] = [
        IntrinsicKind::Any,
        IntrinsicKind::Unknown,
        IntrinsicKind::Never,
        IntrinsicKind::Null,
        IntrinsicKind::Undefined,
        IntrinsicKind::Bool,
        IntrinsicKind::Int,
        IntrinsicKind::Float,
        IntrinsicKind::String,
        IntrinsicKind::Html,
        IntrinsicKind::Css,
        IntrinsicKind::Js,
        IntrinsicKind::Uri,
        IntrinsicKind::TrustedResourceUri,
        IntrinsicKind::Attributes,
        IntrinsicKind::Message,
    ];
}

/// Tag of an `html<tag>` element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementTag {
    /// `html<?>`: accepts any element.
    Wildcard,
    /// `html<any>`: accepted by any element.
    Any,
    Named(Atom),
}

/// Which enum a proto enum type refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnumRef {
    Any,
    Unknown,
    Descriptor(DescriptorRef<EnumDescriptor>),
}

/// Identifier for an interned list of type ids (union/intersection members).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemplateShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

/// Structural data behind a `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Error,
    Intrinsic(IntrinsicKind),
    Element(ElementTag),
    List(TypeId),
    Set(TypeId),
    Iterable(TypeId),
    Map(TypeId, TypeId),
    LegacyObjectMap(TypeId, TypeId),
    Record(RecordShapeId),
    Template(TemplateShapeId),
    Function(FunctionShapeId),
    /// Sorted, deduplicated, at least two members, none of them a union.
    Union(TypeListId),
    /// Sorted, deduplicated, at least two members, none an intersection.
    Intersection(TypeListId),
    /// A string literal type.
    Literal(Atom),
    ProtoMessage(DescriptorRef<MessageDescriptor>),
    ProtoEnum(EnumRef),
}

// =============================================================================
// Shapes
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordProperty {
    pub name: Atom,
    pub optional: bool,
    pub type_id: TypeId,
}

/// Record properties in declaration order.
///
/// Equality and hashing ignore the order, so `[a: int, b: string]` and
/// `[b: string, a: int]` intern to the same type; the first one interned
/// decides the display order.
#[derive(Clone, Debug)]
pub struct RecordShape {
    pub properties: Vec<RecordProperty>,
}

impl RecordShape {
    fn canonical(&self) -> SmallVec<[&RecordProperty; 8]> {
        let mut props: SmallVec<[&RecordProperty; 8]> = self.properties.iter().collect();
        props.sort_by_key(|p| p.name);
        props
    }

    pub fn property(&self, name: Atom) -> Option<&RecordProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl PartialEq for RecordShape {
    fn eq(&self, other: &Self) -> bool {
        self.properties.len() == other.properties.len() && self.canonical() == other.canonical()
    }
}

impl Eq for RecordShape {}

impl Hash for RecordShape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

/// Whether a template parameter is a regular parameter or an HTML attribute
/// (written with a leading `@`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParameterKind {
    Param,
    Attribute,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateParameter {
    pub name: Atom,
    pub kind: ParameterKind,
    pub type_id: TypeId,
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateShape {
    pub parameters: Vec<TemplateParameter>,
    pub return_type: TypeId,
}

impl TemplateShape {
    pub fn parameter(&self, name: Atom) -> Option<&TemplateParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionParameter {
    pub name: Atom,
    pub type_id: TypeId,
    pub is_var_args: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub parameters: Vec<FunctionParameter>,
    pub return_type: TypeId,
}

// =============================================================================
// Kind
// =============================================================================

/// The dispatch tag of a type.
///
/// Every type-directed operation matches on this (or on `TypeData`)
/// exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Error,
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Bool,
    Int,
    Float,
    String,
    Html,
    Element,
    Css,
    Js,
    Uri,
    TrustedResourceUri,
    Attributes,
    List,
    Set,
    Iterable,
    Map,
    LegacyObjectMap,
    Record,
    Template,
    Function,
    Union,
    Intersection,
    Literal,
    Message,
    Proto,
    ProtoEnum,
}

impl Kind {
    pub fn is_sanitized_content(self) -> bool {
        matches!(
            self,
            Kind::Html
                | Kind::Element
                | Kind::Css
                | Kind::Js
                | Kind::Uri
                | Kind::TrustedResourceUri
                | Kind::Attributes
        )
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Kind::Bool | Kind::Int | Kind::Float | Kind::String | Kind::Null | Kind::Undefined
        )
    }
}

impl TypeData {
    pub fn kind(&self) -> Kind {
        match self {
            TypeData::Error => Kind::Error,
            TypeData::Intrinsic(kind) => match kind {
                IntrinsicKind::Any => Kind::Any,
                IntrinsicKind::Unknown => Kind::Unknown,
                IntrinsicKind::Never => Kind::Never,
                IntrinsicKind::Null => Kind::Null,
                IntrinsicKind::Undefined => Kind::Undefined,
                IntrinsicKind::Bool => Kind::Bool,
                IntrinsicKind::Int => Kind::Int,
                IntrinsicKind::Float => Kind::Float,
                IntrinsicKind::String => Kind::String,
                IntrinsicKind::Html => Kind::Html,
                IntrinsicKind::Css => Kind::Css,
                IntrinsicKind::Js => Kind::Js,
                IntrinsicKind::Uri => Kind::Uri,
                IntrinsicKind::TrustedResourceUri => Kind::TrustedResourceUri,
                IntrinsicKind::Attributes => Kind::Attributes,
                IntrinsicKind::Message => Kind::Message,
            },
            TypeData::Element(_) => Kind::Element,
            TypeData::List(_) => Kind::List,
            TypeData::Set(_) => Kind::Set,
            TypeData::Iterable(_) => Kind::Iterable,
            TypeData::Map(..) => Kind::Map,
            TypeData::LegacyObjectMap(..) => Kind::LegacyObjectMap,
            TypeData::Record(_) => Kind::Record,
            TypeData::Template(_) => Kind::Template,
            TypeData::Function(_) => Kind::Function,
            TypeData::Union(_) => Kind::Union,
            TypeData::Intersection(_) => Kind::Intersection,
            TypeData::Literal(_) => Kind::Literal,
            TypeData::ProtoMessage(_) => Kind::Proto,
            TypeData::ProtoEnum(_) => Kind::ProtoEnum,
        }
    }
}

// =============================================================================
// Attribute names
// =============================================================================

/// Parameter name for an HTML attribute: `data-item-id` becomes `dataItemId`.
pub fn attribute_to_param_name(attribute: &str) -> String {
    let mut out = String::with_capacity(attribute.len());
    let mut upper_next = false;
    for ch in attribute.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Inverse of [`attribute_to_param_name`].
pub fn param_to_attribute_name(param: &str) -> String {
    let mut out = String::with_capacity(param.len() + 4);
    for ch in param.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
