//! Sanitized content kinds and their corresponding types.

use crate::TypeInterner;
use crate::types::{Kind, TypeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The content kind a template or `{let}` block produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizedContentKind {
    Html,
    HtmlElement,
    Attributes,
    Js,
    Css,
    Uri,
    TrustedResourceUri,
    Text,
}

impl SanitizedContentKind {
    pub const ALL: [SanitizedContentKind; 8] = [
        SanitizedContentKind::Html,
        SanitizedContentKind::HtmlElement,
        SanitizedContentKind::Attributes,
        SanitizedContentKind::Js,
        SanitizedContentKind::Css,
        SanitizedContentKind::Uri,
        SanitizedContentKind::TrustedResourceUri,
        SanitizedContentKind::Text,
    ];

    /// The spelling used in `kind="..."` attributes.
    pub const fn attribute_value(self) -> &'static str {
        match self {
            SanitizedContentKind::Html => "html",
            SanitizedContentKind::HtmlElement => "html<?>",
            SanitizedContentKind::Attributes => "attributes",
            SanitizedContentKind::Js => "js",
            SanitizedContentKind::Css => "css",
            SanitizedContentKind::Uri => "uri",
            SanitizedContentKind::TrustedResourceUri => "trusted_resource_uri",
            SanitizedContentKind::Text => "text",
        }
    }

    pub fn from_attribute_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.attribute_value() == value)
    }

    /// The type of values produced by a block of this kind.
    ///
    /// Text blocks produce plain strings.
    pub const fn type_id(self) -> TypeId {
        match self {
            SanitizedContentKind::Html => TypeId::HTML,
            SanitizedContentKind::HtmlElement => TypeId::ELEMENT,
            SanitizedContentKind::Attributes => TypeId::ATTRIBUTES,
            SanitizedContentKind::Js => TypeId::JS,
            SanitizedContentKind::Css => TypeId::CSS,
            SanitizedContentKind::Uri => TypeId::URI,
            SanitizedContentKind::TrustedResourceUri => TypeId::TRUSTED_RESOURCE_URI,
            SanitizedContentKind::Text => TypeId::STRING,
        }
    }

    /// The kind whose values a type denotes, for sanitized types only.
    /// Every `html<...>` element type maps to `HtmlElement`.
    pub fn for_type(types: &TypeInterner, type_id: TypeId) -> Option<Self> {
        match types.lookup(type_id)?.kind() {
            Kind::Html => Some(SanitizedContentKind::Html),
            Kind::Element => Some(SanitizedContentKind::HtmlElement),
            Kind::Attributes => Some(SanitizedContentKind::Attributes),
            Kind::Js => Some(SanitizedContentKind::Js),
            Kind::Css => Some(SanitizedContentKind::Css),
            Kind::Uri => Some(SanitizedContentKind::Uri),
            Kind::TrustedResourceUri => Some(SanitizedContentKind::TrustedResourceUri),
            _ => None,
        }
    }
}

impl fmt::Display for SanitizedContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_value())
    }
}

pub fn type_for_content_kind(kind: SanitizedContentKind) -> TypeId {
    kind.type_id()
}
