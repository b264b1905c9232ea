//! Type lowering: `TypeNode` → `TypeId`.
//!
//! Resolves names against the builtin types, registered aliases and the
//! descriptor pool. User errors are reported to the `ErrorReporter` and the
//! offending node lowers to `TypeId::ERROR`, so callers can keep going and
//! collect further diagnostics.

use crate::TypeInterner;
use crate::ast::{LiteralTypeValue, TypeNode, TypeNodeKind};
use crate::proto::{DescriptorPool, FieldDescriptor, FieldLabel, FieldType};
use crate::types::*;
use rustc_hash::{FxHashMap, FxHashSet};
use soyc_common::diagnostics::diagnostic_messages;
use soyc_common::limits::MAX_TYPE_NESTING_DEPTH;
use soyc_common::{ErrorReporter, SourceLocation};
use std::sync::Arc;

/// Names visible to type resolution besides the builtins.
pub struct TypeRegistry {
    aliases: FxHashMap<String, TypeId>,
    pool: Arc<DescriptorPool>,
}

impl TypeRegistry {
    pub fn new(pool: Arc<DescriptorPool>) -> Self {
        TypeRegistry {
            aliases: FxHashMap::default(),
            pool,
        }
    }

    /// Register a type alias, returning the previous binding of `name`.
    pub fn register_alias(&mut self, name: &str, type_id: TypeId) -> Option<TypeId> {
        self.aliases.insert(name.to_string(), type_id)
    }

    pub fn alias(&self, name: &str) -> Option<TypeId> {
        self.aliases.get(name).copied()
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new(Arc::new(DescriptorPool::new()))
    }
}

fn builtin_type(interner: &TypeInterner, name: &str) -> Option<TypeId> {
    let id = match name {
        "any" => TypeId::ANY,
        "?" => TypeId::UNKNOWN,
        "never" => TypeId::NEVER,
        "null" => TypeId::NULL,
        "undefined" => TypeId::UNDEFINED,
        "bool" => TypeId::BOOL,
        "int" => TypeId::INT,
        "float" => TypeId::FLOAT,
        "number" => interner.number(),
        "string" => TypeId::STRING,
        "html" => TypeId::HTML,
        "css" => TypeId::CSS,
        "js" => TypeId::JS,
        "uri" => TypeId::URI,
        "trusted_resource_uri" => TypeId::TRUSTED_RESOURCE_URI,
        "attributes" => TypeId::ATTRIBUTES,
        "Message" => TypeId::MESSAGE,
        _ => return None,
    };
    Some(id)
}

/// Expected type-argument count of the generic builtins.
fn generic_arity(name: &str) -> Option<usize> {
    match name {
        "list" | "set" | "iterable" | "html" => Some(1),
        "map" | "legacy_object_map" => Some(2),
        _ => None,
    }
}

enum PropertyLookup {
    Found(TypeId),
    Missing,
    NotIndexable,
}

/// Type lowering context.
pub struct TypeLowering<'a> {
    interner: &'a TypeInterner,
    registry: &'a TypeRegistry,
    reporter: &'a mut ErrorReporter,
    depth: u32,
}

impl<'a> TypeLowering<'a> {
    pub fn new(
        interner: &'a TypeInterner,
        registry: &'a TypeRegistry,
        reporter: &'a mut ErrorReporter,
    ) -> Self {
        TypeLowering {
            interner,
            registry,
            reporter,
            depth: 0,
        }
    }

    /// Resolve a type annotation.
    pub fn lower(&mut self, node: &TypeNode) -> TypeId {
        let result = self.lower_node(node);
        tracing::trace!(
            type_node = %node,
            resolved = %self.interner.display(result),
            "lowered type annotation"
        );
        result
    }

    fn lower_node(&mut self, node: &TypeNode) -> TypeId {
        if self.depth >= MAX_TYPE_NESTING_DEPTH {
            let limit = MAX_TYPE_NESTING_DEPTH.to_string();
            self.reporter
                .report(&node.location, &diagnostic_messages::TYPE_TOO_DEEP, &[limit.as_str()]);
            return TypeId::ERROR;
        }
        self.depth += 1;
        let result = match &node.kind {
            TypeNodeKind::Named(name) => self.lower_named(name, &node.location),
            TypeNodeKind::Generic { name, arguments } => {
                self.lower_generic(name, arguments, &node.location)
            }
            TypeNodeKind::Union(candidates) => {
                let members = candidates.iter().map(|c| self.lower_node(c)).collect();
                self.interner.union(members)
            }
            TypeNodeKind::Intersection(candidates) => {
                let members = candidates.iter().map(|c| self.lower_node(c)).collect();
                self.interner.intersection(members)
            }
            TypeNodeKind::Record(_) => self.lower_record(node),
            TypeNodeKind::Template { .. } => self.lower_template(node),
            TypeNodeKind::Function { .. } => self.lower_function(node),
            TypeNodeKind::Indexed { base, property } => {
                let base_type = self.lower_node(base);
                self.index_type(base_type, property, &node.location)
            }
            TypeNodeKind::Literal(value) => match value {
                LiteralTypeValue::Null => TypeId::NULL,
                LiteralTypeValue::Undefined => TypeId::UNDEFINED,
                LiteralTypeValue::String(text) => self.interner.literal_string(text),
                LiteralTypeValue::Other(text) => {
                    self.reporter.report(
                        &node.location,
                        &diagnostic_messages::UNSUPPORTED_LITERAL_TYPE,
                        &[text.as_str()],
                    );
                    TypeId::ERROR
                }
            },
        };
        self.depth -= 1;
        result
    }

    /// Builtins, aliases and proto names; no diagnostics.
    fn try_named(&self, name: &str) -> Option<TypeId> {
        if let Some(id) = builtin_type(self.interner, name) {
            return Some(id);
        }
        if let Some(id) = self.registry.alias(name) {
            return Some(id);
        }
        let pool = self.registry.pool();
        if let Some(message) = pool.find_message(name) {
            return Some(self.interner.proto_message(message));
        }
        pool.find_enum(name)
            .map(|descriptor| self.interner.proto_enum(descriptor))
    }

    fn lower_named(&mut self, name: &str, location: &SourceLocation) -> TypeId {
        if let Some(id) = self.try_named(name) {
            return id;
        }

        // `Alias.field.sub`: the longest resolvable prefix, then property accesses.
        let segments: Vec<&str> = name.split('.').collect();
        for split in (1..segments.len()).rev() {
            let prefix = segments[..split].join(".");
            if let Some(mut current) = self.try_named(&prefix) {
                for property in &segments[split..] {
                    current = self.index_type(current, property, location);
                }
                return current;
            }
        }

        if let Some(arity) = generic_arity(name) {
            let expected = arity.to_string();
            self.reporter.report(
                location,
                &diagnostic_messages::GENERIC_ARITY_MISMATCH,
                &[name, expected.as_str(), "0"],
            );
        } else {
            self.reporter
                .report(location, &diagnostic_messages::UNKNOWN_TYPE, &[name]);
        }
        TypeId::ERROR
    }

    fn lower_generic(
        &mut self,
        name: &str,
        arguments: &[TypeNode],
        location: &SourceLocation,
    ) -> TypeId {
        let Some(arity) = generic_arity(name) else {
            if self.try_named(name).is_some() {
                self.reporter.report(
                    location,
                    &diagnostic_messages::UNEXPECTED_TYPE_PARAMETERS,
                    &[name],
                );
            } else {
                self.reporter
                    .report(location, &diagnostic_messages::NOT_A_GENERIC_TYPE, &[name]);
            }
            return TypeId::ERROR;
        };

        if name == "html" {
            return self.lower_element(arguments, location);
        }

        let args: Vec<TypeId> = arguments.iter().map(|a| self.lower_node(a)).collect();
        if args.len() != arity {
            let expected = arity.to_string();
            let found = args.len().to_string();
            self.reporter.report(
                location,
                &diagnostic_messages::GENERIC_ARITY_MISMATCH,
                &[name, expected.as_str(), found.as_str()],
            );
            return TypeId::ERROR;
        }

        match (name, args.as_slice()) {
            ("list", &[elem]) => self.interner.list(elem),
            ("set", &[elem]) => self.interner.set(elem),
            ("iterable", &[elem]) => self.interner.iterable(elem),
            ("map", &[key, value]) => self.interner.map(key, value),
            ("legacy_object_map", &[key, value]) => self.interner.legacy_object_map(key, value),
            _ => unreachable!("generic arity table out of sync for '{name}'"),
        }
    }

    fn lower_element(&mut self, arguments: &[TypeNode], location: &SourceLocation) -> TypeId {
        match arguments {
            [tag] => match &tag.kind {
                TypeNodeKind::Named(tag_name) if !tag_name.contains('.') => {
                    self.interner.element(tag_name)
                }
                _ => {
                    let text = tag.to_string();
                    self.reporter.report(
                        &tag.location,
                        &diagnostic_messages::ELEMENT_TAG_EXPECTED,
                        &[text.as_str()],
                    );
                    TypeId::ERROR
                }
            },
            _ => {
                let found = arguments.len().to_string();
                self.reporter.report(
                    location,
                    &diagnostic_messages::GENERIC_ARITY_MISMATCH,
                    &["html", "1", found.as_str()],
                );
                TypeId::ERROR
            }
        }
    }

    fn lower_record(&mut self, node: &TypeNode) -> TypeId {
        let TypeNodeKind::Record(properties) = &node.kind else {
            unreachable!("lower_record called on {node}");
        };
        let mut seen = FxHashSet::default();
        let mut duplicate = false;
        let mut lowered = Vec::with_capacity(properties.len());
        for prop in properties {
            let type_id = self.lower_node(&prop.type_node);
            if !seen.insert(prop.name.as_str()) {
                self.reporter.report(
                    &prop.name_location,
                    &diagnostic_messages::DUPLICATE_RECORD_FIELD,
                    &[prop.name.as_str()],
                );
                duplicate = true;
                continue;
            }
            lowered.push(RecordProperty {
                name: self.interner.intern_string(&prop.name),
                optional: prop.optional,
                type_id,
            });
        }
        if duplicate {
            return TypeId::ERROR;
        }
        self.interner.record(lowered)
    }

    fn lower_template(&mut self, node: &TypeNode) -> TypeId {
        let TypeNodeKind::Template {
            parameters,
            return_type,
        } = &node.kind
        else {
            unreachable!("lower_template called on {node}");
        };
        let mut seen = FxHashSet::default();
        let mut failed = false;
        let mut lowered = Vec::with_capacity(parameters.len());
        for param in parameters {
            let type_id = self.lower_node(&param.type_node);
            if !seen.insert(param.name.as_str()) {
                self.reporter.report(
                    &param.name_location,
                    &diagnostic_messages::DUPLICATE_TEMPLATE_PARAMETER,
                    &[param.source_name.as_str()],
                );
                failed = true;
                continue;
            }
            lowered.push(TemplateParameter {
                name: self.interner.intern_string(&param.name),
                kind: param.kind,
                type_id,
                required: param.required,
            });
        }

        let return_id = self.lower_node(return_type);
        if !is_template_return_type(self.interner, return_id) {
            let text = self.interner.display(return_id);
            self.reporter.report(
                &return_type.location,
                &diagnostic_messages::BAD_TEMPLATE_RETURN_TYPE,
                &[text.as_str()],
            );
            failed = true;
        }
        if failed {
            return TypeId::ERROR;
        }
        self.interner.template(lowered, return_id)
    }

    fn lower_function(&mut self, node: &TypeNode) -> TypeId {
        let TypeNodeKind::Function {
            parameters,
            return_type,
        } = &node.kind
        else {
            unreachable!("lower_function called on {node}");
        };
        let mut seen = FxHashSet::default();
        let mut duplicate = false;
        let mut lowered = Vec::with_capacity(parameters.len());
        for param in parameters {
            let type_id = self.lower_node(&param.type_node);
            if !seen.insert(param.name.as_str()) {
                self.reporter.report(
                    &param.name_location,
                    &diagnostic_messages::DUPLICATE_FUNCTION_PARAMETER,
                    &[param.source_name.as_str()],
                );
                duplicate = true;
                continue;
            }
            lowered.push(FunctionParameter {
                name: self.interner.intern_string(&param.name),
                type_id,
                is_var_args: param.is_var_args,
            });
        }
        let return_id = self.lower_node(return_type);
        if duplicate {
            return TypeId::ERROR;
        }
        self.interner.function(lowered, return_id)
    }

    /// The type of `base.property`, reporting on failure.
    fn index_type(&mut self, base: TypeId, property: &str, location: &SourceLocation) -> TypeId {
        match self.lookup_property(base, property) {
            PropertyLookup::Found(id) => id,
            PropertyLookup::Missing => {
                let text = self.interner.display(base);
                self.reporter.report(
                    location,
                    &diagnostic_messages::NO_SUCH_PROPERTY,
                    &[text.as_str(), property],
                );
                TypeId::ERROR
            }
            PropertyLookup::NotIndexable => {
                let text = self.interner.display(base);
                self.reporter
                    .report(location, &diagnostic_messages::NOT_INDEXABLE, &[text.as_str()]);
                TypeId::ERROR
            }
        }
    }

    fn lookup_property(&self, base: TypeId, property: &str) -> PropertyLookup {
        let interner = self.interner;
        match interner.data(base) {
            TypeData::Error => PropertyLookup::Found(TypeId::ERROR),
            TypeData::Record(shape_id) => {
                let name = interner.intern_string(property);
                match interner.record_shape(shape_id).property(name) {
                    Some(prop) if prop.optional => {
                        PropertyLookup::Found(interner.union2(prop.type_id, TypeId::UNDEFINED))
                    }
                    Some(prop) => PropertyLookup::Found(prop.type_id),
                    None => PropertyLookup::Missing,
                }
            }
            TypeData::Template(shape_id) => {
                let name = interner.intern_string(property);
                match interner.template_shape(shape_id).parameter(name) {
                    Some(param) if !param.required => {
                        PropertyLookup::Found(interner.union2(param.type_id, TypeId::UNDEFINED))
                    }
                    Some(param) => PropertyLookup::Found(param.type_id),
                    None => PropertyLookup::Missing,
                }
            }
            TypeData::ProtoMessage(descriptor) => match descriptor.field(property) {
                Some(field) => {
                    PropertyLookup::Found(interner.proto_field_type(self.registry.pool(), field))
                }
                None => PropertyLookup::Missing,
            },
            TypeData::Union(list) => {
                let mut found = Vec::new();
                for &member in interner.type_list(list).iter() {
                    match self.lookup_property(member, property) {
                        PropertyLookup::Found(id) => found.push(id),
                        other => return other,
                    }
                }
                PropertyLookup::Found(interner.union(found))
            }
            TypeData::Intrinsic(_)
            | TypeData::Element(_)
            | TypeData::List(_)
            | TypeData::Set(_)
            | TypeData::Iterable(_)
            | TypeData::Map(..)
            | TypeData::LegacyObjectMap(..)
            | TypeData::Function(_)
            | TypeData::Intersection(_)
            | TypeData::Literal(_)
            | TypeData::ProtoEnum(_) => PropertyLookup::NotIndexable,
        }
    }
}

/// Template types render content: a sanitized kind, an element, or text.
fn is_template_return_type(interner: &TypeInterner, id: TypeId) -> bool {
    match interner.kind(id) {
        Kind::Error
        | Kind::Html
        | Kind::Element
        | Kind::Attributes
        | Kind::Css
        | Kind::Js
        | Kind::Uri
        | Kind::TrustedResourceUri
        | Kind::String => true,
        Kind::Any
        | Kind::Unknown
        | Kind::Never
        | Kind::Null
        | Kind::Undefined
        | Kind::Bool
        | Kind::Int
        | Kind::Float
        | Kind::List
        | Kind::Set
        | Kind::Iterable
        | Kind::Map
        | Kind::LegacyObjectMap
        | Kind::Record
        | Kind::Template
        | Kind::Function
        | Kind::Union
        | Kind::Intersection
        | Kind::Literal
        | Kind::Message
        | Kind::Proto
        | Kind::ProtoEnum => false,
    }
}

impl TypeInterner {
    /// The type of a proto field as seen from templates.
    ///
    /// Field references that the pool cannot resolve produce
    /// `TypeId::ERROR`; a consistent pool never has them.
    pub fn proto_field_type(&self, pool: &DescriptorPool, field: &FieldDescriptor) -> TypeId {
        match &field.label {
            FieldLabel::Singular(field_type) => self.scalar_field_type(pool, field_type),
            FieldLabel::Repeated(field_type) => {
                let elem = self.scalar_field_type(pool, field_type);
                self.list(elem)
            }
            FieldLabel::Map(key, value) => {
                let key = self.scalar_field_type(pool, key);
                let value = self.scalar_field_type(pool, value);
                self.map(key, value)
            }
        }
    }

    fn scalar_field_type(&self, pool: &DescriptorPool, field_type: &FieldType) -> TypeId {
        match field_type {
            FieldType::Bool => TypeId::BOOL,
            FieldType::Int32 | FieldType::Int64 | FieldType::Uint32 | FieldType::Uint64 => {
                TypeId::INT
            }
            FieldType::Float | FieldType::Double => TypeId::FLOAT,
            FieldType::String | FieldType::Bytes => TypeId::STRING,
            FieldType::Message(name) => match pool.find_message(name) {
                Some(descriptor) => self.proto_message(descriptor),
                None => {
                    tracing::warn!(message = %name, "proto field refers to an unregistered message");
                    TypeId::ERROR
                }
            },
            FieldType::Enum(name) => match pool.find_enum(name) {
                Some(descriptor) => self.proto_enum(descriptor),
                None => {
                    tracing::warn!(enum_name = %name, "proto field refers to an unregistered enum");
                    TypeId::ERROR
                }
            },
        }
    }
}
