//! Type Visitor Pattern
//!
//! Each `TypeData` variant has a dedicated visit method. Every method is
//! required, so adding a variant forces every visitor to decide what it
//! means for that variant.

use crate::TypeInterner;
use crate::proto::{DescriptorRef, MessageDescriptor, Named};
use crate::types::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use soyc_common::Atom;
use std::collections::BTreeSet;

// =============================================================================
// Type Visitor Trait
// =============================================================================

pub trait TypeVisitor: Sized {
    type Output;

    fn visit_error(&mut self) -> Self::Output;

    /// Primitives, sanitized kinds, `Message` and the top and bottom types.
    fn visit_intrinsic(&mut self, kind: IntrinsicKind) -> Self::Output;

    fn visit_element(&mut self, tag: &ElementTag) -> Self::Output;

    fn visit_list(&mut self, element: TypeId) -> Self::Output;
    fn visit_set(&mut self, element: TypeId) -> Self::Output;
    fn visit_iterable(&mut self, element: TypeId) -> Self::Output;
    fn visit_map(&mut self, key: TypeId, value: TypeId) -> Self::Output;
    fn visit_legacy_object_map(&mut self, key: TypeId, value: TypeId) -> Self::Output;

    fn visit_record(&mut self, shape: RecordShapeId) -> Self::Output;
    fn visit_template(&mut self, shape: TemplateShapeId) -> Self::Output;
    fn visit_function(&mut self, shape: FunctionShapeId) -> Self::Output;

    fn visit_union(&mut self, members: TypeListId) -> Self::Output;
    fn visit_intersection(&mut self, members: TypeListId) -> Self::Output;

    fn visit_literal(&mut self, value: Atom) -> Self::Output;

    fn visit_proto_message(&mut self, descriptor: &DescriptorRef<MessageDescriptor>)
    -> Self::Output;
    fn visit_proto_enum(&mut self, descriptor: &EnumRef) -> Self::Output;

    /// Visit a type by dispatching to the appropriate method.
    ///
    /// Ids this interner does not know are visited as the error type.
    fn visit_type(&mut self, types: &TypeInterner, type_id: TypeId) -> Self::Output {
        match types.lookup(type_id) {
            Some(ref data) => self.visit_type_data(data),
            None => self.visit_error(),
        }
    }

    fn visit_type_data(&mut self, data: &TypeData) -> Self::Output {
        match data {
            TypeData::Error => self.visit_error(),
            TypeData::Intrinsic(kind) => self.visit_intrinsic(*kind),
            TypeData::Element(tag) => self.visit_element(tag),
            TypeData::List(element) => self.visit_list(*element),
            TypeData::Set(element) => self.visit_set(*element),
            TypeData::Iterable(element) => self.visit_iterable(*element),
            TypeData::Map(key, value) => self.visit_map(*key, *value),
            TypeData::LegacyObjectMap(key, value) => self.visit_legacy_object_map(*key, *value),
            TypeData::Record(shape) => self.visit_record(*shape),
            TypeData::Template(shape) => self.visit_template(*shape),
            TypeData::Function(shape) => self.visit_function(*shape),
            TypeData::Union(members) => self.visit_union(*members),
            TypeData::Intersection(members) => self.visit_intersection(*members),
            TypeData::Literal(value) => self.visit_literal(*value),
            TypeData::ProtoMessage(descriptor) => self.visit_proto_message(descriptor),
            TypeData::ProtoEnum(descriptor) => self.visit_proto_enum(descriptor),
        }
    }
}

// =============================================================================
// Common Visitor Implementations
// =============================================================================

pub type ChildTypes = SmallVec<[TypeId; 4]>;

/// Lists the types directly referenced by a type.
pub struct ChildTypesVisitor<'a> {
    types: &'a TypeInterner,
}

impl<'a> ChildTypesVisitor<'a> {
    pub fn new(types: &'a TypeInterner) -> Self {
        ChildTypesVisitor { types }
    }
}

impl TypeVisitor for ChildTypesVisitor<'_> {
    type Output = ChildTypes;

    fn visit_error(&mut self) -> ChildTypes {
        ChildTypes::new()
    }

    fn visit_intrinsic(&mut self, _kind: IntrinsicKind) -> ChildTypes {
        ChildTypes::new()
    }

    fn visit_element(&mut self, _tag: &ElementTag) -> ChildTypes {
        ChildTypes::new()
    }

    fn visit_list(&mut self, element: TypeId) -> ChildTypes {
        smallvec::smallvec![element]
    }

    fn visit_set(&mut self, element: TypeId) -> ChildTypes {
        smallvec::smallvec![element]
    }

    fn visit_iterable(&mut self, element: TypeId) -> ChildTypes {
        smallvec::smallvec![element]
    }

    fn visit_map(&mut self, key: TypeId, value: TypeId) -> ChildTypes {
        smallvec::smallvec![key, value]
    }

    fn visit_legacy_object_map(&mut self, key: TypeId, value: TypeId) -> ChildTypes {
        smallvec::smallvec![key, value]
    }

    fn visit_record(&mut self, shape: RecordShapeId) -> ChildTypes {
        self.types
            .record_shape(shape)
            .properties
            .iter()
            .map(|p| p.type_id)
            .collect()
    }

    fn visit_template(&mut self, shape: TemplateShapeId) -> ChildTypes {
        let shape = self.types.template_shape(shape);
        let mut children: ChildTypes = shape.parameters.iter().map(|p| p.type_id).collect();
        children.push(shape.return_type);
        children
    }

    fn visit_function(&mut self, shape: FunctionShapeId) -> ChildTypes {
        let shape = self.types.function_shape(shape);
        let mut children: ChildTypes = shape.parameters.iter().map(|p| p.type_id).collect();
        children.push(shape.return_type);
        children
    }

    fn visit_union(&mut self, members: TypeListId) -> ChildTypes {
        self.types.type_list(members).iter().copied().collect()
    }

    fn visit_intersection(&mut self, members: TypeListId) -> ChildTypes {
        self.types.type_list(members).iter().copied().collect()
    }

    fn visit_literal(&mut self, _value: Atom) -> ChildTypes {
        ChildTypes::new()
    }

    fn visit_proto_message(&mut self, _descriptor: &DescriptorRef<MessageDescriptor>) -> ChildTypes {
        ChildTypes::new()
    }

    fn visit_proto_enum(&mut self, _descriptor: &EnumRef) -> ChildTypes {
        ChildTypes::new()
    }
}

/// Names the proto message or enum a type is, if any.
struct ProtoNameVisitor;

impl TypeVisitor for ProtoNameVisitor {
    type Output = Option<String>;

    fn visit_error(&mut self) -> Option<String> {
        None
    }
    fn visit_intrinsic(&mut self, _kind: IntrinsicKind) -> Option<String> {
        None
    }
    fn visit_element(&mut self, _tag: &ElementTag) -> Option<String> {
        None
    }
    fn visit_list(&mut self, _element: TypeId) -> Option<String> {
        None
    }
    fn visit_set(&mut self, _element: TypeId) -> Option<String> {
        None
    }
    fn visit_iterable(&mut self, _element: TypeId) -> Option<String> {
        None
    }
    fn visit_map(&mut self, _key: TypeId, _value: TypeId) -> Option<String> {
        None
    }
    fn visit_legacy_object_map(&mut self, _key: TypeId, _value: TypeId) -> Option<String> {
        None
    }
    fn visit_record(&mut self, _shape: RecordShapeId) -> Option<String> {
        None
    }
    fn visit_template(&mut self, _shape: TemplateShapeId) -> Option<String> {
        None
    }
    fn visit_function(&mut self, _shape: FunctionShapeId) -> Option<String> {
        None
    }
    fn visit_union(&mut self, _members: TypeListId) -> Option<String> {
        None
    }
    fn visit_intersection(&mut self, _members: TypeListId) -> Option<String> {
        None
    }
    fn visit_literal(&mut self, _value: Atom) -> Option<String> {
        None
    }
    fn visit_proto_message(
        &mut self,
        descriptor: &DescriptorRef<MessageDescriptor>,
    ) -> Option<String> {
        Some(descriptor.full_name().to_string())
    }
    fn visit_proto_enum(&mut self, descriptor: &EnumRef) -> Option<String> {
        match descriptor {
            EnumRef::Descriptor(descriptor) => Some(descriptor.full_name().to_string()),
            EnumRef::Any | EnumRef::Unknown => None,
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Every type reachable from `type_id`, including itself.
pub fn collect_referenced_types(types: &TypeInterner, type_id: TypeId) -> FxHashSet<TypeId> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![type_id];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        stack.extend(ChildTypesVisitor::new(types).visit_type(types, id));
    }
    seen
}

/// Test whether `predicate` holds for `type_id` or any type it references.
pub fn contains_type_where<F>(types: &TypeInterner, type_id: TypeId, predicate: F) -> bool
where
    F: Fn(&TypeData) -> bool,
{
    collect_referenced_types(types, type_id)
        .into_iter()
        .any(|id| types.lookup(id).is_some_and(|data| predicate(&data)))
}

/// Whether resolution failed anywhere inside `type_id`.
pub fn contains_error(types: &TypeInterner, type_id: TypeId) -> bool {
    contains_type_where(types, type_id, |data| matches!(data, TypeData::Error))
}

/// Full names of every proto message and enum referenced by `type_id`, sorted.
pub fn collect_proto_names(types: &TypeInterner, type_id: TypeId) -> Vec<String> {
    let names: BTreeSet<String> = collect_referenced_types(types, type_id)
        .into_iter()
        .filter_map(|id| ProtoNameVisitor.visit_type(types, id))
        .collect();
    names.into_iter().collect()
}
