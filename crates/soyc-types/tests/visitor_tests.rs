use crate::proto::{DescriptorPool, EnumDescriptor, MessageDescriptor};
use crate::types::*;
use crate::visitor::*;
use crate::TypeInterner;
use soyc_common::Atom;

/// Counts how deeply containers nest; everything else is a leaf.
struct ContainerDepth<'a> {
    types: &'a TypeInterner,
}

impl TypeVisitor for ContainerDepth<'_> {
    type Output = usize;

    fn visit_error(&mut self) -> usize {
        0
    }
    fn visit_intrinsic(&mut self, _kind: IntrinsicKind) -> usize {
        0
    }
    fn visit_element(&mut self, _tag: &ElementTag) -> usize {
        0
    }
    fn visit_list(&mut self, element: TypeId) -> usize {
        1 + self.visit_type(self.types, element)
    }
    fn visit_set(&mut self, element: TypeId) -> usize {
        1 + self.visit_type(self.types, element)
    }
    fn visit_iterable(&mut self, element: TypeId) -> usize {
        1 + self.visit_type(self.types, element)
    }
    fn visit_map(&mut self, _key: TypeId, value: TypeId) -> usize {
        1 + self.visit_type(self.types, value)
    }
    fn visit_legacy_object_map(&mut self, _key: TypeId, value: TypeId) -> usize {
        1 + self.visit_type(self.types, value)
    }
    fn visit_record(&mut self, _shape: RecordShapeId) -> usize {
        0
    }
    fn visit_template(&mut self, _shape: TemplateShapeId) -> usize {
        0
    }
    fn visit_function(&mut self, _shape: FunctionShapeId) -> usize {
        0
    }
    fn visit_union(&mut self, _members: TypeListId) -> usize {
        0
    }
    fn visit_intersection(&mut self, _members: TypeListId) -> usize {
        0
    }
    fn visit_literal(&mut self, _value: Atom) -> usize {
        0
    }
    fn visit_proto_message(
        &mut self,
        _descriptor: &crate::DescriptorRef<MessageDescriptor>,
    ) -> usize {
        0
    }
    fn visit_proto_enum(&mut self, _descriptor: &EnumRef) -> usize {
        0
    }
}

#[test]
fn test_custom_visitor_dispatch() {
    let types = TypeInterner::new();
    let nested = types.list(types.map(TypeId::STRING, types.set(TypeId::INT)));
    let mut visitor = ContainerDepth { types: &types };
    assert_eq!(visitor.visit_type(&types, nested), 3);
    assert_eq!(visitor.visit_type(&types, TypeId::INT), 0);
}

#[test]
fn test_child_types() {
    let types = TypeInterner::new();
    let map = types.map(TypeId::STRING, TypeId::INT);
    let children = ChildTypesVisitor::new(&types).visit_type(&types, map);
    assert_eq!(children.as_slice(), &[TypeId::STRING, TypeId::INT]);

    let function = types.function(
        vec![FunctionParameter {
            name: types.intern_string("x"),
            type_id: TypeId::BOOL,
            is_var_args: false,
        }],
        TypeId::HTML,
    );
    let children = ChildTypesVisitor::new(&types).visit_type(&types, function);
    assert_eq!(children.as_slice(), &[TypeId::BOOL, TypeId::HTML]);
}

#[test]
fn test_collect_referenced_types() {
    let types = TypeInterner::new();
    let inner = types.list(TypeId::INT);
    let outer = types.union2(inner, TypeId::NULL);
    let referenced = collect_referenced_types(&types, outer);
    assert!(referenced.contains(&outer));
    assert!(referenced.contains(&inner));
    assert!(referenced.contains(&TypeId::INT));
    assert!(referenced.contains(&TypeId::NULL));
    assert_eq!(referenced.len(), 4);
}

#[test]
fn test_contains_error() {
    let types = TypeInterner::new();
    let clean = types.list(TypeId::INT);
    let dirty = types.map(TypeId::STRING, types.list(TypeId::ERROR));
    assert!(!contains_error(&types, clean));
    assert!(contains_error(&types, dirty));
    assert!(contains_type_where(&types, dirty, |data| matches!(data, TypeData::List(_))));
}

#[test]
fn test_collect_proto_names() {
    let types = TypeInterner::new();
    let mut pool = DescriptorPool::new();
    let foo = pool
        .add_message(MessageDescriptor::new("example.Foo", vec![]))
        .expect("fresh name");
    let color = pool
        .add_enum(EnumDescriptor::new("example.Color", &[("RED", 1)]))
        .expect("fresh name");
    let record = types.record(vec![
        RecordProperty {
            name: types.intern_string("foo"),
            optional: false,
            type_id: types.list(types.proto_message(foo)),
        },
        RecordProperty {
            name: types.intern_string("color"),
            optional: true,
            type_id: types.union2(types.proto_enum(color), TypeId::ANY_ENUM),
        },
    ]);
    assert_eq!(
        collect_proto_names(&types, record),
        vec!["example.Color".to_string(), "example.Foo".to_string()]
    );
}
