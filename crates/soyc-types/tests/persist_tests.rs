use crate::lower::{TypeLowering, TypeRegistry};
use crate::persist::*;
use crate::proto::{DescriptorPool, EnumDescriptor, MessageDescriptor};
use crate::{TypeId, TypeInterner, parse_type};
use soyc_common::ErrorReporter;
use std::sync::Arc;

fn pool() -> Arc<DescriptorPool> {
    let mut pool = DescriptorPool::new();
    pool.add_message(MessageDescriptor::new("example.Foo", vec![]))
        .expect("fresh name");
    pool.add_enum(EnumDescriptor::new("example.Color", &[("RED", 1)]))
        .expect("fresh name");
    Arc::new(pool)
}

fn resolve(types: &TypeInterner, registry: &TypeRegistry, text: &str) -> TypeId {
    let mut reporter = ErrorReporter::new();
    let node = parse_type(text, &mut reporter).expect("parse succeeded");
    let id = TypeLowering::new(types, registry, &mut reporter).lower(&node);
    assert!(!reporter.has_errors(), "{text:?}: {:?}", reporter.diagnostics());
    id
}

#[test]
fn test_export_import_into_fresh_interner() {
    let pool = pool();
    let registry = TypeRegistry::new(pool.clone());
    let source = TypeInterner::new();
    let target = TypeInterner::new();

    for text in [
        "int",
        "?",
        "Message",
        "list<map<string, int|null>>",
        "[b?: string, a: html<div>]",
        "template (@data-id: string, n?: int) => html",
        "(x: int, ...rest: 'a'|'b') => uri",
        "iterable<example.Foo>",
        "example.Color|null",
        "[a: int] & [b: string]",
        "legacy_object_map<string, html<?>>",
    ] {
        let original = resolve(&source, &registry, text);
        let proto = to_proto(&source, original);
        let imported = from_proto(&target, &pool, &proto).expect("import succeeds");
        assert_eq!(target.display(imported), source.display(original), "{text:?}");
        assert_eq!(imported, resolve(&target, &registry, text), "{text:?}");
    }
}

#[test]
fn test_sentinels_survive() {
    let types = TypeInterner::new();
    let pool = pool();
    for id in [TypeId::ERROR, TypeId::ANY_ENUM, TypeId::UNKNOWN_ENUM, TypeId::ANY_ELEMENT] {
        let proto = to_proto(&types, id);
        assert_eq!(from_proto(&types, &pool, &proto).expect("import succeeds"), id);
    }
}

#[test]
fn test_json_shape() {
    let types = TypeInterner::new();
    let list = types.list(TypeId::INT);
    let json = to_json(&types, list).expect("serializable");
    assert_eq!(
        json,
        r#"{"kind":"list","element":{"kind":"primitive","name":"int"}}"#
    );
    assert_eq!(from_json(&types, &pool(), &json).expect("import succeeds"), list);
}

#[test]
fn test_unknown_proto_on_import() {
    let types = TypeInterner::new();
    let empty = DescriptorPool::new();
    let proto = SoyTypeP::List {
        element: Box::new(SoyTypeP::Proto {
            name: "example.Missing".to_string(),
        }),
    };
    let err = from_proto(&types, &empty, &proto).expect_err("missing message");
    assert!(matches!(err, ImportError::UnknownMessage(ref name) if name == "example.Missing"));
    assert_eq!(
        err.to_string(),
        "proto message 'example.Missing' is not in the descriptor pool"
    );

    let proto = SoyTypeP::ProtoEnum {
        name: "example.Color".to_string(),
    };
    assert!(matches!(
        from_proto(&types, &empty, &proto),
        Err(ImportError::UnknownEnum(_))
    ));
}

#[test]
fn test_malformed_input() {
    let types = TypeInterner::new();
    let pool = pool();
    assert!(matches!(
        from_json(&types, &pool, r#"{"kind":"primitive","name":"integer"}"#),
        Err(ImportError::UnknownPrimitive(_))
    ));
    assert!(matches!(
        from_json(&types, &pool, r#"{"kind":"nonsense"}"#),
        Err(ImportError::Json(_))
    ));
}

#[test]
fn test_duplicate_record_property_on_import() {
    let types = TypeInterner::new();
    let json = r#"{"kind":"record","properties":[
        {"name":"a","optional":false,"type":{"kind":"primitive","name":"int"}},
        {"name":"a","optional":true,"type":{"kind":"primitive","name":"string"}}
    ]}"#;
    let err = from_json(&types, &pool(), json).expect_err("duplicate property");
    assert!(matches!(err, ImportError::DuplicateProperty(ref name) if name == "a"));
    assert_eq!(err.to_string(), "record property 'a' is declared more than once");
}

#[test]
fn test_union_export_independent_of_interning_order() {
    let first = TypeInterner::new();
    let ints = first.list(TypeId::INT);
    let strings = first.list(TypeId::STRING);
    let first_json = to_json(&first, first.union2(strings, ints)).expect("serializable");

    let second = TypeInterner::new();
    let strings = second.list(TypeId::STRING);
    let ints = second.list(TypeId::INT);
    let second_json = to_json(&second, second.union2(ints, strings)).expect("serializable");

    assert_eq!(first_json, second_json);
    assert!(first_json.find("\"int\"") < first_json.find("\"string\""));
}
