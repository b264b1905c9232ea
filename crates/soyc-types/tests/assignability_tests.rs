use crate::lower::{TypeLowering, TypeRegistry};
use crate::proto::{DescriptorPool, EnumDescriptor, MessageDescriptor};
use crate::types::*;
use crate::{AssignabilityChecker, AssignabilityMode, TypeInterner, parse_type};
use soyc_common::ErrorReporter;
use std::sync::Arc;

struct Fixture {
    types: TypeInterner,
    registry: TypeRegistry,
}

impl Fixture {
    fn new() -> Self {
        let mut pool = DescriptorPool::new();
        for name in ["example.Foo", "example.Bar"] {
            pool.add_message(MessageDescriptor::new(name, vec![]))
                .expect("fresh name");
        }
        for name in ["example.Color", "example.Size"] {
            pool.add_enum(EnumDescriptor::new(name, &[("DEFAULT", 0)]))
                .expect("fresh name");
        }
        Fixture {
            types: TypeInterner::new(),
            registry: TypeRegistry::new(Arc::new(pool)),
        }
    }

    fn resolve(&self, text: &str) -> TypeId {
        let mut reporter = ErrorReporter::new();
        let node = parse_type(text, &mut reporter).expect("parse succeeded");
        let id = TypeLowering::new(&self.types, &self.registry, &mut reporter).lower(&node);
        assert!(
            !reporter.has_errors(),
            "unexpected errors for {text:?}: {:?}",
            reporter.diagnostics()
        );
        id
    }

    fn assignable(&self, target: &str, source: &str) -> bool {
        self.types
            .is_assignable_from(self.resolve(target), self.resolve(source))
    }

    fn assert_assignable(&self, target: &str, source: &str) {
        assert!(self.assignable(target, source), "{target} should accept {source}");
    }

    fn assert_not_assignable(&self, target: &str, source: &str) {
        assert!(!self.assignable(target, source), "{target} should not accept {source}");
    }
}

const SAMPLE_TYPES: &[&str] = &[
    "int",
    "float",
    "string",
    "bool",
    "null",
    "undefined",
    "html",
    "html<div>",
    "uri",
    "list<int>",
    "map<string, ?>",
    "[a: int]",
    "(x: int) => string",
    "template (x: int) => html",
    "int|string",
    "'lit'",
    "example.Foo",
    "example.Color",
    "Message",
    "never",
    "?",
];

// =============================================================================
// Top, bottom and sentinels
// =============================================================================

#[test]
fn test_any_accepts_everything_and_never_is_accepted_everywhere() {
    let f = Fixture::new();
    for &t in SAMPLE_TYPES {
        f.assert_assignable("any", t);
        f.assert_assignable("?", t);
        f.assert_assignable(t, "never");
        f.assert_assignable(t, t);
    }
}

#[test]
fn test_error_is_assignable_both_ways() {
    let f = Fixture::new();
    for &t in SAMPLE_TYPES {
        let id = f.resolve(t);
        assert!(f.types.is_assignable_from(TypeId::ERROR, id), "{t}");
        assert!(f.types.is_assignable_from(id, TypeId::ERROR), "{t}");
    }
}

#[test]
fn test_unknown_source_by_mode() {
    let f = Fixture::new();
    let int = f.resolve("int");
    assert!(f.types.is_assignable_from(int, TypeId::UNKNOWN));
    assert!(!f.types.is_assignable_from_strict(int, TypeId::UNKNOWN));
    assert!(f.types.is_assignable_from_strict(TypeId::ANY, TypeId::UNKNOWN));
    assert!(f.types.is_assignable_from_strict(TypeId::UNKNOWN, TypeId::UNKNOWN));

    let list_of_unknown = f.resolve("list<?>");
    let list_of_int = f.resolve("list<int>");
    assert!(f.types.is_assignable_from(list_of_int, list_of_unknown));
    let mut strict = AssignabilityChecker::with_mode(&f.types, AssignabilityMode::Strict);
    assert!(!strict.is_assignable_from(list_of_int, list_of_unknown));
    assert!(strict.is_assignable_from(list_of_unknown, list_of_int));
}

#[test]
fn test_any_is_not_assignable_to_concrete_types() {
    let f = Fixture::new();
    f.assert_not_assignable("int", "any");
    f.assert_not_assignable("never", "int");
}

// =============================================================================
// Primitives and sanitized content
// =============================================================================

#[test]
fn test_distinct_primitives() {
    let f = Fixture::new();
    f.assert_not_assignable("int", "float");
    f.assert_not_assignable("float", "int");
    f.assert_not_assignable("string", "int");
    f.assert_not_assignable("bool", "null");
    f.assert_not_assignable("null", "undefined");
    f.assert_assignable("number", "int");
    f.assert_assignable("number", "float");
    f.assert_not_assignable("int", "number");
}

#[test]
fn test_html_and_elements() {
    let f = Fixture::new();
    f.assert_assignable("html", "html<div>");
    f.assert_assignable("html", "html<?>");
    f.assert_not_assignable("html<div>", "html");
    f.assert_not_assignable("html<div>", "html<span>");
    f.assert_assignable("html<?>", "html<div>");
    f.assert_assignable("html<div>", "html<any>");
    f.assert_not_assignable("html<any>", "html<div>");
    f.assert_not_assignable("html", "css");
}

#[test]
fn test_uri_accepts_trusted_resource_uri_only_one_way() {
    let f = Fixture::new();
    f.assert_assignable("uri", "trusted_resource_uri");
    f.assert_not_assignable("trusted_resource_uri", "uri");
    f.assert_not_assignable("js", "uri");
}

#[test]
fn test_literals() {
    let f = Fixture::new();
    f.assert_assignable("string", "'a'");
    f.assert_not_assignable("'a'", "string");
    f.assert_assignable("'a'", "'a'");
    f.assert_not_assignable("'a'", "'b'");
    f.assert_assignable("'a'|'b'", "'b'");
    f.assert_not_assignable("html", "'a'");
}

// =============================================================================
// Unions and intersections
// =============================================================================

#[test]
fn test_union_target_and_source() {
    let f = Fixture::new();
    f.assert_assignable("int|string", "int");
    f.assert_assignable("int|string|null", "int|null");
    f.assert_not_assignable("int|string", "int|null");
    f.assert_not_assignable("int", "int|string");
    f.assert_assignable("html|string", "html<div>|'x'");
}

#[test]
fn test_intersections() {
    let f = Fixture::new();
    f.assert_assignable("[a: int] & [b: string]", "[a: int, b: string]");
    f.assert_not_assignable("[a: int] & [b: string]", "[a: int]");
    f.assert_assignable("[a: int]", "[a: int] & [b: string]");
    f.assert_not_assignable("int", "[a: int] & [b: string]");
}

// =============================================================================
// Containers and shapes
// =============================================================================

#[test]
fn test_containers() {
    let f = Fixture::new();
    f.assert_assignable("list<int|string>", "list<int>");
    f.assert_not_assignable("list<int>", "list<int|string>");
    f.assert_not_assignable("list<int>", "set<int>");
    f.assert_assignable("iterable<int|null>", "list<int>");
    f.assert_assignable("iterable<int>", "set<int>");
    f.assert_not_assignable("list<int>", "iterable<int>");
    f.assert_assignable("map<string, int|null>", "map<string, int>");
    f.assert_not_assignable("map<int, int>", "map<string, int>");
    f.assert_not_assignable("map<string, int>", "legacy_object_map<string, int>");
    f.assert_assignable("legacy_object_map<string, ?>", "legacy_object_map<string, html>");
}

#[test]
fn test_records() {
    let f = Fixture::new();
    f.assert_assignable("[a: int]", "[a: int, b: string]");
    f.assert_not_assignable("[a: int, b: string]", "[a: int]");
    f.assert_assignable("[a: int, b?: string]", "[a: int]");
    f.assert_assignable("[a?: int]", "[a: int]");
    f.assert_not_assignable("[a: int]", "[a?: int]");
    f.assert_not_assignable("[a: int]", "[a: string]");
    f.assert_assignable("[a: int|null]", "[a: int]");
}

#[test]
fn test_functions() {
    let f = Fixture::new();
    f.assert_assignable("(x: int) => int|null", "(x: int|string) => int");
    f.assert_not_assignable("(x: int|string) => int", "(x: int) => int");
    f.assert_not_assignable("(x: int) => int", "(x: int) => string");
    f.assert_not_assignable("(x: int) => int", "(x: int, y: int) => int");
    f.assert_not_assignable("(x: int, y: int) => int", "(x: int) => int");
    f.assert_assignable("(x: int, y: int) => int", "(...rest: int) => int");
    f.assert_assignable("() => int", "(...rest: int) => int");
    f.assert_not_assignable("(x: string) => int", "(...rest: int) => int");
}

#[test]
fn test_templates() {
    let f = Fixture::new();
    f.assert_assignable("template (a: int) => html", "template (a: int|null) => html<div>");
    f.assert_not_assignable("template (a: int|null) => html", "template (a: int) => html");
    f.assert_assignable("template (a: int) => html", "template (a: int, b?: string) => html");
    f.assert_not_assignable("template (a: int) => html", "template (a: int, b: string) => html");
    f.assert_not_assignable("template (a: int, b: string) => html", "template (a: int) => html");
    f.assert_not_assignable("template (a?: int) => html", "template (a: int) => html");
    f.assert_assignable("template (a: int) => html", "template (a?: int) => html");
    f.assert_not_assignable("template (@a: int) => html", "template (a: int) => html");
    f.assert_not_assignable("template () => html", "template () => attributes");
}

// =============================================================================
// Protos
// =============================================================================

#[test]
fn test_proto_identity() {
    let f = Fixture::new();
    f.assert_assignable("example.Foo", "example.Foo");
    f.assert_not_assignable("example.Foo", "example.Bar");
    f.assert_assignable("Message", "example.Foo");
    f.assert_not_assignable("example.Foo", "Message");

    // Same name in a different pool is a different message.
    let mut other_pool = DescriptorPool::new();
    let other = other_pool
        .add_message(MessageDescriptor::new("example.Foo", vec![]))
        .expect("fresh name");
    let other_id = f.types.proto_message(other);
    assert!(!f.types.is_assignable_from(f.resolve("example.Foo"), other_id));
}

#[test]
fn test_enum_sentinels() {
    let f = Fixture::new();
    let color = f.resolve("example.Color");
    let size = f.resolve("example.Size");
    assert!(!f.types.is_assignable_from(color, size));
    for sentinel in [TypeId::ANY_ENUM, TypeId::UNKNOWN_ENUM] {
        assert!(f.types.is_assignable_from(color, sentinel));
        assert!(f.types.is_assignable_from(sentinel, size));
    }
    assert!(!f.types.is_assignable_from(TypeId::ANY_ENUM, TypeId::INT));
}
