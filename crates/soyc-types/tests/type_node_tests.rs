use crate::ast::{TypeNode, TypeNodeKind};
use crate::parse_type;
use soyc_common::ErrorReporter;
use soyc_tree::{CopyState, NodeId, NodePayload};

/// Payload for a tree that only exists to drive `TypeNode::copy`.
struct Annotation;

impl NodePayload for Annotation {
    fn copy_payload(&self, _new_id: NodeId, _state: &mut CopyState<Self>) -> Self {
        Annotation
    }

    fn write_source_open(&self, _out: &mut String) {}
}

fn parse(text: &str) -> TypeNode {
    let mut reporter = ErrorReporter::new();
    parse_type(text, &mut reporter).expect("parse succeeded")
}

#[test]
fn test_copy_is_deep_and_equal() {
    let original = parse("template (a: list<int>, @b-c?: [x: string]) => html");
    let mut state = CopyState::<Annotation>::new();
    let copy = original.copy(&mut state);

    assert!(copy.structurally_equal(&original));
    assert_eq!(copy.to_string(), original.to_string());
    assert_eq!(copy.location, original.location);
    assert_eq!(state.pending_fixups(), 0);
}

#[test]
fn test_structural_equality_ignores_locations() {
    let spaced = parse("list< int >");
    let compact = parse("list<int>");
    assert_ne!(spaced.location, compact.location);
    assert!(spaced.structurally_equal(&compact));
    assert!(TypeNode::generic("list", vec![TypeNode::named("int")]).structurally_equal(&compact));
}

#[test]
fn test_structural_inequality() {
    let pairs = [
        ("int", "string"),
        ("list<int>", "set<int>"),
        ("int|string", "string|int"),
        ("[a: int]", "[a?: int]"),
        ("(a: int) => int", "(...a: int) => int"),
        ("template (a: int) => html", "template (a?: int) => html"),
        ("template (@a: int) => html", "template (a: int) => html"),
        ("(foo).bar", "(foo).baz"),
        ("'a'", "'b'"),
        ("null", "undefined"),
        ("a & b", "a|b"),
    ];
    for (left, right) in pairs {
        assert!(
            !parse(left).structurally_equal(&parse(right)),
            "{left:?} should differ from {right:?}"
        );
    }
}

#[test]
fn test_is_function_like() {
    assert!(parse("() => int").is_function_like());
    assert!(parse("template () => html").is_function_like());
    assert!(!parse("(int)").is_function_like());
    assert!(matches!(parse("(int)").kind, TypeNodeKind::Named(_)));
}
