use crate::ast::{LiteralTypeValue, RecordPropertyNode, TypeNode, TypeNodeKind};
use crate::types::ParameterKind;
use crate::{parse_type, parse_type_in_file};
use soyc_common::{ErrorReporter, SourceLocation};
use soyc_common::diagnostics::diagnostic_codes;
use std::sync::Arc;

fn parse(text: &str) -> TypeNode {
    let mut reporter = ErrorReporter::new();
    let node = parse_type(text, &mut reporter);
    assert!(
        !reporter.has_errors(),
        "unexpected errors for {text:?}: {:?}",
        reporter.diagnostics()
    );
    node.expect("parse succeeded")
}

fn parse_error(text: &str) -> ErrorReporter {
    let mut reporter = ErrorReporter::new();
    assert!(parse_type(text, &mut reporter).is_none(), "{text:?} should not parse");
    reporter
}

fn print(text: &str) -> String {
    parse(text).to_string()
}

fn assert_round_trips(text: &str) {
    let first = parse(text);
    let printed = first.to_string();
    let second = parse(&printed);
    assert!(
        first.structurally_equal(&second),
        "{text:?} printed as {printed:?}, which parses differently"
    );
    assert_eq!(second.to_string(), printed, "printing is not stable for {text:?}");
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_round_trip() {
    for text in [
        "int",
        "?",
        "list<list<list<list<int>>>>",
        "map<int, any>",
        "template (count: int) => html | template (count: int) => attributes",
        "list<string>",
        "map<string, list<int>>",
        "legacy_object_map<string, ?>",
        "int|string|null",
        "[a: int, b?: string]",
        "[]",
        "(x: int) => string",
        "() => html",
        "(...rest: string) => int",
        "template (p: int, @data-id: string, opt?: bool) => html",
        "template () => html<div>",
        "(a: int) => string|null",
        "(() => int)|string",
        "(a|b) & c",
        "a & b|c",
        "(a|b)|c",
        "foo.bar.Baz",
        "(foo).bar",
        "[a: int].a",
        "list<int>.length",
        "'it\\'s'",
        "\"double\"",
        "undefined|null",
        "html<any>",
        "html<?>",
        "list<(x: int) => int>",
        "template (\n  a: int,\n  b: string,\n  c: bool\n) => html",
        "(a: [x: int], b: list<string>, c: map<int, int>) => (y: int) => bool",
        "A & (B | C) & D",
        "(A & B) | (C & D)",
        "() => (string|null)",
        "template () => (string|null)",
        "(template () => string)|null",
        "'prop1' | 'prop2'",
        "(null).foo",
        "(undefined).x",
        "(true).x",
        "(1).x",
        "(1.5).x",
        "'text'.length",
    ] {
        assert_round_trips(text);
    }
}

#[test]
fn test_parenthesized_function_differs_from_function_returning_union() {
    let grouped = parse("(() => string)|null");
    let returning = parse("() => string|null");
    assert!(!grouped.structurally_equal(&returning));
    assert!(matches!(grouped.kind, TypeNodeKind::Union(_)));
    assert!(returning.is_function_like());
}

// =============================================================================
// Printing
// =============================================================================

#[test]
fn test_print_constructed_nodes() {
    let abc = || TypeNode::named("abc");
    let prop = |name: &str, optional: bool, type_name: &str| RecordPropertyNode {
        name: name.to_string(),
        name_location: SourceLocation::UNKNOWN,
        optional,
        type_node: TypeNode::named(type_name),
    };

    assert_eq!(TypeNode::generic("list", vec![abc()]).to_string(), "list<abc>");
    assert_eq!(
        TypeNode::synthetic(TypeNodeKind::Record(vec![prop("x", false, "abc")])).to_string(),
        "[x: abc]"
    );
    assert_eq!(
        TypeNode::synthetic(TypeNodeKind::Record(vec![
            prop("x", false, "abc"),
            prop("y", false, "def"),
            prop("z", false, "ghi"),
            prop("w", true, "jkl"),
        ]))
        .to_string(),
        "[x: abc, y: def, z: ghi, w?: jkl]"
    );
    assert_eq!(
        TypeNode::synthetic(TypeNodeKind::Union(vec![abc(), TypeNode::named("def")])).to_string(),
        "abc|def"
    );
    assert_eq!(
        TypeNode::synthetic(TypeNodeKind::Template {
            parameters: vec![],
            return_type: Box::new(TypeNode::named("html")),
        })
        .to_string(),
        "template () => html"
    );
}

#[test]
fn test_print_normalizes_spacing() {
    assert_eq!(print("map<string,int>"), "map<string, int>");
    assert_eq!(print("[a:int,b?:string]"), "[a: int, b?: string]");
    assert_eq!(print("a&b"), "a & b");
    assert_eq!(print("a | b"), "a|b");
    assert_eq!(print("(x:int)=>string"), "(x: int) => string");
}

#[test]
fn test_print_multiline_parameters() {
    assert_eq!(print("(a: int, b: int) => int"), "(a: int, b: int) => int");
    assert_eq!(
        print("(a: int, b: int, c: int) => int"),
        "(\n  a: int,\n  b: int,\n  c: int\n) => int"
    );
    assert_eq!(
        print("template (a: int, @b-c: string, d?: bool) => html"),
        "template (\n  a: int,\n  @b-c: string,\n  d?: bool\n) => html"
    );
    assert_eq!(
        print("template (a: int, d?: bool) => html"),
        "template (a: int, d?: bool) => html"
    );
}

#[test]
fn test_print_parenthesizes_ambiguous_candidates() {
    assert_eq!(print("(() => int)|null"), "(() => int)|null");
    assert_eq!(print("(template () => html) & x"), "(template () => html) & x");
    assert_eq!(print("a & (b|c)"), "a & (b|c)");
    assert_eq!(print("(a & b) & c"), "(a & b) & c");
    assert_eq!(print("(a & b)|c"), "a & b|c");
}

#[test]
fn test_print_indexed_literal_bases() {
    assert_eq!(print("(null).foo"), "(null).foo");
    assert_eq!(print("(undefined).x"), "(undefined).x");
    assert_eq!(print("(false).x"), "(false).x");
    assert_eq!(print("(1).x"), "(1).x");
    assert_eq!(print("('text').length"), "'text'.length");

    let indexed = parse("(true).x");
    let TypeNodeKind::Indexed { base, property } = &indexed.kind else {
        panic!("expected an indexed type, got {indexed:?}");
    };
    assert_eq!(property, "x");
    assert!(matches!(
        &base.kind,
        TypeNodeKind::Literal(LiteralTypeValue::Other(text)) if text == "true"
    ));
}

#[test]
fn test_print_literals() {
    assert_eq!(print("\"x\""), "'x'");
    assert_eq!(print("'a\\nb'"), "'a\\nb'");
    assert_eq!(print("null"), "null");
}

// =============================================================================
// Tree shape
// =============================================================================

#[test]
fn test_function_return_type_extends_over_union() {
    let node = parse("() => string|null");
    let TypeNodeKind::Function { return_type, .. } = &node.kind else {
        panic!("expected a function, got {node:?}");
    };
    assert!(matches!(return_type.kind, TypeNodeKind::Union(ref c) if c.len() == 2));
}

#[test]
fn test_template_parameter_names() {
    let node = parse("template (@data-item-id: string, title?: string) => html");
    let TypeNodeKind::Template { parameters, .. } = &node.kind else {
        panic!("expected a template, got {node:?}");
    };
    assert_eq!(parameters[0].name, "dataItemId");
    assert_eq!(parameters[0].source_name, "@data-item-id");
    assert_eq!(parameters[0].kind, ParameterKind::Attribute);
    assert!(parameters[0].required);
    assert_eq!(parameters[1].name, "title");
    assert_eq!(parameters[1].kind, ParameterKind::Param);
    assert!(!parameters[1].required);
}

#[test]
fn test_var_args_parameter() {
    let node = parse("(first: int, ...rest: string) => int");
    let TypeNodeKind::Function { parameters, .. } = &node.kind else {
        panic!("expected a function, got {node:?}");
    };
    assert!(!parameters[0].is_var_args);
    assert!(parameters[1].is_var_args);
    assert_eq!(parameters[1].source_name, "rest");
}

#[test]
fn test_dotted_name_is_one_name() {
    let node = parse("foo.bar.Baz");
    assert!(matches!(node.kind, TypeNodeKind::Named(ref n) if n == "foo.bar.Baz"));

    let node = parse("(foo).bar.baz");
    let TypeNodeKind::Indexed { base, property } = &node.kind else {
        panic!("expected an indexed type, got {node:?}");
    };
    assert_eq!(property, "baz");
    assert!(matches!(base.kind, TypeNodeKind::Indexed { ref property, .. } if property == "bar"));
}

#[test]
fn test_literal_values() {
    assert!(matches!(
        parse("null").kind,
        TypeNodeKind::Literal(LiteralTypeValue::Null)
    ));
    assert!(matches!(
        parse("'a'").kind,
        TypeNodeKind::Literal(LiteralTypeValue::String(ref s)) if s == "a"
    ));
    assert!(matches!(
        parse("42").kind,
        TypeNodeKind::Literal(LiteralTypeValue::Other(ref s)) if s == "42"
    ));
    assert!(matches!(
        parse("true").kind,
        TypeNodeKind::Literal(LiteralTypeValue::Other(ref s)) if s == "true"
    ));
}

#[test]
fn test_locations() {
    let mut reporter = ErrorReporter::new();
    let file: Arc<str> = Arc::from("a.soy");
    let node = parse_type_in_file("list<int>|null", Some(file.clone()), &mut reporter)
        .expect("parse succeeded");
    assert_eq!(node.location.file.as_deref(), Some("a.soy"));
    assert_eq!((node.location.start, node.location.end), (0, 14));

    let TypeNodeKind::Union(candidates) = &node.kind else {
        panic!("expected a union");
    };
    assert_eq!((candidates[0].location.start, candidates[0].location.end), (0, 9));
    assert_eq!((candidates[1].location.start, candidates[1].location.end), (10, 14));
}

// =============================================================================
// Syntax errors
// =============================================================================

#[test]
fn test_syntax_errors_are_reported() {
    for text in ["list<", "[a int]", "(a: int) =>", "int|", "map<int,>", "", "a b", "#"] {
        let reporter = parse_error(text);
        assert_eq!(reporter.error_count(), 1, "{text:?}");
        assert_eq!(
            reporter.diagnostics()[0].code,
            diagnostic_codes::TYPE_SYNTAX_ERROR,
            "{text:?}"
        );
    }
}

#[test]
fn test_unterminated_string() {
    let reporter = parse_error("'abc");
    assert_eq!(
        reporter.diagnostics()[0].message_text,
        "Expected a closing quote, found 'end of input'."
    );
}

#[test]
fn test_error_location_points_at_bad_token() {
    let reporter = parse_error("list<int;>");
    let diagnostic = &reporter.diagnostics()[0];
    assert_eq!(diagnostic.start, 8);
    assert_eq!(diagnostic.length, 1);
}

#[test]
fn test_deep_nesting_is_reported() {
    let text = format!("{}int{}", "list<".repeat(300), ">".repeat(300));
    let reporter = parse_error(&text);
    assert_eq!(reporter.diagnostics()[0].code, diagnostic_codes::TYPE_TOO_DEEP);
}
