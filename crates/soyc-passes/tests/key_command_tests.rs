use crate::test_utils::*;
use crate::{CompilerFilePass, KeyCommandPass};
use soyc_common::ErrorReporter;
use soyc_common::diagnostics::diagnostic_codes;
use soyc_soytree::builders::*;
use soyc_soytree::{Expr, SoyTree};
use soyc_tree::NodeId;
use soyc_types::{TypeId, TypeInterner};

fn run(types: &TypeInterner, tree: &mut SoyTree, file: NodeId) -> ErrorReporter {
    let mut reporter = ErrorReporter::new();
    KeyCommandPass::new(types).run(tree, file, &mut reporter);
    reporter
}

#[test]
fn test_literal_keys_are_accepted() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    keyed_element(&mut tree, main, "div", Expr::string("a"));
    keyed_element(&mut tree, main, "li", Expr::Int(3));

    let reporter = run(&types, &mut tree, file);
    assert!(reporter.diagnostics().is_empty(), "{:?}", reporter.diagnostics());
}

#[test]
fn test_key_outside_open_tag() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let stray = key(&mut tree, loc("t.soy", 50, 60), Expr::string("a"));
    tree.add_child(main, stray);

    let reporter = run(&types, &mut tree, file);
    assert_eq!(codes(&reporter), vec![diagnostic_codes::KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG]);
    assert_eq!(reporter.diagnostics()[0].start, 50);
    assert!(messages(&reporter)[0].starts_with("The `key` command must be directly nested"));
}

#[test]
fn test_key_nested_below_the_tag() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let open = open_tag(&mut tree, loc("t.soy", 0, 5), "div");
    let class = attribute(&mut tree, loc("t.soy", 5, 10), "class", None);
    tree.add_child(open, class);
    let nested = key(&mut tree, loc("t.soy", 6, 9), Expr::string("a"));
    tree.add_child(class, nested);
    tree.add_child(main, open);

    let reporter = run(&types, &mut tree, file);
    assert_eq!(codes(&reporter), vec![diagnostic_codes::KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG]);
}

#[test]
fn test_open_tag_with_several_close_tags_is_ambiguous() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let (open, key, _) = keyed_element(&mut tree, main, "div", Expr::string("a"));
    let other_close = close_tag(&mut tree, loc("t.soy", 200, 206), "div");
    pair_tags(&mut tree, open, other_close);
    tree.add_child(main, other_close);

    let reporter = run(&types, &mut tree, file);
    assert_eq!(codes(&reporter), vec![diagnostic_codes::KEY_ELEMENT_AMBIGUOUS]);
    assert_eq!(reporter.diagnostics()[0].start, tree.location(key).start);
}

#[test]
fn test_close_tag_shared_by_several_open_tags_is_ambiguous() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let (open, _, close) = keyed_element(&mut tree, main, "div", Expr::string("a"));
    let other_open = open_tag(&mut tree, loc("t.soy", 300, 305), "div");
    if let soyc_soytree::SoyNode::HtmlCloseTag(tag) = tree.payload_mut(close) {
        tag.tagged_pairs.push(other_open);
    }
    tree.add_child(main, other_open);

    let reporter = run(&types, &mut tree, file);
    assert_eq!(codes(&reporter), vec![diagnostic_codes::KEY_ELEMENT_AMBIGUOUS]);
    // Reported on the open tag rather than the key.
    assert_eq!(reporter.diagnostics()[0].start, tree.location(open).start);
}

#[test]
fn test_unpaired_open_tag_is_fine() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let input = self_closing_tag(&mut tree, loc("t.soy", 0, 10), "input");
    let key = key(&mut tree, loc("t.soy", 6, 9), Expr::Int(1));
    tree.add_child(input, key);
    tree.add_child(main, input);

    assert!(run(&types, &mut tree, file).diagnostics().is_empty());
}

#[test]
fn test_deprecated_key_attribute() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let (open, _, _) = keyed_element(&mut tree, main, "div", Expr::string("a"));
    let attribute = attribute(&mut tree, loc("t.soy", 101, 104), "key", Some("b"));
    tree.add_child_at(open, 0, attribute);

    let reporter = run(&types, &mut tree, file);
    assert_eq!(codes(&reporter), vec![diagnostic_codes::DUPLICATE_KEY_ATTR]);
    assert_eq!(reporter.diagnostics()[0].start, 101);
    assert_eq!(
        messages(&reporter),
        vec!["The key attribute is deprecated. Instead, use the {key} command."]
    );
}

#[test]
fn test_key_types() {
    let types = TypeInterner::new();
    let nullable_int = types.union2(TypeId::INT, TypeId::NULL);
    let string_or_bool = types.union2(TypeId::STRING, TypeId::BOOL);
    let cases = [
        (Expr::typed_var("s", TypeId::STRING), true),
        (Expr::typed_var("i", TypeId::INT), true),
        (Expr::typed_var("n", nullable_int), true),
        (Expr::typed_var("u", string_or_bool), true),
        (Expr::typed_var("a", TypeId::ANY), true),
        (Expr::var("untyped"), true),
        (Expr::typed_var("f", TypeId::FLOAT), false),
        (Expr::typed_var("b", TypeId::BOOL), false),
        (Expr::typed_var("l", types.list(TypeId::STRING)), false),
        (Expr::typed_var("lit", types.literal_string("x")), false),
        (Expr::Bool(true), false),
        (Expr::Float(1.5), false),
        (Expr::Null, false),
        (Expr::Other("$a + $b".to_string()), false),
    ];

    for (expr, supported) in cases {
        let mut tree = SoyTree::new();
        let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
        let text = expr.to_string();
        keyed_element(&mut tree, main, "div", expr);
        let reporter = run(&types, &mut tree, file);
        let expected = if supported {
            vec![]
        } else {
            vec![diagnostic_codes::UNSUPPORTED_KEY_TYPE]
        };
        assert_eq!(codes(&reporter), expected, "key {text}");
    }
}

#[test]
fn test_all_problems_are_reported() {
    let types = TypeInterner::new();
    let mut tree = SoyTree::new();
    let (file, main) = file_with_template(&mut tree, "t.soy", "ns");
    let stray = key(&mut tree, loc("t.soy", 1, 2), Expr::Bool(false));
    tree.add_child(main, stray);
    let (open, _, _) = keyed_element(&mut tree, main, "div", Expr::Null);
    let attribute = attribute(&mut tree, loc("t.soy", 3, 4), "key", None);
    tree.add_child(open, attribute);

    let reporter = run(&types, &mut tree, file);
    assert_eq!(
        codes(&reporter),
        vec![
            diagnostic_codes::KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG,
            diagnostic_codes::UNSUPPORTED_KEY_TYPE,
            diagnostic_codes::DUPLICATE_KEY_ATTR,
            diagnostic_codes::UNSUPPORTED_KEY_TYPE,
        ]
    );
}
