use crate::builders::*;
use crate::expr::Expr;
use crate::nodes::{SoyNode, SoyNodeKind};
use crate::utils::{all_nodes_of_kind, sameness_key, tagged_pairs};
use crate::{CommandTagAttribute, SoyTree};
use soyc_common::{ErrorReporter, SourceLocation};
use soyc_tree::{CopyState, NodeId};
use soyc_types::parse_type;

fn at() -> SourceLocation {
    SourceLocation::UNKNOWN
}

fn keyed_div(tree: &mut SoyTree) -> (NodeId, NodeId, NodeId) {
    let root = template(tree, at(), ".t");
    let open = open_tag(tree, at(), "div");
    let key = key(tree, at(), Expr::var("id"));
    tree.add_child(open, key);
    let close = close_tag(tree, at(), "div");
    pair_tags(tree, open, close);
    tree.add_children(root, [open, close]);
    (root, open, close)
}

#[test]
fn test_copy_is_structurally_equal_and_detached() {
    let mut tree = SoyTree::new();
    let file = file(&mut tree, "a.soy", "ns");
    let (root, _, _) = keyed_div(&mut tree);
    tree.add_child(file, root);

    let copy = tree.copy_subtree(root);
    assert_ne!(copy, root);
    assert_eq!(tree.parent(copy), None);
    assert_eq!(tree.to_source_string(copy), tree.to_source_string(root));

    let original_nodes = tree.descendants(root);
    let copied_nodes = tree.descendants(copy);
    assert_eq!(original_nodes.len(), copied_nodes.len());
    for (old, new) in original_nodes.iter().zip(&copied_nodes) {
        assert_ne!(old, new);
        assert_eq!(tree.payload(*old).kind(), tree.payload(*new).kind());
    }

    let again = tree.copy_subtree(copy);
    assert_eq!(tree.to_source_string(again), tree.to_source_string(root));
}

#[test]
fn test_tag_pairs_rebind_to_copies() {
    let mut tree = SoyTree::new();
    let (root, open, close) = keyed_div(&mut tree);

    let copy = tree.copy_subtree(root);
    let new_open = tree.child(copy, 0);
    let new_close = tree.child(copy, 1);

    assert_eq!(tagged_pairs(&tree, new_open), &[new_close]);
    assert_eq!(tagged_pairs(&tree, new_close), &[new_open]);
    // The original pairing is untouched.
    assert_eq!(tagged_pairs(&tree, open), &[close]);
    assert_eq!(tagged_pairs(&tree, close), &[open]);
}

#[test]
fn test_pairs_outside_the_copy_are_kept() {
    let mut tree = SoyTree::new();
    let (_, open, close) = keyed_div(&mut tree);

    let copy = tree.copy_subtree(open);
    assert_eq!(tagged_pairs(&tree, copy), &[close]);
    assert_eq!(tree.num_children(copy), 1);
}

#[test]
fn test_multiple_pairs_rebind_by_position() {
    let mut tree = SoyTree::new();
    let root = template(&mut tree, at(), ".t");
    let open = open_tag(&mut tree, at(), "li");
    let first_close = close_tag(&mut tree, at(), "li");
    let second_close = close_tag(&mut tree, at(), "li");
    pair_tags(&mut tree, open, first_close);
    pair_tags(&mut tree, open, second_close);
    tree.add_children(root, [open, first_close, second_close]);

    let copy = tree.copy_subtree(root);
    let copied = tree.children(copy).to_vec();
    assert_eq!(tagged_pairs(&tree, copied[0]), &[copied[1], copied[2]]);
    assert_eq!(tagged_pairs(&tree, copied[2]), &[copied[0]]);
}

#[test]
fn test_velog_sameness_key_follows_the_copy() {
    let mut tree = SoyTree::new();
    let mut reporter = ErrorReporter::new();
    let root = template(&mut tree, at(), ".t");
    let velog = velog(
        &mut tree,
        at(),
        Expr::var("ve"),
        vec![CommandTagAttribute::new("logonly", at(), Expr::Bool(true))],
        &mut reporter,
    );
    tree.add_child(root, velog);

    let copy = tree.copy_subtree(root);
    let new_velog = all_nodes_of_kind(&tree, copy, SoyNodeKind::VeLog)[0];
    let SoyNode::VeLog(node) = tree.payload(new_velog) else {
        panic!("expected a velog");
    };
    assert_eq!(node.sameness_key_node(), new_velog);
    assert_eq!(sameness_key(&tree, new_velog), sameness_key(&tree, velog));
}

#[test]
fn test_velog_copied_alone_keys_itself() {
    let mut tree = SoyTree::new();
    let mut reporter = ErrorReporter::new();
    let velog = velog(&mut tree, at(), Expr::var("ve"), vec![], &mut reporter);

    let mut state = CopyState::new();
    let copy = tree.copy(velog, &mut state);
    assert_eq!(state.pending_fixups(), 1);
    let SoyNode::VeLog(before) = tree.payload(copy) else {
        panic!("expected a velog");
    };
    // Phase 1 leaves the key on the original.
    assert_eq!(before.sameness_key_node(), velog);

    assert_eq!(state.finish(&mut tree), 1);
    let SoyNode::VeLog(after) = tree.payload(copy) else {
        panic!("expected a velog");
    };
    assert_eq!(after.sameness_key_node(), copy);
}

#[test]
fn test_const_type_annotation_is_deep_copied() {
    let mut tree = SoyTree::new();
    let mut reporter = ErrorReporter::new();
    let annotation = parse_type("map<string, list<int>>|null", &mut reporter).expect("parses");
    let node = constant(&mut tree, at(), "LOOKUP", Expr::Null, true, Some(annotation));

    let copy = tree.copy_subtree(node);
    let (SoyNode::Const(original), SoyNode::Const(copied)) =
        (tree.payload(node), tree.payload(copy))
    else {
        panic!("expected consts");
    };
    let original_type = original.type_node.as_ref().expect("annotated");
    let copied_type = copied.type_node.as_ref().expect("annotated");
    assert!(copied_type.structurally_equal(original_type));
    assert_eq!(copied.name, "LOOKUP");
    assert!(copied.exported);
}

#[test]
fn test_copy_two_roots_in_one_state() {
    let mut tree = SoyTree::new();
    let open = open_tag(&mut tree, at(), "p");
    let close = close_tag(&mut tree, at(), "p");
    pair_tags(&mut tree, open, close);

    let mut state = CopyState::new();
    let new_open = tree.copy(open, &mut state);
    let new_close = tree.copy(close, &mut state);
    assert_eq!(state.finish(&mut tree), 2);

    assert_eq!(tagged_pairs(&tree, new_open), &[new_close]);
    assert_eq!(tagged_pairs(&tree, new_close), &[new_open]);
}
