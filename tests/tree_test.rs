//! Tests for NodeTree structural operations

use orgtree::domain::{
    DomainError, NodeEdit, NodeTree, Position, Priority, BRANCH_OFFSET, DEFAULT_POSITION,
    ROOT_TITLE,
};
use orgtree::util::testing::{init_test_setup, org_chart};
use rstest::rstest;

// ============================================================
// Construction
// ============================================================

#[test]
fn given_new_tree_then_holds_only_root_at_default_position() {
    init_test_setup();
    let tree = NodeTree::new();

    let root = tree.root().unwrap();
    let data = tree.data(root).unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(data.title.as_str(), ROOT_TITLE);
    assert_eq!(data.position, DEFAULT_POSITION);
    assert_eq!(data.priority, Priority::Low);
    assert_eq!(data.progress.value(), 0);
    assert_eq!(tree.top_level(), &[root]);
}

#[test]
fn given_empty_tree_then_has_no_root() {
    let tree = NodeTree::empty();
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.depth(), 0);
}

// ============================================================
// add_node / add_twin_branch
// ============================================================

#[test]
fn given_root_when_adding_node_and_twin_then_offsets_from_anchor() {
    // Arrange
    let mut tree = NodeTree::new();
    let root = tree.root().unwrap();

    // Act
    let a = tree.add_node(Some(root), "A").unwrap();
    let b = tree.add_twin_branch(Some(root), "B").unwrap();

    // Assert
    assert_eq!(tree.data(a).unwrap().position, Position::new(400.0, 200.0));
    assert_eq!(tree.data(b).unwrap().position, Position::new(400.0, 100.0));
    assert_eq!(tree.children(root), &[a, b]);
    assert_eq!(tree.parent(a), Some(root));
    assert_eq!(tree.registry(), &[root, a, b]);
}

#[test]
fn given_no_anchor_when_adding_then_new_top_level_at_default_position() {
    let mut tree = NodeTree::new();
    let root = tree.root().unwrap();

    let loose = tree.add_node(None, "Loose").unwrap();

    assert_eq!(tree.top_level(), &[root, loose]);
    assert_eq!(tree.parent(loose), None);
    assert_eq!(tree.data(loose).unwrap().position, DEFAULT_POSITION);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn given_blank_title_when_adding_then_no_op(#[case] title: &str) {
    let mut tree = NodeTree::new();
    let root = tree.root().unwrap();

    assert_eq!(tree.add_node(Some(root), title), None);
    assert_eq!(tree.add_twin_branch(Some(root), title), None);
    assert_eq!(tree.len(), 1);
    assert!(tree.children(root).is_empty());
}

#[test]
fn given_stale_anchor_when_adding_then_no_op() {
    let (mut tree, ids) = org_chart();
    tree.delete_node(ids.sales).unwrap();

    assert_eq!(tree.add_node(Some(ids.sales), "Ghost"), None);
    assert_eq!(tree.len(), 4);
}

#[test]
fn given_moved_anchor_when_adding_then_offsets_from_current_position() {
    let mut tree = NodeTree::new();
    let root = tree.root().unwrap();
    tree.place_node(root, Position::new(0.0, 0.0)).unwrap();

    let child = tree.add_node(Some(root), "Child").unwrap();

    assert_eq!(
        tree.data(child).unwrap().position,
        Position::new(BRANCH_OFFSET, BRANCH_OFFSET)
    );
}

// ============================================================
// move_node / place_node
// ============================================================

#[test]
fn given_parent_with_children_when_moving_then_only_parent_moves() {
    // Arrange
    let (mut tree, ids) = org_chart();
    let before: Vec<_> = tree
        .iter()
        .map(|(idx, node)| (idx, node.data.position))
        .collect();

    // Act
    let moved = tree.move_node(ids.engineering, -20.0, 40.0).unwrap();

    // Assert
    assert_eq!(moved, Position::new(380.0, 240.0));
    for (idx, position) in before {
        if idx != ids.engineering {
            assert_eq!(tree.data(idx).unwrap().position, position);
        }
    }
}

#[test]
fn given_unknown_node_when_moving_then_no_op() {
    let (mut tree, ids) = org_chart();
    tree.delete_node(ids.backend).unwrap();

    assert_eq!(
        tree.move_node(ids.backend, 10.0, 10.0),
        Err(DomainError::NodeNotFound)
    );
    assert_eq!(
        tree.place_node(ids.backend, Position::new(1.0, 1.0)),
        Err(DomainError::NodeNotFound)
    );
}

#[rstest]
#[case(f64::INFINITY, 0.0)]
#[case(0.0, f64::NEG_INFINITY)]
#[case(f64::NAN, 0.0)]
fn given_non_finite_offset_when_moving_then_rejected_and_unmoved(
    #[case] dx: f64,
    #[case] dy: f64,
) {
    let (mut tree, ids) = org_chart();

    let result = tree.move_node(ids.sales, dx, dy);

    assert!(matches!(result, Err(DomainError::InvalidPosition(_))));
    assert_eq!(
        tree.data(ids.sales).unwrap().position,
        Position::new(400.0, 100.0)
    );
}

#[test]
fn given_repeated_huge_moves_when_overflowing_then_last_finite_position_kept() {
    let (mut tree, ids) = org_chart();

    let first = tree.move_node(ids.root, 1e308, 0.0).unwrap();
    let second = tree.move_node(ids.root, 1e308, 0.0);

    assert!(first.is_finite());
    assert!(matches!(second, Err(DomainError::InvalidPosition(_))));
    assert_eq!(tree.data(ids.root).unwrap().position, first);
}

#[test]
fn given_non_finite_target_when_placing_then_rejected() {
    let (mut tree, ids) = org_chart();

    let result = tree.place_node(ids.root, Position::new(f64::NAN, 5.0));

    assert!(matches!(result, Err(DomainError::InvalidPosition(_))));
    assert_eq!(
        tree.data(ids.root).unwrap().position,
        DEFAULT_POSITION
    );
}

// ============================================================
// delete_node
// ============================================================

#[test]
fn given_root_with_children_when_deleting_root_then_children_become_top_level() {
    // Arrange
    let mut tree = NodeTree::new();
    let root = tree.root().unwrap();
    let a = tree.add_node(Some(root), "A").unwrap();
    let b = tree.add_twin_branch(Some(root), "B").unwrap();

    // Act
    let removed = tree.delete_node(root).unwrap();

    // Assert
    assert_eq!(removed.title.as_str(), "Root");
    assert_eq!(tree.root(), None);
    assert_eq!(tree.registry(), &[a, b]);
    assert_eq!(tree.top_level(), &[a, b]);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.parent(b), None);
}

#[test]
fn given_inner_node_when_deleting_then_absent_everywhere() {
    let (mut tree, ids) = org_chart();

    tree.delete_node(ids.engineering).unwrap();

    assert!(!tree.contains(ids.engineering));
    assert!(!tree.registry().contains(&ids.engineering));
    for (_, node) in tree.iter() {
        assert!(!node.children.contains(&ids.engineering));
    }
    assert_eq!(tree.children(ids.root), &[ids.sales]);
    assert_eq!(tree.top_level(), &[ids.root, ids.backend, ids.frontend]);
}

#[test]
fn given_deleted_node_when_deleting_again_then_no_op() {
    let (mut tree, ids) = org_chart();
    tree.delete_node(ids.frontend).unwrap();

    assert!(tree.delete_node(ids.frontend).is_none());
    assert_eq!(tree.len(), 4);
}

#[test]
fn given_top_level_leaf_when_deleting_then_removed_from_top_level() {
    let mut tree = NodeTree::new();
    let loose = tree.add_node(None, "Loose").unwrap();

    tree.delete_node(loose).unwrap();

    assert_eq!(tree.top_level().len(), 1);
    assert!(tree.root().is_some());
}

// ============================================================
// Payload edits
// ============================================================

#[test]
fn given_valid_edit_when_updating_then_fields_change() {
    let (mut tree, ids) = org_chart();

    tree.update_node(
        ids.sales,
        NodeEdit {
            title: Some("Sales EMEA".into()),
            text: Some("  Q3 targets  ".into()),
            people: Some(vec!["Ana".into(), "Bo".into()]),
            progress: Some(60),
            priority: Some(Priority::Urgent),
        },
    )
    .unwrap();

    let data = tree.data(ids.sales).unwrap();
    assert_eq!(data.title.as_str(), "Sales EMEA");
    assert_eq!(data.text, "Q3 targets");
    assert_eq!(data.people, vec!["Ana", "Bo"]);
    assert_eq!(data.progress.value(), 60);
    assert_eq!(data.priority, Priority::Urgent);
}

#[rstest]
#[case(NodeEdit { progress: Some(101), ..NodeEdit::default() }, DomainError::ProgressOutOfRange(101))]
#[case(NodeEdit { progress: Some(-1), ..NodeEdit::default() }, DomainError::ProgressOutOfRange(-1))]
#[case(NodeEdit { title: Some(" ".into()), ..NodeEdit::default() }, DomainError::EmptyTitle)]
fn given_invalid_edit_when_updating_then_rejected_and_unchanged(
    #[case] edit: NodeEdit,
    #[case] expected: DomainError,
) {
    let (mut tree, ids) = org_chart();
    let before = tree.data(ids.sales).unwrap().clone();

    let result = tree.update_node(ids.sales, edit);

    assert_eq!(result, Err(expected));
    assert_eq!(tree.data(ids.sales).unwrap(), &before);
}

#[test]
fn given_comments_when_editing_by_index_then_order_kept() {
    let (mut tree, ids) = org_chart();
    tree.add_comment(ids.backend, "first").unwrap();
    tree.add_comment(ids.backend, "second").unwrap();
    tree.add_comment(ids.backend, "third").unwrap();

    let old = tree.edit_comment(ids.backend, 1, "SECOND").unwrap();
    let removed = tree.remove_comment(ids.backend, 0).unwrap();

    assert_eq!(old, "second");
    assert_eq!(removed, "first");
    assert_eq!(tree.data(ids.backend).unwrap().comments, vec!["SECOND", "third"]);
}

#[test]
fn given_out_of_range_index_when_removing_comment_then_item_out_of_range() {
    let (mut tree, ids) = org_chart();
    tree.add_comment(ids.backend, "only").unwrap();

    let result = tree.remove_comment(ids.backend, 3);

    assert_eq!(
        result,
        Err(DomainError::ItemOutOfRange {
            kind: "comment",
            index: 3,
            len: 1
        })
    );
}

#[test]
fn given_files_when_replacing_then_slot_kept() {
    let (mut tree, ids) = org_chart();
    tree.attach_file(ids.frontend, "a.pdf").unwrap();
    tree.attach_file(ids.frontend, "b.pdf").unwrap();

    let old = tree.replace_file(ids.frontend, 0, "c.pdf").unwrap();
    let detached = tree.detach_file(ids.frontend, 1).unwrap();

    assert_eq!(old, "a.pdf");
    assert_eq!(detached, "b.pdf");
    assert_eq!(tree.data(ids.frontend).unwrap().files, vec!["c.pdf"]);
}

#[test]
fn given_text_when_clearing_then_empty() {
    let (mut tree, ids) = org_chart();
    tree.update_node(
        ids.root,
        NodeEdit {
            text: Some("notes".into()),
            ..NodeEdit::default()
        },
    )
    .unwrap();

    tree.clear_text(ids.root).unwrap();

    assert!(tree.data(ids.root).unwrap().text.is_empty());
}

#[test]
fn given_deleted_node_when_editing_then_node_not_found() {
    let (mut tree, ids) = org_chart();
    tree.delete_node(ids.sales).unwrap();

    assert_eq!(
        tree.add_comment(ids.sales, "late"),
        Err(DomainError::NodeNotFound)
    );
}

// ============================================================
// Traversal
// ============================================================

#[test]
fn given_org_chart_when_walking_preorder_then_depth_first() {
    let (tree, ids) = org_chart();

    let order: Vec<_> = tree.iter_preorder().map(|(idx, _)| idx).collect();

    assert_eq!(
        order,
        vec![ids.root, ids.engineering, ids.backend, ids.frontend, ids.sales]
    );
}

#[test]
fn given_org_chart_then_depth_and_leaves() {
    let (tree, ids) = org_chart();

    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.leaf_nodes(), vec![ids.backend, ids.frontend, ids.sales]);
}
