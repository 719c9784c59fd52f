use pretty_assertions::assert_eq;

use super::*;

fn tree() -> Expr {
    // (a + 1) * b, with ids 0..=4 assigned bottom-up
    let mut ids = NodeIdGen::new();
    let mut node = |kind| Expr::new(ids.fresh(), Span::DUMMY, kind);
    let a = node(ExprKind::Ident("a".into()));
    let one = node(ExprKind::Number {
        text: "1".into(),
        unit: None,
    });
    let sum = node(ExprKind::AddSubtract {
        operands: vec![a, one],
        ops: vec![crate::AddOp::Add],
    });
    let b = node(ExprKind::Ident("b".into()));
    node(ExprKind::Times(vec![sum, b]))
}

#[test]
fn find_node_locates_nested_nodes() {
    let root = tree();
    let one = find_node(&root, NodeId::from_raw(1)).map(|e| &e.kind);
    assert_eq!(
        one,
        Some(&ExprKind::Number {
            text: "1".into(),
            unit: None
        })
    );
    assert!(find_node(&root, NodeId::from_raw(99)).is_none());
}

#[test]
fn ids_are_unique_and_max_is_root() {
    let root = tree();
    assert!(has_unique_ids(&root));
    assert_eq!(max_node_id(&root), Some(NodeId::from_raw(4)));
    assert_eq!(collect_ids(&root).len(), 5);
}

#[test]
fn replace_gives_fresh_ids_and_keeps_original() {
    let root = tree();
    let replacement = Expr::synthetic(ExprKind::Number {
        text: "2".into(),
        unit: None,
    });

    let edited = replace_node(&root, NodeId::from_raw(1), replacement).unwrap();

    assert!(has_unique_ids(&edited));
    assert_eq!(max_node_id(&edited), Some(NodeId::from_raw(5)));
    let new = find_node(&edited, NodeId::from_raw(5)).map(|e| &e.kind);
    assert_eq!(
        new,
        Some(&ExprKind::Number {
            text: "2".into(),
            unit: None
        })
    );
    // the original tree is untouched
    assert!(find_node(&root, NodeId::from_raw(5)).is_none());
    assert!(!same_structure(&root, &edited));
}

#[test]
fn replace_missing_target_is_none() {
    let root = tree();
    assert!(replace_node(&root, NodeId::from_raw(42), Expr::synthetic(ExprKind::Missing)).is_none());
}

#[test]
fn same_structure_ignores_ids_and_spans() {
    let a = tree();
    let mut ids = NodeIdGen::starting_after(Some(NodeId::from_raw(100)));
    let mut b = renumber(tree(), &mut ids);
    b.span = Span::new(3, 9);
    assert!(same_structure(&a, &b));
    assert_ne!(a, b);
}
