use pretty_assertions::assert_eq;
use sheaf_ir::{Expr, ExprKind};

use super::*;

#[test]
fn display_includes_code_notes_and_fixes() {
    let node = NodeId::from_raw(3);
    let mut diag = Diagnostic::error(ErrorCode::E2002, node, Span::new(0, 4))
        .with_message("units do not match: m and s")
        .with_note("left side is in m");
    diag.fixes.push(QuickFix::new("change to 2{m}", node, || {
        Expr::synthetic(ExprKind::Boolean(true))
    }));

    assert_eq!(
        diag.to_string(),
        "error [E2002]: units do not match: m and s\n  = note: left side is in m\n  = fix: change to 2{m}"
    );
    assert!(diag.is_error());
}

#[test]
fn notes_are_not_errors() {
    let diag = Diagnostic::note(ErrorCode::I0001, NodeId::from_raw(0), Span::DUMMY)
        .with_message("unit inferred as m");
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "note");
}
