use pretty_assertions::assert_eq;
use sheaf_ir::{Expr, ExprKind, Span};

use super::*;
use crate::ErrorCode;

fn error(node: u32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001, NodeId::from_raw(node), Span::DUMMY).with_message(message)
}

fn fix(node: u32, title: &str) -> QuickFix {
    QuickFix::new(title, NodeId::from_raw(node), || {
        Expr::synthetic(ExprKind::Missing)
    })
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

#[test]
fn errors_for_one_node_accumulate() {
    let mut bag = DiagnosticBag::new();
    let _ = bag.report(error(1, "first"));
    let _ = bag.report(error(1, "second"));
    assert!(bag.has_errors());
    assert_eq!(messages(&bag.into_diagnostics(0)), vec!["first", "second"]);
}

#[test]
fn notes_do_not_count_as_errors() {
    let mut bag = DiagnosticBag::new();
    let note = Diagnostic::note(ErrorCode::I0001, NodeId::from_raw(0), Span::DUMMY);
    bag.push(note);
    assert!(!bag.has_errors());
    assert_eq!(bag.into_diagnostics(0).len(), 1);
}

#[test]
fn pending_fixes_join_the_first_error() {
    let mut bag = DiagnosticBag::new();
    let _ = bag.report(error(2, "mismatch"));
    let _ = bag.report(error(2, "again"));
    bag.add_fixes(NodeId::from_raw(2), [fix(2, "a"), fix(2, "b")]);
    bag.add_fixes(NodeId::from_raw(2), [fix(2, "c")]);

    let diagnostics = bag.into_diagnostics(0);
    let titles: Vec<_> = diagnostics[0].fixes.iter().map(QuickFix::title).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    assert!(diagnostics[1].fixes.is_empty());
}

#[test]
fn fixes_without_an_error_join_a_note() {
    let mut bag = DiagnosticBag::new();
    bag.push(Diagnostic::note(ErrorCode::I0001, NodeId::from_raw(5), Span::DUMMY));
    bag.add_fixes(NodeId::from_raw(5), [fix(5, "insert unit")]);

    let diagnostics = bag.into_diagnostics(0);
    assert_eq!(diagnostics[0].fixes.len(), 1);
}

#[test]
fn limit_caps_errors_only() {
    let mut bag = DiagnosticBag::new();
    for i in 0..5 {
        let _ = bag.report(error(i, "e"));
    }
    bag.push(Diagnostic::note(ErrorCode::I0001, NodeId::from_raw(9), Span::DUMMY));

    let diagnostics = bag.into_diagnostics(2);
    assert_eq!(diagnostics.iter().filter(|d| d.is_error()).count(), 2);
    assert_eq!(diagnostics.len(), 3);
}

#[test]
fn report_forces_error_severity() {
    let mut bag = DiagnosticBag::new();
    let note = Diagnostic::note(ErrorCode::E2003, NodeId::from_raw(3), Span::DUMMY);
    let _guarantee = bag.report(note);
    assert!(bag.has_errors());
    assert!(bag.into_diagnostics(0).iter().all(Diagnostic::is_error));
}
