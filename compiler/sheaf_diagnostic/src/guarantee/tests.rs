use sheaf_ir::{NodeId, Span};

use crate::{Diagnostic, DiagnosticBag, ErrorCode};

#[test]
fn reporting_gives_proof() {
    let mut bag = DiagnosticBag::new();
    let error = Diagnostic::error(ErrorCode::E4003, NodeId::from_raw(1), Span::DUMMY);
    let proof = bag.report(error);
    assert!(bag.has_errors());
    assert_eq!(proof, bag.report(Diagnostic::error(ErrorCode::E4003, NodeId::from_raw(2), Span::DUMMY)));
}

#[test]
fn displays_as_a_summary() {
    let mut bag = DiagnosticBag::new();
    let proof = bag.report(Diagnostic::error(ErrorCode::E4001, NodeId::from_raw(0), Span::DUMMY));
    assert_eq!(proof.to_string(), "error(s) emitted");
}
