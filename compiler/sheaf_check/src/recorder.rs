//! Error and quick-fix recorder.

use rustc_hash::FxHashMap;
use sheaf_diagnostic::{Diagnostic, DiagnosticBag, ErrorGuaranteed, QuickFix};
use sheaf_ir::NodeId;
use sheaf_types::TypeTerm;

/// A type together with the node that produced it, so errors found while
/// unifying it can be attached to that node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedType {
    pub node: NodeId,
    pub ty: TypeTerm,
}

/// Everything a check pass learns about nodes besides their settled
/// annotations: errors, fixes, information, and the term each node checked
/// to.
///
/// Recording accumulates. A second error for a node is added next to the
/// first, and fixes recorded separately join the node's first error.
#[derive(Debug, Default)]
pub struct Recorder {
    bag: DiagnosticBag,
    types: FxHashMap<NodeId, TypeTerm>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        self.bag.report(diagnostic)
    }

    pub fn record_quick_fixes(&mut self, node: NodeId, fixes: impl IntoIterator<Item = QuickFix>) {
        self.bag.add_fixes(node, fixes);
    }

    /// Remember the term `node` checked to. The first term recorded for a
    /// node is kept.
    pub fn record_type(&mut self, node: NodeId, ty: TypeTerm) -> RecordedType {
        let ty = self.types.entry(node).or_insert(ty).clone();
        RecordedType { node, ty }
    }

    /// Record a note that does not make the check fail.
    pub fn record_information(&mut self, diagnostic: Diagnostic) {
        self.bag.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.bag.has_errors()
    }

    pub(crate) fn types(&self) -> impl Iterator<Item = (NodeId, &TypeTerm)> {
        self.types.iter().map(|(node, ty)| (*node, ty))
    }

    pub(crate) fn into_diagnostics(self, limit: usize) -> Vec<Diagnostic> {
        self.bag.into_diagnostics(limit)
    }
}

#[cfg(test)]
mod tests {
    use sheaf_diagnostic::ErrorCode;
    use sheaf_ir::{Expr, ExprKind, Span};

    use super::*;

    #[test]
    fn errors_and_fixes_accumulate_per_node() {
        let node = NodeId::from_raw(4);
        let mut recorder = Recorder::new();
        let _ = recorder.record_error(
            Diagnostic::error(ErrorCode::E2001, node, Span::DUMMY).with_message("first"),
        );
        let _ = recorder.record_error(
            Diagnostic::error(ErrorCode::E2002, node, Span::DUMMY).with_message("second"),
        );
        recorder.record_quick_fixes(
            node,
            [QuickFix::new("fill in", node, || Expr::synthetic(ExprKind::Missing))],
        );
        assert!(recorder.has_errors());

        let diagnostics = recorder.into_diagnostics(0);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].fixes.len(), 1);
        assert!(diagnostics[1].fixes.is_empty());
    }

    #[test]
    fn first_recorded_type_wins() {
        let node = NodeId::from_raw(0);
        let mut recorder = Recorder::new();
        recorder.record_type(node, TypeTerm::Text);
        let again = recorder.record_type(node, TypeTerm::Boolean);
        assert_eq!(again.ty, TypeTerm::Text);
    }
}
