//! Accumulating store of diagnostics keyed by node.

use rustc_hash::FxHashMap;
use sheaf_ir::NodeId;

use crate::{Diagnostic, ErrorGuaranteed, QuickFix, Severity};

/// Diagnostics recorded during one check pass.
///
/// Recording is append-only: several diagnostics or fixes for the same node
/// accumulate in the order they were recorded. Fixes recorded separately
/// from their error are attached to the node's first error when the bag is
/// drained.
#[derive(Default, Debug)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    by_node: FxHashMap<NodeId, Vec<usize>>,
    pending_fixes: FxHashMap<NodeId, Vec<QuickFix>>,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `diagnostic` as an error, whatever severity it was built with,
    /// and get proof that it was recorded.
    pub fn report(&mut self, mut diagnostic: Diagnostic) -> ErrorGuaranteed {
        diagnostic.severity = Severity::Error;
        self.push(diagnostic);
        self.error_count += 1;
        ErrorGuaranteed::new()
    }

    /// Record a note.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.by_node
            .entry(diagnostic.node)
            .or_default()
            .push(self.diagnostics.len());
        self.diagnostics.push(diagnostic);
    }

    /// Record fixes for `node` without a new message.
    pub fn add_fixes(&mut self, node: NodeId, fixes: impl IntoIterator<Item = QuickFix>) {
        self.pending_fixes.entry(node).or_default().extend(fixes);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// All diagnostics in recording order, with separately recorded fixes
    /// merged into their node's first error.
    ///
    /// `limit` caps the number of errors returned (0 = unlimited); notes are
    /// always returned.
    pub fn into_diagnostics(self, limit: usize) -> Vec<Diagnostic> {
        let DiagnosticBag {
            mut diagnostics,
            by_node,
            mut pending_fixes,
            ..
        } = self;

        for (node, indices) in &by_node {
            let Some(fixes) = pending_fixes.remove(node) else {
                continue;
            };
            let first_error = indices.iter().copied().find(|&i| diagnostics[i].is_error());
            if let Some(i) = first_error.or_else(|| indices.first().copied()) {
                diagnostics[i].fixes.extend(fixes);
            }
        }

        let mut errors = 0;
        diagnostics.retain(|d| {
            if !d.is_error() {
                return true;
            }
            errors += 1;
            limit == 0 || errors <= limit
        });
        diagnostics
    }
}

#[cfg(test)]
mod tests;
