use std::fmt;

use sheaf_ir::{NodeId, Span};

use crate::{ErrorCode, QuickFix};

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    /// Non-fatal information about a node, e.g. an inferred unit.
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A problem (or piece of information) attached to one node.
#[derive(Clone, Eq, PartialEq, Debug)]
#[must_use = "diagnostics should be recorded or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// Node the diagnostic is about.
    pub node: NodeId,
    /// Source location of `node`, dummy for trees built without source.
    pub span: Span,
    pub notes: Vec<String>,
    pub fixes: Vec<QuickFix>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity, node: NodeId, span: Span) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            node,
            span,
            notes: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode, node: NodeId, span: Span) -> Self {
        Self::new_with_severity(code, Severity::Error, node, span)
    }

    /// Create an informational note.
    pub fn note(code: ErrorCode, node: NodeId, span: Span) -> Self {
        Self::new_with_severity(code, Severity::Note, node, span)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check if this is an error rather than a note.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for fix in &self.fixes {
            write!(f, "\n  = fix: {}", fix.title())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
