//! Parse errors.

use sheaf_diagnostic::{Diagnostic, ErrorCode};
use sheaf_ir::{NodeId, Span};

/// The first problem found in a formula's text.
///
/// Parsing stops at the first error: the text is either typed by a user who
/// fixes one thing at a time or written by `save`, which never produces
/// errors.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        ParseError {
            code,
            span,
            message: message.into(),
        }
    }

    /// The error as a diagnostic, for rendering alongside type errors.
    ///
    /// No tree exists yet, so the diagnostic points at no node.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code, NodeId::PLACEHOLDER, self.span).with_message(&self.message)
    }
}

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;
