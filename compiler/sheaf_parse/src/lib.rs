//! Parser for the textual form of sheaf formulas.
//!
//! The text form exists so formulas can be stored and typed by hand; the
//! canonical rendering is produced by `sheaf_fmt::save`, and parsing that
//! rendering gives back a tree with the same structure. Keywords start with
//! `@`, identifiers may contain inner spaces, and operators of different
//! kinds may not share a bracket level (`1 + 2 * 3` parses to an
//! invalid-operators placeholder that the checker reports).

mod cursor;
mod error;
mod grammar;
mod lexer;

pub use error::{ParseError, ParseResult};

use sheaf_ir::{Expr, TypeExpr};

use crate::grammar::Parser;

/// Parse a formula.
///
/// # Errors
///
/// Returns the first syntax error found.
pub fn parse(text: &str) -> ParseResult<Expr> {
    let _span = tracing::debug_span!("parse", len = text.len()).entered();
    let tokens = lexer::lex(text).inspect_err(log_error)?;
    Parser::new(text, tokens).parse_formula().inspect_err(log_error)
}

/// Parse a type expression on its own, as written inside `type{...}`.
///
/// # Errors
///
/// Returns the first syntax error found.
pub fn parse_type(text: &str) -> ParseResult<TypeExpr> {
    let tokens = lexer::lex(text)?;
    Parser::new(text, tokens).parse_type()
}

fn log_error(err: &ParseError) {
    tracing::debug!(code = err.code.as_str(), span = ?err.span, "{}", err.message);
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
