//! Sheaf Formatter
//!
//! Renders formula trees back to the text that `sheaf_parse` reads.
//!
//! # Canonical form
//!
//! Every tree has exactly one rendering. Spacing is fixed (one space around
//! operators and after commas, none inside brackets), identifiers are
//! written as stored, and number literals keep the text they were written
//! with. An operator node directly inside another operator node is always
//! bracketed, since operators of different kinds may not share a bracket
//! level. Parsing the rendering gives back a tree with the same structure.
//!
//! # Modules
//!
//! - [`saver`]: Expression rendering
//! - [`syntax`]: Units, types and literal escapes

mod saver;
mod syntax;

pub use saver::Saver;

use sheaf_ir::Expr;

/// The canonical text of `expr`.
pub fn save(expr: &Expr) -> String {
    save_expr(expr, false)
}

/// The canonical text of `expr` in a context that brackets operator nodes.
pub fn save_expr(expr: &Expr, needs_brackets: bool) -> String {
    let mut saver = Saver::new();
    saver.expr(expr, needs_brackets);
    saver.output()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
