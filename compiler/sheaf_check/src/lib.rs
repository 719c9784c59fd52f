//! Type checking for sheaf formulas.
//!
//! [`check`] infers the type of a formula tree and settles everything its
//! evaluation needs: which variable, tag, column or function each name
//! refers to, the concrete type of every node, and the instantiated
//! standard functions. The result is a [`CheckedExpression`], which is
//! immutable and can be evaluated for any number of rows in parallel.
//!
//! # Error recovery
//!
//! Checking does not stop at the first error. A failing node records a
//! diagnostic (with quick fixes where it can suggest an edit) and returns
//! an [`ErrorGuaranteed`](sheaf_diagnostic::ErrorGuaranteed); its siblings
//! are still checked, so one pass reports every independent problem.
//!
//! # Patterns
//!
//! Every node is checked either as a value or as a pattern ([`Kind`]).
//! Patterns bind variables by returning an extended [`TypeState`]; a node
//! that cannot destructure is compared for equality when used as a pattern.

mod checked;
mod checker;
mod recorder;

pub use checked::{implicit_arg_name, CheckedExpression, ImplicitLambda, Resolution, TagRef};
pub use checker::{destructures, CheckContext, CheckResult, Checked, Checker, Kind};
pub use recorder::{RecordedType, Recorder};

use sheaf_diagnostic::Diagnostic;
use sheaf_ir::Expr;
use sheaf_types::TypeState;
use tracing::debug_span;

/// Check `expr` with the variables in `base` in scope.
///
/// Returns every diagnostic on failure, errors first, limited to
/// `ctx.max_errors`.
pub fn check(
    expr: &Expr,
    ctx: CheckContext<'_>,
    base: &TypeState,
) -> Result<CheckedExpression, Vec<Diagnostic>> {
    let _span = debug_span!("check", root = expr.id.raw()).entered();
    let mut checker = Checker::new(ctx);
    let result = checker.check(expr, base, Kind::Expression);
    checker.finish(expr, result)
}
