//! Evaluation of checked sheaf formulas.
//!
//! [`evaluate`] computes the value of a [`CheckedExpression`] for one row.
//! The checked expression is read-only, so rows can be evaluated in
//! parallel, each with its own [`EvaluateState`].
//!
//! # Failures
//!
//! A formula that checked can still fail on particular data: no `@case`
//! matches, a division by zero, a function rejecting its input. These are
//! [`UserError`](sheaf_value::UserError)s and affect only the row being
//! evaluated. Anything the checker should have ruled out is an
//! [`InternalError`](sheaf_value::InternalError).
//!
//! # Standard library
//!
//! [`StandardLibrary`] is the [`FunctionLookup`](sheaf_value::FunctionLookup)
//! of the built-in functions (`abs`, `sum`, `map`, `convert unit`, ...).

pub mod errors;
mod exec;
mod interpreter;
mod stdlib;

pub use interpreter::{Evaluator, ValueResult};
pub use stdlib::StandardLibrary;

use sheaf_check::CheckedExpression;
use sheaf_value::{EvalResult, EvaluateState};
use tracing::trace_span;

/// Evaluate `checked` with the variables and row of `state`.
///
/// With `explain`, the result carries the results of every operand.
pub fn evaluate(
    checked: &CheckedExpression,
    state: &EvaluateState,
    explain: bool,
) -> EvalResult<ValueResult> {
    let _span = trace_span!("evaluate", row = state.row()).entered();
    Evaluator::new(checked)
        .explaining(explain)
        .calculate_value(checked.expr(), state)
}
