//! Error constructors for the evaluator.
//!
//! User errors describe data that did not fit the formula. Everything else
//! here is an internal error: the checker accepted a tree that evaluation
//! cannot follow.

use sheaf_ir::Expr;
use sheaf_value::{EvalError, UserError, Value};

// User errors

pub fn no_matching_clause(value: &Value) -> EvalError {
    UserError::NoMatchingClause {
        value: value.to_string(),
    }
    .into()
}

pub fn definition_mismatch(value: &Value) -> EvalError {
    UserError::DefinitionMismatch {
        value: value.to_string(),
    }
    .into()
}

pub fn division_by_zero() -> EvalError {
    UserError::DivisionByZero.into()
}

pub fn not_real(operation: impl Into<String>) -> EvalError {
    UserError::NotReal {
        operation: operation.into(),
    }
    .into()
}

pub fn parameter_mismatch(value: &Value) -> EvalError {
    UserError::function("function", format!("argument {value} does not match its parameter")).into()
}

// Internal errors

#[cold]
pub fn unresolved(expr: &Expr) -> EvalError {
    EvalError::internal(format!(
        "{} (node {}) was not resolved by the checker",
        expr.describe(),
        expr.id.raw()
    ))
}

#[cold]
pub fn placeholder(expr: &Expr) -> EvalError {
    EvalError::internal(format!(
        "{} (node {}) cannot be evaluated",
        expr.describe(),
        expr.id.raw()
    ))
}

#[cold]
pub fn pattern_only(expr: &Expr) -> EvalError {
    EvalError::internal(format!(
        "{} (node {}) evaluated outside a pattern",
        expr.describe(),
        expr.id.raw()
    ))
}

#[cold]
pub fn expected(what: &str, found: &Value) -> EvalError {
    EvalError::internal(format!("expected {what} but found {}", found.kind_name()))
}

#[cold]
pub fn incomparable(left: &Value, right: &Value) -> EvalError {
    EvalError::internal(format!(
        "cannot order {} and {}",
        left.kind_name(),
        right.kind_name()
    ))
}
