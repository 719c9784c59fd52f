//! Evaluation errors.
//!
//! # Categories
//!
//! - [`UserError`]: the data did not fit the formula (no match clause
//!   applied, division by zero, a function rejected its input). Aborts the
//!   current cell only.
//! - [`InternalError`]: the checker and evaluator disagree, e.g. a node that
//!   failed checking was evaluated. Always a bug; see [`InternalErrorPolicy`].

use std::fmt;

/// Result of evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl EvalError {
    /// Create an internal error, logging it.
    #[cold]
    pub fn internal(message: impl Into<String>) -> Self {
        EvalError::Internal(InternalError::new(message))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, EvalError::Internal(_))
    }
}

/// Data-dependent failure, reported to the user for one cell.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("no matching clause for {value}")]
    NoMatchingClause { value: String },

    #[error("value {value} did not match the pattern of its definition")]
    DefinitionMismatch { value: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{operation} has no real result")]
    NotReal { operation: String },

    #[error("{function}: {message}")]
    Function { function: String, message: String },

    #[error("index {index} is out of range for a list of {len} items")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("could not read row {row} of column {column}: {message}")]
    ColumnAccess {
        column: String,
        row: usize,
        message: String,
    },
}

impl UserError {
    pub fn function(function: &str, message: impl fmt::Display) -> Self {
        UserError::Function {
            function: function.to_owned(),
            message: message.to_string(),
        }
    }
}

/// A checker/evaluator invariant was broken.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("internal error, please report: {message}")]
pub struct InternalError {
    message: String,
}

impl InternalError {
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(%message, "internal evaluation error");
        InternalError { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What to do when evaluation hits an internal error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InternalErrorPolicy {
    /// Panic, so the bug is seen during development.
    Panic,
    /// Return the error to the caller like any other failure.
    Report,
}

impl Default for InternalErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            InternalErrorPolicy::Panic
        } else {
            InternalErrorPolicy::Report
        }
    }
}

impl InternalErrorPolicy {
    /// Apply the policy to an evaluation result.
    ///
    /// # Panics
    ///
    /// With [`InternalErrorPolicy::Panic`], when `result` is an internal error.
    pub fn apply<T>(self, result: EvalResult<T>) -> EvalResult<T> {
        match (self, result) {
            (InternalErrorPolicy::Panic, Err(EvalError::Internal(err))) => {
                panic!("{err}")
            }
            (_, result) => result,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "panic" => Some(InternalErrorPolicy::Panic),
            "report" => Some(InternalErrorPolicy::Report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            EvalError::from(UserError::DivisionByZero).to_string(),
            "division by zero"
        );
        assert_eq!(
            EvalError::internal("unbound variable `x`").to_string(),
            "internal error, please report: unbound variable `x`"
        );
    }

    #[test]
    fn report_policy_passes_errors_through() {
        let err: EvalResult<()> = Err(EvalError::internal("oops"));
        assert!(InternalErrorPolicy::Report.apply(err).is_err());
    }

    #[test]
    #[should_panic(expected = "internal error, please report: oops")]
    fn panic_policy_panics_on_internal_errors() {
        let err: EvalResult<()> = Err(EvalError::internal("oops"));
        let _ = InternalErrorPolicy::Panic.apply(err);
    }

    #[test]
    fn panic_policy_ignores_user_errors() {
        let err: EvalResult<()> = Err(UserError::DivisionByZero.into());
        assert!(InternalErrorPolicy::Panic.apply(err).is_err());
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(InternalErrorPolicy::parse("Panic"), Some(InternalErrorPolicy::Panic));
        assert_eq!(InternalErrorPolicy::parse("report"), Some(InternalErrorPolicy::Report));
        assert_eq!(InternalErrorPolicy::parse("ignore"), None);
    }
}
