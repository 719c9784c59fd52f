//! Variable environment for evaluation.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use sheaf_ir::is_wildcard_name;

use crate::{EvalError, Value};

/// Bound variables plus the index of the row being evaluated.
///
/// Persistent like the type-checking environment: `add` returns a new state
/// and the original stays valid. One state per row; states are never shared
/// between rows.
#[derive(Clone, Debug, Default)]
pub struct EvaluateState {
    vars: Arc<FxHashMap<String, Value>>,
    row: usize,
}

impl EvaluateState {
    pub fn new(row: usize) -> Self {
        EvaluateState {
            vars: Arc::default(),
            row,
        }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Bind `name`. The checker rejects duplicate names, so binding one
    /// twice here is an internal error; `_`-prefixed names are rebound.
    pub fn add(&self, name: &str, value: Value) -> Result<EvaluateState, EvalError> {
        if self.vars.contains_key(name) && !is_wildcard_name(name) {
            return Err(EvalError::internal(format!(
                "variable `{name}` bound twice during evaluation"
            )));
        }
        let mut vars = (*self.vars).clone();
        vars.insert(name.to_owned(), value);
        Ok(EvaluateState {
            vars: Arc::new(vars),
            row: self.row,
        })
    }

    /// Value of `name`. The checker rejects unbound names, so a missing
    /// variable here is an internal error.
    pub fn get(&self, name: &str) -> Result<&Value, EvalError> {
        self.vars
            .get(name)
            .ok_or_else(|| EvalError::internal(format!("variable `{name}` is not bound")))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
