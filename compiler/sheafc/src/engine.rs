//! The engine: registries plus the check and evaluate entry points.
//!
//! An [`Engine`] owns the type and unit registries and the standard library,
//! and passes them explicitly to every check. A [`CheckedExpression`] it
//! returns is immutable, so [`Engine::evaluate_column`] evaluates rows in
//! parallel, each with its own fresh [`EvaluateState`].

use rayon::prelude::*;
use sheaf_check::{CheckContext, CheckedExpression};
use sheaf_diagnostic::Diagnostic;
use sheaf_eval::{Evaluator, StandardLibrary, ValueResult};
use sheaf_ir::{Expr, TypeExpr};
use sheaf_types::{DataType, TypeExprError, TypeManager, TypeState, UnitManager};
use sheaf_value::{ColumnLookup, EvalResult, EvaluateState, Value};

use crate::config::EngineConfig;
use crate::table;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not start {threads} evaluation threads: {source}")]
    ThreadPool {
        threads: usize,
        source: rayon::ThreadPoolBuildError,
    },
}

pub struct Engine {
    config: EngineConfig,
    types: TypeManager,
    units: UnitManager,
    library: StandardLibrary,
    /// Dedicated pool when a thread count is configured; otherwise rayon's
    /// global pool.
    pool: Option<rayon::ThreadPool>,
}

impl Engine {
    /// An engine with the built-in types and units.
    ///
    /// # Errors
    ///
    /// When the configured thread pool cannot be started.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let pool = match config.threads {
            0 => None,
            threads => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("sheaf-eval-{i}"))
                    .build()
                    .map_err(|source| EngineError::ThreadPool { threads, source })?,
            ),
        };
        Ok(Engine {
            config,
            types: TypeManager::new(),
            units: UnitManager::with_builtin_units(),
            library: StandardLibrary::new(),
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeManager {
        &self.types
    }

    /// Register tagged types here before checking formulas that use them.
    pub fn types_mut(&mut self) -> &mut TypeManager {
        &mut self.types
    }

    pub fn units(&self) -> &UnitManager {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut UnitManager {
        &mut self.units
    }

    pub fn library(&self) -> &StandardLibrary {
        &self.library
    }

    fn context<'a>(&'a self, columns: &'a dyn ColumnLookup) -> CheckContext<'a> {
        CheckContext {
            types: &self.types,
            units: &self.units,
            columns,
            functions: &self.library,
            max_errors: self.config.max_errors,
        }
    }

    /// Check `expr` against `columns` with no variables in scope.
    pub fn check(
        &self,
        expr: &Expr,
        columns: &dyn ColumnLookup,
    ) -> Result<CheckedExpression, Vec<Diagnostic>> {
        self.check_in(expr, columns, &TypeState::new())
    }

    /// Check `expr` with the variables of `base` in scope.
    pub fn check_in(
        &self,
        expr: &Expr,
        columns: &dyn ColumnLookup,
        base: &TypeState,
    ) -> Result<CheckedExpression, Vec<Diagnostic>> {
        sheaf_check::check(expr, self.context(columns), base)
    }

    /// Parse and check `text`. A syntax error is returned as the only
    /// diagnostic.
    pub fn check_text(
        &self,
        text: &str,
        columns: &dyn ColumnLookup,
    ) -> Result<CheckedExpression, Vec<Diagnostic>> {
        let expr = sheaf_parse::parse(text).map_err(|err| vec![err.to_diagnostic()])?;
        self.check(&expr, columns)
    }

    /// Resolve written type syntax against the engine's registries.
    pub fn resolve_type(&self, expr: &TypeExpr) -> Result<DataType, TypeExprError> {
        table::resolve_type(expr, &self.types, &self.units)
    }

    /// Evaluate `checked` for `state`'s row, explaining if configured.
    ///
    /// # Panics
    ///
    /// On an internal error, when the configured policy is to panic.
    pub fn evaluate_in(
        &self,
        checked: &CheckedExpression,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let result = Evaluator::new(checked)
            .explaining(self.config.explain)
            .calculate_value(checked.expr(), state);
        if let Err(err) = &result {
            if err.is_internal() {
                tracing::error!(row = state.row(), "internal error during evaluation: {err}");
            }
        }
        self.config.internal_errors.apply(result)
    }

    /// The value of `checked` at `row`.
    pub fn evaluate(&self, checked: &CheckedExpression, row: usize) -> EvalResult<Value> {
        self.evaluate_in(checked, &EvaluateState::new(row))
            .map(|result| result.value)
    }

    /// The value of `checked` for every row in `0..rows`, in row order.
    ///
    /// Rows run in parallel; a failing row only affects its own result.
    pub fn evaluate_column(
        &self,
        checked: &CheckedExpression,
        rows: usize,
    ) -> Vec<EvalResult<Value>> {
        let _span = tracing::debug_span!("evaluate_column", rows).entered();
        let run = || {
            (0..rows)
                .into_par_iter()
                .map(|row| self.evaluate(checked, row))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}
