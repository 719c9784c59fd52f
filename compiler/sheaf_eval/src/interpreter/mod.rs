//! Tree-walking evaluator over checked formulas.
//!
//! Every name was settled by the checker, so evaluation only reads the
//! [`CheckedExpression`]: which variable, tag, column or function instance a
//! node refers to. A node the checker did not settle is an internal error.
//!
//! The [`Evaluator`] is a pair of shared references and holds no state of
//! its own. Variables live in the [`EvaluateState`] passed down the tree, so
//! one evaluator can be used from many threads at once, each evaluating
//! its own row.

use sheaf_check::{implicit_arg_name, CheckedExpression, Resolution, TagRef};
use sheaf_ir::{Expr, ExprKind};
use sheaf_stack::ensure_sufficient_stack;
use sheaf_value::{EvalResult, EvaluateState, FunctionValue, Value};

use crate::errors::{expected, pattern_only, placeholder, unresolved};

/// What evaluating one node produced.
#[derive(Clone, Debug)]
pub struct ValueResult {
    pub value: Value,
    /// Variables in scope after the node. Only `~` tests (and `&` chains
    /// of them) extend the state they were given.
    pub state: EvaluateState,
    /// Results of the node's operands, in evaluation order. Empty unless
    /// the evaluator is explaining.
    pub sub_results: Vec<ValueResult>,
}

impl ValueResult {
    pub fn new(value: Value, state: EvaluateState) -> Self {
        ValueResult {
            value,
            state,
            sub_results: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn with_sub_results(mut self, sub_results: Vec<ValueResult>) -> Self {
        self.sub_results = sub_results;
        self
    }
}

/// Evaluates the nodes of one checked formula.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'c> {
    checked: &'c CheckedExpression,
    explain: bool,
}

impl<'c> Evaluator<'c> {
    pub fn new(checked: &'c CheckedExpression) -> Self {
        Evaluator {
            checked,
            explain: false,
        }
    }

    /// Record operand results in [`ValueResult::sub_results`].
    #[must_use]
    pub fn explaining(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn checked(&self) -> &'c CheckedExpression {
        self.checked
    }

    /// Evaluate `expr` as a value.
    pub fn calculate_value(&self, expr: &Expr, state: &EvaluateState) -> EvalResult<ValueResult> {
        ensure_sufficient_stack(|| self.calculate_inner(expr, state))
    }

    pub(crate) fn resolution(&self, expr: &Expr) -> EvalResult<&'c Resolution> {
        self.checked.resolution(expr.id).ok_or_else(|| unresolved(expr))
    }

    /// Evaluate an operand for its value, keeping its result when
    /// explaining.
    pub(crate) fn operand(
        &self,
        expr: &Expr,
        state: &EvaluateState,
        sub_results: &mut Vec<ValueResult>,
    ) -> EvalResult<Value> {
        let result = self.calculate_value(expr, state)?;
        let value = result.value.clone();
        if self.explain {
            sub_results.push(result);
        }
        Ok(value)
    }

    pub(crate) fn boolean_operand(
        &self,
        expr: &Expr,
        state: &EvaluateState,
        sub_results: &mut Vec<ValueResult>,
    ) -> EvalResult<bool> {
        let value = self.operand(expr, state, sub_results)?;
        value.as_bool().ok_or_else(|| expected("a boolean", &value))
    }

    /// Keep `result` as a sub-result when explaining.
    pub(crate) fn keep(&self, result: ValueResult, sub_results: &mut Vec<ValueResult>) {
        if self.explain {
            sub_results.push(result);
        }
    }

    fn calculate_inner(&self, expr: &Expr, state: &EvaluateState) -> EvalResult<ValueResult> {
        let leaf = |value: Value| -> EvalResult<ValueResult> {
            Ok(ValueResult::new(value, state.clone()))
        };
        match &expr.kind {
            ExprKind::Boolean(_)
            | ExprKind::Number { .. }
            | ExprKind::Text(_)
            | ExprKind::Temporal { .. }
            | ExprKind::UnitLiteral(_)
            | ExprKind::TypeLiteral(_) => match self.resolution(expr)? {
                Resolution::Constant(value) => leaf(value.clone()),
                _ => Err(unresolved(expr)),
            },

            ExprKind::Ident(name) => leaf(self.eval_ident(expr, name, state)?),
            ExprKind::Constructor { .. } => match self.resolution(expr)? {
                Resolution::Tag(tag) => leaf(tag_value(tag)),
                _ => Err(unresolved(expr)),
            },
            ExprKind::ImplicitArg => leaf(state.get(&implicit_arg_name(expr.id))?.clone()),
            ExprKind::Column(_) => match self.resolution(expr)? {
                Resolution::Column(info) => leaf(info.cell(state.row())?),
                _ => Err(unresolved(expr)),
            },
            ExprKind::EntireColumn(_) => match self.resolution(expr)? {
                Resolution::EntireColumn(info) => leaf(Value::List(info.whole())),
                _ => Err(unresolved(expr)),
            },
            ExprKind::Table(_) => match self.resolution(expr)? {
                Resolution::Table(info) => leaf(Value::List(info.rows())),
                _ => Err(unresolved(expr)),
            },
            ExprKind::Wildcard | ExprKind::PlusMinus { .. } => Err(pattern_only(expr)),

            ExprKind::AddSubtract { operands, ops } => self.eval_add_subtract(operands, ops, state),
            ExprKind::Times(operands) => self.eval_times(operands, state),
            ExprKind::Divide {
                numerator,
                denominator,
            } => self.eval_divide(numerator, denominator, state),
            ExprKind::Raise { base, exponent } => self.eval_raise(base, exponent, state),
            ExprKind::Concat(operands) => self.eval_concat(operands, state),
            ExprKind::And(operands) => self.eval_and(operands, state),
            ExprKind::Or(operands) => self.eval_or(operands, state),
            ExprKind::Equal(operands) => self.eval_equal(operands, state),
            ExprKind::NotEqual { left, right } => self.eval_not_equal(left, right, state),
            ExprKind::Comparison { operands, ops } => self.eval_comparison(operands, ops, state),
            ExprKind::Matches { value, pattern } => self.eval_matches(value, pattern, state),

            ExprKind::Call { function, args } => self.eval_call(function, args, state),
            ExprKind::FieldAccess { record, field } => self.eval_field_access(record, field, state),
            ExprKind::Tuple(items) => self.eval_tuple(items, state),
            ExprKind::Record(fields) => self.eval_record(fields, state),
            ExprKind::Array(items) => self.eval_array(items, state),
            ExprKind::Lambda { .. } => leaf(self.eval_lambda(expr, state)?),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.eval_if(condition, then_branch, else_branch, state),
            ExprKind::Match { scrutinee, clauses } => self.eval_match(scrutinee, clauses, state),
            ExprKind::Define { definitions, body } => self.eval_define(definitions, body, state),

            ExprKind::InvalidOperators { .. }
            | ExprKind::InvalidIdent(_)
            | ExprKind::Invalid(_)
            | ExprKind::Missing => Err(placeholder(expr)),
        }
    }

    fn eval_ident(&self, expr: &Expr, name: &str, state: &EvaluateState) -> EvalResult<Value> {
        match self.resolution(expr)? {
            Resolution::Variable => state.get(name).cloned(),
            Resolution::Tag(tag) => Ok(tag_value(tag)),
            Resolution::Function(function) => Ok(Value::Function(function.clone())),
            _ => Err(unresolved(expr)),
        }
    }
}

/// A tag used as a value: the tagged value itself, or for a tag that
/// carries a payload, the function building one.
pub(crate) fn tag_value(tag: &TagRef) -> Value {
    if !tag.has_payload {
        return Value::tagged(&tag.type_name, &tag.tag, tag.index, None);
    }
    let name = tag.tag.clone();
    let tag = tag.clone();
    Value::Function(FunctionValue::new(&name, 1, move |args| {
        Ok(Value::tagged(
            &tag.type_name,
            &tag.tag,
            tag.index,
            args.first().cloned(),
        ))
    }))
}
