//! Calls, lambdas and structured values.

use std::sync::Arc;

use sheaf_check::{implicit_arg_name, ImplicitLambda, Resolution};
use sheaf_ir::{Expr, ExprKind};
use sheaf_value::{EvalError, EvalResult, EvaluateState, FunctionValue, Value};

use super::operators::done;
use crate::errors::{expected, parameter_mismatch, unresolved};
use crate::{Evaluator, ValueResult};

impl Evaluator<'_> {
    pub(crate) fn eval_call(
        &self,
        function: &Expr,
        args: &[Expr],
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();

        // `Tag(value)` builds the tagged value directly.
        if let Some(Resolution::Tag(tag)) = self.checked().resolution(function.id) {
            let [arg] = args else {
                return Err(unresolved(function));
            };
            let payload = self.operand(arg, state, &mut sub_results)?;
            let value = Value::tagged(&tag.type_name, &tag.tag, tag.index, Some(payload));
            return Ok(done(value, state, sub_results));
        }

        let callee = self.calculate_value(function, state)?.value;
        let Value::Function(callee) = &callee else {
            return Err(expected("a function", &callee));
        };
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.argument(arg, state, &mut sub_results)?);
        }
        let result = callee.call(&values)?;
        Ok(done(result, state, sub_results))
    }

    /// An argument containing `?` is passed as a function of its holes.
    fn argument(
        &self,
        arg: &Expr,
        state: &EvaluateState,
        sub_results: &mut Vec<ValueResult>,
    ) -> EvalResult<Value> {
        match self.checked().implicit_lambda(arg.id) {
            Some(lambda) => Ok(Value::Function(self.implicit_closure(lambda, state))),
            None => self.operand(arg, state, sub_results),
        }
    }

    fn implicit_closure(&self, lambda: &ImplicitLambda, state: &EvaluateState) -> FunctionValue {
        let checked = self.checked().clone();
        let lambda = lambda.clone();
        let captured = state.clone();
        FunctionValue::new("?", lambda.params.len(), move |args| {
            let mut current = captured.clone();
            for (hole, arg) in lambda.params.iter().zip(args) {
                current = current.add(&implicit_arg_name(*hole), arg.clone())?;
            }
            Ok(Evaluator::new(&checked)
                .calculate_value(&lambda.body, &current)?
                .value)
        })
    }

    /// A closure over the variables in scope where the lambda is evaluated.
    /// Arguments are matched against the parameter patterns on each call.
    pub(crate) fn eval_lambda(&self, expr: &Expr, state: &EvaluateState) -> EvalResult<Value> {
        let Resolution::Lambda(lambda) = self.resolution(expr)? else {
            return Err(unresolved(expr));
        };
        let ExprKind::Lambda { params, .. } = &lambda.kind else {
            return Err(unresolved(expr));
        };
        let arity = params.len();
        let checked = self.checked().clone();
        let lambda = Arc::clone(lambda);
        let captured = state.clone();
        Ok(Value::Function(FunctionValue::new("function", arity, move |args| {
            let ExprKind::Lambda { params, body } = &lambda.kind else {
                return Err(EvalError::internal("lambda node is not a lambda"));
            };
            let evaluator = Evaluator::new(&checked);
            let mut current = captured.clone();
            for (param, arg) in params.iter().zip(args) {
                current = evaluator
                    .match_as_pattern(param, arg, &current)?
                    .ok_or_else(|| parameter_mismatch(arg))?;
            }
            Ok(evaluator.calculate_value(body, &current)?.value)
        })))
    }

    pub(crate) fn eval_field_access(
        &self,
        record: &Expr,
        field: &str,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let value = self.operand(record, state, &mut sub_results)?;
        let Value::Record(fields) = &value else {
            return Err(expected("a record", &value));
        };
        let field = fields
            .get(field)
            .cloned()
            .ok_or_else(|| EvalError::internal(format!("record has no field `{field}`")))?;
        Ok(done(field, state, sub_results))
    }

    pub(crate) fn eval_tuple(&self, items: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let values = self.operands(items, state, &mut sub_results)?;
        Ok(done(Value::tuple(values), state, sub_results))
    }

    pub(crate) fn eval_array(&self, items: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let values = self.operands(items, state, &mut sub_results)?;
        Ok(done(Value::list(values), state, sub_results))
    }

    pub(crate) fn eval_record(
        &self,
        fields: &[(String, Expr)],
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut values = Vec::with_capacity(fields.len());
        for (name, field) in fields {
            values.push((name.clone(), self.operand(field, state, &mut sub_results)?));
        }
        Ok(done(Value::record(values), state, sub_results))
    }

    fn operands(
        &self,
        items: &[Expr],
        state: &EvaluateState,
        sub_results: &mut Vec<ValueResult>,
    ) -> EvalResult<Vec<Value>> {
        items
            .iter()
            .map(|item| self.operand(item, state, sub_results))
            .collect()
    }
}
