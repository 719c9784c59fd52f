use smallvec::SmallVec;
use sheaf_ir::{AddOp, CompareOp, Expr};
use sheaf_value::{EvalResult, EvaluateState, Number, Value};

use crate::errors::{division_by_zero, expected, incomparable, not_real};
use crate::{Evaluator, ValueResult};

impl Evaluator<'_> {
    fn number_operand(
        &self,
        expr: &Expr,
        state: &EvaluateState,
        sub_results: &mut Vec<ValueResult>,
    ) -> EvalResult<Number> {
        let value = self.operand(expr, state, sub_results)?;
        value.as_number().ok_or_else(|| expected("a number", &value))
    }

    pub(crate) fn eval_add_subtract(
        &self,
        operands: &[Expr],
        ops: &[AddOp],
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut total = Number::ZERO;
        for (i, operand) in operands.iter().enumerate() {
            let n = self.number_operand(operand, state, &mut sub_results)?;
            if i == 0 {
                total = n;
                continue;
            }
            let op = ops.get(i - 1).copied().unwrap_or(AddOp::Add);
            let next = match op {
                AddOp::Add => total.plus(n),
                AddOp::Subtract => total.minus(n),
            };
            total = next.ok_or_else(|| not_real(format!("{total} {} {n}", op.as_symbol())))?;
        }
        Ok(done(Value::Number(total), state, sub_results))
    }

    pub(crate) fn eval_times(&self, operands: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut product = Number::ONE;
        for operand in operands {
            let n = self.number_operand(operand, state, &mut sub_results)?;
            product = product
                .times(n)
                .ok_or_else(|| not_real(format!("{product} * {n}")))?;
        }
        Ok(done(Value::Number(product), state, sub_results))
    }

    pub(crate) fn eval_divide(
        &self,
        numerator: &Expr,
        denominator: &Expr,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let n = self.number_operand(numerator, state, &mut sub_results)?;
        let d = self.number_operand(denominator, state, &mut sub_results)?;
        if d.is_zero() {
            return Err(division_by_zero());
        }
        let quotient = n.divided_by(d).ok_or_else(|| not_real(format!("{n} / {d}")))?;
        Ok(done(Value::Number(quotient), state, sub_results))
    }

    pub(crate) fn eval_raise(
        &self,
        base: &Expr,
        exponent: &Expr,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let b = self.number_operand(base, state, &mut sub_results)?;
        let e = self.number_operand(exponent, state, &mut sub_results)?;
        let power = b.raised_to(e).ok_or_else(|| not_real(format!("{b} ^ {e}")))?;
        Ok(done(Value::Number(power), state, sub_results))
    }

    pub(crate) fn eval_concat(&self, operands: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut text = String::new();
        for operand in operands {
            let value = self.operand(operand, state, &mut sub_results)?;
            text.push_str(value.as_text().ok_or_else(|| expected("text", &value))?);
        }
        Ok(done(Value::text(text), state, sub_results))
    }

    /// Stops at the first false operand. Variables bound by `~` tests flow
    /// on to the operands after them and out of the chain when it holds.
    pub(crate) fn eval_and(&self, operands: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut current = state.clone();
        for operand in operands {
            let result = self.calculate_value(operand, &current)?;
            let holds = result
                .value
                .as_bool()
                .ok_or_else(|| expected("a boolean", &result.value))?;
            let next = result.state.clone();
            self.keep(result, &mut sub_results);
            if !holds {
                return Ok(done(Value::Boolean(false), state, sub_results));
            }
            current = next;
        }
        Ok(ValueResult::new(Value::Boolean(true), current).with_sub_results(sub_results))
    }

    /// Stops at the first true operand.
    pub(crate) fn eval_or(&self, operands: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        for operand in operands {
            if self.boolean_operand(operand, state, &mut sub_results)? {
                return Ok(done(Value::Boolean(true), state, sub_results));
            }
        }
        Ok(done(Value::Boolean(false), state, sub_results))
    }

    /// `a = b = c` holds when every operand equals the first.
    pub(crate) fn eval_equal(&self, operands: &[Expr], state: &EvaluateState) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(operands.len());
        for operand in operands {
            values.push(self.operand(operand, state, &mut sub_results)?);
        }
        let mut all_equal = true;
        if let Some((first, rest)) = values.split_first() {
            for value in rest {
                if !first.equals(value)? {
                    all_equal = false;
                    break;
                }
            }
        }
        Ok(done(Value::Boolean(all_equal), state, sub_results))
    }

    pub(crate) fn eval_not_equal(
        &self,
        left: &Expr,
        right: &Expr,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let l = self.operand(left, state, &mut sub_results)?;
        let r = self.operand(right, state, &mut sub_results)?;
        let differ = !l.equals(&r)?;
        Ok(done(Value::Boolean(differ), state, sub_results))
    }

    /// `a < b <= c` holds when every adjacent pair is in order.
    pub(crate) fn eval_comparison(
        &self,
        operands: &[Expr],
        ops: &[CompareOp],
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(operands.len());
        for operand in operands {
            values.push(self.operand(operand, state, &mut sub_results)?);
        }
        let mut holds = true;
        for (pair, op) in values.windows(2).zip(ops) {
            let ordering = pair[0]
                .compare(&pair[1])?
                .ok_or_else(|| incomparable(&pair[0], &pair[1]))?;
            if !op.holds(ordering) {
                holds = false;
                break;
            }
        }
        Ok(done(Value::Boolean(holds), state, sub_results))
    }

    /// `value ~ pattern`. When the pattern matches, the state it binds is
    /// the state after the node.
    pub(crate) fn eval_matches(
        &self,
        value: &Expr,
        pattern: &Expr,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let value = self.operand(value, state, &mut sub_results)?;
        Ok(match self.match_as_pattern(pattern, &value, state)? {
            Some(bound) => ValueResult::new(Value::Boolean(true), bound).with_sub_results(sub_results),
            None => done(Value::Boolean(false), state, sub_results),
        })
    }
}

/// A node's result that leaves the state as it was.
pub(super) fn done(value: Value, state: &EvaluateState, sub_results: Vec<ValueResult>) -> ValueResult {
    ValueResult::new(value, state.clone()).with_sub_results(sub_results)
}
