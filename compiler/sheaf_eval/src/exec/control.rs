//! `@if`, `@match` and `@define`.

use sheaf_ir::{ClausePattern, Definition, Expr, MatchClause};
use sheaf_value::{EvalResult, EvaluateState, Value};

use super::operators::done;
use crate::errors::{definition_mismatch, expected, no_matching_clause};
use crate::{Evaluator, ValueResult};

impl Evaluator<'_> {
    /// Evaluates exactly one branch. The then branch sees the variables
    /// bound by `~` tests in the condition.
    pub(crate) fn eval_if(
        &self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let tested = self.calculate_value(condition, state)?;
        let holds = tested
            .value
            .as_bool()
            .ok_or_else(|| expected("a boolean", &tested.value))?;
        let branch_state = if holds { tested.state.clone() } else { state.clone() };
        self.keep(tested, &mut sub_results);

        let branch = if holds { then_branch } else { else_branch };
        let value = self.operand(branch, &branch_state, &mut sub_results)?;
        Ok(done(value, state, sub_results))
    }

    /// Tries clauses in order, and within a clause each alternative in
    /// order; the first alternative that matches (and whose guard holds)
    /// selects the outcome.
    pub(crate) fn eval_match(
        &self,
        scrutinee: &Expr,
        clauses: &[MatchClause],
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let value = self.operand(scrutinee, state, &mut sub_results)?;
        for clause in clauses {
            for alternative in &clause.patterns {
                let Some(bound) = self.match_alternative(alternative, &value, state)? else {
                    continue;
                };
                let outcome = self.operand(&clause.outcome, &bound, &mut sub_results)?;
                return Ok(done(outcome, state, sub_results));
            }
        }
        Err(no_matching_clause(&value))
    }

    fn match_alternative(
        &self,
        alternative: &ClausePattern,
        value: &Value,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        let Some(bound) = self.match_as_pattern(&alternative.pattern, value, state)? else {
            return Ok(None);
        };
        let Some(guard) = &alternative.guard else {
            return Ok(Some(bound));
        };
        let guarded = self.calculate_value(guard, &bound)?;
        match guarded.value.as_bool() {
            Some(true) => Ok(Some(guarded.state)),
            Some(false) => Ok(None),
            None => Err(expected("a boolean", &guarded.value)),
        }
    }

    /// Each definition's value must match its pattern; the body sees every
    /// variable bound on the way.
    pub(crate) fn eval_define(
        &self,
        definitions: &[Definition],
        body: &Expr,
        state: &EvaluateState,
    ) -> EvalResult<ValueResult> {
        let mut sub_results = Vec::new();
        let mut current = state.clone();
        for definition in definitions {
            // Annotations only constrain types.
            let Definition::Equal { pattern, value } = definition else {
                continue;
            };
            let value = self.operand(value, &current, &mut sub_results)?;
            current = self
                .match_as_pattern(pattern, &value, &current)?
                .ok_or_else(|| definition_mismatch(&value))?;
        }
        let value = self.operand(body, &current, &mut sub_results)?;
        Ok(done(value, state, sub_results))
    }
}
