use sheaf_check::{destructures, Resolution, TagRef};
use sheaf_ir::{Expr, ExprKind};
use sheaf_stack::ensure_sufficient_stack;
use sheaf_value::{EvalError, EvalResult, EvaluateState, Value};

use crate::errors::{expected, placeholder, unresolved};
use crate::Evaluator;

impl Evaluator<'_> {
    /// Match `value` against `pattern`.
    ///
    /// Returns the state extended with the pattern's variables, or `None`
    /// when the value does not match. Nodes without pattern behaviour of
    /// their own are evaluated and compared for equality.
    pub fn match_as_pattern(
        &self,
        pattern: &Expr,
        value: &Value,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        ensure_sufficient_stack(|| self.match_inner(pattern, value, state))
    }

    fn match_inner(
        &self,
        pattern: &Expr,
        value: &Value,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        if !destructures(pattern) {
            return self.match_equal(pattern, value, state);
        }
        match &pattern.kind {
            ExprKind::Ident(name) => match self.resolution(pattern)? {
                Resolution::Binding => state.add(name, value.clone()).map(Some),
                Resolution::Tag(tag) => Ok(has_tag(value, tag).then(|| state.clone())),
                _ => Err(unresolved(pattern)),
            },
            ExprKind::Constructor { .. } => match self.resolution(pattern)? {
                Resolution::Tag(tag) => Ok(has_tag(value, tag).then(|| state.clone())),
                _ => Err(unresolved(pattern)),
            },
            ExprKind::Wildcard => Ok(Some(state.clone())),
            ExprKind::PlusMinus {
                value: centre,
                tolerance,
            } => self.match_tolerance(centre, tolerance, value, state),
            ExprKind::Call { function, args } => match self.checked().resolution(function.id) {
                Some(Resolution::Tag(tag)) => self.match_tag_call(pattern, tag, args, value, state),
                _ => self.match_equal(pattern, value, state),
            },
            ExprKind::Tuple(items) => {
                let Value::Tuple(values) = value else {
                    return Err(expected("a tuple", value));
                };
                if values.len() != items.len() {
                    return Err(EvalError::internal(format!(
                        "tuple of {} items matched against a pattern of {}",
                        values.len(),
                        items.len()
                    )));
                }
                self.match_all(items.iter().zip(values.iter().cloned()), state)
            }
            ExprKind::Record(fields) => {
                let Value::Record(record) = value else {
                    return Err(expected("a record", value));
                };
                let mut pairs = Vec::with_capacity(fields.len());
                for (name, field_pattern) in fields {
                    let field = record.get(name).ok_or_else(|| {
                        EvalError::internal(format!("record has no field `{name}`"))
                    })?;
                    pairs.push((field_pattern, field.clone()));
                }
                self.match_all(pairs.into_iter(), state)
            }
            ExprKind::Array(items) => {
                let Value::List(list) = value else {
                    return Err(expected("a list", value));
                };
                if list.len() != items.len() {
                    return Ok(None);
                }
                self.match_all(items.iter().zip(list.to_vec()?), state)
            }
            _ if pattern.is_placeholder() => Err(placeholder(pattern)),
            _ => self.match_equal(pattern, value, state),
        }
    }

    /// Match sibling patterns in order; variables bound by one are in
    /// scope for the next.
    fn match_all<'p>(
        &self,
        pairs: impl Iterator<Item = (&'p Expr, Value)>,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        let mut current = state.clone();
        for (pattern, value) in pairs {
            match self.match_as_pattern(pattern, &value, &current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn match_equal(
        &self,
        pattern: &Expr,
        value: &Value,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        let wanted = self.calculate_value(pattern, state)?.value;
        Ok(value.equals(&wanted)?.then(|| state.clone()))
    }

    /// `centre ± tolerance` matches numbers no further than `tolerance`
    /// from `centre`, bounds included.
    fn match_tolerance(
        &self,
        centre: &Expr,
        tolerance: &Expr,
        value: &Value,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        let number = value.as_number().ok_or_else(|| expected("a number", value))?;
        let centre = self.calculate_value(centre, state)?.value;
        let centre = centre.as_number().ok_or_else(|| expected("a number", &centre))?;
        let tolerance = self.calculate_value(tolerance, state)?.value;
        let tolerance = tolerance
            .as_number()
            .ok_or_else(|| expected("a number", &tolerance))?;
        let within = number.minus(centre).is_some_and(|gap| gap.abs() <= tolerance);
        Ok(within.then(|| state.clone()))
    }

    /// `Tag(pattern)` matches values with that tag whose payload matches.
    fn match_tag_call(
        &self,
        pattern: &Expr,
        tag: &TagRef,
        args: &[Expr],
        value: &Value,
        state: &EvaluateState,
    ) -> EvalResult<Option<EvaluateState>> {
        let [payload_pattern] = args else {
            return Err(unresolved(pattern));
        };
        let Value::Tagged(tagged) = value else {
            return Err(expected("a tagged value", value));
        };
        if !has_tag(value, tag) {
            return Ok(None);
        }
        let Some(payload) = &tagged.payload else {
            return Err(EvalError::internal(format!(
                "tag `{}` has no payload to match",
                tagged.tag
            )));
        };
        self.match_as_pattern(payload_pattern, payload, state)
    }
}

fn has_tag(value: &Value, tag: &TagRef) -> bool {
    matches!(value, Value::Tagged(t) if t.index == tag.index && t.type_name == tag.type_name)
}
