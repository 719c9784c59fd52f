use smallvec::SmallVec;
use sheaf_diagnostic::{ErrorCode, ErrorGuaranteed, QuickFix};
use sheaf_ir::{CompareOp, Expr, ExprKind};
use sheaf_types::{TypeClasses, TypeState, TypeTerm, UnitTerm};
use sheaf_value::Number;

use super::{CheckResult, Checked, Checker, Kind};

/// An exponent whose effect on units is known before evaluation.
enum Exponent {
    /// `x ^ n`: the unit is raised to `n`.
    Integer(i32),
    /// `x ^ (1/n)`: the unit must be an `n`th power.
    Root(i32),
}

impl Checker<'_> {
    /// Check every operand, keeping the first failure but still checking
    /// the rest so their errors are reported too.
    fn check_operands<'e>(
        &mut self,
        operands: impl IntoIterator<Item = &'e Expr>,
        state: &TypeState,
        mut each: impl FnMut(&mut Self, &'e Expr, Checked) -> Result<(), ErrorGuaranteed>,
    ) -> Result<(), ErrorGuaranteed> {
        let mut failure = None;
        for operand in operands {
            let result = self
                .check(operand, state, Kind::Expression)
                .and_then(|checked| each(self, operand, checked));
            if let Err(guarantee) = result {
                failure.get_or_insert(guarantee);
            }
        }
        failure.map_or(Ok(()), Err)
    }

    /// Check `operand` as a number and return its unit.
    fn check_number_operand(
        &mut self,
        operand: &Expr,
        state: &TypeState,
    ) -> Result<UnitTerm, ErrorGuaranteed> {
        let checked = self.check(operand, state, Kind::Expression)?;
        let unit = self.unifier.fresh_unit();
        self.unify_at(operand, &TypeTerm::Number(unit.clone()), &checked.ty)?;
        Ok(unit)
    }

    /// All operands share one type, `expected`.
    pub(super) fn check_all_as(
        &mut self,
        operands: &[Expr],
        state: &TypeState,
        expected: &TypeTerm,
    ) -> CheckResult {
        self.check_operands(operands, state, |this, operand, checked| {
            this.unify_at(operand, expected, &checked.ty).map(drop)
        })?;
        Ok(Checked::expression(self.unifier.resolve(expected), state))
    }

    /// `a + b - c`: numbers of one unit.
    pub(super) fn check_add_subtract(&mut self, operands: &[Expr], state: &TypeState) -> CheckResult {
        let expected = TypeTerm::Number(self.unifier.fresh_unit());
        self.check_all_as(operands, state, &expected)
    }

    /// `a * b * c`: the units multiply.
    pub(super) fn check_times(&mut self, operands: &[Expr], state: &TypeState) -> CheckResult {
        let mut units: SmallVec<[UnitTerm; 4]> = SmallVec::new();
        let mut failure = None;
        for operand in operands {
            match self.check_number_operand(operand, state) {
                Ok(unit) => units.push(unit),
                Err(guarantee) => {
                    failure.get_or_insert(guarantee);
                }
            }
        }
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }
        let product = units
            .into_iter()
            .reduce(UnitTerm::times)
            .unwrap_or(UnitTerm::Scalar);
        Ok(Checked::expression(
            self.unifier.resolve(&TypeTerm::Number(product)),
            state,
        ))
    }

    pub(super) fn check_divide(
        &mut self,
        numerator: &Expr,
        denominator: &Expr,
        state: &TypeState,
    ) -> CheckResult {
        let num = self.check_number_operand(numerator, state);
        let den = self.check_number_operand(denominator, state);
        let quotient = num?.divided_by(den?);
        Ok(Checked::expression(
            self.unifier.resolve(&TypeTerm::Number(quotient)),
            state,
        ))
    }

    /// `base ^ exponent`. A literal integer exponent raises the unit; a
    /// literal `1/n` takes the `n`th root of it; any other exponent needs
    /// both sides unitless.
    pub(super) fn check_raise(&mut self, base: &Expr, exponent: &Expr, state: &TypeState) -> CheckResult {
        let base_unit = self.check_number_operand(base, state);
        let exponent_unit = self.check_number_operand(exponent, state);
        let (base_unit, exponent_unit) = (base_unit?, exponent_unit?);
        self.unify_at(
            exponent,
            &TypeTerm::SCALAR,
            &TypeTerm::Number(exponent_unit),
        )?;

        let result = match constant_exponent(exponent) {
            Some(Exponent::Integer(n)) => base_unit.raised_to(n),
            Some(Exponent::Root(n)) => {
                let root = self.unifier.fresh_unit();
                self.unify_at(
                    base,
                    &TypeTerm::Number(root.clone().raised_to(n)),
                    &TypeTerm::Number(base_unit),
                )?;
                root
            }
            None => {
                self.unify_at(base, &TypeTerm::SCALAR, &TypeTerm::Number(base_unit))?;
                UnitTerm::Scalar
            }
        };
        Ok(Checked::expression(
            self.unifier.resolve(&TypeTerm::Number(result)),
            state,
        ))
    }

    /// `a & b & c`. Each operand sees the variables bound by `~` tests in
    /// the operands before it, since it only runs when they all held.
    pub(super) fn check_and(&mut self, operands: &[Expr], state: &TypeState) -> CheckResult {
        let mut current = state.clone();
        let mut failure = None;
        for operand in operands {
            let result = self.check(operand, &current, Kind::Expression).and_then(|checked| {
                self.unify_at(operand, &TypeTerm::Boolean, &checked.ty)?;
                Ok(checked.state)
            });
            match result {
                Ok(next) => current = next,
                Err(guarantee) => {
                    failure.get_or_insert(guarantee);
                }
            }
        }
        match failure {
            Some(guarantee) => Err(guarantee),
            None => Ok(Checked {
                ty: TypeTerm::Boolean,
                state: current,
                kind: Kind::Expression,
            }),
        }
    }

    /// `a = b = c` and `a <> b`.
    pub(super) fn check_equal<'e>(
        &mut self,
        operands: impl IntoIterator<Item = &'e Expr>,
        state: &TypeState,
    ) -> CheckResult {
        let shared = self.unifier.fresh_constrained(TypeClasses::EQUATABLE);
        self.check_operands(operands, state, |this, operand, checked| {
            this.unify_at(operand, &shared, &checked.ty).map(drop)
        })?;
        Ok(Checked::expression(TypeTerm::Boolean, state))
    }

    /// `a < b <= c`: one orderable type, and every comparison pointing the
    /// same way.
    pub(super) fn check_comparison(
        &mut self,
        expr: &Expr,
        operands: &[Expr],
        ops: &[CompareOp],
        state: &TypeState,
    ) -> CheckResult {
        let shared = self.unifier.fresh_constrained(TypeClasses::COMPARABLE);
        let checked = self.check_operands(operands, state, |this, operand, checked| {
            this.unify_at(operand, &shared, &checked.ty).map(drop)
        });
        if let Some(first) = ops.first() {
            if ops.iter().any(|op| op.direction() != first.direction()) {
                let symbols: Vec<&str> = ops.iter().map(|op| op.as_symbol()).collect();
                return Err(self.error(
                    ErrorCode::E2007,
                    expr,
                    format!(
                        "comparisons {} point in different directions",
                        symbols.join(" ")
                    ),
                ));
            }
        }
        checked?;
        Ok(Checked::expression(TypeTerm::Boolean, state))
    }

    /// Operators that may not share a bracket level. Always an error; the
    /// fixes offer each way of bracketing one operator first.
    pub(super) fn check_invalid_operators(
        &mut self,
        expr: &Expr,
        operands: &[Expr],
        operators: &[String],
        state: &TypeState,
    ) -> ErrorGuaranteed {
        for operand in operands {
            let _ = self.check(operand, state, Kind::Expression);
        }
        let fixes = (0..operators.len())
            .filter_map(|i| bracketing_fix(expr, operands, operators, i))
            .collect();
        self.error_with_fixes(
            ErrorCode::E2007,
            expr,
            format!(
                "operators {} cannot be mixed without brackets",
                operators.join(" ")
            ),
            fixes,
        )
    }
}

fn integer_literal(expr: &Expr) -> Option<i32> {
    let ExprKind::Number { text, unit: None } = &expr.kind else {
        return None;
    };
    Number::parse(text)?
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
}

fn constant_exponent(expr: &Expr) -> Option<Exponent> {
    match &expr.kind {
        ExprKind::Number { .. } => integer_literal(expr).map(Exponent::Integer),
        ExprKind::Divide {
            numerator,
            denominator,
        } => match (integer_literal(numerator), integer_literal(denominator)) {
            (Some(1), Some(n)) if n > 0 => Some(Exponent::Root(n)),
            _ => None,
        },
        _ => None,
    }
}

/// The fix bracketing `operands[i] operators[i] operands[i + 1]`, if that
/// pair forms a valid operator node on its own.
fn bracketing_fix(
    expr: &Expr,
    operands: &[Expr],
    operators: &[String],
    i: usize,
) -> Option<QuickFix> {
    let (left, right) = (operands.get(i)?, operands.get(i + 1)?);
    let pair = ExprKind::from_operator_chain(
        vec![left.clone(), right.clone()],
        vec![operators[i].clone()],
    );
    if matches!(pair, ExprKind::InvalidOperators { .. }) {
        return None;
    }

    let mut rest_operands = operands.to_vec();
    let mut rest_operators = operators.to_vec();
    rest_operators.remove(i);
    rest_operands.splice(i..=i + 1, [Expr::synthetic(pair)]);

    let title = format!("bracket operator {} (`{}`) first", i + 1, operators[i]);
    Some(QuickFix::new(title, expr.id, move || {
        if rest_operators.is_empty() {
            return rest_operands
                .first()
                .cloned()
                .unwrap_or_else(|| Expr::synthetic(ExprKind::Missing));
        }
        Expr::synthetic(ExprKind::from_operator_chain(
            rest_operands.clone(),
            rest_operators.clone(),
        ))
    }))
}
