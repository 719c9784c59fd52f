//! Diagnostics and quick fixes for unification failures.

use sheaf_diagnostic::{ErrorCode, ErrorGuaranteed, QuickFix};
use sheaf_ir::{Expr, ExprKind, UnitExpr};
use sheaf_types::{TypeError, TypeTerm, Unit, UnitMismatch};

use super::Checker;

/// Name of the standard function offered by "convert" fixes.
const CONVERT_UNIT: &str = "convert unit";

impl Checker<'_> {
    pub(super) fn report_type_error(
        &mut self,
        expr: &Expr,
        expected: &TypeTerm,
        found: &TypeTerm,
        err: &TypeError,
    ) -> ErrorGuaranteed {
        match err {
            TypeError::Mismatch { .. } => {
                let message = format!(
                    "expected {} but found {}",
                    self.describe_expected(expected),
                    self.unifier.resolve(found)
                );
                self.error(ErrorCode::E2001, expr, message)
            }
            TypeError::Unit(mismatch) => {
                let message = format!(
                    "unit mismatch: expected {{{}}} but found {{{}}}",
                    mismatch.expected, mismatch.found
                );
                let fixes = if matches!(self.unifier.resolve(found), TypeTerm::Number(_)) {
                    self.unit_fixes(expr, mismatch)
                } else {
                    Vec::new()
                };
                self.error_with_fixes(ErrorCode::E2002, expr, message, fixes)
            }
            TypeError::Infinite { .. } => self.error(ErrorCode::E2001, expr, err.to_string()),
            TypeError::Arity { .. } => self.error(ErrorCode::E2005, expr, err.to_string()),
            TypeError::MissingField { .. } => self.error(ErrorCode::E2010, expr, err.to_string()),
            TypeError::NotInClass { .. } => self.error(ErrorCode::E2006, expr, err.to_string()),
        }
    }

    /// `a number` for a number whose unit is still open, otherwise the
    /// resolved type.
    fn describe_expected(&self, expected: &TypeTerm) -> String {
        let resolved = self.unifier.resolve(expected);
        match &resolved {
            TypeTerm::Number(unit) if !self.unifier.resolve_unit(unit).is_concrete() => {
                "a number".to_owned()
            }
            TypeTerm::Var(_) => "a value".to_owned(),
            _ => resolved.to_string(),
        }
    }

    /// Fixes that give `expr` the expected unit: rewrite the unit of a
    /// number literal, or convert any other value.
    fn unit_fixes(&self, expr: &Expr, mismatch: &UnitMismatch) -> Vec<QuickFix> {
        let Some(target) = mismatch.expected.to_unit() else {
            return Vec::new();
        };

        if let ExprKind::Number { text, .. } = &expr.kind {
            let text = text.clone();
            let title = if target.is_scalar() {
                "remove the unit".to_owned()
            } else {
                format!("change the unit to {{{target}}}")
            };
            return vec![QuickFix::new(title, expr.id, move || {
                Expr::synthetic(ExprKind::Number {
                    text: text.clone(),
                    unit: (!target.is_scalar()).then(|| target.to_expr()),
                })
            })];
        }

        let Some(from) = mismatch.found.to_unit() else {
            return Vec::new();
        };
        if self.ctx.units.conversion_factor(&from, &target).is_err() {
            return Vec::new();
        }
        let value = expr.clone();
        vec![QuickFix::new(
            format!("convert to {{{target}}}"),
            expr.id,
            move || convert_call(&target, value.clone()),
        )]
    }
}

fn convert_call(target: &Unit, value: Expr) -> Expr {
    Expr::synthetic(ExprKind::Call {
        function: Box::new(Expr::synthetic(ExprKind::Ident(CONVERT_UNIT.to_owned()))),
        args: vec![Expr::synthetic(ExprKind::UnitLiteral(target.to_expr())), value],
    })
}

/// `unit` with every occurrence of the unit name `from` replaced by `to`.
pub(super) fn rename_unit(unit: &UnitExpr, from: &str, to: &str) -> UnitExpr {
    match unit {
        UnitExpr::Single(name) if name == from => UnitExpr::single(to),
        UnitExpr::One | UnitExpr::Single(_) | UnitExpr::Invalid(_) => unit.clone(),
        UnitExpr::Times(items) => {
            UnitExpr::Times(items.iter().map(|u| rename_unit(u, from, to)).collect())
        }
        UnitExpr::Divide(num, den) => {
            UnitExpr::divide(rename_unit(num, from, to), rename_unit(den, from, to))
        }
        UnitExpr::Raise(base, power) => UnitExpr::raise(rename_unit(base, from, to), *power),
    }
}
