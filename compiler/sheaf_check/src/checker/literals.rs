use std::sync::Arc;

use sheaf_diagnostic::{suggest_similar, ErrorCode, ErrorGuaranteed, QuickFix};
use sheaf_ir::{Expr, ExprKind, TemporalKind, TypeExpr, UnitExpr};
use sheaf_types::{TypeExprError, TypeState, TypeTerm, UnitError, UnitTerm};
use sheaf_value::{Number, Temporal, Value};

use super::fixes::rename_unit;
use super::{CheckResult, Checked, Checker, InferredUnit, Kind};
use crate::Resolution;

impl Checker<'_> {
    pub(super) fn check_boolean(&mut self, expr: &Expr, value: bool, state: &TypeState) -> Checked {
        self.resolve(expr.id, Resolution::Constant(Value::Boolean(value)));
        Checked::expression(TypeTerm::Boolean, state)
    }

    pub(super) fn check_text(&mut self, expr: &Expr, text: &str, state: &TypeState) -> Checked {
        self.resolve(expr.id, Resolution::Constant(Value::text(text)));
        Checked::expression(TypeTerm::Text, state)
    }

    /// A number without a unit is scalar as a value. As a pattern it takes
    /// the unit of whatever it is matched against, so `0` matches a zero
    /// length as well as a zero count.
    pub(super) fn check_number(
        &mut self,
        expr: &Expr,
        text: &str,
        unit: Option<&UnitExpr>,
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        let Some(number) = Number::parse(text) else {
            return Err(self.error(
                ErrorCode::E1004,
                expr,
                format!("`{text}` is not a valid number"),
            ));
        };
        let unit = match unit {
            Some(unit) => self.resolve_unit_at(expr, unit)?,
            None if kind == Kind::Pattern => {
                let fresh = self.unifier.fresh_unit();
                self.inferred_units.push(InferredUnit {
                    node: expr.id,
                    span: expr.span,
                    unit: fresh.clone(),
                });
                fresh
            }
            None => UnitTerm::Scalar,
        };
        self.resolve(expr.id, Resolution::Constant(Value::Number(number)));
        Ok(Checked::expression(TypeTerm::Number(unit), state))
    }

    pub(super) fn check_temporal(
        &mut self,
        expr: &Expr,
        kind: TemporalKind,
        content: &str,
        state: &TypeState,
    ) -> CheckResult {
        match Temporal::parse(kind, content) {
            Ok(value) => {
                self.resolve(expr.id, Resolution::Constant(Value::Temporal(value)));
                Ok(Checked::expression(TypeTerm::Temporal(kind), state))
            }
            Err(err) => Err(self.error(ErrorCode::E2009, expr, err.to_string())),
        }
    }

    pub(super) fn check_unit_literal(
        &mut self,
        expr: &Expr,
        unit: &UnitExpr,
        state: &TypeState,
    ) -> CheckResult {
        let term = self.resolve_unit_at(expr, unit)?;
        match self.ctx.units.resolve_concrete(unit) {
            Ok(concrete) => {
                self.resolve(expr.id, Resolution::Constant(Value::Unit(Arc::new(concrete))));
                Ok(Checked::expression(TypeTerm::unit_of(term), state))
            }
            Err(err) => Err(self.error(ErrorCode::E1005, expr, err.to_string())),
        }
    }

    pub(super) fn check_type_literal(
        &mut self,
        expr: &Expr,
        ty: &TypeExpr,
        state: &TypeState,
    ) -> CheckResult {
        let term = match self.ctx.types.resolve_type_expr(ty, self.ctx.units) {
            Ok(term) => term,
            Err(err) => return Err(self.report_type_expr_error(expr, &err)),
        };
        match self.unifier.to_concrete(&term) {
            Ok(concrete) => {
                self.resolve(expr.id, Resolution::Constant(Value::Type(Arc::new(concrete))));
                Ok(Checked::expression(TypeTerm::type_of(term), state))
            }
            Err(err) => Err(self.error(ErrorCode::E2003, expr, err.to_string())),
        }
    }

    /// Resolve a written unit, recording unknown names with suggestions.
    pub(super) fn resolve_unit_at(
        &mut self,
        expr: &Expr,
        unit: &UnitExpr,
    ) -> Result<UnitTerm, ErrorGuaranteed> {
        match self.ctx.units.resolve(unit) {
            Ok(term) => Ok(term),
            Err(err) => Err(self.report_unit_error(expr, unit, &err)),
        }
    }

    fn report_unit_error(&mut self, expr: &Expr, unit: &UnitExpr, err: &UnitError) -> ErrorGuaranteed {
        match err {
            UnitError::Unknown { name, suggestions } => {
                let fixes = suggestions
                    .iter()
                    .map(|suggestion| {
                        let replacement = with_unit(expr, rename_unit(unit, name, suggestion));
                        QuickFix::new(format!("change to {{{suggestion}}}"), expr.id, move || {
                            replacement.clone()
                        })
                    })
                    .collect();
                self.error_with_fixes(ErrorCode::E4004, expr, err.to_string(), fixes)
            }
            UnitError::Invalid(_) => self.error(ErrorCode::E1005, expr, err.to_string()),
            UnitError::Duplicate(_) | UnitError::Incompatible { .. } => {
                self.error(ErrorCode::E2011, expr, err.to_string())
            }
        }
    }

    pub(super) fn report_type_expr_error(
        &mut self,
        expr: &Expr,
        err: &TypeExprError,
    ) -> ErrorGuaranteed {
        match err {
            TypeExprError::UnknownType { name, .. } => {
                let names = self.ctx.types.type_names();
                let suggestions = suggest_similar(name, names, 3);
                let mut message = err.to_string();
                if let Some(first) = suggestions.first() {
                    message.push_str(&format!("; did you mean `{first}`?"));
                }
                self.error(ErrorCode::E4005, expr, message)
            }
            TypeExprError::Unit(UnitError::Unknown { .. }) => {
                self.error(ErrorCode::E4004, expr, err.to_string())
            }
            TypeExprError::Arity { .. } => self.error(ErrorCode::E2005, expr, err.to_string()),
            TypeExprError::Duplicate(_)
            | TypeExprError::ArgKind { .. }
            | TypeExprError::Unit(_)
            | TypeExprError::Invalid(_) => self.error(ErrorCode::E1006, expr, err.to_string()),
        }
    }
}

/// `expr` (a number or unit literal) with its unit replaced.
fn with_unit(expr: &Expr, unit: UnitExpr) -> Expr {
    let kind = match &expr.kind {
        ExprKind::Number { text, .. } => ExprKind::Number {
            text: text.clone(),
            unit: Some(unit),
        },
        _ => ExprKind::UnitLiteral(unit),
    };
    Expr::synthetic(kind)
}
