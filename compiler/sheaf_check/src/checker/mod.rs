//! Per-node type checking.
//!
//! The checker is split by node family:
//! - `literals.rs`: booleans, numbers, text, temporal, unit and type literals
//! - `references.rs`: identifiers, tags, columns, tables, `?`
//! - `operators.rs`: the n-ary and binary operators
//! - `structure.rs`: calls, field access, tuples, records, lists, lambdas, if
//! - `patterns.rs`: match, define, `~` and `±`
//! - `fixes.rs`: turning unification failures into diagnostics and quick fixes

mod fixes;
mod literals;
mod operators;
mod patterns;
mod references;
mod structure;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use sheaf_diagnostic::{Diagnostic, ErrorCode, ErrorGuaranteed, QuickFix};
use sheaf_ir::{Expr, ExprKind, NodeId, Span};
use sheaf_stack::ensure_sufficient_stack;
use sheaf_types::{
    ConcreteError, DataType, TypeClasses, TypeManager, TypeState, TypeTerm, Unifier, UnitManager,
    UnitTerm,
};
use sheaf_value::{CallSite, ColumnLookup, FunctionDefinition, FunctionLookup};
use tracing::debug;

use crate::{CheckedExpression, ImplicitLambda, Recorder, Resolution};

/// Collaborators the checker consults. Nothing is read from global state.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub types: &'a TypeManager,
    pub units: &'a UnitManager,
    pub columns: &'a dyn ColumnLookup,
    pub functions: &'a dyn FunctionLookup,
    /// Maximum number of errors returned from a failed check (0 = all).
    pub max_errors: usize,
}

/// Whether a node is read as a value or matched against one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    Expression,
    Pattern,
}

/// A node that checked successfully.
#[derive(Clone, Debug)]
pub struct Checked {
    pub ty: TypeTerm,
    /// Variables in scope after the node: extended by patterns and by the
    /// `~` tests of an `&` chain.
    pub state: TypeState,
    /// `Pattern` if the node destructures or binds; `Expression` if it is
    /// a value (in pattern position, compared for equality).
    pub kind: Kind,
}

impl Checked {
    pub fn expression(ty: TypeTerm, state: &TypeState) -> Self {
        Checked {
            ty,
            state: state.clone(),
            kind: Kind::Expression,
        }
    }

    pub fn pattern(ty: TypeTerm, state: TypeState) -> Self {
        Checked {
            ty,
            state,
            kind: Kind::Pattern,
        }
    }
}

/// `Err` only once an error has been recorded.
pub type CheckResult = Result<Checked, ErrorGuaranteed>;

/// A standard function used somewhere in the formula, instantiated once
/// checking is complete.
struct PendingInstance {
    node: NodeId,
    span: Span,
    definition: Arc<dyn FunctionDefinition>,
    ty: TypeTerm,
}

/// A unitless number pattern that took its unit from the value it matches.
struct InferredUnit {
    node: NodeId,
    span: Span,
    unit: UnitTerm,
}

/// State of one check pass.
pub struct Checker<'a> {
    ctx: CheckContext<'a>,
    unifier: Unifier,
    recorder: Recorder,
    resolutions: FxHashMap<NodeId, Resolution>,
    implicit_lambdas: FxHashMap<NodeId, ImplicitLambda>,
    instances: Vec<PendingInstance>,
    inferred_units: Vec<InferredUnit>,
}

impl<'a> Checker<'a> {
    pub fn new(ctx: CheckContext<'a>) -> Self {
        Checker {
            ctx,
            unifier: Unifier::new(),
            recorder: Recorder::new(),
            resolutions: FxHashMap::default(),
            implicit_lambdas: FxHashMap::default(),
            instances: Vec::new(),
            inferred_units: Vec::new(),
        }
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn unifier(&self) -> &Unifier {
        &self.unifier
    }

    /// Check `expr` in `state`, read as `kind`.
    pub fn check(&mut self, expr: &Expr, state: &TypeState, kind: Kind) -> CheckResult {
        let checked = ensure_sufficient_stack(|| self.check_inner(expr, state, kind))?;
        self.recorder.record_type(expr.id, checked.ty.clone());
        Ok(checked)
    }

    fn check_inner(&mut self, expr: &Expr, state: &TypeState, kind: Kind) -> CheckResult {
        if kind == Kind::Pattern && !destructures(expr) {
            return self.check_equality_pattern(expr, state);
        }
        match &expr.kind {
            ExprKind::Boolean(value) => Ok(self.check_boolean(expr, *value, state)),
            ExprKind::Number { text, unit } => {
                self.check_number(expr, text, unit.as_ref(), state, kind)
            }
            ExprKind::Text(text) => Ok(self.check_text(expr, text, state)),
            ExprKind::Temporal {
                kind: temporal,
                content,
            } => self.check_temporal(expr, *temporal, content, state),
            ExprKind::UnitLiteral(unit) => self.check_unit_literal(expr, unit, state),
            ExprKind::TypeLiteral(ty) => self.check_type_literal(expr, ty, state),

            ExprKind::Ident(name) => match kind {
                Kind::Expression => self.check_ident(expr, name, state),
                Kind::Pattern => self.check_ident_pattern(expr, name, state),
            },
            ExprKind::Wildcard => match kind {
                Kind::Expression => Err(self.pattern_only(expr, "`_`")),
                Kind::Pattern => Ok(Checked::pattern(self.unifier.fresh_type(), state.clone())),
            },
            ExprKind::ImplicitArg => self.check_implicit_arg(expr, state),
            ExprKind::Column(column) => self.check_column(expr, column, state),
            ExprKind::EntireColumn(column) => self.check_entire_column(expr, column, state),
            ExprKind::Table(table) => self.check_table(expr, table, state),
            ExprKind::Constructor { type_name, tag } => {
                self.check_constructor(expr, type_name, tag, state, kind)
            }

            ExprKind::AddSubtract { operands, .. } => self.check_add_subtract(operands, state),
            ExprKind::Times(operands) => self.check_times(operands, state),
            ExprKind::Divide {
                numerator,
                denominator,
            } => self.check_divide(numerator, denominator, state),
            ExprKind::Raise { base, exponent } => self.check_raise(base, exponent, state),
            ExprKind::Concat(operands) => self.check_all_as(operands, state, &TypeTerm::Text),
            ExprKind::And(operands) => self.check_and(operands, state),
            ExprKind::Or(operands) => self.check_all_as(operands, state, &TypeTerm::Boolean),
            ExprKind::Equal(operands) => self.check_equal(operands, state),
            ExprKind::NotEqual { left, right } => {
                self.check_equal([left.as_ref(), right.as_ref()], state)
            }
            ExprKind::Comparison { operands, ops } => {
                self.check_comparison(expr, operands, ops, state)
            }
            ExprKind::Matches { value, pattern } => self.check_matches(value, pattern, state),
            ExprKind::PlusMinus { value, tolerance } => match kind {
                Kind::Expression => Err(self.pattern_only(expr, "`±`")),
                Kind::Pattern => self.check_plus_minus(value, tolerance, state),
            },

            ExprKind::Call { function, args } => self.check_call(expr, function, args, state, kind),
            ExprKind::FieldAccess { record, field } => {
                self.check_field_access(expr, record, field, state)
            }
            ExprKind::Tuple(items) => self.check_tuple(expr, items, state, kind),
            ExprKind::Record(fields) => self.check_record(expr, fields, state, kind),
            ExprKind::Array(items) => self.check_array(expr, items, state, kind),
            ExprKind::Lambda { params, body } => self.check_lambda(expr, params, body, state),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.check_if(condition, then_branch, else_branch, state),
            ExprKind::Match { scrutinee, clauses } => {
                self.check_match(expr, scrutinee, clauses, state)
            }
            ExprKind::Define { definitions, body } => {
                self.check_define(expr, definitions, body, state)
            }

            ExprKind::InvalidOperators {
                operands,
                operators,
            } => Err(self.check_invalid_operators(expr, operands, operators, state)),
            ExprKind::InvalidIdent(text) => Err(self.error(
                ErrorCode::E4003,
                expr,
                format!("`{text}` is not a valid name"),
            )),
            ExprKind::Invalid(items) => {
                for item in items {
                    let _ = self.check(item, state, Kind::Expression);
                }
                Err(self.error(ErrorCode::E2008, expr, "could not understand this expression"))
            }
            ExprKind::Missing => Err(self.error(ErrorCode::E2008, expr, "missing expression")),
        }
    }

    /// A value in pattern position: matches values equal to it.
    fn check_equality_pattern(&mut self, expr: &Expr, state: &TypeState) -> CheckResult {
        let checked = self.check(expr, state, Kind::Expression)?;
        self.require_at(expr, &checked.ty, TypeClasses::EQUATABLE)?;
        Ok(Checked::expression(checked.ty, state))
    }

    fn pattern_only(&mut self, expr: &Expr, what: &str) -> ErrorGuaranteed {
        self.error(
            ErrorCode::E3001,
            expr,
            format!("{what} can only be used in a pattern"),
        )
    }

    // ========================================
    // Recording helpers
    // ========================================

    pub(crate) fn error(
        &mut self,
        code: ErrorCode,
        expr: &Expr,
        message: impl Into<String>,
    ) -> ErrorGuaranteed {
        self.recorder
            .record_error(Diagnostic::error(code, expr.id, expr.span).with_message(message))
    }

    pub(crate) fn error_with_fixes(
        &mut self,
        code: ErrorCode,
        expr: &Expr,
        message: impl Into<String>,
        fixes: Vec<QuickFix>,
    ) -> ErrorGuaranteed {
        let guarantee = self.error(code, expr, message);
        if !fixes.is_empty() {
            self.recorder.record_quick_fixes(expr.id, fixes);
        }
        guarantee
    }

    pub(crate) fn resolve(&mut self, node: NodeId, resolution: Resolution) {
        self.resolutions.insert(node, resolution);
    }

    /// Unify the type `found` of `expr` with `expected`, recording any
    /// failure against `expr`.
    pub(crate) fn unify_at(
        &mut self,
        expr: &Expr,
        expected: &TypeTerm,
        found: &TypeTerm,
    ) -> Result<TypeTerm, ErrorGuaranteed> {
        match self.unifier.unify(expected, found) {
            Ok(ty) => Ok(ty),
            Err(err) => Err(self.report_type_error(expr, expected, found, &err)),
        }
    }

    pub(crate) fn require_at(
        &mut self,
        expr: &Expr,
        ty: &TypeTerm,
        classes: TypeClasses,
    ) -> Result<(), ErrorGuaranteed> {
        match self.unifier.require(ty, classes) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.report_type_error(expr, ty, ty, &err)),
        }
    }

    // ========================================
    // Finishing
    // ========================================

    /// Settle the pass: convert the root type to a concrete type,
    /// instantiate the standard functions used, and collect diagnostics.
    pub fn finish(
        mut self,
        root: &Expr,
        result: CheckResult,
    ) -> Result<CheckedExpression, Vec<Diagnostic>> {
        let ty = match result {
            Ok(checked) => match self.unifier.to_concrete(&checked.ty) {
                Ok(ty) => Some(ty),
                Err(err) => {
                    self.report_concrete_error(root, &err);
                    None
                }
            },
            Err(_) => None,
        };

        if !self.recorder.has_errors() {
            self.instantiate_functions();
        }
        self.note_inferred_units();

        let max_errors = self.ctx.max_errors;
        match ty {
            Some(ty) if !self.recorder.has_errors() => {
                let types = self
                    .recorder
                    .types()
                    .filter_map(|(node, term)| Some((node, self.unifier.to_concrete(term).ok()?)))
                    .collect();
                debug!(%ty, "check succeeded");
                Ok(CheckedExpression::new(
                    root.clone(),
                    ty,
                    self.resolutions,
                    self.implicit_lambdas,
                    types,
                    self.recorder.into_diagnostics(max_errors),
                ))
            }
            _ => {
                let diagnostics = self.recorder.into_diagnostics(max_errors);
                debug!(
                    errors = diagnostics.iter().filter(|d| d.is_error()).count(),
                    "check failed"
                );
                Err(diagnostics)
            }
        }
    }

    fn report_concrete_error(&mut self, root: &Expr, err: &ConcreteError) {
        let code = match err {
            ConcreteError::Ambiguous { .. } => ErrorCode::E2003,
            ConcreteError::Unresolved { .. } | ConcreteError::UnresolvedUnit { .. } => {
                ErrorCode::E2004
            }
        };
        self.error(code, root, err.to_string());
    }

    fn instantiate_functions(&mut self) {
        for pending in std::mem::take(&mut self.instances) {
            let TypeTerm::Function(params, ret) = self.unifier.resolve(&pending.ty) else {
                continue;
            };
            let params: Vec<Option<DataType>> = params
                .iter()
                .map(|p| self.unifier.to_concrete(p).ok())
                .collect();
            let ret = self.unifier.to_concrete(&ret).ok();
            let site = CallSite {
                params: &params,
                ret: ret.as_ref(),
                units: self.ctx.units,
            };
            match pending.definition.instantiate(&site) {
                Ok(function) => self.resolve(pending.node, Resolution::Function(function)),
                Err(err) => {
                    self.recorder.record_error(
                        Diagnostic::error(ErrorCode::E2001, pending.node, pending.span)
                            .with_message(format!(
                                "`{}` cannot be used here: {err}",
                                pending.definition.name()
                            )),
                    );
                }
            }
        }
    }

    fn note_inferred_units(&mut self) {
        for inferred in std::mem::take(&mut self.inferred_units) {
            let exps = self.unifier.resolve_unit(&inferred.unit);
            let Some(unit) = exps.to_unit() else {
                continue;
            };
            if unit.is_scalar() {
                continue;
            }
            self.recorder.record_information(
                Diagnostic::note(ErrorCode::I0001, inferred.node, inferred.span)
                    .with_message(format!("unit inferred as {{{unit}}}")),
            );
        }
    }
}

/// Nodes that have their own pattern behaviour. Anything else in pattern
/// position is an equality test.
pub fn destructures(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Ident(_)
            | ExprKind::Wildcard
            | ExprKind::Number { .. }
            | ExprKind::Constructor { .. }
            | ExprKind::PlusMinus { .. }
            | ExprKind::Call { .. }
            | ExprKind::Tuple(_)
            | ExprKind::Record(_)
            | ExprKind::Array(_)
    ) || expr.is_placeholder()
}
