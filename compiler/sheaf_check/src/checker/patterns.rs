use rustc_hash::FxHashMap;
use sheaf_diagnostic::{ErrorCode, ErrorGuaranteed};
use sheaf_ir::{ClausePattern, Definition, Expr, ExprKind, MatchClause};
use sheaf_types::{IntersectError, TypeState, TypeTerm};

use super::{CheckResult, Checked, Checker, Kind};

/// An `x :: type{...}` waiting for the definition of `x`.
struct Annotation<'e> {
    ty: TypeTerm,
    variable: &'e Expr,
}

impl Checker<'_> {
    /// `value ~ pattern`. True when the pattern matches; its bindings flow
    /// on to whatever runs only when it did (the rest of an `&` chain, or
    /// the then branch of an `@if`).
    pub(super) fn check_matches(&mut self, value: &Expr, pattern: &Expr, state: &TypeState) -> CheckResult {
        let value_checked = self.check(value, state, Kind::Expression);
        let pattern_checked = self.check(pattern, state, Kind::Pattern);
        let (value_checked, pattern_checked) = (value_checked?, pattern_checked?);
        self.unify_at(pattern, &value_checked.ty, &pattern_checked.ty)?;
        Ok(Checked {
            ty: TypeTerm::Boolean,
            state: pattern_checked.state,
            kind: Kind::Expression,
        })
    }

    /// `value ± tolerance` matches numbers within `tolerance` of `value`.
    pub(super) fn check_plus_minus(
        &mut self,
        value: &Expr,
        tolerance: &Expr,
        state: &TypeState,
    ) -> CheckResult {
        let number = TypeTerm::Number(self.unifier.fresh_unit());
        let value_checked = self
            .check(value, state, Kind::Expression)
            .and_then(|checked| self.unify_at(value, &number, &checked.ty));
        let tolerance_checked = self
            .check(tolerance, state, Kind::Expression)
            .and_then(|checked| self.unify_at(tolerance, &number, &checked.ty));
        value_checked?;
        tolerance_checked?;
        Ok(Checked::pattern(self.unifier.resolve(&number), state.clone()))
    }

    pub(super) fn check_match(
        &mut self,
        expr: &Expr,
        scrutinee: &Expr,
        clauses: &[MatchClause],
        state: &TypeState,
    ) -> CheckResult {
        if clauses.is_empty() {
            return Err(self.error(ErrorCode::E2008, expr, "`@match` needs at least one `@case`"));
        }
        let scrutinee = self.check(scrutinee, state, Kind::Expression)?;
        let outcome = self.unifier.fresh_type();

        let mut failure = None;
        for clause in clauses {
            if let Err(guarantee) = self.check_clause(clause, &scrutinee.ty, &outcome, state) {
                failure.get_or_insert(guarantee);
            }
        }
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }
        Ok(Checked::expression(self.unifier.resolve(&outcome), state))
    }

    /// One `@case ... @then ...` clause: every alternative is matched
    /// against the scrutinee, and the outcome sees the variables they all
    /// bind.
    fn check_clause(
        &mut self,
        clause: &MatchClause,
        scrutinee: &TypeTerm,
        outcome: &TypeTerm,
        state: &TypeState,
    ) -> Result<(), ErrorGuaranteed> {
        let mut branches = Vec::with_capacity(clause.patterns.len());
        let mut failure = None;
        for alternative in &clause.patterns {
            match self.check_alternative(alternative, scrutinee, state) {
                Ok(branch) => branches.push(branch),
                Err(guarantee) => {
                    failure.get_or_insert(guarantee);
                }
            }
        }
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }

        let merged = match TypeState::intersect(state, &branches, &mut self.unifier) {
            Ok(merged) => merged,
            Err(err) => {
                let code = match &err {
                    IntersectError::OnlyInSome { .. } => ErrorCode::E3003,
                    IntersectError::Mismatch { .. } => ErrorCode::E2001,
                };
                let anchor = clause.patterns.first().map_or(&clause.outcome, |p| &p.pattern);
                return Err(self.error(code, anchor, err.to_string()));
            }
        };
        let checked = self.check(&clause.outcome, &merged, Kind::Expression)?;
        self.unify_at(&clause.outcome, outcome, &checked.ty)?;
        Ok(())
    }

    fn check_alternative(
        &mut self,
        alternative: &ClausePattern,
        scrutinee: &TypeTerm,
        state: &TypeState,
    ) -> Result<TypeState, ErrorGuaranteed> {
        let pattern = self.check(&alternative.pattern, state, Kind::Pattern)?;
        self.unify_at(&alternative.pattern, scrutinee, &pattern.ty)?;
        let Some(guard) = &alternative.guard else {
            return Ok(pattern.state);
        };
        let guarded = self.check(guard, &pattern.state, Kind::Expression)?;
        self.unify_at(guard, &TypeTerm::Boolean, &guarded.ty)?;
        Ok(guarded.state)
    }

    /// `@define` items are checked in order, each seeing the variables of
    /// the ones before it.
    pub(super) fn check_define(
        &mut self,
        expr: &Expr,
        definitions: &[Definition],
        body: &Expr,
        state: &TypeState,
    ) -> CheckResult {
        if definitions.is_empty() {
            return Err(self.error(ErrorCode::E2008, expr, "`@define` needs at least one definition"));
        }
        let mut current = state.clone();
        let mut annotations: FxHashMap<&str, Annotation<'_>> = FxHashMap::default();
        let mut failure = None;

        for definition in definitions {
            let result = match definition {
                Definition::Annotation { variable, ty } => self
                    .check_annotation(variable, ty, &current, &annotations)
                    .map(|(name, annotation)| {
                        annotations.insert(name, annotation);
                    }),
                Definition::Equal { pattern, value } => self
                    .check_definition(pattern, value, &current, &mut annotations)
                    .map(|next| current = next),
            };
            if let Err(guarantee) = result {
                failure.get_or_insert(guarantee);
            }
        }

        let mut unused: Vec<_> = annotations.into_iter().collect();
        unused.sort_unstable_by_key(|(name, _)| *name);
        for (name, annotation) in unused {
            let guarantee = self.error(
                ErrorCode::E3004,
                annotation.variable,
                format!("`{name}` is given a type but never defined"),
            );
            failure.get_or_insert(guarantee);
        }
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }

        let checked = self.check(body, &current, Kind::Expression)?;
        Ok(Checked::expression(checked.ty, state))
    }

    fn check_annotation<'e>(
        &mut self,
        variable: &'e Expr,
        ty: &Expr,
        state: &TypeState,
        annotations: &FxHashMap<&str, Annotation<'_>>,
    ) -> Result<(&'e str, Annotation<'e>), ErrorGuaranteed> {
        let ExprKind::Ident(name) = &variable.kind else {
            return Err(self.error(
                ErrorCode::E3004,
                variable,
                "only a variable name can be given a type",
            ));
        };
        if annotations.contains_key(name.as_str()) {
            return Err(self.error(
                ErrorCode::E3004,
                variable,
                format!("`{name}` is given a type more than once"),
            ));
        }
        let inner = self.unifier.fresh_type();
        let checked = self.check(ty, state, Kind::Expression)?;
        self.unify_at(ty, &TypeTerm::type_of(inner.clone()), &checked.ty)?;
        Ok((name.as_str(), Annotation { ty: inner, variable }))
    }

    /// `pattern = value`. Variables the pattern binds take any type given
    /// to them by an earlier annotation.
    fn check_definition<'e>(
        &mut self,
        pattern: &Expr,
        value: &Expr,
        state: &TypeState,
        annotations: &mut FxHashMap<&'e str, Annotation<'e>>,
    ) -> Result<TypeState, ErrorGuaranteed> {
        let value_checked = self.check(value, state, Kind::Expression);
        let pattern_checked = self.check(pattern, state, Kind::Pattern);
        let (value_checked, pattern_checked) = (value_checked?, pattern_checked?);

        let bound: Vec<&'e str> = annotations
            .keys()
            .copied()
            .filter(|name| pattern_checked.state.contains(name) && !state.contains(name))
            .collect();
        for name in bound {
            let (Some(annotation), Some(candidates)) =
                (annotations.remove(name), pattern_checked.state.find(name))
            else {
                continue;
            };
            for candidate in candidates {
                self.unify_at(pattern, &annotation.ty, candidate)?;
            }
        }

        self.unify_at(value, &pattern_checked.ty, &value_checked.ty)?;
        Ok(pattern_checked.state)
    }
}
