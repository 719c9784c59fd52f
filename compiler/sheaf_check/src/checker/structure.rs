use std::sync::Arc;

use rustc_hash::FxHashSet;
use sheaf_diagnostic::{suggest_similar, ErrorCode, ErrorGuaranteed, QuickFix};
use sheaf_ir::for_each_child;
use sheaf_ir::{Expr, ExprKind, NodeId};
use sheaf_types::{RecordTerm, TypeState, TypeTerm};

use super::{CheckResult, Checked, Checker, Kind};
use crate::{implicit_arg_name, ImplicitLambda, Resolution};

impl Checker<'_> {
    pub(super) fn check_call(
        &mut self,
        expr: &Expr,
        function: &Expr,
        args: &[Expr],
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        if let Some(tag) = self.tag_callee(function, state) {
            return self.check_tag_call(expr, function, tag, args, state, kind);
        }
        if kind == Kind::Pattern {
            return self.check_equality_pattern(expr, state);
        }

        let callee = self.check(function, state, Kind::Expression);
        let mut arg_types = Vec::with_capacity(args.len());
        let mut failure = None;
        for arg in args {
            match self.check_argument(arg, state) {
                Ok(ty) => arg_types.push(ty),
                Err(guarantee) => {
                    failure.get_or_insert(guarantee);
                }
            }
        }
        let callee = callee?;
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }

        let (params, ret) = match self.unifier.resolve(&callee.ty) {
            TypeTerm::Function(params, ret) => (params, *ret),
            other => {
                let params: Vec<TypeTerm> = args.iter().map(|_| self.unifier.fresh_type()).collect();
                let ret = self.unifier.fresh_type();
                self.unify_at(function, &TypeTerm::function(params.clone(), ret.clone()), &other)?;
                (params, ret)
            }
        };
        if params.len() != args.len() {
            let name = match &function.kind {
                ExprKind::Ident(name) => format!("`{name}`"),
                _ => "this function".to_owned(),
            };
            return Err(self.error(
                ErrorCode::E2005,
                expr,
                format!(
                    "{name} takes {} arguments but {} were given",
                    params.len(),
                    args.len()
                ),
            ));
        }

        let mut failure = None;
        for ((arg, param), found) in args.iter().zip(&params).zip(&arg_types) {
            if let Err(guarantee) = self.unify_at(arg, param, found) {
                failure.get_or_insert(guarantee);
            }
        }
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }
        Ok(Checked::expression(self.unifier.resolve(&ret), state))
    }

    /// The tag named by a callee, if it names one rather than a variable or
    /// a function.
    fn tag_callee<'e>(&self, function: &'e Expr, state: &TypeState) -> Option<(Option<&'e str>, &'e str)> {
        match &function.kind {
            ExprKind::Constructor { type_name, tag } => Some((Some(type_name.as_str()), tag.as_str())),
            ExprKind::Ident(name)
                if !state.contains(name) && !self.ctx.types.types_with_tag(name).is_empty() =>
            {
                Some((None, name.as_str()))
            }
            _ => None,
        }
    }

    /// `Tag(value)`: builds a tagged value, or in a pattern, matches one and
    /// destructures its payload.
    fn check_tag_call(
        &mut self,
        expr: &Expr,
        function: &Expr,
        (type_name, tag): (Option<&str>, &str),
        args: &[Expr],
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        let instance = self.resolve_tag(function, type_name, tag)?;
        let Some(payload) = instance.payload else {
            return Err(self.error(
                ErrorCode::E2005,
                expr,
                format!("tag `{tag}` does not carry a value"),
            ));
        };
        let [arg] = args else {
            return Err(self.error(
                ErrorCode::E2005,
                expr,
                format!("tag `{tag}` takes 1 argument but {} were given", args.len()),
            ));
        };
        let checked = self.check(arg, state, kind)?;
        self.unify_at(arg, &payload, &checked.ty)?;
        let ty = self.unifier.resolve(&instance.ty);
        Ok(match kind {
            Kind::Expression => Checked::expression(ty, state),
            Kind::Pattern => Checked::pattern(ty, checked.state),
        })
    }

    /// An argument containing `?` is a lambda with one parameter per `?`.
    fn check_argument(&mut self, arg: &Expr, state: &TypeState) -> Result<TypeTerm, ErrorGuaranteed> {
        let holes = implicit_args(arg);
        if holes.is_empty() {
            return Ok(self.check(arg, state, Kind::Expression)?.ty);
        }

        let mut inner = state.clone();
        let mut params = Vec::with_capacity(holes.len());
        for hole in &holes {
            let ty = self.unifier.fresh_type();
            inner = match inner.add(&implicit_arg_name(*hole), ty.clone()) {
                Ok(next) => next,
                Err(err) => return Err(self.error(ErrorCode::E3002, arg, err.to_string())),
            };
            params.push(ty);
        }
        let body = self.check(arg, &inner, Kind::Expression)?;
        self.implicit_lambdas.insert(
            arg.id,
            ImplicitLambda {
                params: holes,
                body: Arc::new(arg.clone()),
            },
        );
        Ok(TypeTerm::function(params, body.ty))
    }

    pub(super) fn check_field_access(
        &mut self,
        expr: &Expr,
        record: &Expr,
        field: &str,
        state: &TypeState,
    ) -> CheckResult {
        let checked = self.check(record, state, Kind::Expression)?;
        match self.unifier.resolve(&checked.ty) {
            TypeTerm::Record(known) if known.is_exact() && !known.fields.contains_key(field) => {
                let fixes = suggest_similar(field, known.fields.keys().map(String::as_str), 3)
                    .into_iter()
                    .map(|suggestion| field_fix(expr, record, suggestion))
                    .collect();
                Err(self.error_with_fixes(
                    ErrorCode::E2010,
                    expr,
                    format!("{} has no field `{field}`", known_record(&known)),
                    fixes,
                ))
            }
            found @ (TypeTerm::Record(_) | TypeTerm::Var(_)) => {
                let field_ty = self.unifier.fresh_type();
                let row = self.unifier.fresh_row_var();
                let wanted = TypeTerm::Record(RecordTerm::open([(field.to_owned(), field_ty.clone())], row));
                self.unify_at(record, &wanted, &found)?;
                Ok(Checked::expression(self.unifier.resolve(&field_ty), state))
            }
            found => Err(self.error(
                ErrorCode::E2001,
                record,
                format!("expected a record but found {found}"),
            )),
        }
    }

    /// Check `items` side by side: as values in `state`, or as patterns
    /// whose bindings are merged.
    fn check_items<'e>(
        &mut self,
        items: impl IntoIterator<Item = &'e Expr>,
        state: &TypeState,
        kind: Kind,
    ) -> Result<(Vec<TypeTerm>, Vec<TypeState>), ErrorGuaranteed> {
        let mut types = Vec::new();
        let mut states = Vec::new();
        let mut failure = None;
        for item in items {
            match self.check(item, state, kind) {
                Ok(checked) => {
                    types.push(checked.ty);
                    states.push(checked.state);
                }
                Err(guarantee) => {
                    failure.get_or_insert(guarantee);
                }
            }
        }
        match failure {
            Some(guarantee) => Err(guarantee),
            None => Ok((types, states)),
        }
    }

    /// The result of checking sibling items: unchanged state for values,
    /// merged bindings for patterns.
    fn siblings(
        &mut self,
        expr: &Expr,
        ty: TypeTerm,
        state: &TypeState,
        states: &[TypeState],
        kind: Kind,
    ) -> CheckResult {
        match kind {
            Kind::Expression => Ok(Checked::expression(ty, state)),
            Kind::Pattern => match TypeState::union(state, states) {
                Ok(merged) => Ok(Checked::pattern(ty, merged)),
                Err(err) => Err(self.error(ErrorCode::E3002, expr, err.to_string())),
            },
        }
    }

    pub(super) fn check_tuple(
        &mut self,
        expr: &Expr,
        items: &[Expr],
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        let (types, states) = self.check_items(items, state, kind)?;
        self.siblings(expr, TypeTerm::Tuple(types), state, &states, kind)
    }

    pub(super) fn check_array(
        &mut self,
        expr: &Expr,
        items: &[Expr],
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        let (types, states) = self.check_items(items, state, kind)?;
        let element = self.unifier.fresh_type();
        let mut failure = None;
        for (item, ty) in items.iter().zip(&types) {
            if let Err(guarantee) = self.unify_at(item, &element, ty) {
                failure.get_or_insert(guarantee);
            }
        }
        if let Some(guarantee) = failure {
            return Err(guarantee);
        }
        let ty = TypeTerm::list(self.unifier.resolve(&element));
        self.siblings(expr, ty, state, &states, kind)
    }

    /// A record value has exactly its fields. A record pattern matches any
    /// record that has at least them.
    pub(super) fn check_record(
        &mut self,
        expr: &Expr,
        fields: &[(String, Expr)],
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        let mut seen = FxHashSet::default();
        for (name, value) in fields {
            if !seen.insert(name.as_str()) {
                return Err(self.error(
                    ErrorCode::E3002,
                    value,
                    format!("field `{name}` appears more than once"),
                ));
            }
        }

        let (types, states) = self.check_items(fields.iter().map(|(_, value)| value), state, kind)?;
        let entries = fields.iter().map(|(name, _)| name.clone()).zip(types);
        let record = match kind {
            Kind::Expression => RecordTerm::exact(entries),
            Kind::Pattern => RecordTerm::open(entries, self.unifier.fresh_row_var()),
        };
        self.siblings(expr, TypeTerm::Record(record), state, &states, kind)
    }

    pub(super) fn check_lambda(
        &mut self,
        expr: &Expr,
        params: &[Expr],
        body: &Expr,
        state: &TypeState,
    ) -> CheckResult {
        let (param_types, states) = self.check_items(params, state, Kind::Pattern)?;
        let inner = match TypeState::union(state, &states) {
            Ok(merged) => merged,
            Err(err) => return Err(self.error(ErrorCode::E3002, expr, err.to_string())),
        };
        let body = self.check(body, &inner, Kind::Expression)?;
        self.resolve(expr.id, Resolution::Lambda(Arc::new(expr.clone())));
        Ok(Checked::expression(
            TypeTerm::function(param_types, body.ty),
            state,
        ))
    }

    /// Variables bound by `~` in the condition are visible in the then
    /// branch only.
    pub(super) fn check_if(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        state: &TypeState,
    ) -> CheckResult {
        let cond = self.check(condition, state, Kind::Expression).and_then(|checked| {
            self.unify_at(condition, &TypeTerm::Boolean, &checked.ty)?;
            Ok(checked.state)
        });
        let then_checked = match &cond {
            Ok(inner) => self.check(then_branch, inner, Kind::Expression),
            Err(_) => self.check(then_branch, state, Kind::Expression),
        };
        let else_checked = self.check(else_branch, state, Kind::Expression);
        cond?;
        let (then_checked, else_checked) = (then_checked?, else_checked?);
        let ty = self.unify_at(else_branch, &then_checked.ty, &else_checked.ty)?;
        Ok(Checked::expression(ty, state))
    }
}

/// The `?` nodes of a function argument, in source order. A `?` inside a
/// nested call's arguments or inside a lambda belongs to that call or
/// lambda instead.
pub(crate) fn implicit_args(arg: &Expr) -> Vec<NodeId> {
    fn collect(expr: &Expr, out: &mut Vec<NodeId>) {
        match &expr.kind {
            ExprKind::ImplicitArg => out.push(expr.id),
            ExprKind::Call { function, .. } => collect(function, out),
            ExprKind::Lambda { .. } => {}
            _ => for_each_child(expr, |child| collect(child, out)),
        }
    }
    let mut out = Vec::new();
    collect(arg, &mut out);
    out
}

fn known_record(record: &RecordTerm) -> String {
    if record.fields.is_empty() {
        return "the empty record".to_owned();
    }
    let names: Vec<&str> = record.fields.keys().map(String::as_str).collect();
    format!("record with fields {}", names.join(", "))
}

fn field_fix(expr: &Expr, record: &Expr, field: &str) -> QuickFix {
    let (record, field) = (record.clone(), field.to_owned());
    QuickFix::new(format!("change to `#{field}`"), expr.id, move || {
        Expr::synthetic(ExprKind::FieldAccess {
            record: Box::new(record.clone()),
            field: field.clone(),
        })
    })
}
