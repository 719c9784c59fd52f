use sheaf_diagnostic::{suggest_similar, Diagnostic, ErrorCode, ErrorGuaranteed, QuickFix};
use sheaf_ir::{ColumnRef, Expr, ExprKind};
use sheaf_types::{TagInstance, TypeState, TypeTerm};

use super::{CheckResult, Checked, Checker, Kind, PendingInstance};
use crate::{implicit_arg_name, Resolution, TagRef};

impl Checker<'_> {
    /// A name used as a value: a variable, else a tag, else a standard
    /// function.
    pub(super) fn check_ident(&mut self, expr: &Expr, name: &str, state: &TypeState) -> CheckResult {
        if let Some(candidates) = state.find(name) {
            // Candidates from several alternatives were unified when the
            // alternatives were merged; any one stands for all.
            if let Some(ty) = candidates.first() {
                self.resolve(expr.id, Resolution::Variable);
                return Ok(Checked::expression(self.unifier.resolve(ty), state));
            }
        }

        if !self.ctx.types.types_with_tag(name).is_empty() {
            let instance = self.resolve_tag(expr, None, name)?;
            return Ok(Checked::expression(tag_value_type(instance), state));
        }

        if let Some(definition) = self.ctx.functions.lookup(name) {
            let ty = definition.scheme().instantiate(&mut self.unifier);
            self.instances.push(PendingInstance {
                node: expr.id,
                span: expr.span,
                definition,
                ty: ty.clone(),
            });
            return Ok(Checked::expression(ty, state));
        }

        Err(self.unknown_ident(expr, name, state))
    }

    /// A name in pattern position binds a new variable unless it names a
    /// tag.
    pub(super) fn check_ident_pattern(
        &mut self,
        expr: &Expr,
        name: &str,
        state: &TypeState,
    ) -> CheckResult {
        if !self.ctx.types.types_with_tag(name).is_empty() {
            return self.check_tag_pattern(expr, None, name, state);
        }
        let ty = self.unifier.fresh_type();
        match state.add(name, ty.clone()) {
            Ok(state) => {
                self.resolve(expr.id, Resolution::Binding);
                Ok(Checked::pattern(ty, state))
            }
            Err(err) => Err(self.error(ErrorCode::E3002, expr, err.to_string())),
        }
    }

    pub(super) fn check_constructor(
        &mut self,
        expr: &Expr,
        type_name: &str,
        tag: &str,
        state: &TypeState,
        kind: Kind,
    ) -> CheckResult {
        match kind {
            Kind::Expression => {
                let instance = self.resolve_tag(expr, Some(type_name), tag)?;
                Ok(Checked::expression(tag_value_type(instance), state))
            }
            Kind::Pattern => self.check_tag_pattern(expr, Some(type_name), tag, state),
        }
    }

    /// A tag without payload in pattern position matches values with that
    /// tag.
    fn check_tag_pattern(
        &mut self,
        expr: &Expr,
        type_name: Option<&str>,
        tag: &str,
        state: &TypeState,
    ) -> CheckResult {
        let instance = self.resolve_tag(expr, type_name, tag)?;
        if instance.payload.is_some() {
            return Err(self.error(
                ErrorCode::E2005,
                expr,
                format!("tag `{tag}` carries a value; match it with `{tag}(...)`"),
            ));
        }
        Ok(Checked::pattern(instance.ty, state.clone()))
    }

    /// Resolve `type_name\tag`, or a bare `tag` when `type_name` is `None`,
    /// recording the tag on `expr`.
    pub(super) fn resolve_tag(
        &mut self,
        expr: &Expr,
        type_name: Option<&str>,
        tag: &str,
    ) -> Result<TagInstance, ErrorGuaranteed> {
        let types = self.ctx.types;
        let type_name = match type_name {
            Some(name) => name,
            None => {
                let owners = types.types_with_tag(tag);
                match owners.as_slice() {
                    [only] => *only,
                    [] => {
                        return Err(self.error(
                            ErrorCode::E4005,
                            expr,
                            format!("unknown tag `{tag}`"),
                        ))
                    }
                    _ => return Err(self.ambiguous_tag(expr, tag, &owners)),
                }
            }
        };

        match types.instantiate_tag(type_name, tag, &mut self.unifier) {
            Some(instance) => {
                self.resolve(
                    expr.id,
                    Resolution::Tag(TagRef {
                        type_name: type_name.to_owned(),
                        tag: tag.to_owned(),
                        index: instance.index,
                        has_payload: instance.payload.is_some(),
                    }),
                );
                Ok(instance)
            }
            None => Err(self.unknown_tag(expr, type_name, tag)),
        }
    }

    fn ambiguous_tag(&mut self, expr: &Expr, tag: &str, owners: &[&str]) -> ErrorGuaranteed {
        let fixes = owners
            .iter()
            .map(|owner| {
                let (type_name, tag) = ((*owner).to_owned(), tag.to_owned());
                QuickFix::new(format!("use `@tag {type_name}\\{tag}`"), expr.id, move || {
                    Expr::synthetic(ExprKind::Constructor {
                        type_name: type_name.clone(),
                        tag: tag.clone(),
                    })
                })
            })
            .collect();
        self.error_with_fixes(
            ErrorCode::E4006,
            expr,
            format!(
                "tag `{tag}` belongs to several types: {}",
                owners.join(", ")
            ),
            fixes,
        )
    }

    fn unknown_tag(&mut self, expr: &Expr, type_name: &str, tag: &str) -> ErrorGuaranteed {
        let types = self.ctx.types;
        let Some(definition) = types.get(type_name) else {
            let names = types.type_names();
            let fixes = suggest_similar(type_name, names, 3)
                .into_iter()
                .map(|name| constructor_fix(expr, name, tag))
                .collect();
            return self.error_with_fixes(
                ErrorCode::E4005,
                expr,
                format!("unknown type `{type_name}`"),
                fixes,
            );
        };
        let fixes = suggest_similar(tag, definition.tags.iter().map(|t| t.name.as_str()), 3)
            .into_iter()
            .map(|suggestion| constructor_fix(expr, type_name, suggestion))
            .collect();
        self.error_with_fixes(
            ErrorCode::E4005,
            expr,
            format!("type `{type_name}` has no tag `{tag}`"),
            fixes,
        )
    }

    fn unknown_ident(&mut self, expr: &Expr, name: &str, state: &TypeState) -> ErrorGuaranteed {
        let functions = self.ctx.functions;
        let mut candidates: Vec<&str> = state.names().collect();
        candidates.extend(functions.names());
        let fixes = suggest_similar(name, candidates, 3)
            .into_iter()
            .map(|suggestion| {
                let suggestion = suggestion.to_owned();
                QuickFix::new(format!("change to `{suggestion}`"), expr.id, move || {
                    Expr::synthetic(ExprKind::Ident(suggestion.clone()))
                })
            })
            .collect();
        self.error_with_fixes(
            ErrorCode::E4003,
            expr,
            format!("unknown name `{name}`"),
            fixes,
        )
    }

    pub(super) fn check_implicit_arg(&mut self, expr: &Expr, state: &TypeState) -> CheckResult {
        match state.find(&implicit_arg_name(expr.id)).and_then(<[_]>::first) {
            Some(ty) => {
                self.resolve(expr.id, Resolution::Variable);
                Ok(Checked::expression(ty.clone(), state))
            }
            None => Err(self.error(
                ErrorCode::E3001,
                expr,
                "`?` can only be used inside a function argument",
            )),
        }
    }

    // ========================================
    // Columns and tables
    // ========================================

    pub(super) fn check_column(
        &mut self,
        expr: &Expr,
        column: &ColumnRef,
        state: &TypeState,
    ) -> CheckResult {
        let info = self.find_column(expr, column)?;
        let ty = info.ty.to_term();
        self.resolve(expr.id, Resolution::Column(info));
        Ok(Checked::expression(ty, state))
    }

    pub(super) fn check_entire_column(
        &mut self,
        expr: &Expr,
        column: &ColumnRef,
        state: &TypeState,
    ) -> CheckResult {
        let info = self.find_column(expr, column)?;
        let ty = TypeTerm::list(info.ty.to_term());
        self.resolve(expr.id, Resolution::EntireColumn(info));
        Ok(Checked::expression(ty, state))
    }

    fn find_column(
        &mut self,
        expr: &Expr,
        column: &ColumnRef,
    ) -> Result<sheaf_value::ColumnInfo, ErrorGuaranteed> {
        let Some(info) = self
            .ctx
            .columns
            .column(column.table.as_deref(), &column.column)
        else {
            let message = match &column.table {
                Some(table) => format!("could not find column: {table}\\{}", column.column),
                None => format!("could not find source column: {}", column.column),
            };
            return Err(self.error(ErrorCode::E4001, expr, message));
        };
        if let Some(advisory) = &info.advisory {
            self.recorder.record_information(
                Diagnostic::note(ErrorCode::I0002, expr.id, expr.span).with_message(advisory.clone()),
            );
        }
        Ok(info)
    }

    pub(super) fn check_table(&mut self, expr: &Expr, table: &str, state: &TypeState) -> CheckResult {
        let Some(info) = self.ctx.columns.table(table) else {
            return Err(self.error(
                ErrorCode::E4002,
                expr,
                format!("could not find source table: {table}"),
            ));
        };
        let ty = TypeTerm::list(info.row_type().to_term());
        self.resolve(expr.id, Resolution::Table(info));
        Ok(Checked::expression(ty, state))
    }
}

/// A tag with a payload is a constructor function; one without is a value.
fn tag_value_type(instance: TagInstance) -> TypeTerm {
    match instance.payload {
        Some(payload) => TypeTerm::function(vec![payload], instance.ty),
        None => instance.ty,
    }
}

fn constructor_fix(expr: &Expr, type_name: &str, tag: &str) -> QuickFix {
    let (type_name, tag) = (type_name.to_owned(), tag.to_owned());
    QuickFix::new(format!("change to `@tag {type_name}\\{tag}`"), expr.id, move || {
        Expr::synthetic(ExprKind::Constructor {
            type_name: type_name.clone(),
            tag: tag.clone(),
        })
    })
}
