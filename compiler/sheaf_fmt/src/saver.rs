//! Expression rendering.

use sheaf_ir::{ClausePattern, ColumnRef, Definition, Expr, ExprKind, MatchClause};
use sheaf_stack::ensure_sufficient_stack;

/// Builds the canonical text of a tree.
#[derive(Default)]
pub struct Saver {
    buffer: String,
}

impl Saver {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn emit_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn output(self) -> String {
        self.buffer
    }

    /// Render `expr`, bracketing it if it is an operator node and
    /// `needs_brackets` is set.
    pub fn expr(&mut self, expr: &Expr, needs_brackets: bool) {
        ensure_sufficient_stack(|| {
            if needs_brackets && expr.is_operator() {
                self.emit_char('(');
                self.expr_inner(expr);
                self.emit_char(')');
            } else {
                self.expr_inner(expr);
            }
        });
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Boolean(b) => self.emit(if *b { "true" } else { "false" }),
            ExprKind::Number { text, unit } => {
                self.emit(text);
                if let Some(unit) = unit {
                    self.braced_unit(unit);
                }
            }
            ExprKind::Text(text) => self.text(text),
            ExprKind::Temporal { kind, content } => {
                self.emit(kind.literal_keyword());
                self.emit_char('{');
                self.emit(content);
                self.emit_char('}');
            }
            ExprKind::UnitLiteral(unit) => self.braced_unit(unit),
            ExprKind::TypeLiteral(ty) => {
                self.emit("type{");
                self.type_expr(ty);
                self.emit_char('}');
            }

            ExprKind::Ident(name) => self.emit(name),
            ExprKind::Wildcard => self.emit_char('_'),
            ExprKind::ImplicitArg => self.emit_char('?'),
            ExprKind::Column(column) => {
                self.emit("@column ");
                self.column_ref(column);
            }
            ExprKind::EntireColumn(column) => {
                self.emit("@entire ");
                self.column_ref(column);
            }
            ExprKind::Table(table) => {
                self.emit("@table ");
                self.emit(table);
            }
            ExprKind::Constructor { type_name, tag } => {
                self.emit("@tag ");
                self.emit(type_name);
                self.emit_char('\\');
                self.emit(tag);
            }

            ExprKind::AddSubtract { operands, ops } => {
                let symbols: Vec<&str> = ops.iter().map(|op| op.as_symbol()).collect();
                self.operator_run(operands, |i| symbols[i]);
            }
            ExprKind::Comparison { operands, ops } => {
                let symbols: Vec<&str> = ops.iter().map(|op| op.as_symbol()).collect();
                self.operator_run(operands, |i| symbols[i]);
            }
            ExprKind::Times(operands) => self.operator_run(operands, |_| "*"),
            ExprKind::Concat(operands) => self.operator_run(operands, |_| ";"),
            ExprKind::And(operands) => self.operator_run(operands, |_| "&"),
            ExprKind::Or(operands) => self.operator_run(operands, |_| "|"),
            ExprKind::Equal(operands) => self.operator_run(operands, |_| "="),
            ExprKind::Divide {
                numerator,
                denominator,
            } => self.binary(numerator, "/", denominator),
            ExprKind::Raise { base, exponent } => self.binary(base, "^", exponent),
            ExprKind::NotEqual { left, right } => self.binary(left, "<>", right),
            ExprKind::Matches { value, pattern } => self.binary(value, "~", pattern),
            ExprKind::PlusMinus { value, tolerance } => self.binary(value, "±", tolerance),
            ExprKind::InvalidOperators {
                operands,
                operators,
            } => self.operator_run(operands, |i| {
                operators.get(i).map_or("", String::as_str)
            }),

            ExprKind::Call { function, args } => {
                self.expr(function, true);
                self.emit_char('(');
                self.comma_separated(args);
                self.emit_char(')');
            }
            ExprKind::FieldAccess { record, field } => {
                self.expr(record, true);
                self.emit_char('#');
                self.emit(field);
            }
            ExprKind::Tuple(items) => {
                self.emit_char('(');
                self.comma_separated(items);
                if items.len() == 1 {
                    self.emit_char(',');
                }
                self.emit_char(')');
            }
            ExprKind::Record(fields) => {
                self.emit_char('(');
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit(name);
                    self.emit(": ");
                    self.expr(value, false);
                }
                self.emit_char(')');
            }
            ExprKind::Array(items) => {
                self.emit_char('[');
                self.comma_separated(items);
                self.emit_char(']');
            }
            ExprKind::Lambda { params, body } => {
                self.emit("@function(");
                self.comma_separated(params);
                self.emit(") @then ");
                self.expr(body, false);
                self.emit(" @endfunction");
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.emit("@if ");
                self.expr(condition, false);
                self.emit(" @then ");
                self.expr(then_branch, false);
                self.emit(" @else ");
                self.expr(else_branch, false);
                self.emit(" @endif");
            }
            ExprKind::Match { scrutinee, clauses } => self.match_expr(scrutinee, clauses),
            ExprKind::Define { definitions, body } => {
                self.emit("@define ");
                for (i, definition) in definitions.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.definition(definition);
                }
                self.emit(" @then ");
                self.expr(body, false);
                self.emit(" @enddefine");
            }

            ExprKind::InvalidIdent(text) => {
                self.emit("@invalid ");
                self.text(text);
            }
            ExprKind::Invalid(items) => {
                self.emit("@invalid(");
                self.comma_separated(items);
                self.emit_char(')');
            }
            ExprKind::Missing => self.emit("@missing"),
        }
    }

    /// `a op b op c`, each operand bracketed if it is itself an operator.
    fn operator_run<'s>(&mut self, operands: &[Expr], symbol: impl Fn(usize) -> &'s str) {
        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                self.emit_char(' ');
                self.emit(symbol(i - 1));
                self.emit_char(' ');
            }
            self.expr(operand, true);
        }
    }

    fn binary(&mut self, left: &Expr, symbol: &str, right: &Expr) {
        self.expr(left, true);
        self.emit_char(' ');
        self.emit(symbol);
        self.emit_char(' ');
        self.expr(right, true);
    }

    fn comma_separated(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.expr(item, false);
        }
    }

    fn column_ref(&mut self, column: &ColumnRef) {
        if let Some(table) = &column.table {
            self.emit(table);
            self.emit_char('\\');
        }
        self.emit(&column.column);
    }

    fn match_expr(&mut self, scrutinee: &Expr, clauses: &[MatchClause]) {
        self.emit("@match ");
        self.expr(scrutinee, false);
        for clause in clauses {
            for (i, pattern) in clause.patterns.iter().enumerate() {
                self.emit(if i == 0 { " @case " } else { " @orcase " });
                self.clause_pattern(pattern);
            }
            self.emit(" @then ");
            self.expr(&clause.outcome, false);
        }
        self.emit(" @endmatch");
    }

    fn clause_pattern(&mut self, pattern: &ClausePattern) {
        self.expr(&pattern.pattern, false);
        if let Some(guard) = &pattern.guard {
            self.emit(" @given ");
            self.expr(guard, false);
        }
    }

    fn definition(&mut self, definition: &Definition) {
        match definition {
            // The pattern ends at the first `=`, so an equality pattern
            // is bracketed.
            Definition::Equal { pattern, value } => {
                let bracket = matches!(pattern.kind, ExprKind::Equal(_));
                self.expr(pattern, bracket);
                self.emit(" = ");
                self.expr(value, false);
            }
            Definition::Annotation { variable, ty } => {
                self.expr(variable, false);
                self.emit(" :: ");
                self.expr(ty, false);
            }
        }
    }
}
