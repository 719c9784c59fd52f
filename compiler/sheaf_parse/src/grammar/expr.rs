//! Operator runs, operands, literals and references.

use sheaf_diagnostic::ErrorCode;
use sheaf_ir::{ColumnRef, Expr, ExprKind, TemporalKind};
use sheaf_stack::ensure_sufficient_stack;

use super::Parser;
use crate::lexer::{unescape_text, RawToken};
use crate::ParseResult;

/// Where an operator run stops.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) enum RunEnd {
    /// At the first token that is not an operator.
    Full,
    /// Also before `=`, which separates a definition's pattern from its value.
    BeforeEquals,
}

impl Parser<'_> {
    pub(super) fn expression(&mut self) -> ParseResult<Expr> {
        self.operator_run(RunEnd::Full)
    }

    /// `operand (op operand)*`, all at one bracket level.
    ///
    /// The run becomes one node whatever the operators are; a run mixing
    /// operators that do not belong together becomes an invalid-operators
    /// placeholder, which the checker reports with bracketing fixes.
    pub(super) fn operator_run(&mut self, end: RunEnd) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| {
            let start = self.cursor.start();
            let first = self.operand()?;
            if self.run_operator(end).is_none() {
                return Ok(first);
            }
            let mut operands = vec![first];
            let mut operators = Vec::new();
            while let Some(symbol) = self.run_operator(end) {
                self.cursor.advance();
                operators.push(symbol.to_owned());
                operands.push(self.operand()?);
            }
            let kind = ExprKind::from_operator_chain(operands, operators);
            Ok(self.node(start, kind))
        })
    }

    fn run_operator(&self, end: RunEnd) -> Option<&'static str> {
        let token = self.cursor.current();
        if end == RunEnd::BeforeEquals && token == RawToken::Eq {
            return None;
        }
        token.operator_symbol()
    }

    /// A primary expression followed by calls and field accesses.
    fn operand(&mut self) -> ParseResult<Expr> {
        let start = self.cursor.start();
        let mut expr = self.primary()?;
        loop {
            let kind = match self.cursor.current() {
                RawToken::LParen => {
                    self.cursor.advance();
                    let args = self.comma_list(RawToken::RParen)?;
                    ExprKind::Call {
                        function: Box::new(expr),
                        args,
                    }
                }
                RawToken::Hash => {
                    self.cursor.advance();
                    let field = self.name("a field name")?;
                    ExprKind::FieldAccess {
                        record: Box::new(expr),
                        field,
                    }
                }
                _ => return Ok(expr),
            };
            expr = self.node(start, kind);
        }
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let start = self.cursor.start();
        let kind = match self.cursor.current() {
            RawToken::Number => self.number_literal(false)?,
            RawToken::Minus if self.cursor.peek(1) == RawToken::Number => {
                self.cursor.advance();
                self.number_literal(true)?
            }
            RawToken::Text => ExprKind::Text(unescape_text(self.cursor.advance())),
            RawToken::Temporal => self.temporal_literal(),
            RawToken::TypeOpen => {
                self.cursor.advance();
                let ty = self.type_expr()?;
                self.cursor.expect(RawToken::RBrace)?;
                ExprKind::TypeLiteral(ty)
            }
            RawToken::LBrace => ExprKind::UnitLiteral(self.braced_unit()?),
            RawToken::Word => match self.name("a name")?.as_str() {
                "true" => ExprKind::Boolean(true),
                "false" => ExprKind::Boolean(false),
                name => ExprKind::Ident(name.to_owned()),
            },
            RawToken::Underscore => {
                self.cursor.advance();
                ExprKind::Wildcard
            }
            RawToken::Question => {
                self.cursor.advance();
                ExprKind::ImplicitArg
            }
            RawToken::Column => {
                self.cursor.advance();
                ExprKind::Column(self.column_ref()?)
            }
            RawToken::Entire => {
                self.cursor.advance();
                ExprKind::EntireColumn(self.column_ref()?)
            }
            RawToken::Table => {
                self.cursor.advance();
                ExprKind::Table(self.name("a table name")?)
            }
            RawToken::Tag => {
                self.cursor.advance();
                let type_name = self.name("a type name")?;
                self.cursor.expect(RawToken::Backslash)?;
                let tag = self.name("a tag name")?;
                ExprKind::Constructor { type_name, tag }
            }
            RawToken::LParen => return self.parenthesized(),
            RawToken::LBracket => {
                self.cursor.advance();
                ExprKind::Array(self.comma_list(RawToken::RBracket)?)
            }
            RawToken::If => self.if_expr()?,
            RawToken::Match => self.match_expr()?,
            RawToken::Define => self.define_expr()?,
            RawToken::Function => self.lambda()?,
            RawToken::Missing => {
                self.cursor.advance();
                ExprKind::Missing
            }
            RawToken::Invalid => self.invalid()?,
            _ => {
                return Err(self
                    .cursor
                    .error_here(ErrorCode::E1002, "expected an expression"))
            }
        };
        Ok(self.node(start, kind))
    }

    /// `12`, `-3.5`, `9.8{m/s^2}`. The text is kept as written.
    fn number_literal(&mut self, negative: bool) -> ParseResult<ExprKind> {
        let digits = self.cursor.advance();
        let text = if negative {
            format!("-{digits}")
        } else {
            digits.to_owned()
        };
        let unit = if self.cursor.check(RawToken::LBrace) {
            Some(self.braced_unit()?)
        } else {
            None
        };
        Ok(ExprKind::Number { text, unit })
    }

    /// `date{2021-03-04}`; the content is validated by the checker.
    fn temporal_literal(&mut self) -> ExprKind {
        let literal = self.cursor.advance();
        let (keyword, rest) = literal.split_once('{').unwrap_or((literal, ""));
        let content = rest.strip_suffix('}').unwrap_or(rest);
        match TemporalKind::from_literal_keyword(keyword) {
            Some(kind) => ExprKind::Temporal {
                kind,
                content: content.to_owned(),
            },
            None => ExprKind::InvalidIdent(literal.to_owned()),
        }
    }

    /// `name` or `Table\name`.
    fn column_ref(&mut self) -> ParseResult<ColumnRef> {
        let first = self.name("a column name")?;
        if self.cursor.eat(RawToken::Backslash) {
            let column = self.name("a column name")?;
            Ok(ColumnRef::new(Some(&first), column))
        } else {
            Ok(ColumnRef::new(None, first))
        }
    }

    /// `(e)`, a tuple `(a, b)` or `(a,)`, the empty tuple `()`, or a
    /// record `(name: e, ...)`.
    fn parenthesized(&mut self) -> ParseResult<Expr> {
        let start = self.cursor.start();
        self.cursor.advance();
        if self.cursor.eat(RawToken::RParen) {
            return Ok(self.node(start, ExprKind::Tuple(Vec::new())));
        }
        if self.at_field_label() {
            let fields = self.record_fields()?;
            return Ok(self.node(start, ExprKind::Record(fields)));
        }

        let first = self.expression()?;
        if self.cursor.eat(RawToken::RParen) {
            return Ok(first);
        }
        if !self.cursor.eat(RawToken::Comma) {
            return Err(self
                .cursor
                .error_here(ErrorCode::E1003, "expected `)` or `,`"));
        }
        let mut items = vec![first];
        while !self.cursor.check(RawToken::RParen) {
            items.push(self.expression()?);
            if !self.cursor.eat(RawToken::Comma) {
                break;
            }
        }
        self.cursor.expect(RawToken::RParen)?;
        Ok(self.node(start, ExprKind::Tuple(items)))
    }

    /// `name: e, ...)`, after the opening bracket.
    fn record_fields(&mut self) -> ParseResult<Vec<(String, Expr)>> {
        let mut fields = Vec::new();
        loop {
            let name = self.name("a field name")?;
            self.cursor.expect(RawToken::Colon)?;
            fields.push((name, self.expression()?));
            if !self.cursor.eat(RawToken::Comma) || self.cursor.check(RawToken::RParen) {
                break;
            }
        }
        self.cursor.expect(RawToken::RParen)?;
        Ok(fields)
    }

    /// Comma-separated expressions up to and including `close`.
    pub(super) fn comma_list(&mut self, close: RawToken) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        if self.cursor.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if !self.cursor.eat(RawToken::Comma) {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }
}
