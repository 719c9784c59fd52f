//! Recursive-descent grammar.
//!
//! - `expr`: operator runs, operands, literals and references
//! - `control`: `@if`, `@match`, `@define`, `@function` and placeholders
//! - `types`: unit expressions and type expressions

mod control;
mod expr;
mod types;

use sheaf_diagnostic::ErrorCode;
use sheaf_ir::{Expr, ExprKind, NodeIdGen, TypeExpr};

use crate::cursor::Cursor;
use crate::lexer::{RawToken, Token};
use crate::ParseResult;

/// Parser over the tokens of one formula.
///
/// Node ids are handed out in the order nodes are completed, so every id in
/// the resulting tree is unique.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    ids: NodeIdGen,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(source, tokens),
            ids: NodeIdGen::new(),
        }
    }

    /// A whole formula: one expression and nothing after it.
    pub(crate) fn parse_formula(mut self) -> ParseResult<Expr> {
        let expr = self.expression()?;
        self.finish("an operator or the end of the formula")?;
        Ok(expr)
    }

    /// A whole type expression, as written in table headers.
    pub(crate) fn parse_type(mut self) -> ParseResult<TypeExpr> {
        let ty = self.type_expr()?;
        self.finish("the end of the type")?;
        Ok(ty)
    }

    fn finish(&self, expected: &str) -> ParseResult<()> {
        if self.cursor.at_end() {
            Ok(())
        } else {
            Err(self
                .cursor
                .error_here(ErrorCode::E1001, format!("expected {expected}")))
        }
    }

    /// A node spanning from `start` to the last consumed token.
    fn node(&mut self, start: u32, kind: ExprKind) -> Expr {
        Expr::new(self.ids.fresh(), self.cursor.span_from(start), kind)
    }

    /// One or more words, joined by single spaces: `to text`, `unit price`.
    fn name(&mut self, what: &str) -> ParseResult<String> {
        if !self.cursor.check(RawToken::Word) {
            return Err(self
                .cursor
                .error_here(ErrorCode::E1001, format!("expected {what}")));
        }
        let mut name = self.cursor.advance().to_owned();
        while self.cursor.check(RawToken::Word) {
            name.push(' ');
            name.push_str(self.cursor.advance());
        }
        Ok(name)
    }

    /// Whether the cursor is at `name:` (but not `name::`).
    fn at_field_label(&self) -> bool {
        let mut offset = 0;
        while self.cursor.peek(offset) == RawToken::Word {
            offset += 1;
        }
        offset > 0 && self.cursor.peek(offset) == RawToken::Colon
    }
}
