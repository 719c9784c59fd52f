//! Keyword-delimited forms and editor placeholders.

use sheaf_diagnostic::ErrorCode;
use sheaf_ir::{ClausePattern, Definition, ExprKind, MatchClause};

use super::expr::RunEnd;
use super::Parser;
use crate::lexer::{unescape_text, RawToken};
use crate::ParseResult;

impl Parser<'_> {
    /// `@if c @then a @else b @endif`
    pub(super) fn if_expr(&mut self) -> ParseResult<ExprKind> {
        self.cursor.advance();
        let condition = self.expression()?;
        self.cursor.expect(RawToken::Then)?;
        let then_branch = self.expression()?;
        self.cursor.expect(RawToken::Else)?;
        let else_branch = self.expression()?;
        self.cursor.expect(RawToken::EndIf)?;
        Ok(ExprKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    /// `@match e (@case p [@given g] (@orcase p [@given g])* @then e)+ @endmatch`
    pub(super) fn match_expr(&mut self) -> ParseResult<ExprKind> {
        self.cursor.advance();
        let scrutinee = self.expression()?;
        let mut clauses = Vec::new();
        while self.cursor.eat(RawToken::Case) {
            let mut patterns = vec![self.clause_pattern()?];
            while self.cursor.eat(RawToken::OrCase) {
                patterns.push(self.clause_pattern()?);
            }
            self.cursor.expect(RawToken::Then)?;
            let outcome = self.expression()?;
            clauses.push(MatchClause { patterns, outcome });
        }
        if clauses.is_empty() {
            return Err(self
                .cursor
                .error_here(ErrorCode::E1001, "expected `@case`"));
        }
        self.cursor.expect(RawToken::EndMatch)?;
        Ok(ExprKind::Match {
            scrutinee: Box::new(scrutinee),
            clauses,
        })
    }

    fn clause_pattern(&mut self) -> ParseResult<ClausePattern> {
        let pattern = self.expression()?;
        let guard = if self.cursor.eat(RawToken::Given) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(ClausePattern { pattern, guard })
    }

    /// `@define d, d, ... @then body @enddefine`
    pub(super) fn define_expr(&mut self) -> ParseResult<ExprKind> {
        self.cursor.advance();
        let mut definitions = vec![self.definition()?];
        while self.cursor.eat(RawToken::Comma) {
            definitions.push(self.definition()?);
        }
        self.cursor.expect(RawToken::Then)?;
        let body = self.expression()?;
        self.cursor.expect(RawToken::EndDefine)?;
        Ok(ExprKind::Define {
            definitions,
            body: Box::new(body),
        })
    }

    /// `pattern = value` or `name :: type{...}`.
    ///
    /// The pattern stops before `=`, so `x = a = b` defines `x` as the
    /// equality `a = b`.
    fn definition(&mut self) -> ParseResult<Definition> {
        let left = self.operator_run(RunEnd::BeforeEquals)?;
        if self.cursor.eat(RawToken::DoubleColon) {
            let ty = self.expression()?;
            return Ok(Definition::Annotation { variable: left, ty });
        }
        if self.cursor.eat(RawToken::Eq) {
            let value = self.expression()?;
            return Ok(Definition::Equal {
                pattern: left,
                value,
            });
        }
        Err(self
            .cursor
            .error_here(ErrorCode::E1001, "expected `=` or `::`"))
    }

    /// `@function(p, ...) @then body @endfunction`
    pub(super) fn lambda(&mut self) -> ParseResult<ExprKind> {
        self.cursor.advance();
        self.cursor.expect(RawToken::LParen)?;
        let params = self.comma_list(RawToken::RParen)?;
        self.cursor.expect(RawToken::Then)?;
        let body = self.expression()?;
        self.cursor.expect(RawToken::EndFunction)?;
        Ok(ExprKind::Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// `@invalid "text"` or `@invalid(e, ...)`, as written for placeholders
    /// an editor left in the tree.
    pub(super) fn invalid(&mut self) -> ParseResult<ExprKind> {
        self.cursor.advance();
        if self.cursor.check(RawToken::Text) {
            return Ok(ExprKind::InvalidIdent(unescape_text(self.cursor.advance())));
        }
        self.cursor.expect(RawToken::LParen)?;
        Ok(ExprKind::Invalid(self.comma_list(RawToken::RParen)?))
    }
}
