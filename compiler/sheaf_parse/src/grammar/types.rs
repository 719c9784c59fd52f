//! Unit and type expressions.
//!
//! Units: `^` binds tightest, then `*`, then `/` (left to right), so
//! `kg*m/s^2` is `(kg*m) / (s^2)`.

use sheaf_diagnostic::ErrorCode;
use sheaf_ir::{TemporalKind, TypeArgExpr, TypeExpr, UnitExpr};

use super::Parser;
use crate::lexer::RawToken;
use crate::{ParseError, ParseResult};

impl Parser<'_> {
    /// `{unit}`
    pub(super) fn braced_unit(&mut self) -> ParseResult<UnitExpr> {
        self.cursor.expect(RawToken::LBrace)?;
        let unit = self.unit_quotient()?;
        self.cursor.expect(RawToken::RBrace)?;
        Ok(unit)
    }

    fn unit_quotient(&mut self) -> ParseResult<UnitExpr> {
        let mut unit = self.unit_product()?;
        while self.cursor.eat(RawToken::Slash) {
            let denominator = self.unit_power()?;
            unit = UnitExpr::divide(unit, denominator);
        }
        Ok(unit)
    }

    fn unit_product(&mut self) -> ParseResult<UnitExpr> {
        let first = self.unit_power()?;
        if !self.cursor.check(RawToken::Star) {
            return Ok(first);
        }
        let mut factors = vec![first];
        while self.cursor.eat(RawToken::Star) {
            factors.push(self.unit_power()?);
        }
        Ok(UnitExpr::Times(factors))
    }

    fn unit_power(&mut self) -> ParseResult<UnitExpr> {
        let mut unit = self.unit_atom()?;
        while self.cursor.eat(RawToken::Caret) {
            let negative = self.cursor.eat(RawToken::Minus);
            let span = self.cursor.current_span();
            if !self.cursor.check(RawToken::Number) {
                return Err(self
                    .cursor
                    .error_here(ErrorCode::E1005, "expected a whole-number power"));
            }
            let power: i32 = self.cursor.advance().parse().map_err(|_| {
                ParseError::new(ErrorCode::E1005, span, "a unit power must be a whole number")
            })?;
            unit = UnitExpr::raise(unit, if negative { -power } else { power });
        }
        Ok(unit)
    }

    fn unit_atom(&mut self) -> ParseResult<UnitExpr> {
        match self.cursor.current() {
            RawToken::Word => Ok(UnitExpr::single(self.cursor.advance())),
            RawToken::Number => {
                let span = self.cursor.current_span();
                match self.cursor.advance() {
                    "1" => Ok(UnitExpr::One),
                    other => Err(ParseError::new(
                        ErrorCode::E1005,
                        span,
                        format!("`{other}` is not a unit; only `1` may appear as a number"),
                    )),
                }
            }
            RawToken::LParen => {
                self.cursor.advance();
                let unit = self.unit_quotient()?;
                self.cursor.expect(RawToken::RParen)?;
                Ok(unit)
            }
            _ => Err(self.cursor.error_here(ErrorCode::E1005, "expected a unit")),
        }
    }

    pub(super) fn type_expr(&mut self) -> ParseResult<TypeExpr> {
        match self.cursor.current() {
            RawToken::Word => self.named_type(),
            RawToken::LBracket => {
                self.cursor.advance();
                let element = self.type_expr()?;
                self.cursor.expect(RawToken::RBracket)?;
                Ok(TypeExpr::List(Box::new(element)))
            }
            RawToken::LParen => self.bracketed_type(),
            _ => Err(self.cursor.error_here(ErrorCode::E1006, "expected a type")),
        }
    }

    /// `Number{u}`, a built-in name, or a tagged type with optional
    /// arguments.
    fn named_type(&mut self) -> ParseResult<TypeExpr> {
        let name = self.name("a type name")?;
        match name.as_str() {
            "Number" => {
                let unit = if self.cursor.check(RawToken::LBrace) {
                    Some(self.braced_unit()?)
                } else {
                    None
                };
                return Ok(TypeExpr::Number(unit));
            }
            "Text" => return Ok(TypeExpr::Text),
            "Boolean" => return Ok(TypeExpr::Boolean),
            _ => {}
        }
        if let Some(kind) = TemporalKind::from_type_name(&name) {
            return Ok(TypeExpr::Temporal(kind));
        }
        let args = if self.cursor.eat(RawToken::LParen) {
            self.type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeExpr::Tagged { name, args })
    }

    fn type_args(&mut self) -> ParseResult<Vec<TypeArgExpr>> {
        let mut args = Vec::new();
        if self.cursor.eat(RawToken::RParen) {
            return Ok(args);
        }
        loop {
            let arg = if self.cursor.check(RawToken::LBrace) {
                TypeArgExpr::Unit(self.braced_unit()?)
            } else {
                TypeArgExpr::Type(self.type_expr()?)
            };
            args.push(arg);
            if !self.cursor.eat(RawToken::Comma) {
                break;
            }
        }
        self.cursor.expect(RawToken::RParen)?;
        Ok(args)
    }

    /// `(t)`, a tuple type `(a, b)` or `(a,)`, or a record type
    /// `(name: t, ...)`.
    fn bracketed_type(&mut self) -> ParseResult<TypeExpr> {
        self.cursor.advance();
        if self.cursor.eat(RawToken::RParen) {
            return Ok(TypeExpr::Tuple(Vec::new()));
        }
        if self.at_field_label() {
            let mut fields = Vec::new();
            loop {
                let name = self.name("a field name")?;
                self.cursor.expect(RawToken::Colon)?;
                fields.push((name, self.type_expr()?));
                if !self.cursor.eat(RawToken::Comma) || self.cursor.check(RawToken::RParen) {
                    break;
                }
            }
            self.cursor.expect(RawToken::RParen)?;
            return Ok(TypeExpr::Record(fields));
        }

        let first = self.type_expr()?;
        if self.cursor.eat(RawToken::RParen) {
            return Ok(first);
        }
        self.cursor.expect(RawToken::Comma)?;
        let mut items = vec![first];
        while !self.cursor.check(RawToken::RParen) {
            items.push(self.type_expr()?);
            if !self.cursor.eat(RawToken::Comma) {
                break;
            }
        }
        self.cursor.expect(RawToken::RParen)?;
        Ok(TypeExpr::Tuple(items))
    }
}
