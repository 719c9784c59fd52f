//! Token cursor for navigating the token stream.

use sheaf_diagnostic::ErrorCode;
use sheaf_ir::Span;

use crate::lexer::{RawToken, Token};
use crate::{ParseError, ParseResult};

/// Position in the token list of one formula.
///
/// The list always ends with [`RawToken::Eof`], and the cursor never moves
/// past it.
pub(crate) struct Cursor<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// End of the last consumed token, for closing node spans.
    prev_end: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Cursor {
            source,
            tokens,
            pos: 0,
            prev_end: 0,
        }
    }

    fn token(&self, pos: usize) -> Token {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens.get(pos.min(last)).copied().unwrap_or(Token {
            kind: RawToken::Eof,
            span: Span::DUMMY,
        })
    }

    #[inline]
    pub(crate) fn current(&self) -> RawToken {
        self.token(self.pos).kind
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.token(self.pos).span
    }

    /// Kind of the token `offset` places ahead of the current one.
    #[inline]
    pub(crate) fn peek(&self, offset: usize) -> RawToken {
        self.token(self.pos + offset).kind
    }

    #[inline]
    pub(crate) fn check(&self, kind: RawToken) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.check(RawToken::Eof)
    }

    /// Start offset of the current token, for opening node spans.
    pub(crate) fn start(&self) -> u32 {
        self.current_span().start
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Consume the current token and return its source text.
    pub(crate) fn advance(&mut self) -> &'a str {
        let token = self.token(self.pos);
        if token.kind != RawToken::Eof {
            self.pos += 1;
            self.prev_end = token.span.end;
        }
        token.span.snippet(self.source).unwrap_or("")
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: RawToken) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind` or fail naming what was expected.
    pub(crate) fn expect(&mut self, kind: RawToken) -> ParseResult<&'a str> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let code = if self.at_end() || is_closer(kind) {
            ErrorCode::E1003
        } else {
            ErrorCode::E1001
        };
        Err(self.error_here(code, format!("expected {}", kind.describe())))
    }

    /// An error at the current token, mentioning what was found there.
    pub(crate) fn error_here(&self, code: ErrorCode, expected: impl Into<String>) -> ParseError {
        let found = self.current();
        let found = if found == RawToken::Eof {
            found.describe().to_owned()
        } else {
            format!("`{}`", self.current_span().snippet(self.source).unwrap_or(""))
        };
        ParseError::new(
            code,
            self.current_span(),
            format!("{}, found {found}", expected.into()),
        )
    }
}

/// Tokens that close something opened earlier.
fn is_closer(kind: RawToken) -> bool {
    matches!(
        kind,
        RawToken::RParen
            | RawToken::RBracket
            | RawToken::RBrace
            | RawToken::EndIf
            | RawToken::EndMatch
            | RawToken::EndDefine
            | RawToken::EndFunction
    )
}
