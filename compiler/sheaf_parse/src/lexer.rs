//! Lexer for the textual form of formulas, using logos.
//!
//! Identifiers may contain inner spaces (`to text`), so the lexer emits one
//! [`RawToken::Word`] per space-separated word and the parser joins runs of
//! words into a single name.

use logos::Logos;
use sheaf_diagnostic::ErrorCode;
use sheaf_ir::Span;

use crate::{ParseError, ParseResult};

#[derive(Logos, Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    // Keywords
    #[token("@if")]
    If,
    #[token("@then")]
    Then,
    #[token("@else")]
    Else,
    #[token("@endif")]
    EndIf,
    #[token("@match")]
    Match,
    #[token("@case")]
    Case,
    #[token("@orcase")]
    OrCase,
    #[token("@given")]
    Given,
    #[token("@endmatch")]
    EndMatch,
    #[token("@define")]
    Define,
    #[token("@enddefine")]
    EndDefine,
    #[token("@function")]
    Function,
    #[token("@endfunction")]
    EndFunction,
    #[token("@column")]
    Column,
    #[token("@entire")]
    Entire,
    #[token("@table")]
    Table,
    #[token("@tag")]
    Tag,
    #[token("@missing")]
    Missing,
    #[token("@invalid")]
    Invalid,
    #[regex(r"@[a-zA-Z]+")]
    UnknownKeyword,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,
    #[regex(r#""([^"\\]|\\.)*""#)]
    Text,
    /// `date{...}` and friends; the content is checked later, by the type
    /// checker, so that a bad date is a diagnostic on a node.
    #[regex(r"(date|dateym|time|datetime|datetimezoned)\{[^}]*\}")]
    Temporal,
    #[token("type{")]
    TypeOpen,

    // Names
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
    #[token("_", priority = 3)]
    Underscore,
    #[token("?")]
    Question,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("#")]
    Hash,
    #[token("\\")]
    Backslash,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token(";")]
    Semicolon,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("~")]
    Tilde,
    #[token("±")]
    PlusMinus,

    /// End of input, appended by [`lex`].
    Eof,
}

impl RawToken {
    /// The symbol of an operator token, as accepted by
    /// [`sheaf_ir::ExprKind::from_operator_chain`].
    pub(crate) fn operator_symbol(self) -> Option<&'static str> {
        Some(match self {
            RawToken::Plus => "+",
            RawToken::Minus => "-",
            RawToken::Star => "*",
            RawToken::Slash => "/",
            RawToken::Caret => "^",
            RawToken::Semicolon => ";",
            RawToken::Amp => "&",
            RawToken::Pipe => "|",
            RawToken::Eq => "=",
            RawToken::NotEq => "<>",
            RawToken::Lt => "<",
            RawToken::LtEq => "<=",
            RawToken::Gt => ">",
            RawToken::GtEq => ">=",
            RawToken::Tilde => "~",
            RawToken::PlusMinus => "±",
            _ => return None,
        })
    }

    /// How the token is described in "expected ..., found ..." messages.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            RawToken::If => "`@if`",
            RawToken::Then => "`@then`",
            RawToken::Else => "`@else`",
            RawToken::EndIf => "`@endif`",
            RawToken::Match => "`@match`",
            RawToken::Case => "`@case`",
            RawToken::OrCase => "`@orcase`",
            RawToken::Given => "`@given`",
            RawToken::EndMatch => "`@endmatch`",
            RawToken::Define => "`@define`",
            RawToken::EndDefine => "`@enddefine`",
            RawToken::Function => "`@function`",
            RawToken::EndFunction => "`@endfunction`",
            RawToken::Column => "`@column`",
            RawToken::Entire => "`@entire`",
            RawToken::Table => "`@table`",
            RawToken::Tag => "`@tag`",
            RawToken::Missing => "`@missing`",
            RawToken::Invalid => "`@invalid`",
            RawToken::Number => "a number",
            RawToken::Text => "a text literal",
            RawToken::Temporal => "a date/time literal",
            RawToken::TypeOpen => "`type{`",
            RawToken::Word => "a name",
            RawToken::Underscore => "`_`",
            RawToken::Question => "`?`",
            RawToken::LParen => "`(`",
            RawToken::RParen => "`)`",
            RawToken::LBracket => "`[`",
            RawToken::RBracket => "`]`",
            RawToken::LBrace => "`{`",
            RawToken::RBrace => "`}`",
            RawToken::Comma => "`,`",
            RawToken::Colon => "`:`",
            RawToken::DoubleColon => "`::`",
            RawToken::Hash => "`#`",
            RawToken::Backslash => "`\\`",
            RawToken::UnknownKeyword => "an unknown keyword",
            RawToken::Eof => "the end of the formula",
            _ => "an operator",
        }
    }
}

/// A token and where it is in the source.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct Token {
    pub kind: RawToken,
    pub span: Span,
}

/// Split `source` into tokens, ending with [`RawToken::Eof`].
pub(crate) fn lex(source: &str) -> ParseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(RawToken::UnknownKeyword) => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    span,
                    format!("unknown keyword `{}`", lexer.slice()),
                ))
            }
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => return Err(lex_error(lexer.slice(), &source[lexer.span().start..], span)),
        }
    }
    tokens.push(Token {
        kind: RawToken::Eof,
        span: Span::from_range(source.len()..source.len()),
    });
    Ok(tokens)
}

fn lex_error(slice: &str, rest: &str, span: Span) -> ParseError {
    if rest.starts_with('"') {
        return ParseError::new(ErrorCode::E1007, span, "text literal is never closed");
    }
    ParseError::new(ErrorCode::E1001, span, format!("unexpected `{slice}`"))
}

/// Remove the quotes from a text literal and resolve its escapes.
///
/// `\n` and `\t` stand for newline and tab; a backslash before any other
/// character stands for that character.
pub(crate) fn unescape_text(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<RawToken> {
        lex(source)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn number_with_unit() {
        assert_eq!(
            kinds("9.8{m/s^2}"),
            vec![
                RawToken::Number,
                RawToken::LBrace,
                RawToken::Word,
                RawToken::Slash,
                RawToken::Word,
                RawToken::Caret,
                RawToken::Number,
                RawToken::RBrace,
                RawToken::Eof,
            ]
        );
    }

    #[test]
    fn temporal_literals_are_single_tokens() {
        assert_eq!(
            kinds("datetime{2021-03-04 12:30} date from ymd"),
            vec![
                RawToken::Temporal,
                RawToken::Word,
                RawToken::Word,
                RawToken::Word,
                RawToken::Eof,
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("a <= b <> c :: d"),
            vec![
                RawToken::Word,
                RawToken::LtEq,
                RawToken::Word,
                RawToken::NotEq,
                RawToken::Word,
                RawToken::DoubleColon,
                RawToken::Word,
                RawToken::Eof,
            ]
        );
    }

    #[test]
    fn underscore_alone_is_a_wildcard() {
        assert_eq!(
            kinds("_ _x"),
            vec![RawToken::Underscore, RawToken::Word, RawToken::Eof]
        );
    }

    #[test]
    fn unterminated_text() {
        let err = lex("\"abc").unwrap_err();
        assert_eq!(err.code, ErrorCode::E1007);
    }

    #[test]
    fn unknown_keyword() {
        let err = lex("@iff x").unwrap_err();
        assert_eq!(err.message, "unknown keyword `@iff`");
    }

    #[test]
    fn escapes() {
        assert_eq!(unescape_text(r#""a\"b\\c\nd""#), "a\"b\\c\nd");
    }
}
