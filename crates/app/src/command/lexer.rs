//! Tokenizer for the command grammar.
//!
//! Produces a flat list of tokens paired with their byte spans in the source
//! line. Whitespace separates tokens and is otherwise dropped.

use chumsky::input::MapExtra;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use smarthome_domain::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A bare run of characters: names, numbers, times such as `08:00`.
    Word(String),
    /// A single- or double-quoted string, unescaped.
    Str(String),
    LParen,
    RParen,
    Comma,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Word(w) => f.write_str(w),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
        }
    }
}

/// A token and the bytes it was read from.
pub type Spanned = (TokenKind, SimpleSpan);

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | '\'' | '"') || c.is_whitespace()
}

/// String literal delimited by `quote`. A backslash escapes the next char.
///
/// A missing closing quote still yields a token but emits an error spanning
/// the whole literal.
fn quoted<'a>(quote: char) -> impl Parser<'a, &'a str, TokenKind, extra::Err<Rich<'a, char>>> {
    let escape = just('\\').ignore_then(any());

    just(quote)
        .ignore_then(
            none_of([quote, '\\'])
                .or(escape)
                .repeated()
                .collect::<String>(),
        )
        .then(just(quote).or_not())
        .validate(|(value, close), e, emitter| {
            if close.is_none() {
                emitter.emit(Rich::custom(e.span(), "unterminated string"));
            }
            TokenKind::Str(value)
        })
}

/// Build the lexer for the command grammar.
pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Spanned>, extra::Err<Rich<'a, char>>> {
    let punct = choice((
        just('(').to(TokenKind::LParen),
        just(')').to(TokenKind::RParen),
        just(',').to(TokenKind::Comma),
    ));

    let word = any()
        .filter(|c: &char| !is_delimiter(*c))
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|w: &str| TokenKind::Word(w.to_string()))
        .labelled("word");

    let token = choice((punct, quoted('\''), quoted('"'), word));

    text::whitespace().ignore_then(
        token
            .map_with(|tok, e: &mut MapExtra<'a, '_, &'a str, _>| (tok, e.span()))
            .then_ignore(text::whitespace())
            .repeated()
            .collect(),
    )
}

/// Split `src` into tokens.
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedString`] when a quote is never closed.
/// Every other character sequence lexes.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, ParseError> {
    lexer().parse(src).into_result().map_err(|errs| {
        let offset = errs.first().map_or(src.len(), |err| err.span().start);
        ParseError::UnterminatedString { offset }
    })
}
