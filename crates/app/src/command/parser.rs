//! Parser over the token stream.
//!
//! ```text
//! command  := WORD "(" arg_list? ")" EOF
//! arg_list := arg ("," arg)*
//! arg      := STR | WORD | WORD "(" arg_list? ")"
//! ```
//!
//! A nested call is not interpreted here: its source text is captured
//! verbatim as one argument, so `schedule(1, 08:00, turnOn(1))` yields the
//! third argument `turnOn(1)`.

use chumsky::error::RichPattern;
use chumsky::input::ValueInput;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use smarthome_domain::error::ParseError;

use super::lexer::{Spanned, TokenKind, tokenize};

/// Deepest parenthesis nesting accepted, the command's own list included.
pub const MAX_NESTING: usize = 32;

const COMMAND_NAME: &str = "command name";

/// A command split into its name and raw string arguments.
///
/// Arguments are coerced to their target types only when the command is
/// typed (see [`Command`](super::Command)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl RawCommand {
    /// Parse one command line.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first malformed token.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        check_nesting(&tokens)?;

        let len = src.len();
        command_parser(src)
            .parse(
                tokens
                    .as_slice()
                    .map((len..len).into(), |(t, s)| (t, s)),
            )
            .into_result()
            .map_err(|errs| {
                errs.first().map_or(
                    ParseError::Expected {
                        expected: "')'",
                        offset: len,
                    },
                    |err| to_parse_error(src, err),
                )
            })
    }
}

/// Reject input nested deeper than [`MAX_NESTING`] before parsing it.
fn check_nesting(tokens: &[Spanned]) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (kind, span) in tokens {
        match kind {
            TokenKind::LParen => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::TooDeep { offset: span.start });
                }
            }
            TokenKind::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn verbatim(src: &str, span: SimpleSpan) -> String {
    src.get(span.start..span.end).unwrap_or_default().to_string()
}

/// Build the parser for one command line. `src` is the text the tokens
/// were read from; nested calls are sliced out of it.
fn command_parser<'tokens, 'src: 'tokens, I>(
    src: &'src str,
) -> impl Parser<'tokens, I, RawCommand, extra::Err<Rich<'tokens, TokenKind>>>
where
    I: ValueInput<'tokens, Token = TokenKind, Span = SimpleSpan>,
{
    let call = recursive(|call| {
        let inner = choice((
            call.ignored(),
            select! { TokenKind::Str(_) => (), TokenKind::Word(_) => () },
        ));
        select! { TokenKind::Word(_) => () }.then_ignore(
            inner
                .separated_by(just(TokenKind::Comma))
                .collect::<Vec<()>>()
                .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen)),
        )
    });

    let arg = choice((
        call.map_with(move |(), e| verbatim(src, e.span())),
        select! { TokenKind::Str(s) => s, TokenKind::Word(w) => w },
    ));

    select! { TokenKind::Word(name) => name }
        .labelled(COMMAND_NAME)
        .then(
            arg.separated_by(just(TokenKind::Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen)),
        )
        .then_ignore(end())
        .map(|(name, args)| RawCommand { name, args })
}

/// The most specific thing the parser was waiting for, if any.
fn expected_label(err: &Rich<'_, TokenKind>) -> Option<&'static str> {
    let mut best = None;
    for pattern in err.expected() {
        let (rank, label) = match pattern {
            RichPattern::Token(t) if **t == TokenKind::RParen => (0, "')'"),
            RichPattern::Token(t) if **t == TokenKind::LParen => (1, "'('"),
            RichPattern::Label(l) if *l == COMMAND_NAME => (2, COMMAND_NAME),
            _ => continue,
        };
        if best.is_none_or(|(r, _)| rank < r) {
            best = Some((rank, label));
        }
    }
    best.map(|(_, label)| label)
}

fn to_parse_error(src: &str, err: &Rich<'_, TokenKind>) -> ParseError {
    let offset = err.span().start;
    let found = err.found();

    if found.is_some()
        && err
            .expected()
            .any(|p| matches!(p, RichPattern::EndOfInput))
    {
        return ParseError::TrailingInput { offset };
    }
    if let Some(expected) = expected_label(err) {
        return ParseError::Expected { expected, offset };
    }
    match found {
        Some(TokenKind::LParen | TokenKind::RParen | TokenKind::Comma) => {
            ParseError::UnexpectedChar {
                found: src
                    .get(offset..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(' '),
                offset,
            }
        }
        _ => ParseError::Expected {
            expected: "argument",
            offset,
        },
    }
}
