use std::collections::VecDeque;

use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::sequence::preceded;
use nom::Parser;

use crate::error::ParseError;
use crate::node::{Node, NodeId, ReferenceSyntax};
use crate::result::ParseResult;

use super::{ParseContext, Token, TokenKind};

/// Matches a whole `$name` word and yields `name`.
pub fn dollar_identifier(input: &str) -> ParseResult<&str, &str> {
    all_consuming(preceded(
        char('$'),
        take_while1(|c: char| c != '$' && !c.is_whitespace()),
    ))
    .parse(input)
}

/// Whether the window starts with `{ word }` or a `$word`.
pub fn is_reference(tokens: &VecDeque<Token>) -> bool {
    let brace = tokens.len() > 2
        && tokens[0].is(TokenKind::OpenCurly)
        && tokens[1].is(TokenKind::Word)
        && tokens[2].is(TokenKind::CloseCurly);

    brace
        || tokens
            .front()
            .is_some_and(|t| t.is(TokenKind::Word) && dollar_identifier(&t.text).is_ok())
}

/// Consumes the tokens of one reference and appends its node to the context
/// container. Tokens after the reference are left in `tokens`; when the
/// identifier resolver fails nothing is consumed.
pub fn build_reference(
    tokens: &mut VecDeque<Token>,
    ctx: &mut ParseContext,
) -> Result<NodeId, ParseError> {
    let first = tokens.pop_front().ok_or(ParseError::NotAReference)?;

    match first.kind {
        TokenKind::OpenCurly => {
            let identifier = tokens
                .pop_front()
                .ok_or(ParseError::UnclosedBracket(first.start))?;
            let value = match ctx.options().resolve_identifier(&identifier.text) {
                Ok(value) => value,
                Err(err) => {
                    tokens.push_front(identifier);
                    tokens.push_front(first);
                    return Err(err);
                }
            };
            let id = ctx.init(Node::reference(ReferenceSyntax::Brace, value), first.start);

            match tokens.pop_front() {
                Some(close) if close.is(TokenKind::CloseCurly) => {
                    ctx.end(&close);
                    Ok(id)
                }
                other => {
                    if let Some(other) = other {
                        tokens.push_front(other);
                    }
                    log::warn!("unclosed reference bracket at {}", first.start);
                    Err(ParseError::UnclosedBracket(first.start))
                }
            }
        }
        TokenKind::Word => {
            let identifier = first.text.strip_prefix('$').unwrap_or(&first.text);
            let value = match ctx.options().resolve_identifier(identifier) {
                Ok(value) => value,
                Err(err) => {
                    tokens.push_front(first);
                    return Err(err);
                }
            };
            let id = ctx.init(Node::reference(ReferenceSyntax::Dollar, value), first.start);
            ctx.end(&first);
            Ok(id)
        }
        _ => {
            tokens.push_front(first);
            Err(ParseError::NotAReference)
        }
    }
}
