use combine::stream::easy::Errors;
use thiserror::Error;

use crate::position::Pos;
use crate::tokenizer::Token;

pub type InternalError<'a> = Errors<Token<'a>, Token<'a>, Pos>;

/// Error parsing a query, a schema or a type signature
///
/// The message carries the position and the expected tokens as reported
/// by the grammar.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("graphql parse error: {}", _0)]
pub struct ParseError(String);

impl ParseError {
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl<'a> From<InternalError<'a>> for ParseError {
    fn from(e: InternalError<'a>) -> ParseError {
        ParseError(format!("{}", e))
    }
}
