use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use combine::error::StreamError;
use combine::parser::choice::{choice, optional};
use combine::parser::item::{eof, position};
use combine::parser::repeat::{many, many1};
use combine::stream::easy::Error;
use combine::{parser, ParseResult, Parser};

use crate::helpers::{ident, kind, name, punct};
use crate::position::Pos;
use crate::tokenizer::{Kind as T, Token, TokenStream};
use crate::ParseError;

/// Names are owned so that documents can be edited in place
pub type Txt = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub position: Pos,
    pub name: Txt,
    pub arguments: Vec<(Txt, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(Txt),
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(Txt),
    List(Vec<Value>),
    Object(BTreeMap<Txt, Value>),
}

impl Value {
    /// Visits every variable referenced by this value, including nested ones
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'v>(&'v self, names: &mut Vec<&'v str>) {
        match self {
            Value::Variable(name) => names.push(name),
            Value::List(items) => items.iter().for_each(|v| v.collect_variables(names)),
            Value::Object(fields) => fields.values().for_each(|v| v.collect_variables(names)),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    NamedType(Txt),
    ListType(Box<Type>),
    NonNullType(Box<Type>),
}

impl Type {
    /// The innermost named type, with list and non-null wrappers removed
    pub fn inner_name(&self) -> &str {
        match self {
            Type::NamedType(name) => name,
            Type::ListType(inner) | Type::NonNullType(inner) => inner.inner_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullType(_))
    }
}

impl FromStr for Type {
    type Err = ParseError;

    /// Parses a type signature such as `[Int!]!`
    fn from_str(s: &str) -> Result<Type, ParseError> {
        let mut tokens = TokenStream::new(s);
        let (ty, _) = parser(parse_type)
            .skip(eof())
            .parse_stream(&mut tokens)
            .map_err(|e| e.into_inner().error)?;
        Ok(ty)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::NamedType(name) => f.write_str(name),
            Type::ListType(inner) => write!(f, "[{}]", inner),
            Type::NonNullType(inner) => write!(f, "{}!", inner),
        }
    }
}

pub fn directives<'a>(input: &mut TokenStream<'a>) -> ParseResult<Vec<Directive>, TokenStream<'a>> {
    many(
        position()
            .skip(punct("@"))
            .and(name::<'a>())
            .and(parser(arguments))
            .map(|((position, name), arguments)| Directive {
                position,
                name,
                arguments,
            }),
    )
    .parse_stream(input)
}

pub fn arguments<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<(Txt, Value)>, TokenStream<'a>> {
    optional(
        punct("(")
            .with(many1(name::<'a>().skip(punct(":")).and(parser(value))))
            .skip(punct(")")),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn int_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value, TokenStream<'a>> {
    kind(T::IntValue)
        .and_then(|tok| tok.value.parse())
        .map(Value::Int)
        .parse_stream(input)
}

pub fn float_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value, TokenStream<'a>> {
    kind(T::FloatValue)
        .and_then(|tok| tok.value.parse())
        .map(Value::Float)
        .parse_stream(input)
}

fn is_block_indent(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn unquote_block_string<'a>(src: &'a str) -> Result<String, Error<Token<'a>, Token<'a>>> {
    debug_assert!(src.starts_with("\"\"\"") && src.ends_with("\"\"\""));
    let body = &src[3..src.len() - 3];
    // only spaces and tabs indent, so `indent` falls on a char boundary
    let indent = body
        .lines()
        .skip(1)
        .filter_map(|line| {
            let trimmed = line.trim_start_matches(is_block_indent).len();
            if trimmed > 0 {
                Some(line.len() - trimmed)
            } else {
                None // whitespace-only lines don't count
            }
        })
        .min()
        .unwrap_or(0);
    let mut result = String::with_capacity(src.len() - 6);
    let mut lines = body.lines();
    if let Some(first) = lines.next() {
        let stripped = first.trim();
        if !stripped.is_empty() {
            result.push_str(stripped);
            result.push('\n');
        }
    }
    let mut last_line = 0;
    for line in lines {
        last_line = result.len();
        if let Some(rest) = line.get(indent..) {
            result.push_str(&rest.replace(r#"\""""#, r#"""""#));
        }
        result.push('\n');
    }
    if result[last_line..].trim().is_empty() {
        result.truncate(last_line);
    }

    Ok(result)
}

fn unquote_string<'a>(s: &'a str) -> Result<String, Error<Token<'a>, Token<'a>>> {
    debug_assert!(s.starts_with('"') && s.ends_with('"'));
    let mut res = String::with_capacity(s.len());
    let mut chars = s[1..s.len() - 1].chars();
    let mut code_point = String::with_capacity(4);
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next() {
            Some(c @ '"') | Some(c @ '\\') | Some(c @ '/') => res.push(c),
            Some('b') => res.push('\u{0008}'),
            Some('f') => res.push('\u{000C}'),
            Some('n') => res.push('\n'),
            Some('r') => res.push('\r'),
            Some('t') => res.push('\t'),
            Some('u') => {
                code_point.clear();
                code_point.extend(chars.by_ref().take(4));
                if code_point.len() != 4 {
                    return Err(Error::unexpected_message(format_args!(
                        "\\u must have 4 characters after it, only found '{}'",
                        code_point
                    )));
                }
                match u32::from_str_radix(&code_point, 16).map(std::char::from_u32) {
                    Ok(Some(unicode_char)) => res.push(unicode_char),
                    _ => {
                        return Err(Error::unexpected_message(format_args!(
                            "{} is not a valid unicode code point",
                            code_point
                        )))
                    }
                }
            }
            Some(c) => {
                return Err(Error::unexpected_message(format_args!(
                    "bad escaped char {:?}",
                    c
                )));
            }
            None => return Err(Error::unexpected_message("slash can't be at the end")),
        }
    }

    Ok(res)
}

pub fn string<'a>(input: &mut TokenStream<'a>) -> ParseResult<String, TokenStream<'a>> {
    choice((
        kind(T::StringValue).and_then(|tok| unquote_string(tok.value)),
        kind(T::BlockString).and_then(|tok| unquote_block_string(tok.value)),
    ))
    .parse_stream(input)
}

pub fn plain_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value, TokenStream<'a>> {
    ident("true")
        .map(|_| Value::Boolean(true))
        .or(ident("false").map(|_| Value::Boolean(false)))
        .or(ident("null").map(|_| Value::Null))
        .or(name::<'a>().map(Value::Enum))
        .or(parser(int_value))
        .or(parser(float_value))
        .or(parser(string).map(Value::String))
        .parse_stream(input)
}

pub fn value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value, TokenStream<'a>> {
    parser(plain_value)
        .or(punct("$").with(name::<'a>()).map(Value::Variable))
        .or(punct("[")
            .with(many(parser(value)))
            .skip(punct("]"))
            .map(Value::List))
        .or(punct("{")
            .with(many(name::<'a>().skip(punct(":")).and(parser(value))))
            .skip(punct("}"))
            .map(Value::Object))
        .parse_stream(input)
}

pub fn default_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<Value, TokenStream<'a>> {
    parser(plain_value)
        .or(punct("[")
            .with(many(parser(default_value)))
            .skip(punct("]"))
            .map(Value::List))
        .or(punct("{")
            .with(many(name::<'a>().skip(punct(":")).and(parser(default_value))))
            .skip(punct("}"))
            .map(Value::Object))
        .parse_stream(input)
}

pub fn parse_type<'a>(input: &mut TokenStream<'a>) -> ParseResult<Type, TokenStream<'a>> {
    name::<'a>()
        .map(Type::NamedType)
        .or(punct("[")
            .with(parser(parse_type))
            .skip(punct("]"))
            .map(Box::new)
            .map(Type::ListType))
        .and(optional(punct("!")).map(|v| v.is_some()))
        .map(|(typ, strict)| {
            if strict {
                Type::NonNullType(Box::new(typ))
            } else {
                typ
            }
        })
        .parse_stream(input)
}
