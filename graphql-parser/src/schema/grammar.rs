use combine::stream::easy::{Error, Errors};
use combine::error::StreamError;
use combine::parser::choice::{choice, optional};
use combine::parser::item::{eof, position};
use combine::parser::repeat::{many, many1, sep_by1};
use combine::{parser, ParseResult, Parser};

use crate::common::{default_value, directives, parse_type, string, Txt};
use crate::helpers::{ident, name, punct};
use crate::position::Pos;
use crate::schema::ast::*;
use crate::tokenizer::TokenStream;
use crate::ParseError;

pub fn schema<'a>(input: &mut TokenStream<'a>) -> ParseResult<SchemaDefinition, TokenStream<'a>> {
    (
        position().skip(ident("schema")),
        parser(directives),
        punct("{")
            .with(many((position(), name::<'a>().skip(punct(":")), name::<'a>())))
            .skip(punct("}")),
    )
        .flat_map(
            |(position, directives, operations): (_, _, Vec<(Pos, Txt, Txt)>)| {
                let mut schema = SchemaDefinition {
                    position,
                    directives,
                    ..SchemaDefinition::default()
                };
                for (pos, operation, type_name) in operations {
                    let slot = match operation.as_str() {
                        "query" => &mut schema.query,
                        "mutation" => &mut schema.mutation,
                        "subscription" => &mut schema.subscription,
                        _ => {
                            let mut e = Errors::empty(pos);
                            e.add_error(Error::unexpected_message(format_args!(
                                "unknown operation type {}",
                                operation
                            )));
                            return Err(e);
                        }
                    };
                    if slot.is_some() {
                        let mut e = Errors::empty(pos);
                        e.add_error(Error::unexpected_message(format_args!(
                            "duplicate {} operation",
                            operation
                        )));
                        return Err(e);
                    }
                    *slot = Some(type_name);
                }
                Ok(schema)
            },
        )
        .parse_stream(input)
}

pub fn implements_interfaces<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<Txt>, TokenStream<'a>> {
    optional(
        ident("implements")
            .skip(optional(punct("&")))
            .with(sep_by1(name::<'a>(), punct("&"))),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn input_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<InputValue, TokenStream<'a>> {
    (
        position(),
        optional(parser(string)),
        name::<'a>(),
        punct(":").with(parser(parse_type)),
        optional(punct("=").with(parser(default_value))),
        parser(directives),
    )
        .map(
            |(position, description, name, value_type, default_value, directives)| InputValue {
                position,
                description,
                name,
                value_type,
                default_value,
                directives,
            },
        )
        .parse_stream(input)
}

pub fn arguments_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<InputValue>, TokenStream<'a>> {
    optional(punct("(").with(many1(parser(input_value))).skip(punct(")")))
        .map(|v| v.unwrap_or_else(Vec::new))
        .parse_stream(input)
}

pub fn field<'a>(input: &mut TokenStream<'a>) -> ParseResult<Field, TokenStream<'a>> {
    (
        position(),
        optional(parser(string)),
        name::<'a>(),
        parser(arguments_definition),
        punct(":").with(parser(parse_type)),
        parser(directives),
    )
        .map(
            |(position, description, name, arguments, field_type, directives)| Field {
                position,
                description,
                name,
                arguments,
                field_type,
                directives,
            },
        )
        .parse_stream(input)
}

pub fn fields<'a>(input: &mut TokenStream<'a>) -> ParseResult<Vec<Field>, TokenStream<'a>> {
    optional(punct("{").with(many(parser(field))).skip(punct("}")))
        .map(|v| v.unwrap_or_else(Vec::new))
        .parse_stream(input)
}

fn union_members<'a>(input: &mut TokenStream<'a>) -> ParseResult<Vec<Txt>, TokenStream<'a>> {
    optional(
        punct("=")
            .skip(optional(punct("|")))
            .with(sep_by1(name::<'a>(), punct("|"))),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

fn enum_value<'a>(input: &mut TokenStream<'a>) -> ParseResult<EnumValue, TokenStream<'a>> {
    (
        position(),
        optional(parser(string)),
        name::<'a>(),
        parser(directives),
    )
        .map(|(position, description, name, directives)| EnumValue {
            position,
            description,
            name,
            directives,
        })
        .parse_stream(input)
}

fn enum_values<'a>(input: &mut TokenStream<'a>) -> ParseResult<Vec<EnumValue>, TokenStream<'a>> {
    optional(punct("{").with(many(parser(enum_value))).skip(punct("}")))
        .map(|v| v.unwrap_or_else(Vec::new))
        .parse_stream(input)
}

fn input_fields<'a>(input: &mut TokenStream<'a>) -> ParseResult<Vec<InputValue>, TokenStream<'a>> {
    optional(punct("{").with(many(parser(input_value))).skip(punct("}")))
        .map(|v| v.unwrap_or_else(Vec::new))
        .parse_stream(input)
}

/// Parses everything after the description of a type definition
pub fn type_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<TypeDefinition, TokenStream<'a>> {
    let header = |keyword: &'static str| (position().skip(ident(keyword)), name::<'a>());
    choice((
        (header("scalar"), parser(directives))
            .map(|((position, name), directives)| (position, name, directives, TypeDefinitionKind::Scalar)),
        (
            header("type"),
            parser(implements_interfaces),
            parser(directives),
            parser(fields),
        )
            .map(|((position, name), implements_interfaces, directives, fields)| {
                let kind = TypeDefinitionKind::Object {
                    implements_interfaces,
                    fields,
                };
                (position, name, directives, kind)
            }),
        (
            header("interface"),
            parser(implements_interfaces),
            parser(directives),
            parser(fields),
        )
            .map(|((position, name), implements_interfaces, directives, fields)| {
                let kind = TypeDefinitionKind::Interface {
                    implements_interfaces,
                    fields,
                };
                (position, name, directives, kind)
            }),
        (header("union"), parser(directives), parser(union_members)).map(
            |((position, name), directives, types)| {
                (position, name, directives, TypeDefinitionKind::Union { types })
            },
        ),
        (header("enum"), parser(directives), parser(enum_values)).map(
            |((position, name), directives, values)| {
                (position, name, directives, TypeDefinitionKind::Enum { values })
            },
        ),
        (header("input"), parser(directives), parser(input_fields)).map(
            |((position, name), directives, fields)| {
                (position, name, directives, TypeDefinitionKind::InputObject { fields })
            },
        ),
    ))
    .map(|(position, name, directives, kind)| TypeDefinition {
        position,
        description: None,
        name,
        directives,
        kind,
    })
    .parse_stream(input)
}

pub fn directive_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<DirectiveDefinition, TokenStream<'a>> {
    (
        position().skip(ident("directive")).skip(punct("@")),
        name::<'a>(),
        parser(arguments_definition),
        optional(ident("repeatable")).map(|r| r.is_some()),
        ident("on")
            .skip(optional(punct("|")))
            .with(sep_by1(name::<'a>(), punct("|"))),
    )
        .map(
            |(position, name, arguments, repeatable, locations)| DirectiveDefinition {
                position,
                description: None,
                name,
                arguments,
                repeatable,
                locations,
            },
        )
        .parse_stream(input)
}

pub fn definition<'a>(input: &mut TokenStream<'a>) -> ParseResult<Definition, TokenStream<'a>> {
    (
        optional(parser(string)),
        choice((
            parser(schema).map(Definition::Schema),
            parser(type_definition).map(Definition::Type),
            ident("extend")
                .with(parser(type_definition))
                .map(Definition::TypeExtension),
            parser(directive_definition).map(Definition::Directive),
        )),
    )
        .map(|(description, mut definition)| {
            match &mut definition {
                Definition::Type(ty) | Definition::TypeExtension(ty) => {
                    ty.description = description
                }
                Definition::Directive(dir) => dir.description = description,
                Definition::Schema(_) => {}
            }
            definition
        })
        .parse_stream(input)
}

/// Parses a piece of schema language and returns an AST
pub fn parse_schema(s: &str) -> Result<Document, ParseError> {
    let mut tokens = TokenStream::new(s);
    let (doc, _) = many(parser(definition))
        .map(|d| Document { definitions: d })
        .skip(eof())
        .parse_stream(&mut tokens)
        .map_err(|e| e.into_inner().error)?;

    Ok(doc)
}
