/*!
# Build a [`Schema`] from schema definition language text
*/

use graphql_parser::parse_schema;
use graphql_parser::schema::{self as sdl, TypeDefinitionKind};
use indexmap::IndexMap;

use super::{EnumValue, FieldDefinition, InputValue, Schema, SchemaType, TypeKind};
use crate::error::SchemaError;

fn input_value(value: &sdl::InputValue) -> InputValue {
    InputValue {
        name: value.name.clone(),
        description: value.description.clone(),
        ty: value.value_type.clone(),
        default_value: value.default_value.as_ref().map(|v| v.to_string()),
    }
}

fn field(field: &sdl::Field) -> FieldDefinition {
    FieldDefinition {
        name: field.name.clone(),
        description: field.description.clone(),
        arguments: field.arguments.iter().map(input_value).collect(),
        ty: field.field_type.clone(),
        deprecation_reason: field.deprecation_reason(),
    }
}

fn enum_value(value: &sdl::EnumValue) -> EnumValue {
    EnumValue {
        name: value.name.clone(),
        description: value.description.clone(),
        deprecation_reason: value.deprecation_reason(),
    }
}

fn kind(definition: &sdl::TypeDefinition) -> TypeKind {
    match &definition.kind {
        TypeDefinitionKind::Scalar => TypeKind::Scalar,
        TypeDefinitionKind::Object {
            implements_interfaces,
            fields,
        } => TypeKind::Object {
            fields: fields.iter().map(field).collect(),
            interfaces: implements_interfaces.clone(),
        },
        TypeDefinitionKind::Interface {
            implements_interfaces,
            fields,
        } => TypeKind::Interface {
            fields: fields.iter().map(field).collect(),
            interfaces: implements_interfaces.clone(),
            possible_types: vec![],
        },
        TypeDefinitionKind::Union { types } => TypeKind::Union {
            possible_types: types.clone(),
        },
        TypeDefinitionKind::Enum { values } => TypeKind::Enum {
            values: values.iter().map(enum_value).collect(),
        },
        TypeDefinitionKind::InputObject { fields } => TypeKind::InputObject {
            fields: fields.iter().map(input_value).collect(),
        },
    }
}

/// Appends the members of an extension to the type it extends
fn extend(base: &mut SchemaType, extension: TypeKind) -> Result<(), SchemaError> {
    match (&mut base.kind, extension) {
        (TypeKind::Scalar, TypeKind::Scalar) => {}
        (
            TypeKind::Object { fields, interfaces },
            TypeKind::Object {
                fields: more_fields,
                interfaces: more_interfaces,
            },
        )
        | (
            TypeKind::Interface {
                fields, interfaces, ..
            },
            TypeKind::Interface {
                fields: more_fields,
                interfaces: more_interfaces,
                ..
            },
        ) => {
            fields.extend(more_fields);
            interfaces.extend(more_interfaces);
        }
        (
            TypeKind::Union { possible_types },
            TypeKind::Union {
                possible_types: more,
            },
        ) => possible_types.extend(more),
        (TypeKind::Enum { values }, TypeKind::Enum { values: more }) => values.extend(more),
        (TypeKind::InputObject { fields }, TypeKind::InputObject { fields: more }) => {
            fields.extend(more)
        }
        (_, extension) => {
            return Err(SchemaError::InvalidKind {
                name: base.name.clone(),
                kind: SchemaType::new(base.name.clone(), extension)
                    .kind_name()
                    .to_string(),
            })
        }
    }
    Ok(())
}

pub(super) fn parse(text: &str) -> Result<Schema, SchemaError> {
    let document = parse_schema(text)?;

    let mut types: IndexMap<String, SchemaType> = IndexMap::new();
    for definition in document.types() {
        if types.contains_key(&definition.name) {
            return Err(SchemaError::DuplicateType(definition.name.clone()));
        }
        types.insert(
            definition.name.clone(),
            SchemaType {
                name: definition.name.clone(),
                description: definition.description.clone(),
                kind: kind(definition),
            },
        );
    }

    for extension in document.extensions() {
        let base = types
            .get_mut(&extension.name)
            .ok_or_else(|| SchemaError::UnknownType {
                name: extension.name.clone(),
                referrer: format!("extend {}", extension.name),
            })?;
        extend(base, kind(extension))?;
    }

    let (query, mutation, subscription) = match document.schema_definition() {
        Some(schema) => (
            schema.query.clone(),
            schema.mutation.clone(),
            schema.subscription.clone(),
        ),
        None => (None, None, None),
    };

    Schema::new(query, mutation, subscription, types.into_iter().map(|(_, t)| t).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::query::Operation;

    static SDL: &str = r#"
        schema { query: Root }

        "The entry point"
        type Root {
            node(id: ID!): Node
            search(term: String = "", first: Int! = 10): [Result!]!
        }

        interface Node { id: ID! }

        type User implements Node {
            id: ID!
            name: String @deprecated(reason: "use fullName")
        }

        type Post implements Node { id: ID! }

        union Result = User | Post

        enum Role { ADMIN USER }

        input Filter { role: Role, nested: Filter }

        extend type User { role: Role }
        extend enum Role { GUEST }

        directive @auth(requires: Role) on FIELD_DEFINITION
    "#;

    #[test]
    fn parses_types() {
        let schema = parse(SDL).unwrap();
        assert_eq!(schema.root_type_name(Operation::Query), Some("Root"));
        let root = schema.get_type("Root").unwrap();
        assert_eq!(root.description.as_deref(), Some("The entry point"));
        let search = root.field("search").unwrap();
        assert_eq!(search.ty.to_string(), "[Result!]!");
        assert_eq!(search.arguments[0].default_value.as_deref(), Some("\"\""));
        assert_eq!(search.required_arguments().count(), 0);
        assert!(root.field("node").unwrap().arguments[0].is_required());
    }

    #[test]
    fn applies_extensions() {
        let schema = parse(SDL).unwrap();
        let user = schema.get_type("User").unwrap();
        let names: Vec<_> = user.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "role"]);
        assert_eq!(
            user.field("name").unwrap().deprecation_reason.as_deref(),
            Some("use fullName")
        );
        let values: Vec<_> = schema
            .get_type("Role")
            .unwrap()
            .enum_values()
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(values, vec!["ADMIN", "USER", "GUEST"]);
    }

    #[test]
    fn interface_possible_types() {
        let schema = parse(SDL).unwrap();
        match &schema.get_type("Node").unwrap().kind {
            TypeKind::Interface { possible_types, .. } => {
                assert_eq!(possible_types, &vec!["User".to_string(), "Post".to_string()])
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn references() {
        let schema = parse(SDL).unwrap();
        let refs: Vec<_> = schema
            .references_to("Role")
            .into_iter()
            .map(|r| format!("{}.{}", r.type_name, r.field_name))
            .collect();
        assert_eq!(refs, vec!["User.role", "Filter.role"]);
    }

    #[test]
    fn extension_errors() {
        assert!(matches!(
            parse("extend type Missing { a: Int }"),
            Err(SchemaError::UnknownType { .. })
        ));
        assert!(matches!(
            parse("type A { a: Int } extend enum A { B }"),
            Err(SchemaError::InvalidKind { .. })
        ));
        assert!(matches!(
            parse("type Query { a: Unknown }"),
            Err(SchemaError::UnknownType { .. })
        ));
        assert!(matches!(parse("type {"), Err(SchemaError::Parse(_))));
    }
}
