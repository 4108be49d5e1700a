use graphql_parser::query::Type;

use crate::schema::FieldDefinition;

lazy_static! {
    static ref TYPENAME_SCHEMA_FIELD: FieldDefinition = FieldDefinition {
        name: TYPENAME_FIELD_NAME.to_string(),
        description: Some("The name of the current Object type at runtime.".to_string()),
        arguments: vec![],
        ty: Type::NonNullType(Box::new(Type::NamedType("String".to_string()))),
        deprecation_reason: None,
    };
}

pub static TYPENAME_FIELD_NAME: &str = "__typename";
pub static QUERY_TYPE_NAME: &str = "Query";
pub static MUTATION_TYPE_NAME: &str = "Mutation";
pub static SUBSCRIPTION_TYPE_NAME: &str = "Subscription";

pub static BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

pub static DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_INDENT: u32 = 2;

/// Nesting limit for mocks of self-referencing input objects
pub const MOCK_INPUT_DEPTH: usize = 3;

pub fn typename_field_def() -> &'static FieldDefinition {
    &*TYPENAME_SCHEMA_FIELD
}
