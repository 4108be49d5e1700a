//! Schema definition language AST
//!
//! Type extensions share the shape of type definitions and are merged into
//! them by consumers.
pub use crate::common::{Directive, Txt, Type, Value};
use crate::position::Pos;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Type definitions, not including extensions
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Type(ty) => Some(ty),
            _ => None,
        })
    }

    pub fn extensions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::TypeExtension(ty) => Some(ty),
            _ => None,
        })
    }

    pub fn schema_definition(&self) -> Option<&SchemaDefinition> {
        self.definitions.iter().find_map(|def| match def {
            Definition::Schema(schema) => Some(schema),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Schema(SchemaDefinition),
    Type(TypeDefinition),
    TypeExtension(TypeDefinition),
    Directive(DirectiveDefinition),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition {
    pub position: Pos,
    pub directives: Vec<Directive>,
    pub query: Option<Txt>,
    pub mutation: Option<Txt>,
    pub subscription: Option<Txt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub position: Pos,
    pub description: Option<String>,
    pub name: Txt,
    pub directives: Vec<Directive>,
    pub kind: TypeDefinitionKind,
}

impl TypeDefinition {
    pub fn is_composite_type(&self) -> bool {
        matches!(
            self.kind,
            TypeDefinitionKind::Object { .. }
                | TypeDefinitionKind::Interface { .. }
                | TypeDefinitionKind::Union { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinitionKind {
    Scalar,
    Object {
        implements_interfaces: Vec<Txt>,
        fields: Vec<Field>,
    },
    Interface {
        implements_interfaces: Vec<Txt>,
        fields: Vec<Field>,
    },
    Union {
        types: Vec<Txt>,
    },
    Enum {
        values: Vec<EnumValue>,
    },
    InputObject {
        fields: Vec<InputValue>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub position: Pos,
    pub description: Option<String>,
    pub name: Txt,
    pub arguments: Vec<InputValue>,
    pub field_type: Type,
    pub directives: Vec<Directive>,
}

impl Field {
    /// The reason given by a `@deprecated` directive, if any
    pub fn deprecation_reason(&self) -> Option<String> {
        deprecation_reason(&self.directives)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub position: Pos,
    pub description: Option<String>,
    pub name: Txt,
    pub value_type: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub position: Pos,
    pub description: Option<String>,
    pub name: Txt,
    pub directives: Vec<Directive>,
}

impl EnumValue {
    pub fn deprecation_reason(&self) -> Option<String> {
        deprecation_reason(&self.directives)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub position: Pos,
    pub description: Option<String>,
    pub name: Txt,
    pub arguments: Vec<InputValue>,
    pub repeatable: bool,
    /// Location names such as `FIELD` or `OBJECT`, as written
    pub locations: Vec<Txt>,
}

fn deprecation_reason(directives: &[Directive]) -> Option<String> {
    let deprecated = directives.iter().find(|d| d.name == "deprecated")?;
    let reason = deprecated
        .arguments
        .iter()
        .find_map(|(name, value)| match value {
            Value::String(reason) if name == "reason" => Some(reason.clone()),
            _ => None,
        });
    Some(reason.unwrap_or_else(|| "No longer supported".to_string()))
}
