/*!
# Build a [`Schema`] from the result of the standard introspection query
*/

use graphql_parser::query::Type;
use serde::Deserialize;

use super::{EnumValue, FieldDefinition, InputValue, Schema, SchemaType, TypeKind};
use crate::consts::DEFAULT_DEPRECATION_REASON;
use crate::error::SchemaError;

/// Introspection results arrive either bare or inside a GraphQL response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Response { data: IntrospectionResult },
    Bare(IntrospectionResult),
}

#[derive(Debug, Deserialize)]
struct IntrospectionResult {
    #[serde(rename = "__schema")]
    schema: IntrospectionSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    query_type: Option<NamedRef>,
    mutation_type: Option<NamedRef>,
    subscription_type: Option<NamedRef>,
    types: Vec<FullType>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullType {
    kind: String,
    name: String,
    description: Option<String>,
    fields: Option<Vec<IntrospectionField>>,
    input_fields: Option<Vec<IntrospectionInputValue>>,
    interfaces: Option<Vec<TypeRef>>,
    enum_values: Option<Vec<IntrospectionEnumValue>>,
    possible_types: Option<Vec<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionField {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    ty: TypeRef,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionInputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: TypeRef,
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionEnumValue {
    name: String,
    description: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRef {
    kind: String,
    name: Option<String>,
    of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    fn to_type(&self, owner: &str) -> Result<Type, SchemaError> {
        let inner = || {
            self.of_type
                .as_ref()
                .ok_or_else(|| SchemaError::MissingTypeRef(owner.to_string()))
        };
        match self.kind.as_str() {
            "NON_NULL" => Ok(Type::NonNullType(Box::new(inner()?.to_type(owner)?))),
            "LIST" => Ok(Type::ListType(Box::new(inner()?.to_type(owner)?))),
            _ => self
                .name
                .clone()
                .map(Type::NamedType)
                .ok_or_else(|| SchemaError::MissingTypeRef(owner.to_string())),
        }
    }

    fn name(&self, owner: &str) -> Result<String, SchemaError> {
        self.name
            .clone()
            .ok_or_else(|| SchemaError::MissingTypeRef(owner.to_string()))
    }
}

fn deprecation(is_deprecated: bool, reason: Option<String>) -> Option<String> {
    if is_deprecated {
        Some(reason.unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string()))
    } else {
        None
    }
}

fn input_value(value: IntrospectionInputValue, owner: &str) -> Result<InputValue, SchemaError> {
    Ok(InputValue {
        ty: value.ty.to_type(&format!("{}.{}", owner, value.name))?,
        name: value.name,
        description: value.description,
        default_value: value.default_value,
    })
}

fn input_values(
    values: Option<Vec<IntrospectionInputValue>>,
    owner: &str,
) -> Result<Vec<InputValue>, SchemaError> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| input_value(v, owner))
        .collect()
}

fn fields(ty: &mut FullType) -> Result<Vec<FieldDefinition>, SchemaError> {
    let owner = ty.name.clone();
    ty.fields
        .take()
        .unwrap_or_default()
        .into_iter()
        .map(|field| -> Result<FieldDefinition, SchemaError> {
            let path = format!("{}.{}", owner, field.name);
            Ok(FieldDefinition {
                ty: field.ty.to_type(&path)?,
                arguments: input_values(Some(field.args), &path)?,
                deprecation_reason: deprecation(field.is_deprecated, field.deprecation_reason),
                name: field.name,
                description: field.description,
            })
        })
        .collect()
}

fn names(refs: Option<Vec<TypeRef>>, owner: &str) -> Result<Vec<String>, SchemaError> {
    refs.unwrap_or_default()
        .iter()
        .map(|r| r.name(owner))
        .collect()
}

fn schema_type(mut ty: FullType) -> Result<SchemaType, SchemaError> {
    let kind_name = std::mem::take(&mut ty.kind);
    let kind = match kind_name.as_str() {
        "SCALAR" => TypeKind::Scalar,
        "OBJECT" => TypeKind::Object {
            fields: fields(&mut ty)?,
            interfaces: names(ty.interfaces.take(), &ty.name)?,
        },
        "INTERFACE" => TypeKind::Interface {
            fields: fields(&mut ty)?,
            interfaces: names(ty.interfaces.take(), &ty.name)?,
            possible_types: names(ty.possible_types.take(), &ty.name)?,
        },
        "UNION" => TypeKind::Union {
            possible_types: names(ty.possible_types.take(), &ty.name)?,
        },
        "ENUM" => TypeKind::Enum {
            values: ty
                .enum_values
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(|v| EnumValue {
                    deprecation_reason: deprecation(v.is_deprecated, v.deprecation_reason),
                    name: v.name,
                    description: v.description,
                })
                .collect(),
        },
        "INPUT_OBJECT" => TypeKind::InputObject {
            fields: input_values(ty.input_fields.take(), &ty.name)?,
        },
        other => {
            return Err(SchemaError::InvalidKind {
                name: ty.name,
                kind: other.to_string(),
            })
        }
    };
    Ok(SchemaType {
        name: ty.name,
        description: ty.description,
        kind,
    })
}

pub(super) fn parse(json: &str) -> Result<Schema, SchemaError> {
    let schema = match serde_json::from_str::<Envelope>(json)? {
        Envelope::Response { data } => data.schema,
        Envelope::Bare(result) => result.schema,
    };
    let types = schema
        .types
        .into_iter()
        .map(schema_type)
        .collect::<Result<Vec<_>, _>>()?;
    Schema::new(
        schema.query_type.map(|r| r.name),
        schema.mutation_type.map(|r| r.name),
        schema.subscription_type.map(|r| r.name),
        types,
    )
}
