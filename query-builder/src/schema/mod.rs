//! Strongly typed schema model
//!
//! A [`Schema`] is validated once when it is built, so every type name it
//! references is known to exist.
use std::collections::HashSet;

use graphql_parser::query::{Operation, Type};
use indexmap::IndexMap;

use crate::consts::{
    typename_field_def, BUILTIN_SCALARS, MUTATION_TYPE_NAME, QUERY_TYPE_NAME,
    SUBSCRIPTION_TYPE_NAME, TYPENAME_FIELD_NAME,
};
use crate::error::SchemaError;

mod introspection;
mod sdl;

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: IndexMap<String, SchemaType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaType {
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Scalar,
    Object {
        fields: Vec<FieldDefinition>,
        interfaces: Vec<String>,
    },
    Interface {
        fields: Vec<FieldDefinition>,
        interfaces: Vec<String>,
        possible_types: Vec<String>,
    },
    Union {
        possible_types: Vec<String>,
    },
    Enum {
        values: Vec<EnumValue>,
    },
    InputObject {
        fields: Vec<InputValue>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub ty: Type,
    pub deprecation_reason: Option<String>,
}

impl FieldDefinition {
    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    /// Arguments that must be supplied: non-null without a default value
    pub fn required_arguments(&self) -> impl Iterator<Item = &InputValue> {
        self.arguments.iter().filter(|arg| arg.is_required())
    }
}

/// An argument or an input object field
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: Type,
    /// Default value as GraphQL literal text
    pub default_value: Option<String>,
}

impl InputValue {
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

/// A field, argument or input field whose type names a given type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference<'s> {
    pub type_name: &'s str,
    pub field_name: &'s str,
    pub argument_name: Option<&'s str>,
}

impl SchemaType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        SchemaType {
            name: name.into(),
            description: None,
            kind,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object { .. } => "OBJECT",
            TypeKind::Interface { .. } => "INTERFACE",
            TypeKind::Union { .. } => "UNION",
            TypeKind::Enum { .. } => "ENUM",
            TypeKind::InputObject { .. } => "INPUT_OBJECT",
        }
    }

    /// Object, interface or union
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Object { .. } | TypeKind::Interface { .. } | TypeKind::Union { .. }
        )
    }

    /// Scalar or enum
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar | TypeKind::Enum { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, TypeKind::Union { .. })
    }

    /// Output fields of an object or interface, without `__typename`
    pub fn fields(&self) -> &[FieldDefinition] {
        match &self.kind {
            TypeKind::Object { fields, .. } | TypeKind::Interface { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Looks up an output field, resolving `__typename` on every composite type
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        if name == TYPENAME_FIELD_NAME && self.is_composite() {
            return Some(typename_field_def());
        }
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn input_fields(&self) -> &[InputValue] {
        match &self.kind {
            TypeKind::InputObject { fields } => fields,
            _ => &[],
        }
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        match &self.kind {
            TypeKind::Enum { values } => values,
            _ => &[],
        }
    }

    fn referenced_names(&self) -> Vec<(&str, String)> {
        let mut names = Vec::new();
        for field in self.fields() {
            names.push((field.ty.inner_name(), format!("{}.{}", self.name, field.name)));
            for arg in &field.arguments {
                names.push((
                    arg.ty.inner_name(),
                    format!("{}.{}({}:)", self.name, field.name, arg.name),
                ));
            }
        }
        for field in self.input_fields() {
            names.push((field.ty.inner_name(), format!("{}.{}", self.name, field.name)));
        }
        match &self.kind {
            TypeKind::Object { interfaces, .. } | TypeKind::Interface { interfaces, .. } => {
                names.extend(interfaces.iter().map(|i| (i.as_str(), self.name.clone())))
            }
            TypeKind::Union { possible_types } => {
                names.extend(possible_types.iter().map(|t| (t.as_str(), self.name.clone())))
            }
            _ => {}
        }
        names
    }
}

impl Schema {
    /// Builds and validates a schema.
    ///
    /// Built-in scalars are added when missing. Root types left unset fall
    /// back to `Query`, `Mutation` and `Subscription` when those types exist.
    /// Interfaces without possible types get the objects implementing them.
    pub fn new(
        query_type: Option<String>,
        mutation_type: Option<String>,
        subscription_type: Option<String>,
        definitions: Vec<SchemaType>,
    ) -> Result<Schema, SchemaError> {
        let mut types: IndexMap<String, SchemaType> = IndexMap::new();
        for scalar in BUILTIN_SCALARS.iter() {
            types.insert(scalar.to_string(), SchemaType::new(*scalar, TypeKind::Scalar));
        }

        let builtins: HashSet<&str> = BUILTIN_SCALARS.iter().cloned().collect();
        let mut defined: HashSet<String> = HashSet::new();
        for ty in definitions {
            if !defined.insert(ty.name.clone()) {
                return Err(SchemaError::DuplicateType(ty.name));
            }
            if builtins.contains(ty.name.as_str()) && !matches!(ty.kind, TypeKind::Scalar) {
                return Err(SchemaError::InvalidKind {
                    name: ty.name.clone(),
                    kind: ty.kind_name().to_string(),
                });
            }
            types.insert(ty.name.clone(), ty);
        }

        fill_possible_types(&mut types);

        let root = |declared: Option<String>, default: &str| {
            declared.or_else(|| {
                if types.contains_key(default) {
                    Some(default.to_string())
                } else {
                    None
                }
            })
        };
        let query_type = root(query_type, QUERY_TYPE_NAME);
        let mutation_type = root(mutation_type, MUTATION_TYPE_NAME);
        let subscription_type = root(subscription_type, SUBSCRIPTION_TYPE_NAME);
        let schema = Schema {
            query_type,
            mutation_type,
            subscription_type,
            types,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let roots = [
            &self.query_type,
            &self.mutation_type,
            &self.subscription_type,
        ];
        for root in roots.iter().filter_map(|r| r.as_ref()) {
            match self.types.get(root) {
                Some(ty) if matches!(ty.kind, TypeKind::Object { .. }) => {}
                Some(ty) => {
                    return Err(SchemaError::InvalidKind {
                        name: root.clone(),
                        kind: ty.kind_name().to_string(),
                    })
                }
                None => {
                    return Err(SchemaError::UnknownType {
                        name: root.clone(),
                        referrer: "schema".to_string(),
                    })
                }
            }
        }

        for ty in self.types.values() {
            for (name, referrer) in ty.referenced_names() {
                if !self.types.contains_key(name) {
                    return Err(SchemaError::UnknownType {
                        name: name.to_string(),
                        referrer,
                    });
                }
            }
        }
        Ok(())
    }

    /// Parses the JSON result of the standard introspection query
    pub fn from_introspection(json: &str) -> Result<Schema, SchemaError> {
        introspection::parse(json)
    }

    /// Parses schema definition language text
    pub fn from_sdl(sdl: &str) -> Result<Schema, SchemaError> {
        sdl::parse(sdl)
    }

    pub fn root_type_name(&self, kind: Operation) -> Option<&str> {
        match kind {
            Operation::Query => self.query_type.as_deref(),
            Operation::Mutation => self.mutation_type.as_deref(),
            Operation::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn root_type(&self, kind: Operation) -> Option<&SchemaType> {
        self.root_type_name(kind).and_then(|name| self.get_type(name))
    }

    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// All types, in definition order after the built-in scalars
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values()
    }

    /// The named type a field, argument or variable type unwraps to
    pub fn named_type(&self, ty: &Type) -> Option<&SchemaType> {
        self.get_type(ty.inner_name())
    }

    /// Every field, argument and input field whose type names `type_name`
    pub fn references_to<'s>(&'s self, type_name: &str) -> Vec<TypeReference<'s>> {
        let mut refs = Vec::new();
        for ty in self.types.values() {
            for field in ty.fields() {
                if field.ty.inner_name() == type_name {
                    refs.push(TypeReference {
                        type_name: &ty.name,
                        field_name: &field.name,
                        argument_name: None,
                    });
                }
                for arg in field.arguments.iter().filter(|a| a.ty.inner_name() == type_name) {
                    refs.push(TypeReference {
                        type_name: &ty.name,
                        field_name: &field.name,
                        argument_name: Some(&arg.name),
                    });
                }
            }
            for field in ty.input_fields() {
                if field.ty.inner_name() == type_name {
                    refs.push(TypeReference {
                        type_name: &ty.name,
                        field_name: &field.name,
                        argument_name: None,
                    });
                }
            }
        }
        refs
    }
}

fn fill_possible_types(types: &mut IndexMap<String, SchemaType>) {
    let mut implementors: IndexMap<String, Vec<String>> = IndexMap::new();
    for ty in types.values() {
        if let TypeKind::Object { interfaces, .. } = &ty.kind {
            for iface in interfaces {
                implementors
                    .entry(iface.clone())
                    .or_insert_with(Vec::new)
                    .push(ty.name.clone());
            }
        }
    }
    for (iface, objects) in implementors {
        if let Some(SchemaType {
            kind: TypeKind::Interface { possible_types, .. },
            ..
        }) = types.get_mut(&iface)
        {
            if possible_types.is_empty() {
                *possible_types = objects;
            }
        }
    }
}
