//! Field paths and their resolution against a schema and a query document.
//!
//! A path such as `query.user.address` names an operation kind followed by
//! field names. Full resolution walks the schema first, then the document,
//! where the first field selection with a matching name wins at every level.
//! Removals and membership checks only walk the document.
use std::fmt;
use std::str::FromStr;

use graphql_parser::query::{Definition, Document, Field, Operation, SelectionSet};
use itertools::Itertools;

use crate::context::EditContext;
use crate::error::{EditError, Result};
use crate::helpers::{
    definition_selection_set, field_at, find_operation, parse_document, selection_set_at,
};
use crate::schema::{FieldDefinition, Schema, SchemaType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub operation: Operation,
    pub fields: Vec<String>,
}

impl FieldPath {
    /// True when the path addresses the operation itself
    pub fn is_operation(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.fields.last().map(String::as_str)
    }
}

impl FromStr for FieldPath {
    type Err = EditError;

    fn from_str(path: &str) -> Result<FieldPath> {
        let invalid = |reason| EditError::InvalidPath {
            path: path.to_string(),
            reason,
        };
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default();
        if root.is_empty() {
            return Err(invalid("empty path"));
        }
        let operation = match root.to_ascii_lowercase().as_str() {
            "query" => Operation::Query,
            "mutation" => Operation::Mutation,
            "subscription" => Operation::Subscription,
            _ => {
                return Err(EditError::PathNotFound {
                    path: path.to_string(),
                    what: format!("operation {:?}", root),
                })
            }
        };
        let fields: Vec<String> = segments.map(str::to_string).collect();
        if fields.iter().any(|f| f.is_empty()) {
            return Err(invalid("empty segment"));
        }
        Ok(FieldPath { operation, fields })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.operation.as_str())?;
        if !self.fields.is_empty() {
            write!(f, ".{}", self.fields.iter().join("."))?;
        }
        Ok(())
    }
}

/// A path walked through the schema
#[derive(Debug, Clone)]
pub struct SchemaPath<'s> {
    pub path: FieldPath,
    /// Root type followed by the return type of each field
    pub types: Vec<&'s SchemaType>,
    /// Field definition for each segment
    pub fields: Vec<&'s FieldDefinition>,
}

impl<'s> SchemaPath<'s> {
    pub fn resolve(schema: &'s Schema, path: FieldPath) -> Result<SchemaPath<'s>> {
        let not_found = |what: String| EditError::PathNotFound {
            path: path.to_string(),
            what,
        };
        let root = schema
            .root_type(path.operation)
            .ok_or_else(|| not_found(format!("{} root type", path.operation.as_str())))?;

        let mut types = vec![root];
        let mut fields = Vec::with_capacity(path.fields.len());
        for segment in &path.fields {
            let parent = types[types.len() - 1];
            if !parent.is_composite() {
                return Err(not_found(format!("field {} on leaf type {}", segment, parent.name)));
            }
            let field = parent
                .field(segment)
                .ok_or_else(|| not_found(format!("field {} on type {}", segment, parent.name)))?;
            let ty = schema
                .named_type(&field.ty)
                .ok_or_else(|| not_found(format!("type {}", field.ty.inner_name())))?;
            fields.push(field);
            types.push(ty);
        }
        Ok(SchemaPath {
            path,
            types,
            fields,
        })
    }

    /// The type selected at the end of the path
    pub fn target_type(&self) -> &'s SchemaType {
        self.types[self.types.len() - 1]
    }

    pub fn target_field(&self) -> Option<&'s FieldDefinition> {
        self.fields.last().copied()
    }
}

/// A location in a parsed document: the operation plus the index of the
/// selection at every level of the path
#[derive(Debug, Clone)]
pub struct SelectionHandle<'s> {
    pub schema_path: SchemaPath<'s>,
    pub(crate) document: Document,
    pub(crate) operation: usize,
    pub(crate) chain: Vec<usize>,
}

impl<'s> SelectionHandle<'s> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn operation(&self) -> &Definition {
        &self.document.definitions[self.operation]
    }

    pub fn chain(&self) -> &[usize] {
        &self.chain
    }

    /// The selected field, `None` when the path addresses the operation
    pub fn field(&self) -> Option<&Field> {
        field_at(definition_selection_set(self.operation()), &self.chain)
    }

    /// The selection set at the end of the path, if the document has one
    pub fn selection_set(&self) -> Option<&SelectionSet> {
        selection_set_at(definition_selection_set(self.operation()), &self.chain)
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

/// The document side of a path: the operation and the selection indices,
/// found by segment name alone
#[derive(Debug, Clone)]
pub(crate) struct Located {
    pub document: Document,
    pub operation: usize,
    pub chain: Vec<usize>,
}

impl Located {
    pub fn field(&self) -> Option<&Field> {
        let root = definition_selection_set(&self.document.definitions[self.operation]);
        field_at(root, &self.chain)
    }
}

/// Finds `path` in the parsed `query` without consulting the schema, so
/// selections the schema no longer has can still be found and removed.
pub(crate) fn locate(ctx: EditContext, query: &str, path: &FieldPath) -> Result<Located> {
    let document = parse_document(query)?;
    let not_found = |what: String| EditError::PathNotFound {
        path: path.to_string(),
        what,
    };

    let operation = find_operation(&document, path.operation, ctx.options.operation_name.as_deref())
        .ok_or_else(|| not_found(format!("{} operation", path.operation.as_str())))?;

    let mut chain = Vec::with_capacity(path.fields.len());
    let mut set = Some(definition_selection_set(&document.definitions[operation]));
    for segment in &path.fields {
        let current = set.ok_or_else(|| not_found(format!("selection set above {}", segment)))?;
        let idx = current
            .field_position(segment)
            .ok_or_else(|| not_found(format!("selection {}", segment)))?;
        chain.push(idx);
        set = current.field(segment).and_then(|f| f.selection_set.as_ref());
    }

    Ok(Located {
        document,
        operation,
        chain,
    })
}

/// Resolves `path` against the schema and the parsed `query`.
///
/// Fails when the query does not parse, the path is malformed, the schema
/// has no matching field, or the document has no matching selection.
pub fn resolve<'s>(ctx: EditContext<'s>, query: &str, path: &str) -> Result<SelectionHandle<'s>> {
    let path: FieldPath = path.parse()?;
    let schema_path = SchemaPath::resolve(ctx.schema, path)?;
    let Located {
        document,
        operation,
        chain,
    } = locate(ctx, query, &schema_path.path)?;
    Ok(SelectionHandle {
        schema_path,
        document,
        operation,
        chain,
    })
}
