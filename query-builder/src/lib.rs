//! Edits GraphQL query documents against a schema.
//!
//! Every edit takes the current query text and a dotted field path such as
//! `query.user.address`, parses its own copy of the document, applies the
//! edit and prints the result. Edits that cannot apply, because the text does
//! not parse or the path does not resolve, hand back the original text.
//!
//! ```
//! use explorer_query_builder::{QueryEditor, Schema};
//!
//! let schema = Schema::from_sdl(
//!     "type Query { user: User } type User { id: ID!, posts(limit: Int!): [Post] } type Post { id: ID! }",
//! )
//! .unwrap();
//! let editor = QueryEditor::new(&schema);
//!
//! let result = editor.add_arg("query { user { id } }", "query.user.posts", "limit");
//! assert_eq!(
//!     result.query,
//!     "query($limit: Int!) {\n  user {\n    id\n    posts(limit: $limit) {}\n  }\n}\n"
//! );
//! assert_eq!(result.variables[0].name, "limit");
//! assert!(editor.is_field_in_query(&result.query, "query.user.posts"));
//! ```
#![warn(missing_debug_implementations)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate derive_builder;

#[macro_use]
extern crate log;

mod consts;
mod context;
pub mod error;
mod expand;
mod helpers;
pub mod model;
mod mutate;
pub mod options;
pub mod path;
pub mod schema;
mod serialize;
pub mod variables;

use crate::context::{EditContext, Edited};
use crate::expand::{add_type_fields, Expansion};
pub use crate::error::{EditError, Result, SchemaError};
pub use crate::model::EditResult;
pub use crate::options::{EditOptions, EditOptionsBuilder};
pub use crate::path::{FieldPath, SelectionHandle};
pub use crate::schema::Schema;
pub use crate::variables::VariableRequirement;

/// Applies edits to query text against one schema.
///
/// The editor holds no document state: each call parses its own copy of the
/// text, so one editor can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct QueryEditor<'s> {
    schema: &'s Schema,
    options: EditOptions,
}

impl<'s> QueryEditor<'s> {
    pub fn new(schema: &'s Schema) -> QueryEditor<'s> {
        QueryEditor::with_options(schema, EditOptions::default())
    }

    pub fn with_options(schema: &'s Schema, options: EditOptions) -> QueryEditor<'s> {
        QueryEditor { schema, options }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    fn ctx(&self) -> EditContext {
        EditContext::new(self.schema, &self.options)
    }

    fn finish(&self, edit: &str, query: &str, edited: Result<Option<Edited>>) -> EditResult {
        match edited {
            Ok(edited) => serialize::into_result(query, edited, &self.options),
            Err(e) => {
                debug!("{} left the query unchanged: {}", edit, e);
                EditResult::unchanged(query)
            }
        }
    }

    fn check(&self, predicate: &str, answer: Result<bool>) -> bool {
        answer.unwrap_or_else(|e| {
            debug!("{} answered false: {}", predicate, e);
            false
        })
    }

    /// Resolves `path` in the schema and in the parsed `query`.
    ///
    /// Unlike the edits, this reports why a path does not resolve.
    pub fn resolve(&self, query: &str, path: &str) -> Result<SelectionHandle> {
        crate::path::resolve(self.ctx(), query, path)
    }

    /// Selects the field at `path`, creating missing ancestors and the
    /// operation. Required arguments of new fields are bound to variables.
    pub fn add_field(&self, query: &str, path: &str) -> EditResult {
        self.finish(
            "add_field",
            query,
            mutate::add_field(self.ctx(), query, path),
        )
    }

    /// Removes the field at `path`. A bare operation path removes the operation.
    pub fn remove_field(&self, query: &str, path: &str) -> EditResult {
        self.finish(
            "remove_field",
            query,
            mutate::remove_field(self.ctx(), query, path),
        )
    }

    pub fn add_arg(&self, query: &str, path: &str, arg: &str) -> EditResult {
        self.finish(
            "add_arg",
            query,
            mutate::add_arg(self.ctx(), query, path, arg),
        )
    }

    pub fn remove_arg(&self, query: &str, path: &str, arg: &str) -> EditResult {
        self.finish(
            "remove_arg",
            query,
            mutate::remove_arg(self.ctx(), query, path, arg),
        )
    }

    pub fn is_field_in_query(&self, query: &str, path: &str) -> bool {
        self.check(
            "is_field_in_query",
            mutate::is_field_in_query(self.ctx(), query, path),
        )
    }

    pub fn is_arg_in_query(&self, query: &str, path: &str, arg: &str) -> bool {
        self.check(
            "is_arg_in_query",
            mutate::is_arg_in_query(self.ctx(), query, path, arg),
        )
    }

    pub fn are_all_type_fields_in_query(&self, query: &str, path: &str) -> bool {
        self.check(
            "are_all_type_fields_in_query",
            mutate::are_all_type_fields_in_query(self.ctx(), query, path),
        )
    }

    /// Removes the direct selections of every field of the type at `path`
    pub fn remove_type_fields(&self, query: &str, path: &str) -> EditResult {
        self.finish(
            "remove_type_fields",
            query,
            mutate::remove_type_fields(self.ctx(), query, path),
        )
    }

    /// Adds every scalar and enum field of the type at `path`
    pub fn add_all_scalar_type_fields(&self, query: &str, path: &str) -> EditResult {
        self.finish(
            "add_all_scalar_type_fields",
            query,
            add_type_fields(self.ctx(), query, path, Expansion::Scalars),
        )
    }

    /// Adds every field of the type at `path`; composite ones stay pending
    pub fn add_all_type_fields(&self, query: &str, path: &str) -> EditResult {
        self.finish(
            "add_all_type_fields",
            query,
            add_type_fields(self.ctx(), query, path, Expansion::AllFields),
        )
    }

    /// Adds every field of the type at `path`, descending up to
    /// `EditOptions::max_depth` levels
    pub fn add_all_type_fields_recursively(&self, query: &str, path: &str) -> EditResult {
        self.add_all_type_fields_to_depth(query, path, self.options.max_depth)
    }

    pub fn add_all_type_fields_to_depth(
        &self,
        query: &str,
        path: &str,
        max_depth: usize,
    ) -> EditResult {
        self.finish(
            "add_all_type_fields_recursively",
            query,
            add_type_fields(self.ctx(), query, path, Expansion::Recursive(max_depth)),
        )
    }

    /// Adds mock values for `requirements` missing from the `variables` JSON text
    pub fn mock_variables(&self, variables: &str, requirements: &[VariableRequirement]) -> String {
        crate::variables::merge_variables(variables, requirements, self.schema)
    }
}
