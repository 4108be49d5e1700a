use graphql_parser::query::{
    Definition, Document, Field, Operation, OperationDefinition, Selection, SelectionSet, Value,
};

use crate::error::{EditError, Result};
use crate::helpers::{
    definition_selection_set_mut, field_at_mut, find_operation, parse_document,
    promote_shorthand, selection_set_at_mut,
};
use crate::options::EditOptions;
use crate::path::SchemaPath;
use crate::schema::{FieldDefinition, Schema, SchemaType};
use crate::variables::{declare_variables, VariableBinder, VariableRequirement};

/// What every edit reads: the schema and the caller's options
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'s> {
    pub schema: &'s Schema,
    pub options: &'s EditOptions,
}

impl<'s> EditContext<'s> {
    pub fn new(schema: &'s Schema, options: &'s EditOptions) -> EditContext<'s> {
        EditContext { schema, options }
    }
}

/// A document that was changed, with the variables the change requires
#[derive(Debug)]
pub struct Edited {
    pub document: Document,
    pub variables: Vec<VariableRequirement>,
}

/// Outcome of a field insertion into a selection set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Created(usize),
    Existing(usize),
}

impl Inserted {
    pub fn index(self) -> usize {
        match self {
            Inserted::Created(idx) | Inserted::Existing(idx) => idx,
        }
    }
}

/// A document being edited in one operation.
///
/// Missing operations and fields are created on the way down a path.
/// Arguments of created fields are bound to fresh variables, which are
/// declared on the operation when the edit finishes.
#[derive(Debug)]
pub struct DocumentEdit<'s> {
    ctx: EditContext<'s>,
    document: Document,
    operation: usize,
    binder: VariableBinder,
    changed: bool,
}

impl<'s> DocumentEdit<'s> {
    /// Parses `query` and selects, or appends, the operation of `kind`
    pub fn open(ctx: EditContext<'s>, query: &str, kind: Operation) -> Result<DocumentEdit<'s>> {
        let mut document = parse_document(query)?;
        let mut changed = false;
        let operation = match find_operation(&document, kind, ctx.options.operation_name.as_deref())
        {
            Some(idx) => idx,
            None => {
                let mut op = OperationDefinition::new(kind);
                op.name = ctx.options.operation_name.clone();
                trace!("creating {} operation", kind.as_str());
                document.definitions.push(Definition::Operation(op));
                changed = true;
                document.definitions.len() - 1
            }
        };
        let binder = VariableBinder::for_definition(&document.definitions[operation]);
        Ok(DocumentEdit {
            ctx,
            document,
            operation,
            binder,
            changed,
        })
    }

    pub fn schema(&self) -> &'s Schema {
        self.ctx.schema
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Makes sure every field on the path is selected and returns the chain
    /// of selection indices leading to the last one
    pub fn ensure_path(&mut self, schema_path: &SchemaPath<'s>) -> Result<Vec<usize>> {
        let mut chain = Vec::with_capacity(schema_path.fields.len());
        for (depth, field_def) in schema_path.fields.iter().enumerate() {
            let field_type = schema_path.types[depth + 1];
            let (set, binder) =
                self.selection_set_and_binder(&chain)
                    .ok_or_else(|| EditError::PathNotFound {
                        path: schema_path.path.to_string(),
                        what: format!("selection set above {}", field_def.name),
                    })?;
            let inserted = insert_field(set, field_def, field_type, binder)
                .map_err(|reason| EditError::UnsupportedShape {
                    path: schema_path.path.to_string(),
                    reason,
                })?;
            if let Inserted::Created(_) = inserted {
                self.changed = true;
            }
            chain.push(inserted.index());

            // a composite field selected without braces gets them before descending
            let is_last = depth + 1 == schema_path.fields.len();
            if !is_last {
                if let Some(field) = self.field_mut(&chain) {
                    if field.selection_set.is_none() {
                        field.selection_set = Some(SelectionSet::default());
                        self.changed = true;
                    }
                }
            }
        }
        Ok(chain)
    }

    pub fn field_mut(&mut self, chain: &[usize]) -> Option<&mut Field> {
        let root = definition_selection_set_mut(&mut self.document.definitions[self.operation]);
        field_at_mut(root, chain)
    }

    /// The root selection set for an empty chain, else the set of the field at
    /// the chain's end, along with the variable binder
    pub fn selection_set_and_binder(
        &mut self,
        chain: &[usize],
    ) -> Option<(&mut SelectionSet, &mut VariableBinder)> {
        let root = definition_selection_set_mut(&mut self.document.definitions[self.operation]);
        let set = selection_set_at_mut(root, chain)?;
        Some((set, &mut self.binder))
    }

    pub fn field_and_binder(
        &mut self,
        chain: &[usize],
    ) -> Option<(&mut Field, &mut VariableBinder)> {
        let root = definition_selection_set_mut(&mut self.document.definitions[self.operation]);
        let field = field_at_mut(root, chain)?;
        Some((field, &mut self.binder))
    }

    /// Declares bound variables and hands back the document, or `None` when
    /// nothing changed
    pub fn finish(mut self) -> Option<Edited> {
        let variables = self.binder.into_requirements();
        if !variables.is_empty() {
            let op = promote_shorthand(&mut self.document.definitions[self.operation]);
            declare_variables(op, &variables);
            self.changed = true;
        }
        if self.changed {
            Some(Edited {
                document: self.document,
                variables,
            })
        } else {
            None
        }
    }
}

/// Adds a selection of `field_def` to `set` unless one already exists.
///
/// New composite fields get an empty selection set and required arguments
/// are bound to fresh variables. A field whose name is already used as the
/// alias of a different field is refused.
pub fn insert_field(
    set: &mut SelectionSet,
    field_def: &FieldDefinition,
    field_type: &SchemaType,
    binder: &mut VariableBinder,
) -> std::result::Result<Inserted, String> {
    if let Some(idx) = set.field_position(&field_def.name) {
        return Ok(Inserted::Existing(idx));
    }
    let taken_by_alias = set
        .fields()
        .any(|f| f.alias.as_deref() == Some(field_def.name.as_str()));
    if taken_by_alias {
        return Err(format!(
            "{} is already the alias of another field",
            field_def.name
        ));
    }

    let mut field = Field::new(field_def.name.clone());
    if field_type.is_composite() {
        field.selection_set = Some(SelectionSet::default());
    }
    for arg in field_def.required_arguments() {
        let variable = binder.bind(&arg.name, &arg.ty);
        field
            .arguments
            .push((arg.name.clone(), Value::Variable(variable)));
    }
    trace!("adding field {}", field_def.name);
    set.items.push(Selection::Field(field));
    Ok(Inserted::Created(set.items.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;

    fn schema() -> Schema {
        Schema::from_sdl(
            "type Query { user(id: ID!): User } type User { id: ID! friends(first: Int!): [User] }",
        )
        .unwrap()
    }

    fn path<'s>(schema: &'s Schema, path: &str) -> SchemaPath<'s> {
        SchemaPath::resolve(schema, path.parse::<FieldPath>().unwrap()).unwrap()
    }

    #[test]
    fn creates_operation_and_fields() {
        let schema = schema();
        let options = EditOptions::default();
        let ctx = EditContext::new(&schema, &options);
        let mut edit = DocumentEdit::open(ctx, "", Operation::Query).unwrap();
        let chain = edit.ensure_path(&path(&schema, "query.user.friends")).unwrap();
        assert_eq!(chain, vec![0, 0]);
        let edited = edit.finish().unwrap();
        assert_eq!(
            edited.document.to_string(),
            "query($id: ID!, $first: Int!) {\n  user(id: $id) {\n    friends(first: $first) {}\n  }\n}\n"
        );
        let names: Vec<_> = edited.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["id", "first"]);
    }

    #[test]
    fn existing_path_is_unchanged() {
        let schema = schema();
        let options = EditOptions::default();
        let ctx = EditContext::new(&schema, &options);
        let mut edit = DocumentEdit::open(ctx, "{ user(id: 1) { id } }", Operation::Query).unwrap();
        edit.ensure_path(&path(&schema, "query.user.id")).unwrap();
        assert!(edit.finish().is_none());
    }

    #[test]
    fn alias_collision_is_refused() {
        let schema = schema();
        let options = EditOptions::default();
        let ctx = EditContext::new(&schema, &options);
        let mut edit =
            DocumentEdit::open(ctx, "{ user(id: 1) { id: friends(first: 1) { id } } }", Operation::Query)
                .unwrap();
        let err = edit.ensure_path(&path(&schema, "query.user.id")).unwrap_err();
        assert!(matches!(err, EditError::UnsupportedShape { .. }));
    }

    #[test]
    fn named_operation_is_created() {
        let schema = schema();
        let options = EditOptions {
            operation_name: Some("Mine".to_string()),
            ..EditOptions::default()
        };
        let ctx = EditContext::new(&schema, &options);
        let edit = DocumentEdit::open(ctx, "mutation { a }", Operation::Query).unwrap();
        let edited = edit.finish().unwrap();
        assert_eq!(edited.document.to_string(), "mutation {\n  a\n}\n\nquery Mine {}\n");
    }
}
