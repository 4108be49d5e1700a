//! Single field and argument edits, and the membership predicates the
//! editor uses to decide which of them to offer.
use std::collections::HashSet;

use graphql_parser::query::{Selection, Value};

use crate::context::{DocumentEdit, EditContext, Edited};
use crate::error::{EditError, Result};
use crate::helpers::{definition_selection_set_mut, field_at_mut, selection_set_at_mut};
use crate::path::{locate, resolve, FieldPath, Located, SchemaPath, SelectionHandle};
use crate::variables::{prune_variables, selection_variables};

fn schema_path<'s>(ctx: EditContext<'s>, path: &str) -> Result<SchemaPath<'s>> {
    let path: FieldPath = path.parse()?;
    SchemaPath::resolve(ctx.schema, path)
}

/// Selects the field at `path`, creating it and any missing ancestor.
pub fn add_field(ctx: EditContext, query: &str, path: &str) -> Result<Option<Edited>> {
    let schema_path = schema_path(ctx, path)?;
    let mut edit = DocumentEdit::open(ctx, query, schema_path.path.operation)?;
    edit.ensure_path(&schema_path)?;
    Ok(edit.finish())
}

/// The selection at `path`, looked up in the document alone
fn located(ctx: EditContext, query: &str, path: &str) -> Result<Located> {
    let path: FieldPath = path.parse()?;
    locate(ctx, query, &path)
}

/// Removes the field at `path`, or the whole operation for a bare operation path.
///
/// Fields the schema does not define are removed all the same.
pub fn remove_field(ctx: EditContext, query: &str, path: &str) -> Result<Option<Edited>> {
    let Located {
        mut document,
        operation,
        chain,
    } = located(ctx, query, path)?;

    let (last, parent) = match chain.split_last() {
        Some(split) => split,
        None => {
            trace!("removing operation {}", operation);
            document.definitions.remove(operation);
            return Ok(Some(Edited {
                document,
                variables: vec![],
            }));
        }
    };

    let candidates: Vec<String> = {
        let root = definition_selection_set_mut(&mut document.definitions[operation]);
        let set = selection_set_at_mut(root, parent).ok_or_else(|| EditError::PathNotFound {
            path: path.to_string(),
            what: "parent selection set".to_string(),
        })?;
        let removed = set.items.remove(*last);
        selection_variables(&removed)
            .into_iter()
            .map(str::to_string)
            .collect()
    };
    prune_variables(&mut document, operation, &candidates);
    Ok(Some(Edited {
        document,
        variables: vec![],
    }))
}

/// Binds argument `arg` of the field at `path` to a fresh variable.
///
/// The field is selected first if it is missing. An argument that is already
/// present is left alone.
pub fn add_arg(ctx: EditContext, query: &str, path: &str, arg: &str) -> Result<Option<Edited>> {
    let schema_path = schema_path(ctx, path)?;
    let field_def = schema_path
        .target_field()
        .ok_or_else(|| EditError::InvalidPath {
            path: path.to_string(),
            reason: "arguments belong to a field",
        })?;
    let arg_def = field_def
        .argument(arg)
        .ok_or_else(|| EditError::PathNotFound {
            path: path.to_string(),
            what: format!("argument {} of {}", arg, field_def.name),
        })?;

    let mut edit = DocumentEdit::open(ctx, query, schema_path.path.operation)?;
    let chain = edit.ensure_path(&schema_path)?;
    let added = match edit.field_and_binder(&chain) {
        Some((field, binder)) if field.argument(arg).is_none() => {
            let variable = binder.bind(&arg_def.name, &arg_def.ty);
            field
                .arguments
                .push((arg_def.name.clone(), Value::Variable(variable)));
            true
        }
        Some(_) => false,
        None => {
            return Err(EditError::PathNotFound {
                path: path.to_string(),
                what: format!("field {}", field_def.name),
            })
        }
    };
    if added {
        edit.mark_changed();
    }
    Ok(edit.finish())
}

/// Drops argument `arg` from the field at `path` along with the variables
/// only it used.
pub fn remove_arg(ctx: EditContext, query: &str, path: &str, arg: &str) -> Result<Option<Edited>> {
    let Located {
        mut document,
        operation,
        chain,
    } = located(ctx, query, path)?;

    let candidates: Vec<String> = {
        let root = definition_selection_set_mut(&mut document.definitions[operation]);
        let field = field_at_mut(root, &chain).ok_or_else(|| EditError::InvalidPath {
            path: path.to_string(),
            reason: "arguments belong to a field",
        })?;
        let position = match field.arguments.iter().position(|(name, _)| name == arg) {
            Some(position) => position,
            None => return Ok(None),
        };
        let (_, value) = field.arguments.remove(position);
        value.variables().into_iter().map(str::to_string).collect()
    };
    prune_variables(&mut document, operation, &candidates);
    Ok(Some(Edited {
        document,
        variables: vec![],
    }))
}

pub fn is_field_in_query(ctx: EditContext, query: &str, path: &str) -> Result<bool> {
    match located(ctx, query, path) {
        Ok(_) => Ok(true),
        Err(EditError::PathNotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn is_arg_in_query(ctx: EditContext, query: &str, path: &str, arg: &str) -> Result<bool> {
    let located = match located(ctx, query, path) {
        Ok(located) => located,
        Err(EditError::PathNotFound { .. }) => return Ok(false),
        Err(e) => return Err(e),
    };
    Ok(located
        .field()
        .map(|field| field.argument(arg).is_some())
        .unwrap_or(false))
}

/// True when the type at `path` has fields and every one of them is selected
/// directly under the path.
pub fn are_all_type_fields_in_query(ctx: EditContext, query: &str, path: &str) -> Result<bool> {
    let handle = resolve(ctx, query, path)?;
    let fields = handle.schema_path.target_type().fields();
    if fields.is_empty() {
        return Ok(false);
    }
    Ok(match handle.selection_set() {
        Some(set) => fields
            .iter()
            .all(|f| set.field_position(&f.name).is_some()),
        None => false,
    })
}

/// Removes every direct selection of a field the type at `path` defines.
pub fn remove_type_fields(ctx: EditContext, query: &str, path: &str) -> Result<Option<Edited>> {
    let SelectionHandle {
        schema_path,
        mut document,
        operation,
        chain,
    } = resolve(ctx, query, path)?;
    let names: HashSet<&str> = schema_path
        .target_type()
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();

    let mut candidates: Vec<String> = Vec::new();
    {
        let root = definition_selection_set_mut(&mut document.definitions[operation]);
        let set = match selection_set_at_mut(root, &chain) {
            Some(set) => set,
            None => return Ok(None),
        };
        let before = set.items.len();
        set.items.retain(|item| match item {
            Selection::Field(field) if names.contains(field.name.as_str()) => {
                candidates.extend(selection_variables(item).into_iter().map(str::to_string));
                false
            }
            _ => true,
        });
        if set.items.len() == before {
            return Ok(None);
        }
    }
    prune_variables(&mut document, operation, &candidates);
    Ok(Some(Edited {
        document,
        variables: vec![],
    }))
}
