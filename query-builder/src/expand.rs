/*!
# Bulk field expansion

Adds every field of the type found at a path, optionally only the scalar
ones, optionally descending into object and interface fields. Recursion is
bounded by a depth counter so cyclic schemas terminate.
*/

use graphql_parser::query::{Selection, SelectionSet};

use crate::context::{insert_field, DocumentEdit, EditContext, Edited, Inserted};
use crate::error::{EditError, Result};
use crate::path::{FieldPath, SchemaPath};
use crate::schema::{Schema, SchemaType};
use crate::variables::VariableBinder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Fields whose type is a scalar or an enum
    Scalars,
    /// Every field, composite ones with an empty selection
    AllFields,
    /// Every field, descending this many levels
    Recursive(usize),
}

impl Expansion {
    fn depth(self) -> usize {
        match self {
            Expansion::Scalars | Expansion::AllFields => 1,
            Expansion::Recursive(depth) => depth,
        }
    }
}

struct Expander<'s> {
    schema: &'s Schema,
    scalars_only: bool,
}

impl<'s> Expander<'s> {
    /// Adds the fields of `ty` to `set`, and returns whether anything was added
    fn expand(
        &self,
        set: &mut SelectionSet,
        ty: &'s SchemaType,
        depth: usize,
        binder: &mut VariableBinder,
    ) -> bool {
        let mut changed = false;
        for field_def in ty.fields() {
            let field_type = match self.schema.named_type(&field_def.ty) {
                Some(field_type) => field_type,
                None => continue,
            };
            if self.scalars_only && !field_type.is_leaf() {
                continue;
            }
            let inserted = match insert_field(set, field_def, field_type, binder) {
                Ok(inserted) => inserted,
                Err(reason) => {
                    debug!("skipping field {} of {}: {}", field_def.name, ty.name, reason);
                    continue;
                }
            };
            if let Inserted::Created(_) = inserted {
                changed = true;
            }

            // union members need inline fragments, so unions stay pending
            if depth > 1 && field_type.is_composite() && !field_type.is_union() {
                if let Some(Selection::Field(field)) = set.items.get_mut(inserted.index()) {
                    let nested = field.selection_set.get_or_insert_with(SelectionSet::default);
                    changed |= self.expand(nested, field_type, depth - 1, binder);
                }
            }
        }
        changed
    }
}

/// Adds the fields of the type at `path` according to `expansion`.
///
/// The path itself is selected first when it is missing.
pub fn add_type_fields(
    ctx: EditContext,
    query: &str,
    path: &str,
    expansion: Expansion,
) -> Result<Option<Edited>> {
    if expansion.depth() == 0 {
        return Ok(None);
    }
    let field_path: FieldPath = path.parse()?;
    let schema_path = SchemaPath::resolve(ctx.schema, field_path)?;
    let target = schema_path.target_type();
    if !target.is_composite() {
        return Err(EditError::UnsupportedShape {
            path: path.to_string(),
            reason: format!("{} has no fields", target.name),
        });
    }

    let mut edit = DocumentEdit::open(ctx, query, schema_path.path.operation)?;
    let chain = edit.ensure_path(&schema_path)?;
    let mut changed = false;
    if let Some(field) = edit.field_mut(&chain) {
        if field.selection_set.is_none() {
            field.selection_set = Some(SelectionSet::default());
            changed = true;
        }
    }

    let expander = Expander {
        schema: edit.schema(),
        scalars_only: expansion == Expansion::Scalars,
    };
    let (set, binder) =
        edit.selection_set_and_binder(&chain)
            .ok_or_else(|| EditError::PathNotFound {
                path: path.to_string(),
                what: "selection set".to_string(),
            })?;
    changed |= expander.expand(set, target, expansion.depth(), binder);
    if changed {
        edit.mark_changed();
    }
    Ok(edit.finish())
}
