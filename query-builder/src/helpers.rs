use graphql_parser::parse_query;
use graphql_parser::query::*;

use crate::error::Result;

/// An executable operation, counting a `{ ... }` shorthand as a query
#[derive(Debug, Clone, Copy)]
pub struct Op<'q> {
    /// Index into `Document::definitions`
    pub index: usize,
    pub kind: Operation,
    pub name: Option<&'q str>,
}

pub fn get_operations(query: &Document) -> Vec<Op> {
    query
        .definitions
        .iter()
        .enumerate()
        .flat_map(|(index, d)| match d {
            Definition::Operation(op) => Some(Op {
                index,
                kind: op.kind,
                name: op.name.as_deref(),
            }),
            Definition::SelectionSet(_) => Some(Op {
                index,
                kind: Operation::Query,
                name: None,
            }),
            Definition::Fragment(_) => None,
        })
        .collect()
}

/// Picks the operation an edit applies to.
///
/// An operation of `kind` named `name` wins, otherwise the first one of `kind`.
pub fn find_operation(query: &Document, kind: Operation, name: Option<&str>) -> Option<usize> {
    let candidates: Vec<Op> = get_operations(query)
        .into_iter()
        .filter(|op| op.kind == kind)
        .collect();
    name.and_then(|name| candidates.iter().find(|op| op.name == Some(name)))
        .or_else(|| candidates.first())
        .map(|op| op.index)
}

/// Parses query text, treating blank text as an empty document
pub fn parse_document(query: &str) -> Result<Document> {
    if query.trim().is_empty() {
        return Ok(Document::default());
    }
    Ok(parse_query(query)?)
}

pub fn definition_selection_set(definition: &Definition) -> &SelectionSet {
    match definition {
        Definition::Operation(op) => &op.selection_set,
        Definition::SelectionSet(ss) => ss,
        Definition::Fragment(frag) => &frag.selection_set,
    }
}

pub fn definition_selection_set_mut(definition: &mut Definition) -> &mut SelectionSet {
    match definition {
        Definition::Operation(op) => &mut op.selection_set,
        Definition::SelectionSet(ss) => ss,
        Definition::Fragment(frag) => &mut frag.selection_set,
    }
}

/// Follows selection indices down from `set` to a field
pub fn field_at<'d>(set: &'d SelectionSet, chain: &[usize]) -> Option<&'d Field> {
    let (first, rest) = chain.split_first()?;
    match set.items.get(*first)? {
        Selection::Field(field) if rest.is_empty() => Some(field),
        Selection::Field(field) => field_at(field.selection_set.as_ref()?, rest),
        _ => None,
    }
}

pub fn field_at_mut<'d>(set: &'d mut SelectionSet, chain: &[usize]) -> Option<&'d mut Field> {
    let (first, rest) = chain.split_first()?;
    match set.items.get_mut(*first)? {
        Selection::Field(field) => {
            if rest.is_empty() {
                Some(field)
            } else {
                field_at_mut(field.selection_set.as_mut()?, rest)
            }
        }
        _ => None,
    }
}

/// The selection set addressed by `chain`: the root set when empty, else the
/// set of the field at the end of the chain
pub fn selection_set_at_mut<'d>(
    set: &'d mut SelectionSet,
    chain: &[usize],
) -> Option<&'d mut SelectionSet> {
    if chain.is_empty() {
        Some(set)
    } else {
        field_at_mut(set, chain)?.selection_set.as_mut()
    }
}

pub fn selection_set_at<'d>(set: &'d SelectionSet, chain: &[usize]) -> Option<&'d SelectionSet> {
    if chain.is_empty() {
        Some(set)
    } else {
        field_at(set, chain)?.selection_set.as_ref()
    }
}

/// Turns a `{ ... }` shorthand into `query { ... }` so it can declare variables
pub fn promote_shorthand(definition: &mut Definition) -> &mut OperationDefinition {
    if let Definition::SelectionSet(set) = definition {
        let set = std::mem::take(set);
        *definition = Definition::Operation(OperationDefinition::from_shorthand(set));
    }
    match definition {
        Definition::Operation(op) => op,
        _ => unreachable!("shorthand was promoted above"),
    }
}

/// Turns an anonymous query with no variables and no directives back into
/// the `{ ... }` shorthand
pub fn demote_to_shorthand(definition: &mut Definition) {
    let demote = match definition {
        Definition::Operation(op) => {
            op.kind == Operation::Query
                && op.name.is_none()
                && op.variable_definitions.is_empty()
                && op.directives.is_empty()
        }
        _ => false,
    };
    if demote {
        if let Definition::Operation(op) = definition {
            let set = std::mem::take(&mut op.selection_set);
            *definition = Definition::SelectionSet(set);
        }
    }
}
