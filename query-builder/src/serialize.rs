use graphql_parser::query::Document;

use crate::context::Edited;
use crate::model::EditResult;
use crate::options::EditOptions;

pub fn serialize(document: &Document, options: &EditOptions) -> String {
    document.format(&options.style())
}

/// Prints an edited document, or hands back `query` when nothing changed
pub fn into_result(query: &str, edited: Option<Edited>, options: &EditOptions) -> EditResult {
    match edited {
        Some(Edited {
            document,
            variables,
        }) => EditResult {
            query: serialize(&document, options),
            variables,
        },
        None => EditResult::unchanged(query),
    }
}
