use serde::{Deserialize, Serialize};

use crate::variables::VariableRequirement;

/// The text of an edited query and the variables the edit bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub query: String,
    pub variables: Vec<VariableRequirement>,
}

impl EditResult {
    /// A no-op edit: the caller's text, untouched
    pub fn unchanged(query: &str) -> EditResult {
        EditResult {
            query: query.to_string(),
            variables: vec![],
        }
    }

    pub fn is_unchanged_from(&self, query: &str) -> bool {
        self.variables.is_empty() && self.query == query
    }
}
