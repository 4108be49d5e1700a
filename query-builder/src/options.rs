use graphql_parser::Style;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_INDENT, DEFAULT_MAX_DEPTH};

// NB: By deriving Builder (using the derive_builder crate) we get an
// EditOptionsBuilder with a setter per field and a build method.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditOptions {
    /// Depth limit for recursive expansion
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    pub max_depth: usize,

    /// Operation to edit when the document holds several of the same kind
    #[builder(default, setter(into, strip_option))]
    pub operation_name: Option<String>,

    /// Spaces per indentation level of printed queries
    #[builder(default = "DEFAULT_INDENT")]
    pub indent: u32,

    /// Print edited queries on a single line
    #[builder(default)]
    pub minified: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        EditOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            operation_name: None,
            indent: DEFAULT_INDENT,
            minified: false,
        }
    }
}

impl EditOptions {
    pub fn style(&self) -> Style {
        if self.minified {
            Style::minified()
        } else {
            let mut style = Style::default();
            style.indent(self.indent);
            style
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let options = EditOptionsBuilder::default().build().unwrap();
        assert_eq!(options, EditOptions::default());
        assert_eq!(options.max_depth, 6);
        assert_eq!(options.indent, 2);
    }

    #[test]
    fn builder_overrides() {
        let options = EditOptionsBuilder::default()
            .max_depth(2usize)
            .operation_name("Second")
            .minified(true)
            .build()
            .unwrap();
        assert_eq!(options.max_depth, 2);
        assert_eq!(options.operation_name.as_deref(), Some("Second"));
        assert_eq!(options.style(), Style::minified());
    }

    #[test]
    fn deserialize_camel_case() {
        let options: EditOptions =
            serde_json::from_str(r#"{"maxDepth": 3, "operationName": "Q"}"#).unwrap();
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.operation_name.as_deref(), Some("Q"));
        assert_eq!(options.indent, 2);
        assert!(!options.minified);
    }
}
