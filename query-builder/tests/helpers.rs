use explorer_query_builder::{EditOptions, QueryEditor, Schema};

pub static SCHEMA: &str = include_str!("fixtures/schema.graphql");

pub fn schema() -> Schema {
    let _ = env_logger::builder().is_test(true).try_init();
    Schema::from_sdl(SCHEMA).unwrap()
}

pub fn editor(schema: &Schema) -> QueryEditor {
    QueryEditor::new(schema)
}

pub fn editor_with(schema: &Schema, options: EditOptions) -> QueryEditor {
    QueryEditor::with_options(schema, options)
}

/// Deepest brace nesting of printed query text
pub fn nesting(query: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for c in query.chars() {
        match c {
            '{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
