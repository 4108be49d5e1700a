/*!
# Operation variables

Arguments added by an edit are bound to fresh operation variables. The
requirements collected here are declared on the operation and returned to
the caller, who can merge mock values for them into a variables JSON blob
with [`merge_variables`].
*/

use std::collections::HashSet;

use graphql_parser::query::{
    Definition, Directive, Document, OperationDefinition, Selection, SelectionSet, Type,
    VariableDefinition,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::consts::MOCK_INPUT_DEPTH;
use crate::helpers::{definition_selection_set, demote_to_shorthand};
use crate::schema::{Schema, TypeKind};

/// A variable an edit bound and declared, e.g. `{"name": "limit", "type": "Int!"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRequirement {
    pub name: String,
    #[serde(rename = "type", with = "type_signature")]
    pub ty: Type,
}

mod type_signature {
    use graphql_parser::query::Type;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ty: &Type, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(ty)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Type, D::Error> {
        let signature = String::deserialize(deserializer)?;
        signature.parse().map_err(de::Error::custom)
    }
}

/// Hands out variable names that do not clash with the ones an operation
/// already declares or uses
#[derive(Debug, Default)]
pub struct VariableBinder {
    taken: HashSet<String>,
    bound: Vec<VariableRequirement>,
}

impl VariableBinder {
    pub fn for_definition(definition: &Definition) -> Self {
        let mut taken: HashSet<String> = HashSet::new();
        if let Definition::Operation(op) = definition {
            taken.extend(op.variable_definitions.iter().map(|v| v.name.clone()));
            taken.extend(directive_variables(&op.directives).map(str::to_string));
        }
        taken.extend(
            selection_set_variables(definition_selection_set(definition))
                .into_iter()
                .map(str::to_string),
        );
        VariableBinder {
            taken,
            bound: Vec::new(),
        }
    }

    /// Binds a new variable for argument `arg_name` and returns its name
    pub fn bind(&mut self, arg_name: &str, ty: &Type) -> String {
        let name = fresh_name(arg_name, &self.taken);
        trace!("binding ${} as {}", name, ty);
        self.taken.insert(name.clone());
        self.bound.push(VariableRequirement {
            name: name.clone(),
            ty: ty.clone(),
        });
        name
    }

    pub fn into_requirements(self) -> Vec<VariableRequirement> {
        self.bound
    }
}

/// `base`, or `base` suffixed with the first free number from 2
fn fresh_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn directive_variables(directives: &[Directive]) -> impl Iterator<Item = &str> {
    directives
        .iter()
        .flat_map(|d| d.arguments.iter())
        .flat_map(|(_, value)| value.variables())
}

fn collect_selection<'q>(item: &'q Selection, names: &mut Vec<&'q str>) {
    match item {
        Selection::Field(field) => {
            for (_, value) in &field.arguments {
                names.extend(value.variables());
            }
            names.extend(directive_variables(&field.directives));
            if let Some(set) = &field.selection_set {
                set.items.iter().for_each(|item| collect_selection(item, names));
            }
        }
        Selection::FragmentSpread(spread) => {
            names.extend(directive_variables(&spread.directives));
        }
        Selection::InlineFragment(fragment) => {
            names.extend(directive_variables(&fragment.directives));
            fragment
                .selection_set
                .items
                .iter()
                .for_each(|item| collect_selection(item, names));
        }
    }
}

/// Every variable referenced by `item` and its subselections
pub fn selection_variables(item: &Selection) -> Vec<&str> {
    let mut names = Vec::new();
    collect_selection(item, &mut names);
    names
}

/// Every variable referenced below `set`, in order of appearance
pub fn selection_set_variables(set: &SelectionSet) -> Vec<&str> {
    let mut names = Vec::new();
    set.items
        .iter()
        .for_each(|item| collect_selection(item, &mut names));
    names
}

/// Declares each requirement on `op` unless a variable of that name exists
pub fn declare_variables(op: &mut OperationDefinition, requirements: &[VariableRequirement]) {
    for requirement in requirements {
        if op
            .variable_definitions
            .iter()
            .all(|v| v.name != requirement.name)
        {
            op.variable_definitions.push(VariableDefinition::new(
                requirement.name.clone(),
                requirement.ty.clone(),
            ));
        }
    }
}

/// Drops the declarations among `candidates` that the operation at `index`
/// no longer uses.
///
/// Usages inside fragment definitions count, since any of them may be
/// spread into the operation.
pub fn prune_variables(document: &mut Document, index: usize, candidates: &[String]) {
    if candidates.is_empty() {
        return;
    }
    let mut used: HashSet<String> = HashSet::new();
    for (idx, definition) in document.definitions.iter().enumerate() {
        let counts = idx == index || matches!(definition, Definition::Fragment(_));
        if !counts {
            continue;
        }
        if let Definition::Operation(op) = definition {
            used.extend(directive_variables(&op.directives).map(str::to_string));
        }
        if let Definition::Fragment(fragment) = definition {
            used.extend(directive_variables(&fragment.directives).map(str::to_string));
        }
        used.extend(
            selection_set_variables(definition_selection_set(definition))
                .into_iter()
                .map(str::to_string),
        );
    }

    let emptied = match document.definitions.get_mut(index) {
        Some(Definition::Operation(op)) if !op.variable_definitions.is_empty() => {
            op.variable_definitions.retain(|var| {
                let keep = used.contains(&var.name) || !candidates.contains(&var.name);
                if !keep {
                    trace!("pruning unused variable ${}", var.name);
                }
                keep
            });
            op.variable_definitions.is_empty()
        }
        _ => false,
    };
    // an anonymous query that lost its last variable goes back to shorthand
    if emptied {
        demote_to_shorthand(&mut document.definitions[index]);
    }
}

/// A placeholder JSON value of type `ty`
pub fn mock_value(ty: &Type, schema: &Schema) -> JsonValue {
    mock(ty, schema, MOCK_INPUT_DEPTH)
}

fn mock(ty: &Type, schema: &Schema, depth: usize) -> JsonValue {
    match ty {
        Type::NonNullType(inner) => mock(inner, schema, depth),
        Type::ListType(inner) => json!([mock(inner, schema, depth)]),
        Type::NamedType(name) => match name.as_str() {
            "Int" => json!(0),
            "Float" => json!(0.0),
            "String" | "ID" => json!(""),
            "Boolean" => json!(false),
            _ => match schema.get_type(name).map(|t| &t.kind) {
                Some(TypeKind::Enum { values }) => values
                    .first()
                    .map(|v| JsonValue::String(v.name.clone()))
                    .unwrap_or(JsonValue::Null),
                Some(TypeKind::InputObject { fields }) if depth > 0 => JsonValue::Object(
                    fields
                        .iter()
                        .map(|f| (f.name.clone(), mock(&f.ty, schema, depth - 1)))
                        .collect(),
                ),
                Some(TypeKind::InputObject { .. }) => json!({}),
                _ => JsonValue::Null,
            },
        },
    }
}

/// Adds a mock value for every requirement missing from `variables`.
///
/// `variables` is the caller's JSON object text. Blank or invalid text starts
/// from an empty object. The result is pretty-printed.
pub fn merge_variables(
    variables: &str,
    requirements: &[VariableRequirement],
    schema: &Schema,
) -> String {
    let mut object = match serde_json::from_str::<JsonValue>(variables) {
        Ok(JsonValue::Object(object)) => object,
        Ok(_) | Err(_) => {
            if !variables.trim().is_empty() {
                debug!("variables are not a JSON object, starting from scratch");
            }
            Map::new()
        }
    };
    for requirement in requirements {
        if !object.contains_key(&requirement.name) {
            object.insert(
                requirement.name.clone(),
                mock_value(&requirement.ty, schema),
            );
        }
    }
    serde_json::to_string_pretty(&JsonValue::Object(object)).unwrap_or_else(|e| {
        debug!("could not print variables: {}", e);
        "{}".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::parse_query;

    fn schema() -> Schema {
        Schema::from_sdl(
            r#"
            type Query { a: Int }
            enum Order { ASC DESC }
            input Page { first: Int!, order: Order, next: Page }
            scalar Date
            "#,
        )
        .unwrap()
    }

    fn requirement(name: &str, ty: &str) -> VariableRequirement {
        VariableRequirement {
            name: name.to_string(),
            ty: ty.parse().unwrap(),
        }
    }

    #[test]
    fn fresh_names() {
        let doc = parse_query("query($id: ID) { a(id: $id, other: $other) }").unwrap();
        let mut binder = VariableBinder::for_definition(&doc.definitions[0]);
        let int: Type = "Int".parse().unwrap();
        assert_eq!(binder.bind("id", &int), "id2");
        assert_eq!(binder.bind("id", &int), "id3");
        assert_eq!(binder.bind("other", &int), "other2");
        assert_eq!(binder.bind("limit", &int), "limit");
        let names: Vec<_> = binder
            .into_requirements()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["id2", "id3", "other2", "limit"]);
    }

    #[test]
    fn usages() {
        let doc = parse_query(
            "{ a(x: [$one, {k: $two}]) @include(if: $three) { ... on T @skip(if: $four) { b } ...F @skip(if: $five) } }",
        )
        .unwrap();
        let set = definition_selection_set(&doc.definitions[0]);
        assert_eq!(
            selection_set_variables(set),
            vec!["one", "two", "three", "four", "five"]
        );
    }

    #[test]
    fn pruning() {
        let mut doc = parse_query(
            "query($a: Int, $b: Int, $c: Int, $d: Int) { x(a: $a) } fragment F on Query { y(c: $c) }",
        )
        .unwrap();
        let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        prune_variables(&mut doc, 0, &candidates);
        let left = match &doc.definitions[0] {
            Definition::Operation(op) => op
                .variable_definitions
                .iter()
                .map(|v| v.name.clone())
                .collect::<Vec<_>>(),
            _ => unreachable!(),
        };
        assert_eq!(left, vec!["a", "c", "d"]);
    }

    #[test]
    fn pruning_the_last_variable_restores_shorthand() {
        let candidates = vec!["a".to_string()];
        let mut doc = parse_query("query($a: Int) { x(a: $a) y }").unwrap();
        if let Definition::Operation(op) = &mut doc.definitions[0] {
            op.selection_set.items.remove(0);
        }
        prune_variables(&mut doc, 0, &candidates);
        assert_eq!(doc.to_string(), "{\n  y\n}\n");

        let mut named = parse_query("query Q($a: Int) { y }").unwrap();
        prune_variables(&mut named, 0, &candidates);
        assert_eq!(named.to_string(), "query Q {\n  y\n}\n");
    }

    #[test]
    fn mocks() {
        let schema = schema();
        let mock = |ty: &str| mock_value(&ty.parse().unwrap(), &schema);
        assert_eq!(mock("Int!"), json!(0));
        assert_eq!(mock("[String]"), json!([""]));
        assert_eq!(mock("Boolean"), json!(false));
        assert_eq!(mock("Order"), json!("ASC"));
        assert_eq!(mock("Date"), JsonValue::Null);
        assert_eq!(
            mock("Page"),
            json!({
                "first": 0,
                "order": "ASC",
                "next": {
                    "first": 0,
                    "order": "ASC",
                    "next": { "first": 0, "order": "ASC", "next": {} }
                }
            })
        );
    }

    #[test]
    fn requirement_json() {
        let req = requirement("limit", "Int!");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "name": "limit", "type": "Int!" })
        );
        let back: VariableRequirement =
            serde_json::from_value(json!({ "name": "ids", "type": "[ID!]" })).unwrap();
        assert_eq!(back, requirement("ids", "[ID!]"));
    }

    #[test]
    fn merging() {
        let schema = schema();
        let reqs = vec![requirement("limit", "Int!"), requirement("page", "Order")];
        assert_eq!(
            merge_variables("{\"limit\": 5}", &reqs, &schema),
            "{\n  \"limit\": 5,\n  \"page\": \"ASC\"\n}"
        );
        assert_eq!(
            merge_variables("not json", &reqs[..1], &schema),
            "{\n  \"limit\": 0\n}"
        );
        assert_eq!(merge_variables("", &[], &schema), "{}");
    }
}
