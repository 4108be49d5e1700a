use crate::helpers::{editor, editor_with, schema};
use explorer_query_builder::{EditOptionsBuilder, EditResult};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn adds_a_scalar_field() {
    let schema = schema();
    let result = editor(&schema).add_field("query { user { id } }", "query.user.email");
    assert!(result.variables.is_empty());
    assert_snapshot!(result.query.trim_end(), @r###"
    query {
      user {
        id
        email
      }
    }
    "###);
}

#[test]
fn binds_a_required_argument() {
    let schema = schema();
    let result = editor(&schema).add_arg("query { user { id } }", "query.user.posts", "limit");
    assert_snapshot!(result.query.trim_end(), @r###"
    query($limit: Int!) {
      user {
        id
        posts(limit: $limit) {}
      }
    }
    "###);
    assert_eq!(
        serde_json::to_value(&result.variables).unwrap(),
        json!([{ "name": "limit", "type": "Int!" }])
    );
}

#[test]
fn malformed_text_is_left_alone() {
    let schema = schema();
    let editor = editor(&schema);
    let broken = "query { user {";
    let unchanged = EditResult::unchanged(broken);
    assert_eq!(editor.add_field(broken, "query.user.email"), unchanged);
    assert_eq!(editor.remove_field(broken, "query.user"), unchanged);
    assert_eq!(editor.add_arg(broken, "query.user.posts", "limit"), unchanged);
    assert_eq!(editor.remove_arg(broken, "query.user", "id"), unchanged);
    assert_eq!(editor.remove_type_fields(broken, "query.user"), unchanged);
    assert_eq!(editor.add_all_scalar_type_fields(broken, "query.user"), unchanged);
    assert_eq!(editor.add_all_type_fields(broken, "query.user"), unchanged);
    assert_eq!(editor.add_all_type_fields_recursively(broken, "query.user"), unchanged);
    assert!(!editor.is_field_in_query(broken, "query.user"));
    assert!(!editor.is_arg_in_query(broken, "query.user", "id"));
    assert!(!editor.are_all_type_fields_in_query(broken, "query.user"));
    assert!(editor.resolve(broken, "query.user").is_err());
}

#[test]
fn wide_whitespace_in_block_strings() {
    let schema = schema();
    let editor = editor(&schema);
    let query = "{ me { id } user(id: \"\"\"\n x\n\u{3000}y\n\"\"\") { id } }";
    assert!(editor.is_field_in_query(query, "query.user"));
    let result = editor.add_field(query, "query.user.email");
    assert!(result.query.contains("    email\n"));
}

#[test]
fn bad_paths_are_no_ops() {
    let schema = schema();
    let editor = editor(&schema);
    let query = "query { me { id } }";
    for path in &["me.id", "query..id", "query.me.nope", "query.me.id.more", "subscription.me"] {
        assert_eq!(editor.add_field(query, path).query, query, "{}", path);
        assert!(!editor.is_field_in_query(query, path), "{}", path);
    }
    assert_eq!(editor.add_arg(query, "query.me.posts", "nope").query, query);
    assert_eq!(editor.add_arg(query, "query", "id").query, query);
}

#[test]
fn removes_a_field_and_its_variables() {
    let schema = schema();
    let result = editor(&schema).remove_field(
        "query Q($id: ID!, $other: ID) { user(id: $id) { id } me { id } }",
        "query.user",
    );
    assert!(result.variables.is_empty());
    assert_snapshot!(result.query.trim_end(), @r###"
    query Q($other: ID) {
      me {
        id
      }
    }
    "###);
}

#[test]
fn removing_the_last_child_keeps_braces() {
    let schema = schema();
    let result = editor(&schema).remove_field("{ me { address { city } } }", "query.me.address.city");
    assert_snapshot!(result.query.trim_end(), @r###"
    {
      me {
        address {}
      }
    }
    "###);
}

#[test]
fn stale_selections_can_be_found_and_removed() {
    let schema = schema();
    let editor = editor(&schema);
    let query = "query($old: Int) { me { id legacy(old: $old) { id } } }";
    assert!(editor.is_field_in_query(query, "query.me.legacy"));
    assert!(editor.is_field_in_query(query, "query.me.legacy.id"));
    assert!(editor.is_arg_in_query(query, "query.me.legacy", "old"));
    assert!(!editor.is_field_in_query(query, "query.me.legacy.name"));

    let result = editor.remove_field(query, "query.me.legacy");
    assert_eq!(result.query, "{\n  me {\n    id\n  }\n}\n");
    assert!(!editor.is_field_in_query(&result.query, "query.me.legacy"));

    // adding still needs the schema
    assert_eq!(editor.add_field(&result.query, "query.me.legacy").query, result.query);
}

#[test]
fn removes_an_operation() {
    let schema = schema();
    let result = editor(&schema).remove_field(
        "query { me { id } } mutation { updateUser(input: {id: 1}) { id } }",
        "mutation",
    );
    assert_eq!(result.query, "query {\n  me {\n    id\n  }\n}\n");
}

#[test]
fn removes_an_argument() {
    let schema = schema();
    let editor = editor(&schema);
    let query = "query($limit: Int!) { me { posts(limit: $limit, after: \"x\") { id } } }";
    assert!(editor.is_arg_in_query(query, "query.me.posts", "limit"));
    let result = editor.remove_arg(query, "query.me.posts", "limit");
    assert_snapshot!(result.query.trim_end(), @r###"
    {
      me {
        posts(after: "x") {
          id
        }
      }
    }
    "###);
    assert!(!editor.is_arg_in_query(&result.query, "query.me.posts", "limit"));
    assert_eq!(editor.remove_arg(&result.query, "query.me.posts", "limit").query, result.query);
}

#[test]
fn existing_argument_is_not_rebound() {
    let schema = schema();
    let query = "query { me { posts(limit: 3) { id } } }";
    let result = editor(&schema).add_arg(query, "query.me.posts", "limit");
    assert_eq!(result, EditResult::unchanged(query));
}

#[test]
fn variable_names_avoid_collisions() {
    let schema = schema();
    let result = editor(&schema).add_field(
        "query($limit: Int) { user(id: $limit) { id } }",
        "query.me.posts",
    );
    assert_eq!(result.variables[0].name, "limit2");
    assert_snapshot!(result.query.trim_end(), @r###"
    query($limit: Int, $limit2: Int!) {
      user(id: $limit) {
        id
      }
      me {
        posts(limit: $limit2) {}
      }
    }
    "###);
}

#[test]
fn shorthand_is_promoted_for_variables() {
    let schema = schema();
    let editor = editor(&schema);
    let plain = editor.add_field("{ me { id } }", "query.me.email");
    assert_eq!(plain.query, "{\n  me {\n    id\n    email\n  }\n}\n");
    let bound = editor.add_field("{ me { id } }", "query.me.posts");
    assert_eq!(
        bound.query,
        "query($limit: Int!) {\n  me {\n    id\n    posts(limit: $limit) {}\n  }\n}\n"
    );
}

#[test]
fn creates_missing_operations() {
    let schema = schema();
    let editor = editor(&schema);
    let result = editor.add_field("query { me { id } }", "mutation.updateUser");
    assert_snapshot!(result.query.trim_end(), @r###"
    query {
      me {
        id
      }
    }

    mutation($input: UserInput!) {
      updateUser(input: $input) {}
    }
    "###);

    let variables: serde_json::Value =
        serde_json::from_str(&editor.mock_variables("", &result.variables)).unwrap();
    assert_eq!(
        variables,
        json!({
            "input": {
                "id": "",
                "name": "",
                "role": "ADMIN",
                "address": { "street": "", "city": "" }
            }
        })
    );
}

#[test]
fn mock_variables_keep_existing_values() {
    let schema = schema();
    let editor = editor(&schema);
    let result = editor.add_field("", "query.search");
    let names: Vec<_> = result.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["term"]);
    assert_eq!(
        editor.mock_variables("{\"term\": \"rust\", \"extra\": 1}", &result.variables),
        "{\n  \"term\": \"rust\",\n  \"extra\": 1\n}"
    );
}

#[test]
fn selected_operation_is_edited() {
    let schema = schema();
    let options = EditOptionsBuilder::default()
        .operation_name("B")
        .build()
        .unwrap();
    let editor = editor_with(&schema, options);
    let query = "query A { me { id } }\n\nquery B { me { id } }";
    let result = editor.add_field(query, "query.me.email");
    assert_snapshot!(result.query.trim_end(), @r###"
    query A {
      me {
        id
      }
    }

    query B {
      me {
        id
        email
      }
    }
    "###);
    assert!(editor.is_field_in_query(&result.query, "query.me.email"));
    assert!(!crate::helpers::editor(&schema).is_field_in_query(&result.query, "query.me.email"));
}

#[test]
fn new_operation_takes_the_selected_name() {
    let schema = schema();
    let options = EditOptionsBuilder::default()
        .operation_name("Profile")
        .build()
        .unwrap();
    let result = editor_with(&schema, options).add_field("", "query.me.id");
    assert_eq!(result.query, "query Profile {\n  me {\n    id\n  }\n}\n");
}

#[test]
fn alias_collisions_are_skipped() {
    let schema = schema();
    let editor = editor(&schema);
    let query = "{ me { email: name } }";
    assert_eq!(editor.add_field(query, "query.me.email").query, query);
    assert!(!editor.is_field_in_query(query, "query.me.email"));
    assert!(editor.is_field_in_query(query, "query.me.name"));

    let result = editor.add_all_scalar_type_fields(query, "query.me");
    assert_eq!(
        result.query,
        "{\n  me {\n    email: name\n    id\n    role\n  }\n}\n"
    );
}

#[test]
fn type_field_membership() {
    let schema = schema();
    let editor = editor(&schema);
    assert!(editor.are_all_type_fields_in_query(
        "{ me { address { city street } } }",
        "query.me.address"
    ));
    assert!(!editor.are_all_type_fields_in_query("{ me { address { city } } }", "query.me.address"));
    assert!(!editor.are_all_type_fields_in_query("{ me { address } }", "query.me.address"));
    assert!(!editor.are_all_type_fields_in_query("{ search(term: \"a\") { __typename } }", "query.search"));
    assert!(!editor.are_all_type_fields_in_query("{ me { id } }", "query.me.id"));
}

#[test]
fn removes_type_fields() {
    let schema = schema();
    let editor = editor(&schema);
    let result = editor.remove_type_fields(
        "query($limit: Int!) { me { __typename id posts(limit: $limit) { id } friend { id } } }",
        "query.me",
    );
    assert_snapshot!(result.query.trim_end(), @r###"
    {
      me {
        __typename
      }
    }
    "###);
    let query = "{ me { __typename } }";
    assert_eq!(editor.remove_type_fields(query, "query.me").query, query);
}

#[test]
fn minified_output() {
    let schema = schema();
    let options = EditOptionsBuilder::default().minified(true).build().unwrap();
    let result = editor_with(&schema, options).add_field("{ me { id } }", "query.me.posts");
    assert_eq!(result.query, "query($limit:Int!){me{id posts(limit:$limit){}}}");
}

#[test]
fn wide_indentation() {
    let schema = schema();
    let options = EditOptionsBuilder::default().indent(4u32).build().unwrap();
    let result = editor_with(&schema, options).add_field("{ me { id } }", "query.me.email");
    assert_eq!(result.query, "{\n    me {\n        id\n        email\n    }\n}\n");
}

#[test]
fn resolve_reports_the_failure() {
    let schema = schema();
    let editor = editor(&schema);
    let handle = editor.resolve("{ me { address { city } } }", "query.me.address").unwrap();
    assert_eq!(handle.chain(), &[0, 0]);
    assert_eq!(handle.schema_path.target_type().name, "Address");
    let err = editor.resolve("{ me { id } }", "query.me.address").unwrap_err();
    assert_eq!(err.to_string(), "selection address not found at query.me.address");
}
