use crate::helpers::{editor, nesting, schema};
use explorer_query_builder::{QueryEditor, Schema};
use pretty_assertions::assert_eq;

static QUERIES: &[&str] = &[
    "",
    "query {\n  me {\n    id\n  }\n}\n",
    "query {\n  user(id: 1) {\n    id\n    address {}\n  }\n}\n",
    "query Named($limit: Int!) {\n  me {\n    posts(limit: $limit) {\n      id\n    }\n  }\n}\n",
];

static PATHS: &[&str] = &[
    "query.me",
    "query.me.email",
    "query.me.posts",
    "query.me.posts.author.friend",
    "query.user.address.city",
    "query.search",
    "mutation.updateUser.role",
];

#[test]
fn add_field_is_idempotent() {
    let schema = schema();
    let editor = editor(&schema);
    for query in QUERIES {
        for path in PATHS {
            let once = editor.add_field(query, path);
            let twice = editor.add_field(&once.query, path);
            assert_eq!(twice.query, once.query, "{} on {:?}", path, query);
            assert!(twice.variables.is_empty(), "{} on {:?}", path, query);
        }
    }
}

#[test]
fn added_fields_are_members() {
    let schema = schema();
    let editor = editor(&schema);
    for query in QUERIES {
        for path in PATHS {
            let added = editor.add_field(query, path).query;
            assert!(editor.is_field_in_query(&added, path), "{} on {:?}", path, query);
            let removed = editor.remove_field(&added, path).query;
            assert!(!editor.is_field_in_query(&removed, path), "{} on {:?}", path, query);
        }
    }
}

#[test]
fn remove_undoes_add() {
    let schema = schema();
    let editor = editor(&schema);
    let cases = [
        ("query {\n  me {\n    id\n  }\n}\n", "query.me.email"),
        ("{\n  me {\n    id\n  }\n}\n", "query.me.posts"),
        ("{\n  me {\n    id\n  }\n}\n", "query.user"),
        ("{\n  me {\n    id\n  }\n}\n", "query.me.friend"),
        ("query {\n  me {\n    id\n  }\n}\n", "query.me.address"),
        ("query {\n  user(id: 1) {\n    id\n    address {}\n  }\n}\n", "query.user.address.city"),
        ("query Named($limit: Int!) {\n  me {\n    posts(limit: $limit) {\n      id\n    }\n  }\n}\n", "query.me.posts.author"),
    ];
    for (query, path) in cases.iter() {
        assert!(!editor.is_field_in_query(query, path));
        let added = editor.add_field(query, path);
        assert_ne!(added.query, *query);
        assert_eq!(editor.remove_field(&added.query, path).query, *query, "{}", path);
    }
}

#[test]
fn removing_a_missing_field_is_a_no_op() {
    let schema = schema();
    let editor = editor(&schema);
    let query = "query {\n  me {\n    id\n  }\n}\n";
    assert_eq!(editor.remove_field(query, "query.me.email").query, query);
    assert_eq!(editor.remove_field(query, "query.user").query, query);
    assert_eq!(editor.remove_field(query, "mutation").query, query);
}

#[test]
fn recursive_expansion_terminates_on_cycles() {
    let schema = Schema::from_sdl("type Query { user: User } type User { name: String, friend: User }").unwrap();
    let editor = QueryEditor::new(&schema);
    for depth in 1..=6 {
        let result = editor.add_all_type_fields_to_depth("", "query.user", depth);
        // the operation and `user` braces sit above the expanded levels
        assert_eq!(nesting(&result.query), depth + 2, "depth {}", depth);
        assert_eq!(result.query.matches("friend").count(), depth);
    }
    let default = editor.add_all_type_fields_recursively("", "query.user");
    assert_eq!(nesting(&default.query), 8);
    assert_eq!(
        editor.add_all_type_fields_to_depth("", "query.user", 0).query,
        ""
    );
}

#[test]
fn recursive_expansion_on_the_fixture_is_bounded() {
    let schema = schema();
    let editor = editor(&schema);
    for depth in 1..=4 {
        let result = editor.add_all_type_fields_to_depth("{ me { id } }", "query.me", depth);
        assert_eq!(nesting(&result.query), depth + 2, "depth {}", depth);
        assert!(editor.are_all_type_fields_in_query(&result.query, "query.me"));
    }
}

#[test]
fn recursive_expansion_merges_into_existing_selections() {
    let schema = schema();
    let editor = editor(&schema);
    let once = editor.add_all_type_fields_to_depth("{ me { address { city } } }", "query.me", 2);
    let me = editor.resolve(&once.query, "query.me").unwrap();
    let me = me.selection_set().unwrap();
    assert_eq!(me.fields().filter(|f| f.name == "address").count(), 1);
    let address = editor.resolve(&once.query, "query.me.address").unwrap();
    let names: Vec<_> = address
        .selection_set()
        .unwrap()
        .fields()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["city", "street"]);
    let twice = editor.add_all_type_fields_to_depth(&once.query, "query.me", 2);
    assert_eq!(twice.query, once.query);
}

#[test]
fn scalar_expansion_only_adds_leaves() {
    let schema = schema();
    let editor = editor(&schema);
    let composite = ["address", "posts", "friend"];
    for path in &["query.me", "query.me.friend", "query.me.posts.author"] {
        let result = editor.add_all_scalar_type_fields("", path);
        let leaf = editor.resolve(&result.query, path).unwrap();
        let set = leaf.selection_set().unwrap();
        let names: Vec<_> = set.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "name", "role"], "{}", path);
        assert!(names.iter().all(|n| !composite.contains(n)));
    }
}

#[test]
fn union_fields_stay_pending() {
    let schema = schema();
    let editor = editor(&schema);
    let result = editor.add_all_type_fields_to_depth("", "query.search", 3);
    assert_eq!(
        result.query,
        "query($term: String!) {\n  search(term: $term) {}\n}\n"
    );
    let nested = editor.add_all_type_fields("", "query");
    assert!(nested.query.contains("search(term: $term) {}"));
    assert!(nested.query.contains("node(id: $id2) {}"));
}
