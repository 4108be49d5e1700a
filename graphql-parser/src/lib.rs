//! Graphql Parser
//! ==============
//!
//! This library contains a parser and formatter for the graphql query
//! language, a parser for the schema definition language, and the AST types
//! for both. The AST owns its strings so documents can be edited in place and
//! printed back.
//!
//! Current this library supports full graphql syntax, and the following
//! extensions:
//!
//! 1. Subscriptions
//! 2. Block (triple quoted) strings
//! 3. Empty selection sets (`field {}`), kept as pending selections
//!
//!
//! Example: Parse and Format Query
//! -------------------------------
//!
//! ```rust
//! use explorer_graphql_parser::{parse_query, Style};
//!
//! let ast = parse_query("query MyQuery { field1, field2 }").unwrap();
//! // Format canonical representation
//! assert_eq!(format!("{}", ast), "\
//! query MyQuery {
//!   field1
//!   field2
//! }
//! ");
//! assert_eq!(ast.format(&Style::minified()), "query MyQuery{field1 field2}");
//! ```
//!
//! Example: Parse a Schema
//! -----------------------
//!
//! ```rust
//! use explorer_graphql_parser::parse_schema;
//!
//! let ast = parse_schema(r#"
//!     schema {
//!         query: Query
//!     }
//!     type Query {
//!         users: [User!]!,
//!     }
//!     """
//!        Example user object
//!     """
//!     type User {
//!         name: String!,
//!     }
//! "#).unwrap();
//! let names: Vec<_> = ast.types().map(|ty| ty.name.as_str()).collect();
//! assert_eq!(names, vec!["Query", "User"]);
//! ```
#![warn(missing_debug_implementations)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod common;
#[macro_use]
mod format;
mod error;
mod helpers;
mod position;
pub mod query;
pub mod schema;
mod tokenizer;

pub use crate::error::ParseError;
pub use crate::format::Style;
pub use crate::position::Pos;
pub use crate::query::parse_query;
pub use crate::schema::parse_schema;
