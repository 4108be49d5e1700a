//! Schema definition language AST and utility
//!
mod ast;
mod grammar;

pub use self::ast::*;
pub use self::grammar::parse_schema;
