//! Query language AST and parsing utilities
//!
mod ast;
mod format;
mod grammar;

pub use self::ast::*;
pub use self::grammar::{fragment_definition, operation_definition, parse_query};
