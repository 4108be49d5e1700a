use graphql_parser::ParseError;
use thiserror::Error;

/// Reasons an edit could not be applied.
///
/// These never reach callers of the editor methods, which degrade to a no-op
/// instead, but they are logged and returned by [`crate::QueryEditor::resolve`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    /// The query text is not valid GraphQL.
    #[error("failed parsing query: {0}")]
    Parse(#[from] ParseError),

    /// The field path is malformed.
    #[error("invalid field path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The path does not resolve against the schema or the document.
    #[error("{what} not found at {path}")]
    PathNotFound { path: String, what: String },

    /// The edit would need aliasing or inline fragments, which are never synthesized.
    #[error("unsupported shape at {path}: {reason}")]
    UnsupportedShape { path: String, reason: String },
}

/// Errors raised while ingesting a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid introspection result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed parsing schema: {0}")]
    Parse(#[from] ParseError),

    #[error("unknown type {name} referenced by {referrer}")]
    UnknownType { name: String, referrer: String },

    #[error("type {0} is defined more than once")]
    DuplicateType(String),

    #[error("type {name} has unexpected kind {kind}")]
    InvalidKind { name: String, kind: String },

    #[error("type reference without a name or inner type in {0}")]
    MissingTypeRef(String),
}

pub type Result<T> = std::result::Result<T, EditError>;
