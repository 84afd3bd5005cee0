//! Error types shared by the codec and the evaluator.

use thiserror::Error;

/// A document the codec cannot turn into (or back from) an expression tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    /// The text is not valid JSON
    #[error("invalid json: {0}")]
    Json(String),

    /// A reference path with an empty or unusable segment (`#a..b`, `#`)
    #[error("invalid path `{0}`")]
    InvalidPath(String),

    /// A `$def` node that is not `["$def", [names...], body]`
    #[error("invalid function definition: {0}")]
    InvalidFunctionDefinition(String),

    /// A call node without an argument slot
    #[error("invalid function call: {0}")]
    InvalidFunctionCall(String),

    /// Native functions have no JSON form
    #[error("native function `{0}` cannot be serialized")]
    NativeFunction(String),
}

/// Errors that terminate an evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] DocumentError),

    /// A reference that no scope frame can resolve, or a path step that does
    /// not fit the container it is applied to
    #[error("no reference: {0}")]
    NoReference(String),

    /// A value of the wrong shape for the operation
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// A dependency sweep made no progress
    #[error("circular reference in `{location}` between {}", .pending.join(", "))]
    CircularReference {
        location: String,
        pending: Vec<String>,
    },

    /// Too many nested function applications
    #[error("function calls nested deeper than {0}")]
    DepthExceeded(usize),
}

pub type Result<T> = std::result::Result<T, EvalError>;
