//! Error types for expression compilation.

use thiserror::Error;

/// Errors that can occur while compiling an expression tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The node has no counterpart in the aggregation language.
    #[error("{node} is not supported.")]
    UnsupportedOperation { node: String },
}

impl CompileError {
    pub fn unsupported(node: impl Into<String>) -> Self {
        CompileError::UnsupportedOperation { node: node.into() }
    }
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
