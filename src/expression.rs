//! Expression trees handed to the compiler.
//!
//! This module provides:
//! - Expression node representation
//! - Typed literal values
//! - Output field descriptions for casts
//! - Compilation error types

pub mod error;
pub mod expr;
pub mod field;
pub mod value;

pub use error::{CompileError, CompileResult};
pub use expr::{
    BinaryArgs, Cast, ColumnRef, Expression, Extract, Func, FunctionClass, NodeKind, Trunc,
};
pub use field::{FieldType, OutputField};
pub use value::Value;
