//! Function translation for the aggregation pipeline.
//!
//! Relational function calls are mapped onto aggregation operators in three
//! pieces:
//! 1. Operator tables: function identity and date-part key to operator token
//! 2. Translators: one rule per node shape (generic call, cast, extract, ...)
//! 3. Registry: the dispatch table from node kind to translator
//!
//! Call [`register_functions`] once at startup and hand the returned registry
//! to [`crate::compiler::MqlCompiler`].

pub mod operators;
pub mod registry;
pub mod translators;

pub use operators::OperatorTable;
pub use registry::{register_functions, FunctionRegistry, Translator};
