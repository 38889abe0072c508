pub mod compiler;
pub mod config;
pub mod expression;
pub mod functions;

pub use compiler::MqlCompiler;
pub use config::{CompilerContext, Settings, TypeTable};
pub use expression::{CompileError, CompileResult, Expression};
pub use functions::register_functions;
