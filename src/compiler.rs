//! Compiler driver.
//!
//! Walks an expression tree and hands each node to the translator registered
//! for its kind. Translators call back into the compiler for their children,
//! so children are always compiled before their parent is assembled.

use crate::config::CompilerContext;
use crate::expression::{CompileError, CompileResult, Expression};
use crate::functions::{FunctionRegistry, OperatorTable};
use bson::Bson;
use log::{debug, trace};

/// Compiles expression trees into aggregation operator trees
#[derive(Debug, Clone, Copy)]
pub struct MqlCompiler<'a> {
    registry: &'a FunctionRegistry,
    context: &'a CompilerContext,
}

impl<'a> MqlCompiler<'a> {
    pub fn new(registry: &'a FunctionRegistry, context: &'a CompilerContext) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> &'a CompilerContext {
        self.context
    }

    pub fn operators(&self) -> &'a OperatorTable {
        self.registry.operators()
    }

    /// Compile a single expression
    pub fn compile(&self, expr: &Expression) -> CompileResult<Bson> {
        let kind = expr.kind();
        trace!("Compiling {} node", kind.as_str());
        match self.registry.get(kind) {
            Some(translator) => translator(expr, self),
            None => {
                debug!("No translator registered for {}", kind.as_str());
                Err(CompileError::unsupported(kind.as_str()))
            }
        }
    }

    /// Compile expressions in order, stopping at the first failure
    pub fn compile_all(&self, exprs: &[&Expression]) -> CompileResult<Vec<Bson>> {
        exprs.iter().map(|expr| self.compile(expr)).collect()
    }
}
