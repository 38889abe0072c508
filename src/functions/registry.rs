//! Dispatch table from node kind to translator.

use crate::compiler::MqlCompiler;
use crate::expression::{CompileResult, Expression, NodeKind};
use crate::functions::operators::OperatorTable;
use crate::functions::translators;
use bson::Bson;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Translation rule for one node kind
pub type Translator = fn(&Expression, &MqlCompiler<'_>) -> CompileResult<Bson>;

static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Immutable mapping from node kind to translator, plus the operator tables
/// the translators consult.
#[derive(Clone)]
pub struct FunctionRegistry {
    translators: HashMap<NodeKind, Translator>,
    operators: &'static OperatorTable,
}

impl FunctionRegistry {
    /// Registry with no translators
    pub fn empty() -> Self {
        Self {
            translators: HashMap::new(),
            operators: OperatorTable::global(),
        }
    }

    /// Registry with a translator for every node kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(NodeKind::Column, translators::col);
        registry.register(NodeKind::Literal, translators::value);
        registry.register(NodeKind::Raw, translators::raw);
        registry.register(NodeKind::Func, translators::func);
        registry.register(NodeKind::Cast, translators::cast);
        registry.register(NodeKind::Cot, translators::cot);
        registry.register(NodeKind::Extract, translators::extract);
        registry.register(NodeKind::Log, translators::log);
        registry.register(NodeKind::NullIf, translators::null_if);
        registry.register(NodeKind::Round, translators::round);
        registry.register(NodeKind::Trunc, translators::trunc);
        registry
    }

    /// Associate a translator with a node kind, returning the one it replaces
    pub fn register(&mut self, kind: NodeKind, translator: Translator) -> Option<Translator> {
        self.translators.insert(kind, translator)
    }

    /// Translator for a node kind
    pub fn get(&self, kind: NodeKind) -> Option<Translator> {
        self.translators.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    pub fn operators(&self) -> &OperatorTable {
        self.operators
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.translators.keys().map(NodeKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("translators", &kinds)
            .finish_non_exhaustive()
    }
}

/// Build the process-wide registry.
///
/// Safe to call any number of times; the registry is built once and every
/// call returns the same handle.
pub fn register_functions() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(|| {
        let registry = FunctionRegistry::with_defaults();
        debug!("Registered {} expression translators", registry.len());
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_registered() {
        let registry = register_functions();
        for kind in NodeKind::ALL {
            assert!(registry.get(kind).is_some(), "{} not registered", kind.as_str());
        }
        assert_eq!(registry.len(), NodeKind::ALL.len());
    }

    #[test]
    fn test_register_functions_idempotent() {
        let first = register_functions();
        let second = register_functions();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_empty_registry() {
        let registry = FunctionRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get(NodeKind::Func).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FunctionRegistry::empty();
        assert!(registry.register(NodeKind::Round, translators::round).is_none());
        assert!(registry.register(NodeKind::Round, translators::func).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_shares_operator_table() {
        let registry = FunctionRegistry::with_defaults();
        assert!(std::ptr::eq(registry.operators(), OperatorTable::global()));
    }
}
