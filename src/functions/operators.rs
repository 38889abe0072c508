//! Operator mapping tables.

use crate::expression::FunctionClass;
use std::collections::HashMap;
use std::sync::OnceLock;

static OPERATOR_TABLE: OnceLock<OperatorTable> = OnceLock::new();

/// Lookups from function identity and date-part key to operator token.
///
/// Tokens are stored without the leading `$`.
#[derive(Debug)]
pub struct OperatorTable {
    functions: HashMap<FunctionClass, &'static str>,
    extracts: HashMap<&'static str, &'static str>,
}

impl OperatorTable {
    fn new() -> Self {
        let functions = HashMap::from([
            (FunctionClass::Ceil, "ceil"),
            (FunctionClass::Coalesce, "ifNull"),
            (FunctionClass::Degrees, "radiansToDegrees"),
            (FunctionClass::Greatest, "max"),
            (FunctionClass::Least, "min"),
            (FunctionClass::Power, "pow"),
            (FunctionClass::Radians, "degreesToRadians"),
            (FunctionClass::Random, "rand"),
            (FunctionClass::Upper, "toUpper"),
        ]);
        let extracts = HashMap::from([
            ("day", "dayOfMonth"),
            ("hour", "hour"),
            ("iso_week_day", "isoDayOfWeek"),
            ("iso_year", "isoWeekYear"),
            ("minute", "minute"),
            ("month", "month"),
            ("second", "second"),
            ("week", "isoWeek"),
            ("week_day", "dayOfWeek"),
            ("year", "year"),
        ]);
        Self {
            functions,
            extracts,
        }
    }

    /// Process-wide table, built on first use
    pub fn global() -> &'static OperatorTable {
        OPERATOR_TABLE.get_or_init(OperatorTable::new)
    }

    /// Operator token for a function identity
    pub fn lookup(&self, class: FunctionClass) -> Option<&'static str> {
        self.functions.get(&class).copied()
    }

    /// Operator token for a date-part key
    pub fn lookup_extract(&self, lookup_name: &str) -> Option<&'static str> {
        self.extracts.get(lookup_name).copied()
    }

    /// Date-part keys with a mapping, in no particular order
    pub fn extract_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extracts.keys().copied()
    }
}
