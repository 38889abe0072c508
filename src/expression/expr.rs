//! Expression tree definitions.

use crate::config::CompilerContext;
use crate::expression::{OutputField, Value};
use bson::Bson;
use serde::{Deserialize, Serialize};

/// Column reference, already resolved by the query layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Alias of the collection the column belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Stored column name
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

/// Identity of a function that has a dedicated operator mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionClass {
    Ceil,
    Coalesce,
    Degrees,
    Greatest,
    Least,
    Power,
    Radians,
    Random,
    Upper,
}

impl FunctionClass {
    /// SQL name of the function
    pub fn function_name(&self) -> &'static str {
        match self {
            FunctionClass::Ceil => "CEILING",
            FunctionClass::Coalesce => "COALESCE",
            FunctionClass::Degrees => "DEGREES",
            FunctionClass::Greatest => "GREATEST",
            FunctionClass::Least => "LEAST",
            FunctionClass::Power => "POWER",
            FunctionClass::Radians => "RADIANS",
            FunctionClass::Random => "RANDOM",
            FunctionClass::Upper => "UPPER",
        }
    }
}

/// Generic function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<FunctionClass>,
    pub function: String,
    #[serde(default)]
    pub args: Vec<Expression>,
}

/// CAST(expression AS output_field)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub expression: Box<Expression>,
    pub output_field: OutputField,
}

/// Extraction of a single component from a date/time value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extract {
    pub expression: Box<Expression>,
    /// Date-part key, e.g. `year` or `iso_week_day`
    pub lookup_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tzinfo: Option<String>,
}

impl Extract {
    /// Class name of the node, used in diagnostics (`iso_year` -> `ExtractIsoYear`)
    pub fn class_name(&self) -> String {
        let mut name = String::from("Extract");
        for part in self.lookup_name.split('_') {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
        }
        name
    }

    /// Timezone the extraction is evaluated in, if any
    pub fn tzname<'a>(&'a self, context: &'a CompilerContext) -> Option<&'a str> {
        context.resolve_timezone(self.tzinfo.as_deref())
    }
}

/// Truncation of a date/time value to a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trunc {
    pub expression: Box<Expression>,
    /// Truncation unit, e.g. `day`, `week`, `month`
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tzinfo: Option<String>,
}

impl Trunc {
    /// Timezone the truncation is evaluated in, if any
    pub fn tzname<'a>(&'a self, context: &'a CompilerContext) -> Option<&'a str> {
        context.resolve_timezone(self.tzinfo.as_deref())
    }
}

/// Ordered pair of arguments for two-argument functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryArgs {
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

impl BinaryArgs {
    pub fn new(lhs: Expression, rhs: Expression) -> Self {
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Copy of the pair with the arguments in reverse order
    pub fn swapped(&self) -> Self {
        Self {
            lhs: self.rhs.clone(),
            rhs: self.lhs.clone(),
        }
    }
}

/// Node kinds the compiler dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Func,
    Cast,
    Extract,
    Trunc,
    Log,
    NullIf,
    Round,
    Cot,
    Column,
    Literal,
    Raw,
}

impl NodeKind {
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Func,
        NodeKind::Cast,
        NodeKind::Extract,
        NodeKind::Trunc,
        NodeKind::Log,
        NodeKind::NullIf,
        NodeKind::Round,
        NodeKind::Cot,
        NodeKind::Column,
        NodeKind::Literal,
        NodeKind::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Func => "Func",
            NodeKind::Cast => "Cast",
            NodeKind::Extract => "Extract",
            NodeKind::Trunc => "Trunc",
            NodeKind::Log => "Log",
            NodeKind::NullIf => "NullIf",
            NodeKind::Round => "Round",
            NodeKind::Cot => "Cot",
            NodeKind::Column => "Column",
            NodeKind::Literal => "Literal",
            NodeKind::Raw => "Raw",
        }
    }
}

/// Expression tree node
///
/// Nodes are immutable once built. Translators that need a different argument
/// order build a new node instead of rewriting an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Column reference
    Column(ColumnRef),

    /// Typed literal
    Literal(Value),

    /// Operator tree that was compiled elsewhere
    Raw(Bson),

    /// Generic function call
    Func(Func),

    /// Type conversion
    Cast(Cast),

    /// Date/time component extraction
    Extract(Extract),

    /// Date/time truncation
    Trunc(Trunc),

    /// LOG(base, number)
    Log(BinaryArgs),

    /// NULLIF(expr1, expr2)
    NullIf(BinaryArgs),

    /// ROUND(value, precision)
    Round(BinaryArgs),

    /// COT(expression)
    Cot(Box<Expression>),
}

impl Expression {
    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::new(name))
    }

    /// Create a column reference qualified by a collection alias
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::qualified(table, name))
    }

    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a NULL literal
    pub fn null() -> Self {
        Expression::Literal(Value::Null)
    }

    /// Wrap an already-compiled operator tree
    pub fn raw(compiled: impl Into<Bson>) -> Self {
        Expression::Raw(compiled.into())
    }

    /// Create a call to a function without a dedicated mapping
    pub fn func(function: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Func(Func {
            class: None,
            function: function.into(),
            args,
        })
    }

    /// Create a call to a function with a known identity
    pub fn call(class: FunctionClass, args: Vec<Expression>) -> Self {
        Expression::Func(Func {
            class: Some(class),
            function: class.function_name().to_string(),
            args,
        })
    }

    /// Create CEILING(expr)
    pub fn ceil(expr: Expression) -> Self {
        Self::call(FunctionClass::Ceil, vec![expr])
    }

    /// Create COALESCE(args...)
    pub fn coalesce(args: Vec<Expression>) -> Self {
        Self::call(FunctionClass::Coalesce, args)
    }

    /// Create DEGREES(expr)
    pub fn degrees(expr: Expression) -> Self {
        Self::call(FunctionClass::Degrees, vec![expr])
    }

    /// Create GREATEST(args...)
    pub fn greatest(args: Vec<Expression>) -> Self {
        Self::call(FunctionClass::Greatest, args)
    }

    /// Create LEAST(args...)
    pub fn least(args: Vec<Expression>) -> Self {
        Self::call(FunctionClass::Least, args)
    }

    /// Create POWER(base, exponent)
    pub fn power(base: Expression, exponent: Expression) -> Self {
        Self::call(FunctionClass::Power, vec![base, exponent])
    }

    /// Create RADIANS(expr)
    pub fn radians(expr: Expression) -> Self {
        Self::call(FunctionClass::Radians, vec![expr])
    }

    /// Create RANDOM()
    pub fn random() -> Self {
        Self::call(FunctionClass::Random, vec![])
    }

    /// Create UPPER(expr)
    pub fn upper(expr: Expression) -> Self {
        Self::call(FunctionClass::Upper, vec![expr])
    }

    /// Create a CAST expression
    pub fn cast(expr: Expression, output_field: impl Into<OutputField>) -> Self {
        Expression::Cast(Cast {
            expression: Box::new(expr),
            output_field: output_field.into(),
        })
    }

    /// Create an EXTRACT expression for the given date-part key
    pub fn extract(expr: Expression, lookup_name: impl Into<String>) -> Self {
        Expression::Extract(Extract {
            expression: Box::new(expr),
            lookup_name: lookup_name.into(),
            tzinfo: None,
        })
    }

    /// Create a date truncation expression
    pub fn trunc(expr: Expression, kind: impl Into<String>) -> Self {
        Expression::Trunc(Trunc {
            expression: Box::new(expr),
            kind: kind.into(),
            tzinfo: None,
        })
    }

    /// Create LOG(base, number)
    pub fn log(base: Expression, number: Expression) -> Self {
        Expression::Log(BinaryArgs::new(base, number))
    }

    /// Create NULLIF(expr1, expr2)
    pub fn null_if(expr1: Expression, expr2: Expression) -> Self {
        Expression::NullIf(BinaryArgs::new(expr1, expr2))
    }

    /// Create ROUND(value, precision)
    pub fn round(value: Expression, precision: Expression) -> Self {
        Expression::Round(BinaryArgs::new(value, precision))
    }

    /// Create COT(expression)
    pub fn cot(expr: Expression) -> Self {
        Expression::Cot(Box::new(expr))
    }

    /// Set an explicit timezone on an Extract or Trunc node.
    ///
    /// Other node kinds are returned unchanged.
    pub fn with_tzinfo(self, tzinfo: impl Into<String>) -> Self {
        match self {
            Expression::Extract(extract) => Expression::Extract(Extract {
                tzinfo: Some(tzinfo.into()),
                ..extract
            }),
            Expression::Trunc(trunc) => Expression::Trunc(Trunc {
                tzinfo: Some(tzinfo.into()),
                ..trunc
            }),
            other => other,
        }
    }

    /// Kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Column(_) => NodeKind::Column,
            Expression::Literal(_) => NodeKind::Literal,
            Expression::Raw(_) => NodeKind::Raw,
            Expression::Func(_) => NodeKind::Func,
            Expression::Cast(_) => NodeKind::Cast,
            Expression::Extract(_) => NodeKind::Extract,
            Expression::Trunc(_) => NodeKind::Trunc,
            Expression::Log(_) => NodeKind::Log,
            Expression::NullIf(_) => NodeKind::NullIf,
            Expression::Round(_) => NodeKind::Round,
            Expression::Cot(_) => NodeKind::Cot,
        }
    }

    /// Ordered child expressions
    pub fn source_expressions(&self) -> Vec<&Expression> {
        match self {
            Expression::Column(_) | Expression::Literal(_) | Expression::Raw(_) => vec![],
            Expression::Func(func) => func.args.iter().collect(),
            Expression::Cast(cast) => vec![cast.expression.as_ref()],
            Expression::Extract(extract) => vec![extract.expression.as_ref()],
            Expression::Trunc(trunc) => vec![trunc.expression.as_ref()],
            Expression::Log(args) | Expression::NullIf(args) | Expression::Round(args) => {
                vec![args.lhs.as_ref(), args.rhs.as_ref()]
            }
            Expression::Cot(expr) => vec![expr.as_ref()],
        }
    }

    /// Identity of the function, when it has a dedicated mapping
    pub fn function_class(&self) -> Option<FunctionClass> {
        match self {
            Expression::Func(func) => func.class,
            _ => None,
        }
    }

    /// SQL name of the function this node calls
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Expression::Func(func) => Some(&func.function),
            Expression::Cast(_) => Some("CAST"),
            Expression::Extract(_) => Some("EXTRACT"),
            Expression::Trunc(_) => Some("DATE_TRUNC"),
            Expression::Log(_) => Some("LOG"),
            Expression::NullIf(_) => Some("NULLIF"),
            Expression::Round(_) => Some("ROUND"),
            Expression::Cot(_) => Some("COT"),
            Expression::Column(_) | Expression::Literal(_) | Expression::Raw(_) => None,
        }
    }

    /// Class name used in diagnostics
    pub fn class_name(&self) -> String {
        match self {
            Expression::Extract(extract) => extract.class_name(),
            Expression::Func(Func {
                class: Some(class), ..
            }) => format!("{:?}", class),
            other => other.kind().as_str().to_string(),
        }
    }
}
