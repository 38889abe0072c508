//! Translation rules, one per node shape.
//!
//! Each translator receives the node it was registered for and the compiler,
//! which it uses to compile child expressions before wrapping them.

use crate::compiler::MqlCompiler;
use crate::expression::{CompileError, CompileResult, Expression};
use bson::{doc, Bson};
use log::{debug, trace};

/// Integer leaf the way the engine's drivers encode them: 32-bit when it fits
fn int(value: u32) -> Bson {
    i32::try_from(value)
        .map(Bson::Int32)
        .unwrap_or_else(|_| Bson::Int64(i64::from(value)))
}

fn operator_key(operator: &str) -> String {
    format!("${}", operator)
}

/// Error for a node handed to a translator registered for another kind
fn mismatched(node: &Expression) -> CompileError {
    CompileError::unsupported(node.class_name())
}

/// Column reference: `"$name"`, prefixed with the alias for joined collections.
pub fn col(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Column(column) = node else {
        return Err(mismatched(node));
    };
    let path = match column.table.as_deref() {
        Some(table) if compiler.context().collection.as_deref() != Some(table) => {
            format!("${}.{}", table, column.name)
        }
        _ => format!("${}", column.name),
    };
    Ok(Bson::String(path))
}

/// Literal: the scalar itself.
pub fn value(node: &Expression, _compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    match node {
        Expression::Literal(value) => Ok(value.to_bson()),
        other => Err(mismatched(other)),
    }
}

/// Already-compiled operator tree, passed through.
pub fn raw(node: &Expression, _compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    match node {
        Expression::Raw(compiled) => Ok(compiled.clone()),
        other => Err(mismatched(other)),
    }
}

/// Generic call: `{"$op": [args...]}`.
///
/// Functions without a mapping use their own lower-cased name as the operator.
/// An unknown name is left for the engine to reject.
pub fn func(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let args = compiler.compile_all(&node.source_expressions())?;
    let mapped = node
        .function_class()
        .and_then(|class| compiler.operators().lookup(class));
    let operator = match mapped {
        Some(operator) => operator.to_string(),
        None => {
            let name = node
                .function_name()
                .unwrap_or_else(|| node.kind().as_str())
                .to_lowercase();
            trace!("No operator mapping for {}, using ${}", node.class_name(), name);
            name
        }
    };
    Ok(Bson::Document(doc! { operator_key(&operator): Bson::Array(args) }))
}

/// CAST: substring, then convert, then truncate decimals.
pub fn cast(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Cast(cast) = node else {
        return Err(mismatched(node));
    };
    let field = &cast.output_field;
    let mut mql = compiler.compile(&cast.expression)?;
    // A zero length or precision means unset.
    if let Some(max_length) = field.max_length.filter(|&n| n > 0) {
        mql = Bson::Document(doc! { "$substrCP": [mql, 0, int(max_length)] });
    }
    let output_type = compiler.context().data_types.engine_type(field.field_type);
    mql = Bson::Document(doc! { "$convert": { "input": mql, "to": output_type } });
    if let Some(decimal_places) = field.decimal_places.filter(|&n| n > 0) {
        mql = Bson::Document(doc! { "$trunc": [mql, int(decimal_places)] });
    }
    Ok(mql)
}

/// COT(x) as `1 / tan(x)`.
pub fn cot(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Cot(expr) = node else {
        return Err(mismatched(node));
    };
    let mql = compiler.compile(expr)?;
    Ok(Bson::Document(doc! { "$divide": [1, { "$tan": mql }] }))
}

/// Date-part extraction. Unmapped date parts are rejected.
pub fn extract(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Extract(extract) = node else {
        return Err(mismatched(node));
    };
    let mut mql = compiler.compile(&extract.expression)?;
    let Some(operator) = compiler.operators().lookup_extract(&extract.lookup_name) else {
        let mut known: Vec<&str> = compiler.operators().extract_keys().collect();
        known.sort_unstable();
        debug!(
            "No operator for date part '{}', known parts: {}",
            extract.lookup_name,
            known.join(", ")
        );
        return Err(CompileError::unsupported(extract.class_name()));
    };
    if let Some(timezone) = extract.tzname(compiler.context()) {
        mql = Bson::Document(doc! { "date": mql, "timezone": timezone });
    }
    Ok(Bson::Document(doc! { operator_key(operator): mql }))
}

/// LOG(base, number) becomes `{"$log": [number, base]}`.
pub fn log(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Log(args) = node else {
        return Err(mismatched(node));
    };
    let reordered = Expression::Log(args.swapped());
    func(&reordered, compiler)
}

/// NULLIF(a, b): null when `a == b`, else `a`.
pub fn null_if(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::NullIf(args) = node else {
        return Err(mismatched(node));
    };
    let expr1 = compiler.compile(&args.lhs)?;
    let expr2 = compiler.compile(&args.rhs)?;
    Ok(Bson::Document(doc! {
        "$cond": {
            "if": { "$eq": [expr1.clone(), expr2] },
            "then": Bson::Null,
            "else": expr1,
        }
    }))
}

/// ROUND(value, precision), argument order kept.
pub fn round(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Round(args) = node else {
        return Err(mismatched(node));
    };
    let value = compiler.compile(&args.lhs)?;
    let precision = compiler.compile(&args.rhs)?;
    Ok(Bson::Document(doc! { "$round": [value, precision] }))
}

/// Date truncation. Weeks always start on Monday.
pub fn trunc(node: &Expression, compiler: &MqlCompiler<'_>) -> CompileResult<Bson> {
    let Expression::Trunc(trunc) = node else {
        return Err(mismatched(node));
    };
    let mql = compiler.compile(&trunc.expression)?;
    let mut date_trunc = doc! {
        "date": mql,
        "unit": trunc.kind.as_str(),
        "startOfWeek": "mon",
    };
    if let Some(timezone) = trunc.tzname(compiler.context()) {
        date_trunc.insert("timezone", timezone);
    }
    Ok(Bson::Document(doc! { "$dateTrunc": date_trunc }))
}
