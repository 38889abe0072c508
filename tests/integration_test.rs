use bson::{bson, Bson};
use mqlfunc::expression::{FieldType, NodeKind, OutputField};
use mqlfunc::{
    register_functions, CompileError, CompilerContext, Expression, MqlCompiler, Settings,
};
use std::io::Write;

fn compile(expr: &Expression, context: &CompilerContext) -> Result<Bson, CompileError> {
    MqlCompiler::new(register_functions(), context).compile(expr)
}

fn sample(kind: NodeKind) -> Expression {
    let date = || Expression::column("created");
    match kind {
        NodeKind::Func => Expression::func("SQRT", vec![Expression::column("area")]),
        NodeKind::Cast => Expression::cast(Expression::column("price"), OutputField::decimal(2)),
        NodeKind::Extract => Expression::extract(date(), "iso_week_day"),
        NodeKind::Trunc => Expression::trunc(date(), "week"),
        NodeKind::Log => Expression::log(Expression::literal(10), Expression::column("n")),
        NodeKind::NullIf => Expression::null_if(Expression::column("a"), Expression::literal("")),
        NodeKind::Round => Expression::round(Expression::column("x"), Expression::literal(1)),
        NodeKind::Cot => Expression::cot(Expression::column("angle")),
        NodeKind::Column => Expression::qualified_column("other", "id"),
        NodeKind::Literal => Expression::literal(true),
        NodeKind::Raw => Expression::raw(bson!({ "$literal": "$not_a_path" })),
    }
}

#[test]
fn test_every_kind_compiles() {
    let contexts = [
        CompilerContext::default(),
        CompilerContext::new()
            .with_time_zone("UTC")
            .with_collection("orders"),
    ];
    for context in &contexts {
        for kind in NodeKind::ALL {
            let expr = sample(kind);
            assert_eq!(expr.kind(), kind);
            assert!(
                compile(&expr, context).is_ok(),
                "{} failed to compile",
                kind.as_str()
            );
        }
    }
}

#[test]
fn test_log_matches_reordered_generic_call() {
    let ctx = CompilerContext::default();
    let log = Expression::log(Expression::literal(2), Expression::literal(8));
    let generic = Expression::func("LOG", vec![Expression::literal(8), Expression::literal(2)]);

    let compiled = compile(&log, &ctx).unwrap();
    assert_eq!(compiled, bson!({ "$log": [8, 2] }));
    assert_ne!(compiled, bson!({ "$log": [2, 8] }));
    assert_eq!(compiled, compile(&generic, &ctx).unwrap());

    // Compiling twice gives the same result; the node was not reordered in place.
    assert_eq!(compile(&log, &ctx).unwrap(), compiled);
}

#[test]
fn test_generic_fallback_is_permissive() {
    let ctx = CompilerContext::default();
    let expr = Expression::func("MyFunc", vec![Expression::column("a"), Expression::literal(3)]);
    assert_eq!(
        compile(&expr, &ctx).unwrap(),
        bson!({ "$myfunc": ["$a", 3] })
    );
}

#[test]
fn test_greatest_least_coalesce() {
    let ctx = CompilerContext::default();
    let args = || vec![Expression::column("a"), Expression::column("b")];
    assert_eq!(
        compile(&Expression::greatest(args()), &ctx).unwrap(),
        bson!({ "$max": ["$a", "$b"] })
    );
    assert_eq!(
        compile(&Expression::least(args()), &ctx).unwrap(),
        bson!({ "$min": ["$a", "$b"] })
    );
    assert_eq!(
        compile(&Expression::coalesce(args()), &ctx).unwrap(),
        bson!({ "$ifNull": ["$a", "$b"] })
    );
}

#[test]
fn test_compile_json_tree() {
    let json = r#"{
        "null_if": {
            "lhs": {
                "cast": {
                    "expression": {"column": {"name": "code"}},
                    "output_field": {"field_type": "CharField", "max_length": 3}
                }
            },
            "rhs": {"literal": "N/A"}
        }
    }"#;
    let expr: Expression = serde_json::from_str(json).unwrap();
    let code = bson!({
        "$convert": { "input": { "$substrCP": ["$code", 0, 3] }, "to": "string" }
    });
    assert_eq!(
        compile(&expr, &CompilerContext::default()).unwrap(),
        bson!({
            "$cond": {
                "if": { "$eq": [code.clone(), "N/A"] },
                "then": null,
                "else": code,
            }
        })
    );
}

#[test]
fn test_settings_file_drives_compilation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "use_tz": true,
            "time_zone": "America/New_York",
            "collection": "events",
            "data_types": {{"FloatField": "decimal"}}
        }}"#
    )
    .unwrap();
    let ctx = Settings::load(file.path()).unwrap().into_context();

    let expr = Expression::trunc(Expression::qualified_column("events", "at"), "day");
    assert_eq!(
        compile(&expr, &ctx).unwrap(),
        bson!({
            "$dateTrunc": {
                "date": "$at",
                "unit": "day",
                "startOfWeek": "mon",
                "timezone": "America/New_York",
            }
        })
    );

    let expr = Expression::cast(Expression::column("ratio"), FieldType::FloatField);
    assert_eq!(
        compile(&expr, &ctx).unwrap(),
        bson!({ "$convert": { "input": "$ratio", "to": "decimal" } })
    );
}

#[test]
fn test_unsupported_extract_reports_class() {
    let ctx = CompilerContext::default();
    let expr = Expression::extract(Expression::column("created"), "microsecond");
    let err = compile(&expr, &ctx).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedOperation {
            node: "ExtractMicrosecond".to_string()
        }
    );
    assert_eq!(err.to_string(), "ExtractMicrosecond is not supported.");
}
