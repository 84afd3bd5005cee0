use std::{collections::BTreeMap, sync::Arc, thread};

use tenpen::{
    Engine, EngineConfig, EvalError, Expr, NativeFunction, eval, eval_result, parse_document,
};

fn number_arg(args: &[Expr]) -> Result<f64, EvalError> {
    args.first()
        .and_then(Expr::as_number)
        .ok_or_else(|| EvalError::InvalidType("expected a number".into()))
}

fn engine_with_host_functions() -> Engine {
    let mut engine = Engine::new();
    engine
        .add_function("double", |_, args| Ok(Expr::Number(number_arg(&args)? * 2.0)))
        .add_module(
            "geo",
            [
                NativeFunction::new("square", |_, args| {
                    let side = number_arg(&args)?;
                    Ok(Expr::Number(side * side))
                }),
                NativeFunction::new("name", |_, _| Ok(Expr::from("geo"))),
            ],
        );
    engine
}

#[test]
fn test_host_function() {
    let rule = engine_with_host_functions()
        .compile(r##"{"twice": ["$double", "#n"]}"##)
        .unwrap();
    assert_eq!(rule.eval(r#"{"n": 21}"#).unwrap(), r#"{"twice":42}"#);
}

#[test]
fn test_host_module() {
    let rule = engine_with_host_functions()
        .compile(r#"{"area": ["$geo.square", 3], "who": ["$geo.name", null]}"#)
        .unwrap();
    assert_eq!(rule.eval("").unwrap(), r#"{"area":9,"who":"geo"}"#);
}

#[test]
fn test_module_registration_merges() {
    let mut engine = engine_with_host_functions();
    engine.add_module(
        "geo",
        [NativeFunction::new("pi", |_, _| Ok(Expr::Number(3.0)))],
    );
    let rule = engine
        .compile(r#"[["$geo.pi", null], ["$geo.square", 2]]"#)
        .unwrap();
    assert_eq!(rule.eval("").unwrap(), "[3,4]");
}

#[test]
fn test_module_replaces_function_of_same_name() {
    let mut engine = Engine::new();
    engine
        .add_function("util", |_, _| Ok(Expr::Null))
        .add_module("util", [NativeFunction::new("one", |_, _| Ok(Expr::Number(1.0)))]);
    let rule = engine.compile(r#"["$util.one", null]"#).unwrap();
    assert_eq!(rule.eval("").unwrap(), "1");
}

#[test]
fn test_host_function_shadows_builtin() {
    let mut engine = Engine::new();
    engine.add_function("+", |_, _| Ok(Expr::from("host")));
    let rule = engine.compile(r#"["$+", 1, 2]"#).unwrap();
    assert_eq!(rule.eval("").unwrap(), r#""host""#);
}

#[test]
fn test_host_function_calls_back_into_document() {
    let mut engine = Engine::new();
    engine.add_function("twice", |evaluator, args| {
        let mut args = args.into_iter();
        let f = args.next().unwrap_or(Expr::Null);
        let v = args.next().unwrap_or(Expr::Null);
        let once = evaluator.call(&f, vec![v])?;
        evaluator.call(&f, vec![once])
    });
    let rule = engine
        .compile(r##"["$twice", ["$def", ["x"], ["$+", "#x", 1]], 5]"##)
        .unwrap();
    assert_eq!(rule.eval("").unwrap(), "7");
}

#[test]
fn test_host_function_error_propagates() {
    let rule = engine_with_host_functions()
        .compile(r#"{"a": ["$double", "x"]}"#)
        .unwrap();
    assert!(matches!(rule.eval(""), Err(EvalError::InvalidType(_))));
}

#[test]
fn test_compile_rejects_invalid_rule() {
    assert!(matches!(
        Engine::new().compile(r#"["$def", 1]"#),
        Err(EvalError::InvalidDocument(_))
    ));
}

#[test]
fn test_invalid_facts() {
    let rule = Engine::new().compile("1").unwrap();
    assert!(matches!(rule.eval("{"), Err(EvalError::InvalidDocument(_))));
}

#[test]
fn test_rule_is_reusable() {
    let rule = Engine::new().compile(r##"["$*", "#n", "#n"]"##).unwrap();
    assert_eq!(rule.eval(r#"{"n": 3}"#).unwrap(), "9");
    assert_eq!(rule.eval(r#"{"n": 4}"#).unwrap(), "16");
}

#[test]
fn test_rule_keeps_functions_at_compile_time() {
    let mut engine = Engine::new();
    let rule = engine.compile(r#"["$late", 1]"#).unwrap();
    engine.add_function("late", |_, _| Ok(Expr::Null));
    assert!(matches!(rule.eval(""), Err(EvalError::NoReference(_))));
}

#[test]
fn test_eval_value() {
    let rule = Engine::new().compile(r##"{"v": "#a"}"##).unwrap();
    let facts = parse_document(r#"{"a": [1]}"#).unwrap();
    assert_eq!(
        rule.eval_value(vec![facts]).unwrap(),
        Expr::object([("v", Expr::Array(vec![Expr::Number(1.0)]))])
    );
}

#[test]
fn test_concurrent_evaluation() {
    let rule = Arc::new(
        Engine::new()
            .compile(r##"{"sum": ["$+", "#a", "#b"]}"##)
            .unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || rule.eval(&format!(r#"{{"a": {}, "b": 1}}"#, i)))
        })
        .collect();
    let results: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(
        results,
        vec![
            r#"{"sum":1}"#,
            r#"{"sum":2}"#,
            r#"{"sum":3}"#,
            r#"{"sum":4}"#
        ]
    );
}

#[test]
fn test_depth_limit_from_config() {
    let engine = Engine::with_config(EngineConfig { max_depth: 2 });
    let rule = engine
        .compile(
            r##"{"a": ["$def", ["x"], ["$b", "#x"]], "b": ["$def", ["x"], ["$c", "#x"]], "c": ["$def", ["x"], "#x"], "r": ["$a", 1]}"##,
        )
        .unwrap();
    assert_eq!(rule.eval(""), Err(EvalError::DepthExceeded(2)));
}

#[test]
fn test_default_config() {
    assert_eq!(Engine::new().config().max_depth, 64);
}

#[test]
fn test_engine_evaluator() {
    let engine = engine_with_host_functions();
    let mut evaluator = engine.evaluator(vec![parse_document(r#"{"n": 5}"#).unwrap()]);
    let rule = parse_document(r##"["$double", "#n"]"##).unwrap();
    assert_eq!(evaluator.evaluate(&rule).unwrap(), Expr::Number(10.0));
}

// ========================================
// One-shot helpers
// ========================================

#[test]
fn test_eval_helper() {
    assert_eq!(eval(r##"["$+", "#a", "#b"]"##, &[r#"{"a": 1, "b": 2}"#]).unwrap(), "3");
}

#[test]
fn test_eval_result_deserialize() {
    let outcome = eval_result(
        r##"{"total": ["$+", "#a", "#b"], "label": "sum"}"##,
        &[r#"{"a": 1, "b": 2}"#],
    );
    let decoded: BTreeMap<String, serde_json::Value> = outcome.deserialize().unwrap();
    assert_eq!(decoded["total"], serde_json::json!(3));
    assert_eq!(decoded["label"], serde_json::json!("sum"));
}

#[test]
fn test_eval_result_deserialize_wrong_shape() {
    let outcome = eval_result(r#""text""#, &[]);
    assert!(matches!(
        outcome.deserialize::<f64>(),
        Err(EvalError::InvalidType(_))
    ));
}

#[test]
fn test_eval_result_keeps_error() {
    let outcome = eval_result(r##"{"x": "#y", "y": "#x"}"##, &[]);
    assert!(matches!(
        outcome.output,
        Err(EvalError::CircularReference { .. })
    ));
    assert!(matches!(
        outcome.deserialize::<serde_json::Value>(),
        Err(EvalError::CircularReference { .. })
    ));
}

#[test]
fn test_eval_with_several_fact_documents() {
    let output = eval(
        r##"{"x": "#a", "y": "#b"}"##,
        &[r#"{"a": 1, "b": 1}"#, "", r#"{"b": 2}"#],
    )
    .unwrap();
    assert_eq!(output, r#"{"x":1,"y":2}"#);
}

#[test]
fn test_rule_eval_all() {
    let rule = Engine::new().compile(r##"["$+", "#base", "#extra"]"##).unwrap();
    assert_eq!(rule.eval_all(&[r#"{"base": 1}"#, r#"{"extra": 2}"#]).unwrap(), "3");
    assert!(matches!(
        rule.eval_all(&[r#"{"base": 1}"#, "{"]),
        Err(EvalError::InvalidDocument(_))
    ));
}
