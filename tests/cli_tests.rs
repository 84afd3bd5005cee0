use tenpen::EvalError;
use tenpen::cli::{
    CliError, DocCategory, EvalOptions, EvalOutcome, execute_eval, get_doc_category,
    get_docs_overview,
};

fn options(rule: &str, facts: Option<&str>) -> EvalOptions {
    EvalOptions {
        rule: rule.to_string(),
        facts: facts.map(str::to_string),
        ..Default::default()
    }
}

#[test]
fn test_eval_with_facts() {
    let result = execute_eval(&options(r##"{"sum": ["$+", "#a", 1]}"##, Some(r#"{"a": 2}"#)));
    assert_eq!(result.unwrap(), EvalOutcome::Success(r#"{"sum":3}"#.to_string()));
}

#[test]
fn test_eval_without_facts() {
    let result = execute_eval(&options(r#"["$*", 6, 7]"#, None));
    assert_eq!(result.unwrap(), EvalOutcome::Success("42".to_string()));
}

#[test]
fn test_eval_pretty() {
    let opts = EvalOptions {
        pretty: true,
        ..options(r#"{"a": [1]}"#, Some("{}"))
    };
    assert_eq!(
        execute_eval(&opts).unwrap(),
        EvalOutcome::Success("{\n  \"a\": [\n    1\n  ]\n}".to_string())
    );
}

#[test]
fn test_syntax_only_skips_evaluation() {
    let opts = EvalOptions {
        syntax_only: true,
        ..options(r##"{"x": "#y", "y": "#x"}"##, None)
    };
    assert_eq!(execute_eval(&opts).unwrap(), EvalOutcome::SyntaxValid);
}

#[test]
fn test_syntax_only_reports_invalid_rule() {
    let opts = EvalOptions {
        syntax_only: true,
        ..options(r#"["$def"]"#, None)
    };
    assert!(matches!(
        execute_eval(&opts),
        Err(CliError::Eval(EvalError::InvalidDocument(_)))
    ));
}

#[test]
fn test_empty_rule_is_no_input() {
    assert!(matches!(
        execute_eval(&options("  ", None)),
        Err(CliError::NoInput)
    ));
}

#[test]
fn test_evaluation_error() {
    let result = execute_eval(&options(r##"{"x": "#y", "y": "#x"}"##, None));
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Evaluation error: circular reference"));
}

#[test]
fn test_docs_overview_lists_categories() {
    let overview = get_docs_overview();
    for name in ["syntax", "references", "functions", "builtins", "errors"] {
        assert!(overview.contains(name), "overview misses {}", name);
        assert!(get_doc_category(name).is_ok());
    }
}

#[test]
fn test_doc_category_aliases() {
    assert_eq!(DocCategory::from_name("Refs"), Some(DocCategory::References));
    assert_eq!(DocCategory::from_name("library"), Some(DocCategory::Builtins));
    assert_eq!(DocCategory::from_name("nope"), None);
}

#[test]
fn test_unknown_doc_category() {
    assert!(matches!(
        get_doc_category("nope"),
        Err(CliError::UnknownCategory(name)) if name == "nope"
    ));
}

#[test]
fn test_docs_show_escaped_literals() {
    assert!(get_docs_overview().contains(r###""##text""###));
    let syntax = get_doc_category("syntax").unwrap();
    assert!(syntax.contains(r###""##tag"   =>  "#tag""###));
}

#[test]
fn test_builtins_doc_lists_falsy_values() {
    let builtins = get_doc_category("builtins").unwrap();
    assert!(builtins.contains(r#"null, false, 0, "", [] and {} are false"#));
}
