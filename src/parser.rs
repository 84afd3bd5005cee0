//! JSON text -> expression tree.
//!
//! The document is first read with `serde_json`, then every node is
//! classified: prefixed strings become references, arrays led by a function
//! reference become calls or definitions.

use std::collections::BTreeMap;

use crate::{
    ast::{Expr, FunctionCall, FunctionDefinition},
    error::{DocumentError, Result},
    path::{Path, Step},
};

pub const VALUE_PREFIX: char = '#';
pub const FUNCTION_PREFIX: char = '$';
pub const DEF_KEYWORD: &str = "def";

/// Parses a JSON document into an expression tree.
///
/// ```
/// use tenpen::{parse_document, Expr};
///
/// let expr = parse_document(r###"["$+", "#a", "##a"]"###).unwrap();
/// match expr {
///     Expr::FunctionCall(call) => {
///         assert_eq!(call.function.to_string(), "+");
///         assert_eq!(call.args[1], Expr::String("#a".into()));
///     }
///     other => panic!("expected a call, got {:?}", other),
/// }
/// ```
pub fn parse_document(text: &str) -> Result<Expr> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DocumentError::Json(e.to_string()))?;
    from_json(value)
}

/// Classifies an already parsed JSON value.
pub fn from_json(value: serde_json::Value) -> Result<Expr> {
    match value {
        serde_json::Value::Null => Ok(Expr::Null),
        serde_json::Value::Bool(b) => Ok(Expr::Bool(b)),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Expr::Number)
            .ok_or_else(|| DocumentError::Json(format!("number {} is out of range", n)).into()),
        serde_json::Value::String(s) => parse_string(s),
        serde_json::Value::Array(items) => {
            let items = items.into_iter().map(from_json).collect::<Result<Vec<_>>>()?;
            parse_array(items)
        }
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| Ok((key, from_json(value)?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Expr::Object),
    }
}

fn parse_string(s: String) -> Result<Expr> {
    if let Some(rest) = s.strip_prefix(VALUE_PREFIX) {
        if rest.starts_with(VALUE_PREFIX) {
            return Ok(Expr::String(rest.to_string()));
        }
        return Ok(Expr::ValueRef(Path::parse(rest)?));
    }
    if let Some(rest) = s.strip_prefix(FUNCTION_PREFIX) {
        if rest.starts_with(FUNCTION_PREFIX) {
            return Ok(Expr::String(rest.to_string()));
        }
        return Ok(Expr::FunctionRef(Path::parse(rest)?));
    }
    Ok(Expr::String(s))
}

fn is_def_marker(path: &Path) -> bool {
    matches!(path.steps(), [Step::Key(key)] if key == DEF_KEYWORD)
}

fn parse_array(items: Vec<Expr>) -> Result<Expr> {
    let is_def = match items.first() {
        Some(Expr::FunctionRef(path)) => is_def_marker(path),
        _ => return Ok(Expr::Array(items)),
    };
    if is_def {
        parse_definition(items)
    } else {
        parse_call(items)
    }
}

/// `[$name, arg, ...]`
fn parse_call(items: Vec<Expr>) -> Result<Expr> {
    if items.len() < 2 {
        return Err(DocumentError::InvalidFunctionCall(
            "a call needs at least one argument".to_string(),
        )
        .into());
    }
    let mut items = items.into_iter();
    let function = match items.next() {
        Some(Expr::FunctionRef(path)) => path,
        _ => {
            return Err(DocumentError::InvalidFunctionCall(
                "a call must start with a function reference".to_string(),
            )
            .into());
        }
    };
    Ok(Expr::FunctionCall(FunctionCall {
        function,
        args: items.collect(),
    }))
}

/// `["$def", [param, ...], body]`
fn parse_definition(items: Vec<Expr>) -> Result<Expr> {
    let [_, params, body]: [Expr; 3] = items.try_into().map_err(|items: Vec<Expr>| {
        DocumentError::InvalidFunctionDefinition(format!(
            "expected marker, parameters and body, got {} elements",
            items.len()
        ))
    })?;

    let params = match params {
        Expr::Array(params) => params
            .into_iter()
            .map(|param| match param {
                Expr::String(name) => Ok(name),
                other => Err(DocumentError::InvalidFunctionDefinition(format!(
                    "parameter names must be strings, got {}",
                    other.type_name()
                ))),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?,
        other => {
            return Err(DocumentError::InvalidFunctionDefinition(format!(
                "parameters must be an array, got {}",
                other.type_name()
            ))
            .into());
        }
    };

    Ok(Expr::FunctionDefinition(FunctionDefinition {
        params,
        body: Box::new(body),
    }))
}
