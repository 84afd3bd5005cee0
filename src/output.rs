//! Expression tree -> JSON.
//!
//! The structural inverse of [`crate::parser`]. Output is deterministic (object
//! keys are sorted) and numbers with an integral value are written without a
//! fractional part, so encoding a decoded document gives back the same text.
//!
//! # Examples
//!
//! ```
//! use tenpen::Expr;
//! use tenpen::output::{to_json, to_json_pretty};
//!
//! let value = Expr::object([("b", Expr::Number(2.0)), ("a", Expr::from("#x"))]);
//!
//! assert_eq!(to_json(&value).unwrap(), r###"{"a":"##x","b":2}"###);
//! assert_eq!(
//!     to_json_pretty(&value).unwrap(),
//!     "{\n  \"a\": \"##x\",\n  \"b\": 2\n}"
//! );
//! ```

use crate::{
    ast::Expr,
    error::{DocumentError, Result},
    parser::{DEF_KEYWORD, FUNCTION_PREFIX, VALUE_PREFIX},
};

/// Largest magnitude below which every integral f64 is an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Converts an expression to a `serde_json::Value`.
///
/// Native functions have no JSON form and are rejected.
pub fn to_json_value(expr: &Expr) -> Result<serde_json::Value> {
    Ok(match expr {
        Expr::Null => serde_json::Value::Null,
        Expr::Bool(b) => serde_json::Value::Bool(*b),
        Expr::Number(n) => number(*n),
        Expr::String(s) => serde_json::Value::String(escape_literal(s)),
        Expr::Array(items) => serde_json::Value::Array(
            items.iter().map(to_json_value).collect::<Result<Vec<_>>>()?,
        ),
        Expr::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), to_json_value(v)?)))
                .collect::<Result<serde_json::Map<_, _>>>()?,
        ),
        Expr::ValueRef(path) => serde_json::Value::String(format!("{}{}", VALUE_PREFIX, path)),
        Expr::FunctionRef(path) => {
            serde_json::Value::String(format!("{}{}", FUNCTION_PREFIX, path))
        }
        Expr::FunctionCall(call) => {
            let mut items = Vec::with_capacity(call.args.len() + 1);
            items.push(serde_json::Value::String(format!(
                "{}{}",
                FUNCTION_PREFIX, call.function
            )));
            for arg in &call.args {
                items.push(to_json_value(arg)?);
            }
            serde_json::Value::Array(items)
        }
        Expr::FunctionDefinition(def) => serde_json::Value::Array(vec![
            serde_json::Value::String(format!("{}{}", FUNCTION_PREFIX, DEF_KEYWORD)),
            serde_json::Value::Array(
                def.params
                    .iter()
                    .map(|param| serde_json::Value::String(escape_literal(param)))
                    .collect(),
            ),
            to_json_value(&def.body)?,
        ]),
        Expr::NativeFunction(native) => {
            return Err(DocumentError::NativeFunction(native.name().to_string()).into());
        }
    })
}

/// Converts an expression to compact JSON text.
pub fn to_json(expr: &Expr) -> Result<String> {
    let value = to_json_value(expr)?;
    serde_json::to_string(&value).map_err(|e| DocumentError::Json(e.to_string()).into())
}

/// Converts an expression to JSON text with 2-space indentation.
pub fn to_json_pretty(expr: &Expr) -> Result<String> {
    let value = to_json_value(expr)?;
    serde_json::to_string_pretty(&value).map_err(|e| DocumentError::Json(e.to_string()).into())
}

fn number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Doubles a leading `#` or `$` so the string reads back as a literal.
fn escape_literal(s: &str) -> String {
    match s.chars().next() {
        Some(c) if c == VALUE_PREFIX || c == FUNCTION_PREFIX => format!("{}{}", c, s),
        _ => s.to_string(),
    }
}
