//! The built-in function library, the outermost function frame of every
//! evaluation.
//!
//! # Functions
//!
//! ```text
//! $+ $- $* $/                arithmetic over numbers
//! $== $!= $< $> $<= $>=      comparison
//! $and $or $not $if          logic (truthiness)
//! $str.concat $str.upper $str.lower $str.len $str.matches
//! $list.len $list.map $list.filter
//! ```

use std::{cmp::Ordering, collections::BTreeMap, sync::LazyLock};

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{
    ast::{Expr, NativeFunction},
    error::{EvalError, Result},
    evaluator::{Evaluator, Frame},
};

type Builtin = fn(&mut Evaluator, Vec<Expr>) -> Result<Expr>;

static LIBRARY: LazyLock<Frame> = LazyLock::new(|| Frame::new(build()));

/// The shared built-in frame.
pub fn library() -> Frame {
    LIBRARY.clone()
}

fn build() -> Expr {
    let mut table = BTreeMap::new();
    register(&mut table, "+", add);
    register(&mut table, "-", sub);
    register(&mut table, "*", mul);
    register(&mut table, "/", div);
    register(&mut table, "==", eq);
    register(&mut table, "!=", ne);
    register(&mut table, "<", lt);
    register(&mut table, ">", gt);
    register(&mut table, "<=", le);
    register(&mut table, ">=", ge);
    register(&mut table, "and", and);
    register(&mut table, "or", or);
    register(&mut table, "not", not);
    register(&mut table, "if", if_);

    let mut strings = BTreeMap::new();
    register(&mut strings, "concat", str_concat);
    register(&mut strings, "upper", str_upper);
    register(&mut strings, "lower", str_lower);
    register(&mut strings, "len", str_len);
    register(&mut strings, "matches", str_matches);
    table.insert("str".to_string(), Expr::Object(strings));

    let mut lists = BTreeMap::new();
    register(&mut lists, "len", list_len);
    register(&mut lists, "map", list_map);
    register(&mut lists, "filter", list_filter);
    table.insert("list".to_string(), Expr::Object(lists));

    Expr::Object(table)
}

fn register(table: &mut BTreeMap<String, Expr>, name: &str, f: Builtin) {
    table.insert(name.to_string(), Expr::NativeFunction(NativeFunction::new(name, f)));
}

fn numbers(name: &str, args: &[Expr]) -> Result<Vec<f64>> {
    args.iter()
        .map(|arg| {
            arg.as_number().ok_or_else(|| {
                EvalError::InvalidType(format!(
                    "`{}` expects numbers, got {}",
                    name,
                    arg.type_name()
                ))
            })
        })
        .collect()
}

/// Exact decimal form of `n`, if converting back gives the same f64.
fn exact(n: f64) -> Option<Decimal> {
    Decimal::from_f64(n).filter(|d| d.to_f64() == Some(n))
}

/// Combines two numbers with decimal arithmetic when both are exactly
/// representable, falling back to f64.
fn combine(
    a: f64,
    b: f64,
    decimal: fn(Decimal, Decimal) -> Option<Decimal>,
    float: fn(f64, f64) -> f64,
) -> f64 {
    if let Some(x) = exact(a)
        && let Some(y) = exact(b)
        && let Some(r) = decimal(x, y).and_then(|r| r.to_f64())
    {
        return r;
    }
    float(a, b)
}

// ========================================
// Arithmetic
// ========================================

/// $+ - sum of all arguments
fn add(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let sum = numbers("+", &args)?
        .into_iter()
        .fold(0.0, |acc, n| combine(acc, n, Decimal::checked_add, |a, b| a + b));
    Ok(Expr::Number(sum))
}

/// $- - first argument minus the rest
fn sub(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let values = numbers("-", &args)?;
    let Some((first, rest)) = values.split_first() else {
        return Ok(Expr::Number(0.0));
    };
    let diff = rest
        .iter()
        .fold(*first, |acc, n| combine(acc, *n, Decimal::checked_sub, |a, b| a - b));
    Ok(Expr::Number(diff))
}

/// $* - product of all arguments
fn mul(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let product = numbers("*", &args)?
        .into_iter()
        .fold(1.0, |acc, n| combine(acc, n, Decimal::checked_mul, |a, b| a * b));
    Ok(Expr::Number(product))
}

/// $/ - first argument divided by the rest
fn div(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let values = numbers("/", &args)?;
    let Some((first, rest)) = values.split_first() else {
        return Ok(Expr::Number(1.0));
    };
    let mut quotient = *first;
    for n in rest {
        if *n == 0.0 {
            return Err(EvalError::InvalidType("division by zero".to_string()));
        }
        quotient = combine(quotient, *n, Decimal::checked_div, |a, b| a / b);
    }
    Ok(Expr::Number(quotient))
}

// ========================================
// Comparison
// ========================================

fn pair(name: &str, args: Vec<Expr>) -> Result<(Expr, Expr)> {
    let [left, right]: [Expr; 2] = args.try_into().map_err(|args: Vec<Expr>| {
        EvalError::InvalidType(format!(
            "`{}` expects 2 arguments, got {}",
            name,
            args.len()
        ))
    })?;
    Ok((left, right))
}

fn compare(name: &str, args: Vec<Expr>) -> Result<Ordering> {
    let (left, right) = pair(name, args)?;
    match (&left, &right) {
        (Expr::Number(a), Expr::Number(b)) => a.partial_cmp(b).ok_or_else(|| {
            EvalError::InvalidType(format!("`{}` cannot order {} and {}", name, a, b))
        }),
        (Expr::String(a), Expr::String(b)) => Ok(a.cmp(b)),
        (a, b) => Err(EvalError::InvalidType(format!(
            "`{}` cannot compare {} and {}",
            name,
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn eq(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let (left, right) = pair("==", args)?;
    Ok(Expr::Bool(left == right))
}

fn ne(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let (left, right) = pair("!=", args)?;
    Ok(Expr::Bool(left != right))
}

fn lt(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(compare("<", args)? == Ordering::Less))
}

fn gt(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(compare(">", args)? == Ordering::Greater))
}

fn le(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(compare("<=", args)? != Ordering::Greater))
}

fn ge(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(compare(">=", args)? != Ordering::Less))
}

// ========================================
// Logic
// ========================================

fn and(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(args.iter().all(Expr::is_truthy)))
}

fn or(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(args.iter().any(Expr::is_truthy)))
}

fn not(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Bool(!args.first().is_some_and(Expr::is_truthy)))
}

/// $if - `[cond, then, else]`; arguments are already evaluated
fn if_(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let mut args = args.into_iter();
    let cond = args.next().unwrap_or(Expr::Null);
    let then = args.next().unwrap_or(Expr::Null);
    let otherwise = args.next().unwrap_or(Expr::Null);
    Ok(if cond.is_truthy() { then } else { otherwise })
}

// ========================================
// String Methods
// ========================================

fn string_arg<'a>(name: &str, args: &'a [Expr], index: usize) -> Result<&'a str> {
    match args.get(index) {
        Some(Expr::String(s)) => Ok(s),
        Some(other) => Err(EvalError::InvalidType(format!(
            "`{}` requires string, got {}",
            name,
            other.type_name()
        ))),
        None => Err(EvalError::InvalidType(format!(
            "`{}` requires argument {}",
            name,
            index + 1
        ))),
    }
}

/// $str.concat - joins strings and numbers
fn str_concat(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let mut result = String::new();
    for arg in &args {
        match arg {
            Expr::String(s) => result.push_str(s),
            Expr::Number(n) => result.push_str(&n.to_string()),
            other => {
                return Err(EvalError::InvalidType(format!(
                    "`str.concat` requires strings or numbers, got {}",
                    other.type_name()
                )));
            }
        }
    }
    Ok(Expr::String(result))
}

fn str_upper(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::String(string_arg("str.upper", &args, 0)?.to_uppercase()))
}

fn str_lower(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::String(string_arg("str.lower", &args, 0)?.to_lowercase()))
}

/// $str.len - length in characters
fn str_len(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let s = string_arg("str.len", &args, 0)?;
    Ok(Expr::Number(s.chars().count() as f64))
}

/// $str.matches - `[text, pattern]`, true if the regex matches
fn str_matches(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let text = string_arg("str.matches", &args, 0)?;
    let pattern = string_arg("str.matches", &args, 1)?;
    let re = regex::Regex::new(pattern)
        .map_err(|e| EvalError::InvalidType(format!("invalid regex: {e}")))?;
    Ok(Expr::Bool(re.is_match(text)))
}

// ========================================
// List Methods
// ========================================

fn list_arg<'a>(name: &str, args: &'a [Expr], index: usize) -> Result<&'a [Expr]> {
    match args.get(index) {
        Some(Expr::Array(items)) => Ok(items),
        Some(other) => Err(EvalError::InvalidType(format!(
            "`{}` requires array, got {}",
            name,
            other.type_name()
        ))),
        None => Err(EvalError::InvalidType(format!(
            "`{}` requires argument {}",
            name,
            index + 1
        ))),
    }
}

fn function_arg<'a>(name: &str, args: &'a [Expr]) -> Result<&'a Expr> {
    match args.first() {
        Some(f) if f.is_function() => Ok(f),
        Some(other) => Err(EvalError::InvalidType(format!(
            "`{}` requires a function, got {}",
            name,
            other.type_name()
        ))),
        None => Err(EvalError::InvalidType(format!("`{}` requires a function", name))),
    }
}

fn list_len(_: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    Ok(Expr::Number(list_arg("list.len", &args, 0)?.len() as f64))
}

/// $list.map - `[function, array]`
fn list_map(evaluator: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let f = function_arg("list.map", &args)?;
    let items = list_arg("list.map", &args, 1)?;
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        result.push(evaluator.call(f, vec![item.clone()])?);
    }
    Ok(Expr::Array(result))
}

/// $list.filter - `[function, array]`, keeps items the function finds truthy
fn list_filter(evaluator: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
    let f = function_arg("list.filter", &args)?;
    let items = list_arg("list.filter", &args, 1)?;
    let mut result = Vec::new();
    for item in items {
        if evaluator.call(f, vec![item.clone()])?.is_truthy() {
            result.push(item.clone());
        }
    }
    Ok(Expr::Array(result))
}
