use std::{fmt, sync::Arc};

use crate::{ast::Expr, error::Result, evaluator::Evaluator, path::Path};

/// Call of the function at `function` with unevaluated arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Where the callee lives in the function scope stack
    pub function: Path,

    /// Argument expressions, evaluated in the caller's scope
    pub args: Vec<Expr>,
}

/// Function defined inside a document with `["$def", [params...], body]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// Parameter names, bound in a fresh value frame on every call
    pub params: Vec<String>,

    /// Function body (pre-parsed expression)
    pub body: Box<Expr>,
}

/// Signature of host functions: the running evaluator and the evaluated
/// arguments.
pub type NativeFn = dyn Fn(&mut Evaluator, Vec<Expr>) -> Result<Expr> + Send + Sync;

/// A host function stored in a function frame.
///
/// Two handles are equal when they share the same closure.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&mut Evaluator, Vec<Expr>) -> Result<Expr> + Send + Sync + 'static,
    {
        NativeFunction {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, evaluator: &mut Evaluator, args: Vec<Expr>) -> Result<Expr> {
        (self.func)(evaluator, args)
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}>", self.name)
    }
}
