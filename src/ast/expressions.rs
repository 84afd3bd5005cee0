use std::collections::BTreeMap;

use crate::{
    ast::{FunctionCall, FunctionDefinition, NativeFunction},
    path::Path,
};

/// A node of a rule document, and at the same time a value it reduces to.
///
/// Evaluation turns every reference, call and definition into plain data, so a
/// fully evaluated tree only holds the JSON variants (plus functions that
/// escaped into a result).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Scalars
    /// JSON null
    Null,

    /// JSON boolean
    Bool(bool),

    /// JSON number
    Number(f64),

    /// Literal string
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// "##not a reference"   // decodes to "#not a reference"
    /// ```
    String(String),

    // Containers
    /// Array of expressions
    Array(Vec<Expr>),

    /// Object with string keys, kept sorted by key
    Object(BTreeMap<String, Expr>),

    // References
    /// Value reference (`#path`)
    ///
    /// # Examples
    /// ```text
    /// "#price"
    /// "#order.items.0"
    /// ```
    ValueRef(Path),

    /// Function reference (`$path`)
    ///
    /// # Examples
    /// ```text
    /// "$+"
    /// "$str.upper"
    /// ```
    FunctionRef(Path),

    // Functions
    /// Function call, an array led by a function reference
    ///
    /// # Example
    /// ```text
    /// ["$+", "#a", 1]
    /// ```
    FunctionCall(FunctionCall),

    /// Function defined in the document
    ///
    /// # Example
    /// ```text
    /// ["$def", ["x"], ["$*", "#x", 2]]
    /// ```
    FunctionDefinition(FunctionDefinition),

    /// Host supplied function
    NativeFunction(NativeFunction),
}

impl Expr {
    /// Human readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Null => "null",
            Expr::Bool(_) => "boolean",
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::Array(_) => "array",
            Expr::Object(_) => "object",
            Expr::ValueRef(_) => "value reference",
            Expr::FunctionRef(_) => "function reference",
            Expr::FunctionCall(_) => "function call",
            Expr::FunctionDefinition(_) => "function",
            Expr::NativeFunction(_) => "native function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Expr::Null)
    }

    /// True for values that can be called.
    pub fn is_function(&self) -> bool {
        matches!(self, Expr::FunctionDefinition(_) | Expr::NativeFunction(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is truthy (for conditions)
    pub fn is_truthy(&self) -> bool {
        match self {
            Expr::Null => false,
            Expr::Bool(b) => *b,
            Expr::Number(n) => *n != 0.0,
            Expr::String(s) => !s.is_empty(),
            Expr::Array(items) => !items.is_empty(),
            Expr::Object(map) => !map.is_empty(),
            _ => true,
        }
    }

    /// Builds an object from key/value pairs.
    pub fn object<K, I>(pairs: I) -> Expr
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expr)>,
    {
        Expr::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Number(n)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Bool(b)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::String(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::String(s)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }
}

impl From<NativeFunction> for Expr {
    fn from(f: NativeFunction) -> Self {
        Expr::NativeFunction(f)
    }
}
