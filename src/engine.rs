//! Host embedding API: function registration, rule compilation and evaluation.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::{
    ast::{Expr, NativeFunction},
    builtins,
    error::{EvalError, Result},
    evaluator::{DEFAULT_MAX_DEPTH, Evaluator, Frame},
    output::to_json,
    parser::parse_document,
};

/// Evaluation settings shared by every rule of an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of document-defined function calls
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Holds host functions and compiles rules against them.
///
/// # Examples
///
/// ```
/// use tenpen::{Engine, EvalError, Expr};
///
/// let mut engine = Engine::new();
/// engine.add_function("double", |_, args| match args.first() {
///     Some(Expr::Number(n)) => Ok(Expr::Number(n * 2.0)),
///     _ => Err(EvalError::InvalidType("double expects a number".into())),
/// });
///
/// let rule = engine.compile(r##"{"twice": ["$double", "#n"]}"##).unwrap();
/// assert_eq!(rule.eval(r#"{"n": 21}"#).unwrap(), r#"{"twice":42}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    functions: BTreeMap<String, Expr>,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with only the built-in library.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            functions: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a host function callable as `$name`.
    pub fn add_function<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Evaluator, Vec<Expr>) -> Result<Expr> + Send + Sync + 'static,
    {
        self.functions
            .insert(name.to_string(), NativeFunction::new(name, f).into());
        self
    }

    /// Registers a group of host functions callable as `$module.name`.
    ///
    /// Registering the same module again adds to it.
    pub fn add_module<I>(&mut self, module: &str, functions: I) -> &mut Self
    where
        I: IntoIterator<Item = NativeFunction>,
    {
        let entry = self
            .functions
            .entry(module.to_string())
            .or_insert_with(|| Expr::Object(BTreeMap::new()));
        if !matches!(entry, Expr::Object(_)) {
            warn!("module `{}` replaces a function of the same name", module);
            *entry = Expr::Object(BTreeMap::new());
        }
        if let Expr::Object(table) = entry {
            for f in functions {
                table.insert(f.name().to_string(), f.into());
            }
        }
        self
    }

    /// Parses a rule document.
    pub fn compile(&self, rule: &str) -> Result<Rule> {
        let expr = parse_document(rule)?;
        debug!("compiled rule with {} host function(s)", self.functions.len());
        Ok(Rule {
            expr,
            functions: Arc::new(Expr::Object(self.functions.clone())),
            config: self.config.clone(),
        })
    }

    /// An evaluator over the given value frames and this engine's functions.
    pub fn evaluator(&self, values: Vec<Expr>) -> Evaluator {
        let functions = Arc::new(Expr::Object(self.functions.clone()));
        evaluator(values, functions, &self.config)
    }
}

fn evaluator(values: Vec<Expr>, functions: Frame, config: &EngineConfig) -> Evaluator {
    Evaluator::from_frames(
        values.into_iter().map(Arc::new).collect(),
        vec![builtins::library(), functions],
    )
    .with_max_depth(config.max_depth)
}

/// A parsed rule bound to a snapshot of its engine's functions.
///
/// Rules are immutable; evaluating one never changes it, so a rule can be
/// shared between threads and evaluated concurrently.
#[derive(Debug, Clone)]
pub struct Rule {
    expr: Expr,
    functions: Frame,
    config: EngineConfig,
}

impl Rule {
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the rule against a JSON fact document and returns compact
    /// JSON. Blank facts mean no fact document.
    pub fn eval(&self, facts: &str) -> Result<String> {
        self.eval_all(&[facts])
    }

    /// Evaluates the rule against several fact documents. Later documents
    /// shadow earlier ones; blank documents are skipped.
    pub fn eval_all(&self, facts: &[&str]) -> Result<String> {
        let facts = facts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| parse_document(text))
            .collect::<Result<Vec<_>>>()?;
        to_json(&self.eval_value(facts)?)
    }

    /// Evaluates the rule against already parsed fact documents, outermost
    /// first.
    pub fn eval_value(&self, facts: Vec<Expr>) -> Result<Expr> {
        evaluator(facts, self.functions.clone(), &self.config).evaluate(&self.expr)
    }
}

/// Evaluates a rule against any number of fact documents with a default
/// engine.
///
/// ```
/// let sum = tenpen::eval(r##"["$+", "#a", "#b"]"##, &[r#"{"a": 1, "b": 2}"#]).unwrap();
/// assert_eq!(sum, "3");
/// ```
pub fn eval(rule: &str, facts: &[&str]) -> Result<String> {
    Engine::new().compile(rule)?.eval_all(facts)
}

/// Evaluates a rule and keeps the outcome for later decoding.
pub fn eval_result(rule: &str, facts: &[&str]) -> Outcome {
    Outcome {
        output: eval(rule, facts),
    }
}

/// Result of [`eval_result`].
#[derive(Debug, Clone)]
pub struct Outcome {
    pub output: Result<String>,
}

impl Outcome {
    /// Decodes the JSON output into a Rust type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let output = self.output.as_ref().map_err(Clone::clone)?;
        serde_json::from_str(output).map_err(|e| EvalError::InvalidType(e.to_string()))
    }
}
