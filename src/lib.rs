//! # tenpen
//!
//! A rule engine whose rules are JSON documents. A rule is evaluated against a
//! fact document: references pull values out of the facts (or out of other
//! fields of the rule), calls run built-in, host or document-defined
//! functions, and the result is again JSON.
//!
//! ```
//! use tenpen::Engine;
//!
//! let rule = Engine::new()
//!     .compile(r##"{"total": ["$+", "#price", "#tax"], "tax": ["$*", "#price", 0.2]}"##)?;
//! assert_eq!(rule.eval(r#"{"price": 10}"#)?, r#"{"tax":2,"total":12}"#);
//! # Ok::<(), tenpen::EvalError>(())
//! ```

pub mod ast;
pub mod builtins;
pub mod cli;
pub mod dependency;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod output;
pub mod parser;
pub mod path;

pub use ast::{Expr, FunctionCall, FunctionDefinition, NativeFunction};
pub use engine::{Engine, EngineConfig, Outcome, Rule, eval, eval_result};
pub use error::{DocumentError, EvalError};
pub use evaluator::Evaluator;
pub use output::{to_json, to_json_pretty, to_json_value};
pub use parser::{from_json, parse_document};
pub use path::{Path, Step};
