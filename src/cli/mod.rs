//! CLI support for tenpen
//!
//! Provides programmatic access to the `tenpen` command so other tools can
//! run rules and show the reference documentation without spawning it.

mod docs;
mod eval;

pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use eval::{EvalOptions, EvalOutcome, execute_eval};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Rule, facts or evaluation error
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Empty rule
    #[error("No rule provided. Pass the rule document as the first argument.")]
    NoInput,
    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'tenpen docs' to see available categories.")]
    UnknownCategory(String),
}
