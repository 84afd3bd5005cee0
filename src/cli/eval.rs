//! Evaluate rules against fact documents

use log::debug;

use super::CliError;
use crate::{Engine, output::to_json_pretty};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The rule document
    pub rule: String,
    /// Fact document; none means the rule sees no facts
    pub facts: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate the rule, don't evaluate it
    pub syntax_only: bool,
}

/// Result of an eval operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The rule is a well-formed document
    SyntaxValid,
    /// The rule evaluated to this JSON text
    Success(String),
}

/// Execute a tenpen eval operation
pub fn execute_eval(options: &EvalOptions) -> Result<EvalOutcome, CliError> {
    if options.rule.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let rule = Engine::new().compile(&options.rule)?;
    if options.syntax_only {
        return Ok(EvalOutcome::SyntaxValid);
    }

    let facts = options.facts.as_deref().unwrap_or("");
    debug!("evaluating rule against {} bytes of facts", facts.len());

    let output = if options.pretty {
        let facts = if facts.trim().is_empty() {
            vec![]
        } else {
            vec![crate::parse_document(facts)?]
        };
        to_json_pretty(&rule.eval_value(facts)?)?
    } else {
        rule.eval(facts)?
    };
    Ok(EvalOutcome::Success(output))
}
