//! Entry point for running scripts: parse, evaluate, collect console output.

use thiserror::Error;

use crate::parser::{JsParser, Rule};
use crate::runner::config::EngineConfig;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::eval::run_program;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::EvalContext;

#[derive(Debug, Error)]
pub enum JsRunError {
    #[error("{0}")]
    Parse(Box<pest::error::Error<Rule>>),
    #[error(transparent)]
    Runtime(#[from] JErrorType),
}

impl From<pest::error::Error<Rule>> for JsRunError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        JsRunError::Parse(Box::new(e))
    }
}

impl JsRunError {
    /// The runtime error, if evaluation (rather than parsing) failed.
    pub fn runtime_error(&self) -> Option<&JErrorType> {
        match self {
            JsRunError::Runtime(e) => Some(e),
            JsRunError::Parse(_) => None,
        }
    }
}

/// Keeps one realm alive across scripts, so later scripts see earlier globals.
pub struct JsRunner {
    ctx: EvalContext,
}

impl JsRunner {
    pub fn new(config: EngineConfig) -> Self {
        let mut ctx = EvalContext::with_config(config);
        ctx.install_core_builtins(BuiltInRegistry::with_core());
        JsRunner { ctx }
    }

    /// Runs `source` and returns the value of its last expression statement.
    pub fn run_script(&mut self, source: &str) -> Result<JsValue, JsRunError> {
        let program = JsParser::parse_to_ast_from_str(source)?;
        let value = run_program(&program, &mut self.ctx)?;
        Ok(value)
    }

    /// Console lines written so far.
    pub fn output(&self) -> &[String] {
        self.ctx.console_output()
    }

    pub fn take_output(&mut self) -> Vec<String> {
        self.ctx.take_console_output()
    }
}

impl Default for JsRunner {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Runs a single script in a fresh realm and returns its console lines.
pub fn run_script(source: &str, config: EngineConfig) -> Result<Vec<String>, JsRunError> {
    let mut runner = JsRunner::new(config);
    runner.run_script(source)?;
    Ok(runner.take_output())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_survive_between_scripts() {
        let mut runner = JsRunner::default();
        runner.run_script("var who = 'Steve';").unwrap();
        let value = runner.run_script("who").unwrap();
        assert_eq!(value, JsValue::from("Steve"));
    }

    #[test]
    fn parse_errors_are_reported_separately() {
        let err = run_script("var = ;", EngineConfig::default()).unwrap_err();
        assert!(matches!(err, JsRunError::Parse(_)));
        assert!(err.runtime_error().is_none());
    }

    #[test]
    fn runtime_errors_keep_their_type() {
        let err = run_script("missing();", EngineConfig::default()).unwrap_err();
        assert_eq!(
            err.runtime_error(),
            Some(&JErrorType::ReferenceError("missing is not defined".to_string()))
        );
        assert_eq!(err.to_string(), "Uncaught reference error: missing is not defined.");
    }

    #[test]
    fn output_is_captured() {
        let lines = run_script("console.log('a'); console.log(1, 'b');", EngineConfig::default())
            .unwrap();
        assert_eq!(lines, vec!["a".to_string(), "1 b".to_string()]);
    }
}
