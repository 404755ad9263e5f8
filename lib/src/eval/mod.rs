//! Pluggable code evaluation for bookmark code bodies.
//!
//! A bookmark's code runs against an output-capture sink: everything the
//! code writes during execution is collected and returned as the
//! replacement text. The sink is scoped to one `execute` call and released
//! on every exit path.
//!
//! Two implementations exist. [`ScriptEvaluator`] interprets a restricted
//! statement language with no host access and is the default.
//! [`NativeEvaluator`] hands the code body to a shell and captures its
//! stdout; it preserves the original execute-arbitrary-code contract and is
//! therefore locked behind the `allow_native` configuration flag. Anyone
//! who can place a matching placeholder in content can trigger whatever an
//! enabled bookmark's code does, with the full privilege of this process.

pub mod native;
pub mod script;

pub use native::NativeEvaluator;
pub use script::ScriptEvaluator;

use crate::config::{Config, EvaluatorChoice};
use crate::error::CodemarkError;

/// Errors produced while evaluating a bookmark code body.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The code body could not be parsed
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The code body failed during execution
    #[error("runtime error: {0}")]
    Runtime(String),

    /// The output sink could not be read back
    #[error("output capture failed: {0}")]
    Capture(String),
}

/// Executes a code body and returns its captured output.
pub trait CodeEvaluator: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, source: &str) -> Result<String, EvalError>;
}

/// Build the evaluator selected by the configuration.
///
/// The native evaluator is only handed out when `allow_native` is set;
/// requesting it otherwise is a configuration error, never a silent
/// fallback.
pub fn evaluator_from_config(config: &Config) -> crate::error::Result<Box<dyn CodeEvaluator>> {
    match config.evaluator {
        EvaluatorChoice::Script => Ok(Box::new(ScriptEvaluator::new())),
        EvaluatorChoice::Native => {
            if !config.allow_native {
                return Err(CodemarkError::Config(
                    "evaluator 'native' requires 'allow_native: true' in the configuration"
                        .to_string(),
                ));
            }
            Ok(Box::new(NativeEvaluator::new(&config.shell)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_factory_defaults_to_script() {
        let evaluator = evaluator_from_config(&Config::default()).unwrap();
        assert_eq!(evaluator.name(), "script");
    }

    #[test]
    fn test_factory_rejects_ungated_native() {
        let config = Config {
            evaluator: EvaluatorChoice::Native,
            allow_native: false,
            ..Config::default()
        };
        let err = match evaluator_from_config(&config) {
            Ok(_) => panic!("expected configuration error"),
            Err(e) => e,
        };
        assert!(matches!(err, CodemarkError::Config(_)));
    }

    #[test]
    fn test_factory_allows_gated_native() {
        let config = Config {
            evaluator: EvaluatorChoice::Native,
            allow_native: true,
            ..Config::default()
        };
        let evaluator = evaluator_from_config(&config).unwrap();
        assert_eq!(evaluator.name(), "native");
    }
}
