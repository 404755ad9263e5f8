//! Native execution adapter, kept for functional parity with the original
//! execute-code-string contract.
//!
//! The code body is handed to a shell and stdout is captured as the
//! replacement text. Construction is gated behind the `allow_native`
//! configuration flag (see [`super::evaluator_from_config`]); there is no
//! sandbox, no timeout, and a runaway code body blocks the whole request.

use std::process::Command;

use super::{CodeEvaluator, EvalError};

pub struct NativeEvaluator {
    shell: String,
}

impl NativeEvaluator {
    pub fn new(shell: &str) -> Self {
        Self {
            shell: shell.to_string(),
        }
    }
}

impl CodeEvaluator for NativeEvaluator {
    fn name(&self) -> &'static str {
        "native"
    }

    fn execute(&self, source: &str) -> Result<String, EvalError> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(source)
            .output()
            .map_err(|e| EvalError::Capture(format!("failed to spawn '{}': {}", self.shell, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EvalError::Runtime(format!(
                "'{}' exited with {}: {}",
                self.shell,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| EvalError::Capture(format!("captured output is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn evaluator() -> NativeEvaluator {
        NativeEvaluator::new("/bin/sh")
    }

    #[test]
    fn test_captures_stdout() {
        let out = evaluator().execute("printf 'Hi'").unwrap();
        assert_eq!(out, "Hi");
    }

    #[test]
    fn test_trailing_terminator_is_harmless() {
        assert_eq!(
            evaluator().execute("printf 'Y'").unwrap(),
            evaluator().execute("printf 'Y';").unwrap()
        );
    }

    #[test]
    fn test_nonzero_exit_is_a_runtime_error() {
        let err = evaluator().execute("exit 3").unwrap_err();
        assert!(matches!(err, EvalError::Runtime(_)));
    }

    #[test]
    fn test_missing_shell_is_a_capture_error() {
        let err = NativeEvaluator::new("/nonexistent/shell")
            .execute("printf 'x'")
            .unwrap_err();
        assert!(matches!(err, EvalError::Capture(_)));
    }
}
