use thiserror::Error;

/// Errors raised by library functions and Open hooks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("reference error: {0}")]
    ReferenceError(String),
    #[error("type error: {0}")]
    TypeError(String),
    #[error("runtime error: {0}")]
    RuntimeError(String),
}

impl ScriptError {
    /// Type error for a bad positional argument, numbered from 1.
    pub fn bad_argument(function: &str, position: usize, expected: &str, got: &str) -> Self {
        ScriptError::TypeError(format!(
            "bad argument #{} to '{}' ({} expected, got {})",
            position, function, expected, got
        ))
    }
}
