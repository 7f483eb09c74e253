//! Code-generation errors.
//!
//! The generator records errors and keeps going, so several can be
//! reported from one run; `generate` returns failure if any were
//! recorded.

use thiserror::Error;

/// Errors the lowering pass can record.
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// A name was referenced that no scope declares.
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    /// A call target that no scope declares.
    #[error("Undefined function '{0}'")]
    UndefinedFunction(String),

    /// A construct with no lowering rule.
    #[error("Unsupported construct: {0}")]
    Unsupported(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CodeGenError::UndefinedVariable("x".into()).to_string(),
            "Undefined variable 'x'"
        );
        assert_eq!(
            CodeGenError::UndefinedFunction("f".into()).to_string(),
            "Undefined function 'f'"
        );
        assert_eq!(
            CodeGenError::Unsupported("compound assignment").to_string(),
            "Unsupported construct: compound assignment"
        );
    }
}
