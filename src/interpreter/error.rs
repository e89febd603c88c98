use thiserror::Error;

/// Errors that stop execution. Each renders as the single diagnostic line
/// reported to the user.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("**SEMANTIC ERROR: name '{name}' is not defined (line {line})")]
    UndefinedName { name: String, line: usize },
    #[error("**SEMANTIC ERROR: invalid operand types (line {line})")]
    InvalidOperandTypes { line: usize },
    #[error("ZeroDivisionError: division by zero")]
    DivisionByZero,
    #[error("ZeroDivisionError: integer modulo by zero")]
    ModuloByZero,
    #[error("**SEMANTIC ERROR: invalid string for {function}() (line {line})")]
    InvalidConversion { function: &'static str, line: usize },
    #[error("**SEMANTIC ERROR: integer literal '{text}' is out of range (line {line})")]
    IntegerOutOfRange { text: String, line: usize },
    #[error("**SEMANTIC ERROR: invalid function call '{name}' (line {line})")]
    InvalidFunctionCall { name: String, line: usize },
    #[error("**SEMANTIC ERROR: {feature} is not supported (line {line})")]
    Unsupported { feature: String, line: usize },
    #[error("**INTERNAL ERROR: {message}")]
    Internal { message: String },
    #[error("**INTERNAL ERROR: I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutionError {
    pub(super) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub(super) fn unsupported(feature: impl Into<String>, line: usize) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            line,
        }
    }
}
