use thiserror::Error;

use crate::token::{Span, Token};

/// First grammar violation found by the validator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("**SYNTAX ERROR @ {span}: expecting {expecting}, found '{found}'")]
pub struct SyntaxError {
    pub expecting: String,
    pub found: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(expecting: impl Into<String>, found: &Token) -> Self {
        Self {
            expecting: expecting.into(),
            found: found.text.clone(),
            span: found.span,
        }
    }
}

/// Raised by the graph builder on token sequences validation should have
/// rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("**INTERNAL ERROR: unexpected '{found}' at {span} while building program graph, expected {expecting}")]
    UnexpectedToken {
        expecting: &'static str,
        found: String,
        span: Span,
    },
}

impl GraphError {
    pub(crate) fn unexpected(expecting: &'static str, found: &Token) -> Self {
        Self::UnexpectedToken {
            expecting,
            found: found.text.clone(),
            span: found.span,
        }
    }
}
