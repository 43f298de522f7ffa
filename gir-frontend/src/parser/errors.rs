//! Parse error types for the Go parser
//!
//! This module defines all error types that can occur during parsing.

use crate::lexer::Token;
use gir_common::{BridgeError, SourcePosition};
use thiserror::Error;

/// Parse error types specific to the parser
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {}", found.describe())]
    UnexpectedToken { expected: String, found: Token },

    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEndOfFile {
        expected: String,
        position: SourcePosition,
    },

    #[error("{message}")]
    InvalidExpression {
        message: String,
        position: SourcePosition,
    },

    #[error("{message}")]
    InvalidStatement {
        message: String,
        position: SourcePosition,
    },

    #[error("{message}")]
    Unsupported {
        message: String,
        position: SourcePosition,
    },
}

impl ParseError {
    pub fn position(&self) -> SourcePosition {
        match self {
            ParseError::UnexpectedToken { found, .. } => found.span.start.clone(),
            ParseError::UnexpectedEndOfFile { position, .. }
            | ParseError::InvalidExpression { position, .. }
            | ParseError::InvalidStatement { position, .. }
            | ParseError::Unsupported { position, .. } => position.clone(),
        }
    }
}

impl From<ParseError> for BridgeError {
    fn from(err: ParseError) -> Self {
        BridgeError::syntax_error(err.to_string(), err.position())
    }
}
