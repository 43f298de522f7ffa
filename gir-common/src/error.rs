//! Error handling for the Go IR bridge
//!
//! Every fallible operation in the workspace returns [`BridgeError`]. The
//! [`DiagnosticsReporter`] is the single place where an error leaves the
//! program, either as a panic or as a structured JSON object on stderr.

use crate::source_loc::SourcePosition;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use thiserror::Error;

/// Bound on type descriptor nesting.
pub const MAX_TYPE_DEPTH: usize = 100;

/// Main error type covering parsing, checking, lowering and loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Syntax error at {position}: {message}")]
    Syntax {
        position: SourcePosition,
        message: String,
    },

    #[error("Type error at {position}: {message}")]
    Type {
        position: SourcePosition,
        message: String,
    },

    #[error("Unexpected node {shape} at {position}")]
    UnexpectedNode {
        shape: String,
        position: SourcePosition,
    },

    #[error("Unrecognized type {shape} at {position}")]
    UnrecognizedType {
        shape: String,
        position: SourcePosition,
    },

    #[error("Internal error at {position}: {message}")]
    Internal {
        position: SourcePosition,
        message: String,
    },

    #[error("Type descriptor nested deeper than {limit} levels")]
    DepthLimit { limit: usize },

    #[error("Cannot resolve import {path:?}: {message}")]
    Resolution { path: String, message: String },

    #[error("Path error: {message}")]
    Path { message: String },
}

impl BridgeError {
    pub fn syntax_error(message: impl Into<String>, position: SourcePosition) -> Self {
        BridgeError::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>, position: SourcePosition) -> Self {
        BridgeError::Type {
            position,
            message: message.into(),
        }
    }

    pub fn unexpected_node(shape: impl Into<String>, position: SourcePosition) -> Self {
        BridgeError::UnexpectedNode {
            shape: shape.into(),
            position,
        }
    }

    pub fn unrecognized_type(shape: impl Into<String>, position: SourcePosition) -> Self {
        BridgeError::UnrecognizedType {
            shape: shape.into(),
            position,
        }
    }

    pub fn internal_error(message: impl Into<String>, position: SourcePosition) -> Self {
        BridgeError::Internal {
            position,
            message: message.into(),
        }
    }

    pub fn resolution_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError::Resolution {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn path_error(message: impl Into<String>) -> Self {
        BridgeError::Path {
            message: message.into(),
        }
    }

    /// The wire name of the error category.
    pub fn error_type(&self) -> &'static str {
        match self {
            BridgeError::Syntax { .. } => "syntax_error",
            BridgeError::Type { .. } => "type_error",
            BridgeError::UnexpectedNode { .. } => "unexpected_node",
            BridgeError::UnrecognizedType { .. } => "unrecognized_type",
            BridgeError::Internal { .. } => "internal_error",
            BridgeError::DepthLimit { .. } => "depth_limit_exceeded",
            BridgeError::Resolution { .. } => "import_error",
            BridgeError::Path { .. } => "path_error",
        }
    }

    /// Human-readable reason, without the position prefix.
    pub fn info(&self) -> String {
        match self {
            BridgeError::Syntax { message, .. }
            | BridgeError::Type { message, .. }
            | BridgeError::Internal { message, .. }
            | BridgeError::Path { message } => message.clone(),
            BridgeError::UnexpectedNode { shape, .. }
            | BridgeError::UnrecognizedType { shape, .. } => shape.clone(),
            BridgeError::DepthLimit { limit } => {
                format!("type descriptor nested deeper than {} levels", limit)
            }
            BridgeError::Resolution { path, message } => format!("{}: {}", path, message),
        }
    }

    pub fn position(&self) -> SourcePosition {
        match self {
            BridgeError::Syntax { position, .. }
            | BridgeError::Type { position, .. }
            | BridgeError::UnexpectedNode { position, .. }
            | BridgeError::UnrecognizedType { position, .. }
            | BridgeError::Internal { position, .. } => position.clone(),
            BridgeError::DepthLimit { .. } | BridgeError::Resolution { .. } => {
                SourcePosition::unspecified()
            }
            BridgeError::Path { .. } => SourcePosition::toplevel(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            error: DiagnosticBody {
                error_type: self.error_type().to_string(),
                info: self.info(),
                position: self.position(),
            },
        }
    }
}

/// Convert from std::io::Error
impl From<io::Error> for BridgeError {
    fn from(err: io::Error) -> Self {
        BridgeError::Path {
            message: err.to_string(),
        }
    }
}

/// The structured failure object: `{"error": {"type", "info", "position"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub error: DiagnosticBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub info: String,
    pub position: SourcePosition,
}

/// How the reporting boundary terminates the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Panic with the formatted error (debugging and tests).
    Panic,
    /// Write the diagnostic object to stderr and exit with status 1.
    #[default]
    Report,
}

/// The one place a [`BridgeError`] is turned into process termination.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsReporter {
    mode: FailureMode,
}

impl DiagnosticsReporter {
    pub fn new(mode: FailureMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    /// Serialize the diagnostic for `err` as one JSON line.
    pub fn write_diagnostic<W: Write>(&self, err: &BridgeError, out: &mut W) -> io::Result<()> {
        let diagnostic = err.to_diagnostic();
        serde_json::to_writer(&mut *out, &diagnostic)?;
        writeln!(out)
    }

    pub fn report(&self, err: &BridgeError) -> ! {
        match self.mode {
            FailureMode::Panic => panic!("{}: {}", err.error_type(), err),
            FailureMode::Report => {
                let stderr = io::stderr();
                let mut handle = stderr.lock();
                let _ = self.write_diagnostic(err, &mut handle);
                std::process::exit(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_types() {
        let pos = SourcePosition::new("a.go", 1, 0, 1);
        let cases = vec![
            (BridgeError::syntax_error("x", pos.clone()), "syntax_error"),
            (BridgeError::type_error("x", pos.clone()), "type_error"),
            (BridgeError::unexpected_node("BadStmt", pos.clone()), "unexpected_node"),
            (BridgeError::unrecognized_type("CallExpr", pos.clone()), "unrecognized_type"),
            (BridgeError::internal_error("x", pos), "internal_error"),
            (BridgeError::DepthLimit { limit: MAX_TYPE_DEPTH }, "depth_limit_exceeded"),
            (BridgeError::resolution_error("x/y", "not found"), "import_error"),
            (BridgeError::Path { message: "gone".into() }, "path_error"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.error_type(), expected);
        }
    }

    #[test]
    fn test_sentinel_positions() {
        let err = BridgeError::resolution_error("example.com/p", "no such directory");
        assert_eq!(err.position(), SourcePosition::unspecified());
        assert!(err.info().contains("example.com/p"));

        let err: BridgeError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.position(), SourcePosition::toplevel());
    }

    #[test]
    fn test_diagnostic_json() {
        let reporter = DiagnosticsReporter::new(FailureMode::Report);
        let err = BridgeError::unrecognized_type("CallExpr", SourcePosition::new("f.go", 2, 10, 3));
        let mut buffer = Vec::new();
        reporter.write_diagnostic(&err, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "error": {
                    "type": "unrecognized_type",
                    "info": "CallExpr",
                    "position": {"filename": "f.go", "line": 2, "offset": 10, "column": 3}
                }
            })
        );
    }

    #[test]
    #[should_panic(expected = "internal_error")]
    fn test_panic_mode() {
        let reporter = DiagnosticsReporter::new(FailureMode::Panic);
        reporter.report(&BridgeError::internal_error("bad node", SourcePosition::unspecified()));
    }
}
