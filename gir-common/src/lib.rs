//! Go IR bridge - Common Types and Utilities
//!
//! This crate contains the source position record, the error taxonomy and
//! the diagnostics reporter shared by the frontend, the lowering engine and
//! the driver.

pub mod error;
pub mod source_loc;

pub use error::{BridgeError, MAX_TYPE_DEPTH, Diagnostic, DiagnosticBody, DiagnosticsReporter, FailureMode};
pub use source_loc::{SourcePosition, SourceSpan};
