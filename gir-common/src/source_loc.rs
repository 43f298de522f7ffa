//! Source position tracking
//!
//! Positions are what every IR node carries. Lines and columns are 1-based,
//! offsets are 0-based, and both offsets and columns count bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub filename: String,
    pub line: i64,
    pub offset: i64,
    pub column: i64,
}

impl SourcePosition {
    pub fn new(filename: &str, line: i64, offset: i64, column: i64) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            offset,
            column,
        }
    }

    /// Sentinel for failures that belong to the whole invocation
    /// (for example an unreadable entry path).
    pub fn toplevel() -> Self {
        Self::new("toplevel", -1, -1, -1)
    }

    /// Sentinel for failures that have no meaningful source location.
    pub fn unspecified() -> Self {
        Self::new("unspecified", -1, -1, -1)
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        } else {
            write!(f, "{}", self.filename)
        }
    }
}

/// A span in a source file (start is inclusive, end is exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a single position
    pub fn empty_at(position: SourcePosition) -> Self {
        Self {
            end: position.clone(),
            start: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}:{}-{}",
                self.start.filename, self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{} to {}:{}", self.start, self.end.line, self.end.column)
        }
    }
}
