//! Source positions attached to nodes and tokens

use std::fmt;

/// A line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePosition {
    /// line number (1-based)
    pub line: usize,
    /// column number (1-based, as reported by the tokenizer)
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The source range covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceSpan {
    pub start: SourcePosition,
    /// `None` until the node is closed
    pub end: Option<SourcePosition>,
}

impl SourceSpan {
    /// An open span starting at `start`.
    pub fn starting_at(start: SourcePosition) -> Self {
        Self { start, end: None }
    }

    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }
}
