//! Source location tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// The source line a node was parsed from.
///
/// The parser only hands over line numbers, so a span here is a single
/// line rather than a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// 1-based source line
    pub line: u32,
}

impl Span {
    /// Create a new span
    pub fn new(line: u32) -> Self {
        Self { line }
    }

    /// Create a dummy span (for testing)
    pub fn dummy() -> Self {
        Self { line: 0 }
    }

    /// Check if this span points at no real line
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}
