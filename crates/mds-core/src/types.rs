//! Source location type for MDS

use serde::{Deserialize, Serialize};

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed, as reported in diagnostics)
    pub line: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}
