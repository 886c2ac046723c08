//! Error types for path parsing

use thiserror::Error;

/// Errors produced while turning a textual path into a [`Path`](super::path::Path)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path string was empty
    #[error("Path is empty")]
    Empty,

    /// Two separators with nothing in between, or a leading/trailing dot
    #[error("Empty segment at position {position} in path '{path}'")]
    EmptySegment { path: String, position: usize },

    /// A `]` followed by something other than `.` or `[`
    #[error("Missing separator after segment {position} in path '{path}'")]
    MissingSeparator { path: String, position: usize },

    /// A `[` without its matching `]`
    #[error("Unclosed bracket in path '{path}'")]
    UnclosedBracket { path: String },

    /// Bracket contents that are not a non-negative integer
    #[error("Invalid index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },
}
