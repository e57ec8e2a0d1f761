//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors cover malformed cross-section input and invalid
/// document lookups. Parser variants carry the 1-based input line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { line: usize, expected: &'static str },

    #[error("line {line}: malformed numeric table row '{content}': {reason}")]
    MalformedNumericTable {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("line {line}: malformed argument line '{content}': {reason}")]
    MalformedArgument {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("line {line}: target '{content}' must contain exactly one '->' or '<->'")]
    MalformedTarget { line: usize, content: String },

    #[error("node <{node}> has no attribute '{key}'")]
    MissingAttribute { node: String, key: String },

    #[error("node <{node}> has no child <{name}>")]
    MissingChild { node: String, name: String },

    #[error("nesting level {level} exceeds supported maximum {max}")]
    UnsupportedNestingDepth { level: usize, max: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// True for failures raised while reading cross-section input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DomainError::UnexpectedEndOfInput { .. }
                | DomainError::MalformedNumericTable { .. }
                | DomainError::MalformedArgument { .. }
                | DomainError::MalformedTarget { .. }
        )
    }
}
