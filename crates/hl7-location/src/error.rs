//! Error types for location parsing.

use thiserror::Error;

/// Category shared by every error raised across the workspace.
///
/// Callers that only need to know *what kind* of input was wrong branch on
/// this instead of on the concrete error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A location string does not match the grammar.
    Syntax,
    /// A tree node's name or depth violates the convention for its level.
    Structural,
    /// Encoding needed a separator that is not (or not yet) defined.
    Separator,
    /// A structural path matched zero or several nodes.
    Data,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Structural => write!(f, "structural error"),
            ErrorKind::Separator => write!(f, "separator error"),
            ErrorKind::Data => write!(f, "data error"),
        }
    }
}

/// Errors that can occur while parsing or building a location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The text does not match the location grammar.
    #[error("syntax error at position {position} in `{input}`: {message}")]
    Syntax {
        /// The full text that was parsed.
        input: String,
        /// Byte offset where parsing stopped.
        position: usize,
        /// Description of the error.
        message: String,
    },

    /// Empty input provided.
    #[error("empty location")]
    Empty,

    /// A segment or group name is not a valid token.
    #[error("invalid {expected} name: `{name}`")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// What kind of name was expected (e.g. "segment").
        expected: &'static str,
    },
}

impl LocationError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LocationError::Syntax { .. } | LocationError::Empty | LocationError::InvalidName { .. } => {
                ErrorKind::Syntax
            }
        }
    }
}

/// Result type for location operations.
pub type LocationResult<T> = std::result::Result<T, LocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = LocationError::Syntax {
            input: "PID[1].x".to_string(),
            position: 7,
            message: "unexpected input at: 'x'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "syntax error at position 7 in `PID[1].x`: unexpected input at: 'x'"
        );
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_invalid_name_display() {
        let err = LocationError::InvalidName {
            name: "PIDX".to_string(),
            expected: "segment",
        };
        assert_eq!(err.to_string(), "invalid segment name: `PIDX`");
    }
}
