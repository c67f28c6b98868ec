//! Error types for location discovery and expansion.

use hl7_location::{ErrorKind, LocationError, SourcePosition};
use thiserror::Error;

/// Errors that can occur while discovering or resolving locations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// A location string could not be parsed.
    #[error("location error: {0}")]
    Location(#[from] LocationError),

    /// A node name does not match the convention expected at its level.
    #[error("structural error at `{tag}`{}: {message}", at(.position))]
    Structural {
        /// The offending node name.
        tag: String,
        /// Description of the violation.
        message: String,
        /// Position of the node in its source, when known.
        position: Option<SourcePosition>,
    },

    /// A structural path did not resolve to exactly one node.
    #[error("`{path}` matched {matches} nodes, expected exactly one")]
    Data {
        /// The structural path that was evaluated.
        path: String,
        /// Number of matching nodes.
        matches: usize,
    },

    /// A segment group instance was `*`; only segment and field instances expand.
    #[error("wildcard segment group instances cannot be expanded: {location}")]
    UnsupportedWildcard {
        /// The template in compact form.
        location: String,
    },
}

fn at(position: &Option<SourcePosition>) -> String {
    position.map(|p| format!(" ({})", p)).unwrap_or_default()
}

impl FinderError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FinderError::Location(e) => e.kind(),
            FinderError::Structural { .. } => ErrorKind::Structural,
            FinderError::Data { .. } => ErrorKind::Data,
            FinderError::UnsupportedWildcard { .. } => ErrorKind::Syntax,
        }
    }
}

/// Result type for finder operations.
pub type FinderResult<T> = std::result::Result<T, FinderError>;
