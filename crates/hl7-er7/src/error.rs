//! Error types for transcoding and reading ER7.

use std::fmt;

use hl7_location::{ErrorKind, SourcePosition};
use thiserror::Error;

/// What went wrong while transcoding a message tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TranscodeErrorKind {
    /// A segment, field, component or subcomponent name does not have the
    /// shape expected at its depth.
    MalformedName,
    /// A field names a different segment than the one it is in, or a
    /// component names a different field.
    CodeMismatch,
    /// A value had to be encoded before the separator it needs was declared.
    SeparatorUndefined,
    /// A header field declaring separators is malformed.
    MalformedSeparator,
    /// Nodes nest deeper than subcomponents.
    NestingTooDeep,
    /// A sibling's position is lower than the previous sibling's.
    OutOfOrder,
    /// A component or subcomponent position appears twice under one parent.
    RepeatedPosition,
    /// A segment carries text but no fields, so the text has no position.
    SegmentText,
    /// The markup itself is not well formed.
    Markup,
}

impl TranscodeErrorKind {
    /// Maps the failure onto the shared error taxonomy.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            TranscodeErrorKind::MalformedName
            | TranscodeErrorKind::CodeMismatch
            | TranscodeErrorKind::NestingTooDeep
            | TranscodeErrorKind::OutOfOrder
            | TranscodeErrorKind::RepeatedPosition
            | TranscodeErrorKind::SegmentText => ErrorKind::Structural,
            TranscodeErrorKind::SeparatorUndefined | TranscodeErrorKind::MalformedSeparator => {
                ErrorKind::Separator
            }
            TranscodeErrorKind::Markup => ErrorKind::Syntax,
        }
    }
}

impl fmt::Display for TranscodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TranscodeErrorKind::MalformedName => "malformed element name",
            TranscodeErrorKind::CodeMismatch => "element does not belong to its parent",
            TranscodeErrorKind::SeparatorUndefined => "separator not yet defined",
            TranscodeErrorKind::MalformedSeparator => "malformed separator definition",
            TranscodeErrorKind::NestingTooDeep => "message nests too deep",
            TranscodeErrorKind::OutOfOrder => "element out of positional order",
            TranscodeErrorKind::RepeatedPosition => "position repeated where repetition is not allowed",
            TranscodeErrorKind::SegmentText => "segment text outside any field",
            TranscodeErrorKind::Markup => "malformed markup",
        };
        f.write_str(text)
    }
}

/// A transcoding failure, pointing at the offending element.
///
/// Transcoding is all-or-nothing: when this is returned no output exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at `{tag}`{}{}", at(.position), detail(.message))]
pub struct TranscodeError {
    reason: TranscodeErrorKind,
    tag: String,
    position: Option<SourcePosition>,
    message: Option<String>,
}

fn at(position: &Option<SourcePosition>) -> String {
    position.map(|p| format!(" ({})", p)).unwrap_or_default()
}

fn detail(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default()
}

impl TranscodeError {
    /// Creates an error for the element named `tag`.
    pub fn new(reason: TranscodeErrorKind, tag: impl Into<String>) -> Self {
        Self {
            reason,
            tag: tag.into(),
            position: None,
            message: None,
        }
    }

    /// Attaches the element's source position.
    pub fn at(mut self, position: Option<SourcePosition>) -> Self {
        self.position = position;
        self
    }

    /// Attaches a human-readable detail.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Shared error category.
    pub fn kind(&self) -> ErrorKind {
        self.reason.error_kind()
    }

    /// The specific failure.
    pub fn reason(&self) -> TranscodeErrorKind {
        self.reason
    }

    /// Name of the offending element.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Source position of the offending element, when known.
    pub fn position(&self) -> Option<SourcePosition> {
        self.position
    }
}

/// Result type for transcoding.
pub type TranscodeResult<T> = std::result::Result<T, TranscodeError>;

/// Errors from reading ER7 wire text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Er7Error {
    /// The input holds no segments.
    #[error("no segments in message")]
    Empty,

    /// No `MSH`, `BHS` or `FHS` segment declares the separators.
    #[error("no header segment declares the separators")]
    MissingHeader,

    /// The header's separator fields are malformed.
    #[error("malformed separators in `{segment}`: {message}")]
    MalformedSeparators {
        /// The header segment code.
        segment: String,
        /// Description of the problem.
        message: String,
    },

    /// A line does not start with a segment code followed by the field separator.
    #[error("malformed segment on line {line}: {text:?}")]
    MalformedSegment {
        /// 1-based segment number.
        line: usize,
        /// The offending text.
        text: String,
    },
}

impl Er7Error {
    /// Shared error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Er7Error::Empty | Er7Error::MalformedSegment { .. } => ErrorKind::Syntax,
            Er7Error::MissingHeader | Er7Error::MalformedSeparators { .. } => ErrorKind::Separator,
        }
    }
}

/// Result type for the ER7 reader.
pub type Er7Result<T> = std::result::Result<T, Er7Error>;
