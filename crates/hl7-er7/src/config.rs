//! Configuration for transcoding.

use crate::separators::SeparatorSet;

/// Configuration for [`Transcoder`](crate::Transcoder).
///
/// # Example
///
/// ```rust
/// use hl7_er7::{SeparatorSet, TranscoderConfig};
///
/// let config = TranscoderConfig::builder()
///     .with_segment_terminator("\r\n")
///     .with_fallback_separators(SeparatorSet::default())
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TranscoderConfig {
    /// Appended after every segment (default: `"\r"`).
    pub segment_terminator: String,
    /// Used for separators the message never declares.
    ///
    /// `None` (the default) makes encoding before the header's separator
    /// fields an error.
    pub fallback_separators: Option<SeparatorSet>,
    /// Escape CR and LF in values as `\X0D\` and `\X0A\` (default: true).
    pub escape_line_breaks: bool,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            segment_terminator: "\r".to_string(),
            fallback_separators: None,
            escape_line_breaks: true,
        }
    }
}

impl TranscoderConfig {
    /// Creates a new builder for TranscoderConfig.
    pub fn builder() -> TranscoderConfigBuilder {
        TranscoderConfigBuilder::default()
    }
}

/// Builder for TranscoderConfig.
#[derive(Debug, Clone, Default)]
pub struct TranscoderConfigBuilder {
    config: TranscoderConfig,
}

impl TranscoderConfigBuilder {
    /// Sets the segment terminator.
    pub fn with_segment_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.config.segment_terminator = terminator.into();
        self
    }

    /// Sets the separators used when the message does not declare them.
    pub fn with_fallback_separators(mut self, separators: SeparatorSet) -> Self {
        self.config.fallback_separators = Some(separators);
        self
    }

    /// Enables or disables escaping of CR and LF.
    pub fn with_line_break_escaping(mut self, escape: bool) -> Self {
        self.config.escape_line_breaks = escape;
        self
    }

    /// Builds the TranscoderConfig.
    pub fn build(self) -> TranscoderConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranscoderConfig::default();
        assert_eq!(config.segment_terminator, "\r");
        assert!(config.fallback_separators.is_none());
        assert!(config.escape_line_breaks);
    }

    #[test]
    fn test_builder() {
        let config = TranscoderConfig::builder()
            .with_segment_terminator("\n")
            .with_fallback_separators(SeparatorSet::default())
            .with_line_break_escaping(false)
            .build();
        assert_eq!(config.segment_terminator, "\n");
        assert_eq!(config.fallback_separators, Some(SeparatorSet::default()));
        assert!(!config.escape_line_breaks);
    }
}
