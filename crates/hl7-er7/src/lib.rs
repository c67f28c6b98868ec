//! # hl7-er7
//!
//! Conversion of HL7 v2 XML messages to ER7, the pipe-delimited wire format.
//!
//! ## Key Features
//!
//! - **Single pass** - [`Transcoder`] walks the tree once and writes as it goes
//! - **Declared separators** - the header's `MSH.1`/`MSH.2` decide every
//!   separator and escape sequence that follows
//! - **Positional padding** - missing fields, components and subcomponents
//!   are restored as empty positions
//! - **Readable errors** - failures carry the offending tag and its line and
//!   column in the source document
//! - **ER7 reader** - [`Er7Message`] parses wire text back into a tree that
//!   the location finder can walk
//!
//! ## Quick Start
//!
//! ```rust
//! use hl7_er7::Transcoder;
//!
//! let xml = r"<ADT_A01>
//!   <MSH><MSH.1>|</MSH.1><MSH.2>^~\&amp;</MSH.2><MSH.3>APP</MSH.3></MSH>
//!   <PID><PID.3>123</PID.3><PID.5><XPN.1>Doe</XPN.1><XPN.2>Jane</XPN.2></PID.5></PID>
//! </ADT_A01>";
//!
//! let er7 = Transcoder::new().transcode_xml(xml).unwrap();
//! assert_eq!(er7, "MSH|^~\\&|APP\rPID|||123||Doe^Jane\r");
//! ```
//!
//! ## With Configuration
//!
//! ```rust
//! use hl7_er7::{SeparatorSet, Transcoder, TranscoderConfig};
//!
//! let config = TranscoderConfig::builder()
//!     .with_segment_terminator("\n")
//!     .with_fallback_separators(SeparatorSet::default())
//!     .build();
//!
//! // No MSH header, so the fallback separators apply
//! let er7 = Transcoder::with_config(config)
//!     .transcode_xml("<M><PID><PID.3>1</PID.3></PID></M>")
//!     .unwrap();
//! assert_eq!(er7, "PID|||1\n");
//! ```
//!
//! ## Escaping
//!
//! | Value contains | Written as |
//! |----------------|------------|
//! | field separator | `\F\` |
//! | component separator | `\S\` |
//! | subcomponent separator | `\T\` |
//! | repetition separator | `\R\` |
//! | escape character | `\E\` |
//! | CR / LF | `\X0D\` / `\X0A\` |
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize separator sets and error kinds

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod er7;
mod error;
mod separators;
mod transcoder;
pub mod xml;

// Public re-exports
pub use config::{TranscoderConfig, TranscoderConfigBuilder};
pub use er7::{Er7Message, Er7Node};
pub use error::{Er7Error, Er7Result, TranscodeError, TranscodeErrorKind, TranscodeResult};
pub use separators::{DeclaredSeparators, SeparatorSet};
pub use transcoder::Transcoder;

// Re-export commonly used types from dependencies for convenience
pub use hl7_location::{ErrorKind, MessageNode, SourcePosition};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _: Option<TranscoderConfig> = None;
        let _: Option<Er7Result<()>> = None;
        let _: Option<TranscodeResult<()>> = None;
        let _: Option<DeclaredSeparators> = None;
    }

    #[test]
    fn test_re_exports() {
        let err = TranscodeError::new(TranscodeErrorKind::OutOfOrder, "PID.3")
            .at(Some(SourcePosition::new(2, 4)));
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(SeparatorSet::default().encoding_characters(), "^~\\&");
    }
}
