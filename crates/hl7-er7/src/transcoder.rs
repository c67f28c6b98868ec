//! Tree to ER7 transcoding.
//!
//! The transcoder walks a message tree once, depth-first, and writes the
//! wire text as it goes. Depth 0 is the message root, 1 a segment, 2 a
//! field, 3 a component and 4 a subcomponent; segment groups are elided and
//! keep their parent's depth.
//!
//! Separators are written before each value so positions survive gaps:
//!
//! | Situation | Written |
//! |-----------|---------|
//! | first field at position `n` | `n` field separators |
//! | first component/subcomponent at position `n` | `n - 1` separators |
//! | next sibling at `n` after `m < n` | `n - m` separators |
//! | field at the same position again | one repetition separator |
//!
//! The header's first two fields (`MSH.1`, `MSH.2`, likewise for `BHS` and
//! `FHS`) are written literally and declare the separators for the rest of
//! the message. `MSH.1` also serves as the separator before `MSH.2`, so in a
//! header the first other field at `n` gets `n - 1` separators, or `n - 2`
//! when only `MSH.1` was written.
//!
//! A segment holding text but no fields is rejected: ER7 has no place for a
//! value outside a field.

use hl7_location::{naming, MessageNode};
use tracing::{debug, trace};

use crate::config::TranscoderConfig;
use crate::error::{TranscodeError, TranscodeErrorKind, TranscodeResult};
use crate::separators::DeclaredSeparators;
use crate::xml::XmlElement;

/// Segments whose first two fields declare separators.
const HEADER_SEGMENTS: [&str; 3] = ["MSH", "BHS", "FHS"];

const FIELD: usize = 0;
const COMPONENT: usize = 1;
const SUBCOMPONENT: usize = 2;

/// Converts message trees into ER7 wire text.
///
/// A transcoder holds only configuration; every call builds its own state,
/// so one instance can serve many threads.
///
/// # Example
///
/// ```rust
/// use hl7_er7::Transcoder;
///
/// let xml = "<ADT_A01>\
///     <MSH><MSH.1>|</MSH.1><MSH.2>^~\\&amp;</MSH.2><MSH.3>APP</MSH.3></MSH>\
///     <PID><PID.3>123</PID.3><PID.5><XPN.1>Doe</XPN.1><XPN.2>Jane</XPN.2></PID.5></PID>\
///     </ADT_A01>";
///
/// let er7 = Transcoder::new().transcode_xml(xml).unwrap();
/// assert_eq!(er7, "MSH|^~\\&|APP\rPID|||123||Doe^Jane\r");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    config: TranscoderConfig,
}

/// Mutable state of one conversion.
struct TranscoderState<'c> {
    config: &'c TranscoderConfig,
    out: String,
    separators: DeclaredSeparators,
    /// Set once a header's `.2` field has been read, or the fallback applied.
    separators_ready: bool,
    /// Code of the open segment.
    segment: String,
    is_header: bool,
    /// Last position written at field, component and subcomponent level
    /// under the current parent.
    last: [Option<u32>; 3],
    segments: usize,
}

impl Transcoder {
    /// Creates a transcoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transcoder with custom configuration.
    pub fn with_config(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the transcoder configuration.
    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Parses HL7 v2 XML and transcodes it.
    ///
    /// # Errors
    ///
    /// Markup errors from [`XmlElement::parse`], then any error of
    /// [`Transcoder::transcode`].
    pub fn transcode_xml(&self, xml: &str) -> TranscodeResult<String> {
        let root = XmlElement::parse(xml)?;
        self.transcode(&&root)
    }

    /// Transcodes the message tree under `root`.
    ///
    /// # Errors
    ///
    /// Returns the first [`TranscodeError`]; no partial output is produced.
    pub fn transcode<N: MessageNode>(&self, root: &N) -> TranscodeResult<String> {
        let mut state = TranscoderState {
            config: &self.config,
            out: String::new(),
            separators: DeclaredSeparators::default(),
            separators_ready: false,
            segment: String::new(),
            is_header: false,
            last: [None; 3],
            segments: 0,
        };

        for child in root.children() {
            self.visit_segment_level(&child, &mut state)?;
        }

        debug!(
            message_type = %root.name(),
            segments = state.segments,
            bytes = state.out.len(),
            "transcoded message to ER7"
        );
        Ok(state.out)
    }

    /// Depth 1: a segment, or a group whose children are again at depth 1.
    fn visit_segment_level<N: MessageNode>(
        &self,
        node: &N,
        state: &mut TranscoderState<'_>,
    ) -> TranscodeResult<()> {
        let name = node.name();
        if naming::is_group_name(&name) {
            for child in node.children() {
                self.visit_segment_level(&child, state)?;
            }
            return Ok(());
        }

        if !naming::is_segment_code(&name) {
            return Err(error(TranscodeErrorKind::MalformedName, node)
                .with_message("expected a 3-character segment code"));
        }

        let fields = node.children();
        if fields.is_empty() && !node.text().trim().is_empty() {
            return Err(error(TranscodeErrorKind::SegmentText, node)
                .with_message("segment values must sit in `<SEG>.<position>` fields"));
        }

        state.out.push_str(&name);
        state.segment = name.into_owned();
        state.is_header = HEADER_SEGMENTS.contains(&state.segment.as_str());
        state.last = [None; 3];

        for field in &fields {
            self.visit_field(field, state)?;
        }

        state.out.push_str(&state.config.segment_terminator);
        state.last = [None; 3];
        state.segments += 1;
        trace!(segment = %state.segment, "closed segment");
        Ok(())
    }

    /// Depth 2.
    fn visit_field<N: MessageNode>(
        &self,
        node: &N,
        state: &mut TranscoderState<'_>,
    ) -> TranscodeResult<()> {
        let name = node.name();
        let position = match naming::child_position(&name, &state.segment) {
            Some(position) => position,
            None => return Err(name_error(node, &name, &state.segment)),
        };

        if state.is_header && position <= 2 {
            return self.visit_header_field(node, position, state);
        }

        state.ensure_separators(node)?;
        state.write_separator(node, FIELD, position)?;
        state.last[COMPONENT] = None;
        state.last[SUBCOMPONENT] = None;

        let children = node.children();
        if children.is_empty() {
            return state.write_text(node);
        }
        for component in &children {
            self.visit_component(component, &name, state)?;
        }
        Ok(())
    }

    /// `SEG.1` and `SEG.2` of a header: literal text declaring separators.
    fn visit_header_field<N: MessageNode>(
        &self,
        node: &N,
        position: u32,
        state: &mut TranscoderState<'_>,
    ) -> TranscodeResult<()> {
        if let Some(last) = state.last[FIELD] {
            if last >= position {
                return Err(error(TranscodeErrorKind::OutOfOrder, node));
            }
        }

        let text = node.text();
        if position == 1 {
            let mut chars = text.chars();
            let (Some(field_separator), None) = (chars.next(), chars.next()) else {
                return Err(error(TranscodeErrorKind::MalformedSeparator, node)
                    .with_message(format!("expected one character, found {:?}", text)));
            };
            state.separators = DeclaredSeparators {
                field: Some(field_separator),
                ..Default::default()
            };
            state.separators_ready = false;
            state.out.push(field_separator);
        } else {
            let Some(field_separator) = state
                .separators
                .field
                .filter(|_| state.last[FIELD] == Some(1))
            else {
                return Err(error(TranscodeErrorKind::SeparatorUndefined, node)
                    .with_message("the field separator field must come first"));
            };
            let declared = DeclaredSeparators::from_header(&field_separator.to_string(), &text)
                .map_err(|message| {
                    error(TranscodeErrorKind::MalformedSeparator, node).with_message(message)
                })?;
            state.separators = match &state.config.fallback_separators {
                Some(fallback) => declared.or_fallback(fallback),
                None => declared,
            };
            state.separators_ready = true;
            state.out.push_str(&text);
            trace!(segment = %state.segment, encoding = %text, "declared separators");
        }
        state.last[FIELD] = Some(position);
        Ok(())
    }

    /// Depth 3.
    fn visit_component<N: MessageNode>(
        &self,
        node: &N,
        field_name: &str,
        state: &mut TranscoderState<'_>,
    ) -> TranscodeResult<()> {
        let name = node.name();
        let position = nested_position(node, &name, field_name)?;
        state.write_separator(node, COMPONENT, position)?;
        state.last[SUBCOMPONENT] = None;

        let children = node.children();
        if children.is_empty() {
            return state.write_text(node);
        }
        for subcomponent in &children {
            self.visit_subcomponent(subcomponent, &name, state)?;
        }
        Ok(())
    }

    /// Depth 4.
    fn visit_subcomponent<N: MessageNode>(
        &self,
        node: &N,
        component_name: &str,
        state: &mut TranscoderState<'_>,
    ) -> TranscodeResult<()> {
        let name = node.name();
        let position = nested_position(node, &name, component_name)?;
        state.write_separator(node, SUBCOMPONENT, position)?;

        if let Some(child) = node.children().first() {
            return Err(error(TranscodeErrorKind::NestingTooDeep, child));
        }
        state.write_text(node)
    }
}

impl TranscoderState<'_> {
    /// Applies the fallback separators when no header declared them.
    fn ensure_separators<N: MessageNode>(&mut self, node: &N) -> TranscodeResult<()> {
        if self.separators_ready {
            return Ok(());
        }
        match &self.config.fallback_separators {
            Some(fallback) => {
                self.separators = self.separators.or_fallback(fallback);
                self.separators_ready = true;
                Ok(())
            }
            None => Err(error(TranscodeErrorKind::SeparatorUndefined, node)
                .with_message("value encoded before the header declared the separators")),
        }
    }

    /// Writes the separators that precede the sibling at `position`.
    fn write_separator<N: MessageNode>(
        &mut self,
        node: &N,
        level: usize,
        position: u32,
    ) -> TranscodeResult<()> {
        let count = match self.last[level] {
            // In a header the first separator is field 1 itself, and once
            // written it also stands before field 2.
            None if level == FIELD && self.is_header => position - 1,
            Some(1) if level == FIELD && self.is_header => position - 2,
            None if level == FIELD => position,
            None => position - 1,
            Some(last) if last == position => {
                if level != FIELD {
                    return Err(error(TranscodeErrorKind::RepeatedPosition, node));
                }
                let repetition = self.separator(node, self.separators.repetition, "repetition")?;
                self.out.push(repetition);
                0
            }
            Some(last) if last < position => position - last,
            Some(_) => return Err(error(TranscodeErrorKind::OutOfOrder, node)),
        };

        if count > 0 {
            let declared = match level {
                FIELD => self.separators.field,
                COMPONENT => self.separators.component,
                _ => self.separators.subcomponent,
            };
            let separator = self.separator(node, declared, level_name(level))?;
            self.out.extend(std::iter::repeat(separator).take(count as usize));
        }
        self.last[level] = Some(position);
        Ok(())
    }

    fn separator<N: MessageNode>(
        &self,
        node: &N,
        declared: Option<char>,
        which: &str,
    ) -> TranscodeResult<char> {
        declared.ok_or_else(|| {
            error(TranscodeErrorKind::SeparatorUndefined, node)
                .with_message(format!("no {} separator declared", which))
        })
    }

    /// Escapes and writes a leaf's text.
    fn write_text<N: MessageNode>(&mut self, node: &N) -> TranscodeResult<()> {
        let text = node.text();
        let escaped = self
            .separators
            .escape(&text, self.config.escape_line_breaks)
            .map_err(|c| {
                error(TranscodeErrorKind::SeparatorUndefined, node)
                    .with_message(format!(
                        "{:?} needs escaping but no escape character is declared",
                        c
                    ))
            })?;
        self.out.push_str(&escaped);
        Ok(())
    }
}

fn level_name(level: usize) -> &'static str {
    match level {
        FIELD => "field",
        COMPONENT => "component",
        _ => "subcomponent",
    }
}

/// Position of a component or subcomponent named `<prefix>.<n>`.
///
/// HL7 v2 XML names components after their data type (`XPN.1`), so any
/// undotted prefix is accepted; a dotted prefix (`PID.3.1`) must name the
/// parent.
fn nested_position<N: MessageNode>(node: &N, name: &str, parent: &str) -> TranscodeResult<u32> {
    let Some((prefix, position)) = naming::split_position(name) else {
        return Err(error(TranscodeErrorKind::MalformedName, node)
            .with_message(format!("expected `{}.<position>`", parent)));
    };
    if prefix.contains('.') && prefix != parent {
        return Err(error(TranscodeErrorKind::CodeMismatch, node)
            .with_message(format!("parent is `{}`", parent)));
    }
    Ok(position)
}

fn name_error<N: MessageNode>(node: &N, name: &str, segment: &str) -> TranscodeError {
    match naming::split_position(name) {
        Some((prefix, _)) if prefix != segment => error(TranscodeErrorKind::CodeMismatch, node)
            .with_message(format!("open segment is `{}`", segment)),
        _ => error(TranscodeErrorKind::MalformedName, node)
            .with_message(format!("expected `{}.<position>`", segment)),
    }
}

fn error<N: MessageNode>(reason: TranscodeErrorKind, node: &N) -> TranscodeError {
    TranscodeError::new(reason, node.name()).at(node.source_position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separators::SeparatorSet;
    use hl7_location::{ErrorKind, SourcePosition};

    const HEADER: &str = "<MSH><MSH.1>|</MSH.1><MSH.2>^~\\&amp;</MSH.2></MSH>";

    fn transcode(body: &str) -> TranscodeResult<String> {
        Transcoder::new().transcode_xml(&format!("<ADT_A01>{}{}</ADT_A01>", HEADER, body))
    }

    fn segment(er7: &str, code: &str) -> String {
        er7.split('\r')
            .find(|s| s.starts_with(code))
            .unwrap_or_default()
            .to_string()
    }

    mod separators {
        use super::*;

        #[test]
        fn test_header_is_literal() {
            let er7 = transcode("").unwrap();
            assert_eq!(er7, "MSH|^~\\&\r");
        }

        #[test]
        fn test_field_separator_before_each_field() {
            let er7 = transcode("<PID><PID.1>1</PID.1><PID.2>2</PID.2></PID>").unwrap();
            assert_eq!(segment(&er7, "PID"), "PID|1|2");
        }

        #[test]
        fn test_gap_between_fields() {
            let er7 = transcode("<PID><PID.1>a</PID.1><PID.3>c</PID.3></PID>").unwrap();
            assert_eq!(segment(&er7, "PID"), "PID|a||c");
        }

        #[test]
        fn test_leading_gap() {
            let er7 = transcode("<PID><PID.3>c</PID.3></PID>").unwrap();
            assert_eq!(segment(&er7, "PID"), "PID|||c");
        }

        #[test]
        fn test_repetition() {
            let er7 = transcode("<PID><PID.3>a</PID.3><PID.3>b</PID.3><PID.4>x</PID.4></PID>").unwrap();
            assert_eq!(segment(&er7, "PID"), "PID|||a~b|x");
        }

        #[test]
        fn test_component_and_subcomponent_gaps() {
            let er7 = transcode(
                "<PID><PID.3><CX.1>id</CX.1><CX.4><HD.2>1.2</HD.2><HD.3>ISO</HD.3></CX.4></PID.3></PID>",
            )
            .unwrap();
            assert_eq!(segment(&er7, "PID"), "PID|||id^^^&1.2&ISO");
        }

        #[test]
        fn test_component_trackers_reset_per_repetition() {
            let er7 = transcode(
                "<PID><PID.3><CX.1>a</CX.1><CX.2>b</CX.2></PID.3><PID.3><CX.2>c</CX.2></PID.3></PID>",
            )
            .unwrap();
            assert_eq!(segment(&er7, "PID"), "PID|||a^b~^c");
        }

        #[test]
        fn test_custom_separators() {
            let xml = "<ADT_A01><MSH><MSH.1>#</MSH.1><MSH.2>$%!*</MSH.2></MSH>\
                       <PID><PID.3><CX.1>a#b</CX.1><CX.2>c</CX.2></PID.3></PID></ADT_A01>";
            let er7 = Transcoder::new().transcode_xml(xml).unwrap();
            assert_eq!(er7, "MSH#$%!*\rPID###a!F!b$c\r");
        }

        #[test]
        fn test_segment_groups_are_elided() {
            let er7 = transcode(
                "<ADT_A01.INSURANCE><IN1><IN1.1>1</IN1.1></IN1></ADT_A01.INSURANCE>",
            )
            .unwrap();
            assert_eq!(er7, "MSH|^~\\&\rIN1|1\r");
        }

        #[test]
        fn test_empty_segment() {
            let er7 = transcode("<EVN/>").unwrap();
            assert_eq!(er7, "MSH|^~\\&\rEVN\r");
        }
    }

    mod escaping {
        use super::*;

        #[test]
        fn test_reserved_characters_escaped() {
            let er7 = transcode("<NTE><NTE.3>a|b^c~d\\e&amp;f</NTE.3></NTE>").unwrap();
            assert_eq!(segment(&er7, "NTE"), "NTE|||a\\F\\b\\S\\c\\R\\d\\E\\e\\T\\f");
        }

        #[test]
        fn test_line_breaks() {
            let er7 = transcode("<NTE><NTE.3>one&#13;two</NTE.3></NTE>").unwrap();
            assert_eq!(segment(&er7, "NTE"), "NTE|||one\\X0D\\two");
        }

        #[test]
        fn test_terminator_config() {
            let transcoder = Transcoder::with_config(
                TranscoderConfig::builder().with_segment_terminator("\n").build(),
            );
            let er7 = transcoder
                .transcode_xml(&format!("<ADT_A01>{}<EVN/></ADT_A01>", HEADER))
                .unwrap();
            assert_eq!(er7, "MSH|^~\\&\nEVN\n");
        }
    }

    mod failures {
        use super::*;

        fn reason(body: &str) -> TranscodeErrorKind {
            transcode(body).unwrap_err().reason()
        }

        #[test]
        fn test_segment_text_without_fields() {
            assert_eq!(reason("<EVN>x</EVN>"), TranscodeErrorKind::SegmentText);
            // Whitespace-only content is indentation.
            assert!(transcode("<EVN>\n  </EVN>").is_ok());
        }

        #[test]
        fn test_bad_segment_name() {
            let err = transcode("<PIDX><PIDX.1>1</PIDX.1></PIDX>").unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::MalformedName);
            assert_eq!(err.kind(), ErrorKind::Structural);
            assert_eq!(err.tag(), "PIDX");
            assert!(err.position().is_some());
        }

        #[test]
        fn test_field_of_other_segment() {
            let err = transcode("<PID><PV1.2>I</PV1.2></PID>").unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::CodeMismatch);
            assert_eq!(err.tag(), "PV1.2");
        }

        #[test]
        fn test_field_without_position() {
            assert_eq!(reason("<PID><PID.x>1</PID.x></PID>"), TranscodeErrorKind::MalformedName);
        }

        #[test]
        fn test_component_of_other_field() {
            assert_eq!(
                reason("<PID><PID.3><PID.4.1>1</PID.4.1></PID.3></PID>"),
                TranscodeErrorKind::CodeMismatch
            );
        }

        #[test]
        fn test_too_deep() {
            let err = transcode(
                "<PID><PID.3><CX.4><HD.1><X.1>deep</X.1></HD.1></CX.4></PID.3></PID>",
            )
            .unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::NestingTooDeep);
            assert_eq!(err.tag(), "X.1");
        }

        #[test]
        fn test_repeated_component() {
            assert_eq!(
                reason("<PID><PID.5><XPN.1>a</XPN.1><XPN.1>b</XPN.1></PID.5></PID>"),
                TranscodeErrorKind::RepeatedPosition
            );
        }

        #[test]
        fn test_out_of_order_fields() {
            assert_eq!(
                reason("<PID><PID.5>a</PID.5><PID.3>b</PID.3></PID>"),
                TranscodeErrorKind::OutOfOrder
            );
        }

        #[test]
        fn test_field_before_separators() {
            let err = Transcoder::new()
                .transcode_xml("<ADT_A01><MSH><MSH.1>|</MSH.1><MSH.3>APP</MSH.3></MSH></ADT_A01>")
                .unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::SeparatorUndefined);
            assert_eq!(err.kind(), ErrorKind::Separator);
            assert_eq!(err.tag(), "MSH.3");
        }

        #[test]
        fn test_no_header() {
            let err = Transcoder::new()
                .transcode_xml("<ADT_A01><PID><PID.3>1</PID.3></PID></ADT_A01>")
                .unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::SeparatorUndefined);
        }

        #[test]
        fn test_partial_header_missing_component_separator() {
            let err = Transcoder::new()
                .transcode_xml(
                    "<ADT_A01><MSH><MSH.1>|</MSH.1><MSH.2>^</MSH.2></MSH>\
                     <PID><PID.3>a</PID.3><PID.3>b</PID.3></PID></ADT_A01>",
                )
                .unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::SeparatorUndefined);
            assert_eq!(err.tag(), "PID.3");
        }

        #[test]
        fn test_malformed_field_separator() {
            let err = Transcoder::new()
                .transcode_xml("<ADT_A01><MSH><MSH.1>||</MSH.1></MSH></ADT_A01>")
                .unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::MalformedSeparator);
        }

        #[test]
        fn test_encoding_characters_before_field_separator() {
            let err = Transcoder::new()
                .transcode_xml("<ADT_A01><MSH><MSH.2>^~\\&amp;</MSH.2></MSH></ADT_A01>")
                .unwrap_err();
            assert_eq!(err.reason(), TranscodeErrorKind::SeparatorUndefined);
        }

        #[test]
        fn test_position_points_at_element() {
            let xml = "<ADT_A01>\n  <MSH><MSH.1>|</MSH.1><MSH.2>^~\\&amp;</MSH.2></MSH>\n  <PID>\n    <PV1.3>x</PV1.3>\n  </PID>\n</ADT_A01>";
            let err = Transcoder::new().transcode_xml(xml).unwrap_err();
            assert_eq!(err.position(), Some(SourcePosition::new(4, 5)));
        }
    }

    mod fallback {
        use super::*;

        fn lenient() -> Transcoder {
            Transcoder::with_config(
                TranscoderConfig::builder()
                    .with_fallback_separators(SeparatorSet::default())
                    .build(),
            )
        }

        #[test]
        fn test_headerless_message_uses_fallback() {
            let er7 = lenient()
                .transcode_xml("<ADT_A01><PID><PID.3><CX.1>a</CX.1><CX.2>b</CX.2></PID.3></PID></ADT_A01>")
                .unwrap();
            assert_eq!(er7, "PID|||a^b\r");
        }

        #[test]
        fn test_fallback_fills_partial_header() {
            let er7 = lenient()
                .transcode_xml(
                    "<ADT_A01><MSH><MSH.1>|</MSH.1><MSH.2>^</MSH.2></MSH>\
                     <PID><PID.3>a</PID.3><PID.3>b</PID.3></PID></ADT_A01>",
                )
                .unwrap();
            assert_eq!(er7, "MSH|^\rPID|||a~b\r");
        }

        #[test]
        fn test_declared_separators_take_precedence() {
            let er7 = lenient()
                .transcode_xml(
                    "<ADT_A01><MSH><MSH.1>#</MSH.1><MSH.2>$%!*</MSH.2></MSH>\
                     <PID><PID.3>a</PID.3></PID></ADT_A01>",
                )
                .unwrap();
            assert_eq!(er7, "MSH#$%!*\rPID###a\r");
        }

        #[test]
        fn test_header_fields_stay_aligned_without_encoding_characters() {
            let er7 = lenient()
                .transcode_xml("<ADT_A01><MSH><MSH.1>|</MSH.1><MSH.3>APP</MSH.3></MSH></ADT_A01>")
                .unwrap();
            assert_eq!(er7, "MSH||APP\r");
            // MSH.1 is the first separator, so MSH.n sits at split index n - 1.
            let fields: Vec<&str> = er7.trim_end_matches('\r').split('|').collect();
            assert_eq!(fields.get(2), Some(&"APP"));
        }

        #[test]
        fn test_header_fields_stay_aligned_without_separator_fields() {
            let er7 = lenient()
                .transcode_xml("<ADT_A01><MSH><MSH.3>APP</MSH.3><MSH.5>LAB</MSH.5></MSH></ADT_A01>")
                .unwrap();
            assert_eq!(er7, "MSH||APP||LAB\r");
        }
    }
}
