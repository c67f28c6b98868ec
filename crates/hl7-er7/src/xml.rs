//! HL7 v2 XML documents as message trees.
//!
//! [`XmlElement::parse`] reads the markup once into an owned tree; `&XmlElement`
//! implements [`MessageNode`] so discovery and transcoding run over it.
//!
//! Only element structure and text matter: namespace prefixes are dropped,
//! attributes, comments and processing instructions are ignored, and text
//! and CDATA sections are concatenated.

use std::borrow::Cow;

use hl7_location::{MessageNode, SourcePosition};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{TranscodeError, TranscodeErrorKind, TranscodeResult};

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name, without namespace prefix.
    pub name: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Concatenated text content, entities decoded.
    pub text: String,
    /// Where the start tag begins.
    pub position: SourcePosition,
}

impl XmlElement {
    /// Parses a document and returns its root element.
    ///
    /// # Errors
    ///
    /// A [`TranscodeErrorKind::Markup`] error when the document is not well
    /// formed or has no single root element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hl7_er7::xml::XmlElement;
    ///
    /// let root = XmlElement::parse("<ADT_A01><PID><PID.3>123</PID.3></PID></ADT_A01>").unwrap();
    /// assert_eq!(root.name, "ADT_A01");
    /// assert_eq!(root.children[0].children[0].text, "123");
    /// ```
    pub fn parse(xml: &str) -> TranscodeResult<XmlElement> {
        let lines = LineIndex::new(xml);
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let offset = markup_start(xml, reader.buffer_position() as usize);
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let position = lines.position(reader.error_position() as usize);
                    return Err(markup_error(&open, e.to_string()).at(Some(position)));
                }
            };

            match event {
                Event::Start(start) => {
                    let element = XmlElement::open(&start, lines.position(offset), &open)?;
                    open.push(element);
                }
                Event::Empty(start) => {
                    let element = XmlElement::open(&start, lines.position(offset), &open)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let Some(element) = open.pop() else {
                        return Err(markup_error(&open, "unexpected end tag")
                            .at(Some(lines.position(offset))));
                    };
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = open.last_mut() {
                        let decoded = text.unescape().map_err(|e| {
                            TranscodeError::new(TranscodeErrorKind::Markup, current.name.clone())
                                .at(Some(lines.position(offset)))
                                .with_message(e.to_string())
                        })?;
                        current.text.push_str(&decoded);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = open.last_mut() {
                        let decoded = std::str::from_utf8(&data).map_err(|e| {
                            TranscodeError::new(TranscodeErrorKind::Markup, current.name.clone())
                                .at(Some(lines.position(offset)))
                                .with_message(e.to_string())
                        })?;
                        current.text.push_str(decoded);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(
                TranscodeError::new(TranscodeErrorKind::Markup, unclosed.name.clone())
                    .at(Some(unclosed.position))
                    .with_message("element is never closed"),
            );
        }
        root.ok_or_else(|| {
            TranscodeError::new(TranscodeErrorKind::Markup, "#document")
                .with_message("no root element")
        })
    }

    fn open(start: &BytesStart<'_>, position: SourcePosition, open: &[XmlElement]) -> TranscodeResult<Self> {
        let local = start.local_name();
        let name = std::str::from_utf8(local.as_ref())
            .map_err(|e| markup_error(open, e.to_string()).at(Some(position)))?;
        Ok(XmlElement {
            name: name.to_string(),
            children: Vec::new(),
            text: String::new(),
            position,
        })
    }

    /// Returns true if the element has no child elements.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> TranscodeResult<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(
            TranscodeError::new(TranscodeErrorKind::Markup, element.name.clone())
                .at(Some(element.position))
                .with_message("second root element"),
        );
    }
    *root = Some(element);
    Ok(())
}

/// Backs up onto the `<` of the markup that starts at or just before `offset`.
fn markup_start(xml: &str, offset: usize) -> usize {
    let bytes = xml.as_bytes();
    if bytes.get(offset) != Some(&b'<') && offset > 0 && bytes.get(offset - 1) == Some(&b'<') {
        offset - 1
    } else {
        offset
    }
}

fn markup_error(open: &[XmlElement], message: impl Into<String>) -> TranscodeError {
    let tag = open.last().map_or("#document", |e| e.name.as_str());
    TranscodeError::new(TranscodeErrorKind::Markup, tag).with_message(message)
}

impl<'a> MessageNode for &'a XmlElement {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn children(&self) -> Vec<Self> {
        let element: &'a XmlElement = self;
        element.children.iter().collect()
    }

    /// Text of elements with children is indentation, not content.
    fn text(&self) -> Cow<'_, str> {
        if self.children.is_empty() {
            Cow::Borrowed(&self.text)
        } else {
            Cow::Borrowed("")
        }
    }

    fn source_position(&self) -> Option<SourcePosition> {
        Some(self.position)
    }
}

/// Byte offsets of line starts, for offset to line/column conversion.
struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, starts }
    }

    fn position(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.text.len());
        let line = self.starts.partition_point(|&start| start <= offset).max(1);
        let start = self.starts[line - 1];
        let column = self
            .text
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        SourcePosition::new(to_u32(line), to_u32(column + 1))
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl7_location::ErrorKind;

    const ADT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ADT_A01 xmlns="urn:hl7-org:v2xml">
  <MSH>
    <MSH.1>|</MSH.1>
    <MSH.2>^~\&amp;</MSH.2>
  </MSH>
  <!-- demographics -->
  <hl7:PID xmlns:hl7="urn:hl7-org:v2xml">
    <hl7:PID.5><XPN.1>O&apos;Brien</XPN.1><XPN.2><![CDATA[<Pat>]]></XPN.2></hl7:PID.5>
    <PID.8/>
  </hl7:PID>
</ADT_A01>
"#;

    #[test]
    fn test_parse_structure() {
        let root = XmlElement::parse(ADT).unwrap();
        assert_eq!(root.name, "ADT_A01");
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["MSH", "PID"]);

        let pid = &root.children[1];
        assert_eq!(pid.children[0].name, "PID.5");
        assert_eq!(pid.children[1].name, "PID.8");
        assert!(pid.children[1].is_leaf());
    }

    #[test]
    fn test_text_entities_and_cdata() {
        let root = XmlElement::parse(ADT).unwrap();
        assert_eq!(root.children[0].children[1].text, "^~\\&");
        let name = &root.children[1].children[0];
        assert_eq!(name.children[0].text, "O'Brien");
        assert_eq!(name.children[1].text, "<Pat>");
    }

    #[test]
    fn test_positions() {
        let root = XmlElement::parse(ADT).unwrap();
        assert_eq!(root.position, SourcePosition::new(2, 1));
        assert_eq!(root.children[0].position, SourcePosition::new(3, 3));
        assert_eq!(root.children[1].children[1].position, SourcePosition::new(10, 5));
    }

    #[test]
    fn test_node_text_ignores_indentation() {
        let root = XmlElement::parse(ADT).unwrap();
        let msh = &root.children[0];
        assert!(!msh.text.is_empty());
        assert_eq!((&msh).text(), "");
        assert_eq!((&msh.children[0]).text(), "|");
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = XmlElement::parse("<A>\n  <B>\n  </C>\n</A>").unwrap_err();
        assert_eq!(err.reason(), TranscodeErrorKind::Markup);
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.position().map(|p| p.line), Some(3));
    }

    #[test]
    fn test_unclosed_element() {
        let err = XmlElement::parse("<A>\n<B>text</B>").unwrap_err();
        assert_eq!(err.reason(), TranscodeErrorKind::Markup);
    }

    #[test]
    fn test_empty_document() {
        let err = XmlElement::parse("  ").unwrap_err();
        assert_eq!(err.tag(), "#document");
    }

    #[test]
    fn test_line_index_columns_count_characters() {
        let index = LineIndex::new("ab\nçd<e");
        assert_eq!(index.position(0), SourcePosition::new(1, 1));
        assert_eq!(index.position(3), SourcePosition::new(2, 1));
        assert_eq!(index.position(6), SourcePosition::new(2, 3));
    }
}
