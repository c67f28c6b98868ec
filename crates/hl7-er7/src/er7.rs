//! Reading ER7 wire text back into a message tree.

use std::borrow::Cow;

use hl7_location::{naming, MessageNode};
use tracing::debug;

use crate::error::{Er7Error, Er7Result};
use crate::separators::DeclaredSeparators;

/// Segments whose first two fields declare separators.
const HEADER_SEGMENTS: [&str; 3] = ["MSH", "BHS", "FHS"];

/// Decoded subcomponents of one component.
type Component = Vec<String>;
/// Components of one field repetition.
type Repetition = Vec<Component>;
/// Repetitions of one field.
type Field = Vec<Repetition>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    code: String,
    /// `fields[0]` is field 1. For header segments fields 1 and 2 hold their
    /// literal text as a single value.
    fields: Vec<Field>,
    is_header: bool,
}

/// A parsed ER7 message.
///
/// Separators come from the first `MSH`, `BHS` or `FHS` segment. Values are
/// stored decoded; [`Er7Message::encode`] escapes them again.
///
/// The message is exposed as a tree through [`Er7Message::root`], named like
/// HL7 v2 XML (`PID`, `PID.3`, `PID.3.1`, `PID.3.1.2`). ER7 carries no
/// segment groups, so segments sit directly under the root.
///
/// # Example
///
/// ```rust
/// use hl7_er7::Er7Message;
///
/// let message = Er7Message::parse("MSH|^~\\&|APP||||||ADT^A01\rPID|||123^^^HOSP\r").unwrap();
/// assert_eq!(message.message_type(), "ADT_A01");
/// assert_eq!(message.segment_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Er7Message {
    separators: DeclaredSeparators,
    segments: Vec<Segment>,
}

impl Er7Message {
    /// Parses wire text. Segments may end in CR, LF or CRLF.
    ///
    /// # Errors
    ///
    /// - [`Er7Error::Empty`] when there are no segments
    /// - [`Er7Error::MissingHeader`] when no header declares separators
    /// - [`Er7Error::MalformedSeparators`] for a bad header
    /// - [`Er7Error::MalformedSegment`] for a line without a segment code
    pub fn parse(text: &str) -> Er7Result<Self> {
        let lines: Vec<&str> = text
            .split(['\r', '\n'])
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return Err(Er7Error::Empty);
        }

        let separators = lines
            .iter()
            .find_map(|line| header_separators(line))
            .ok_or(Er7Error::MissingHeader)??;

        let segments = lines
            .iter()
            .enumerate()
            .map(|(index, line)| parse_segment(line, index + 1, &separators))
            .collect::<Er7Result<Vec<_>>>()?;

        debug!(segments = segments.len(), "parsed ER7 message");
        Ok(Self {
            separators,
            segments,
        })
    }

    /// The separators declared by the header.
    pub fn separators(&self) -> &DeclaredSeparators {
        &self.separators
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segment codes in order.
    pub fn segment_codes(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.code.as_str())
    }

    /// Decoded value at `segment`-`field`[`repetition`].`component`.`subcomponent`,
    /// all 1-based.
    pub fn value(
        &self,
        segment: usize,
        field: usize,
        repetition: usize,
        component: usize,
        subcomponent: usize,
    ) -> Option<&str> {
        self.segments
            .get(segment.checked_sub(1)?)?
            .fields
            .get(field.checked_sub(1)?)?
            .get(repetition.checked_sub(1)?)?
            .get(component.checked_sub(1)?)?
            .get(subcomponent.checked_sub(1)?)
            .map(String::as_str)
    }

    /// Message structure: `MSH-9.3`, else `MSH-9.1` and `MSH-9.2` joined by
    /// `_`, else `MSH-9.1`.
    pub fn message_type(&self) -> String {
        let Some(index) = self.segments.iter().position(|s| s.code == "MSH") else {
            return String::new();
        };
        let part = |component| self.value(index + 1, 9, 1, component, 1).unwrap_or("");
        match (part(1), part(2), part(3)) {
            (_, _, structure) if !structure.is_empty() => structure.to_string(),
            (code, event, _) if !event.is_empty() => format!("{}_{}", code, event),
            (code, _, _) => code.to_string(),
        }
    }

    /// The message as a tree.
    pub fn root(&self) -> Er7Node<'_> {
        Er7Node {
            message: self,
            cursor: Cursor::Root,
        }
    }

    /// Writes the message back to wire text, one CR after each segment.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.code);
            for (index, field) in segment.fields.iter().enumerate() {
                // Header field 1 is the separator itself and field 2 follows it directly.
                if segment.is_header && index < 2 {
                    let literal = field.first().and_then(|r| r.first()).and_then(|c| c.first());
                    out.push_str(literal.map_or("", String::as_str));
                    continue;
                }
                out.extend(self.separators.field);
                self.encode_field(field, &mut out);
            }
            out.push('\r');
        }
        out
    }

    fn encode_field(&self, field: &Field, out: &mut String) {
        let separators = &self.separators;
        for (r, repetition) in field.iter().enumerate() {
            if r > 0 {
                out.extend(separators.repetition);
            }
            for (c, component) in repetition.iter().enumerate() {
                if c > 0 {
                    out.extend(separators.component);
                }
                for (s, subcomponent) in component.iter().enumerate() {
                    if s > 0 {
                        out.extend(separators.subcomponent);
                    }
                    match separators.escape(subcomponent, true) {
                        Ok(escaped) => out.push_str(&escaped),
                        Err(_) => out.push_str(subcomponent),
                    }
                }
            }
        }
    }
}

/// Reads the separators of a header line, if it is one.
fn header_separators(line: &str) -> Option<Er7Result<DeclaredSeparators>> {
    let code = line.get(..3)?;
    if !HEADER_SEGMENTS.contains(&code) {
        return None;
    }
    let rest = line.get(3..)?;
    let field_separator = rest.chars().next()?;
    let encoding = rest[field_separator.len_utf8()..]
        .split(field_separator)
        .next()
        .unwrap_or("");
    Some(
        DeclaredSeparators::from_header(&field_separator.to_string(), encoding).map_err(
            |message| Er7Error::MalformedSeparators {
                segment: code.to_string(),
                message,
            },
        ),
    )
}

fn parse_segment(
    line: &str,
    number: usize,
    separators: &DeclaredSeparators,
) -> Er7Result<Segment> {
    let malformed = || Er7Error::MalformedSegment {
        line: number,
        text: line.to_string(),
    };
    let code = line
        .get(..3)
        .filter(|code| naming::is_segment_code(code))
        .ok_or_else(malformed)?;
    let rest = &line[3..];
    let is_header = HEADER_SEGMENTS.contains(&code);

    let mut fields: Vec<Field> = Vec::new();
    if rest.is_empty() {
        return Ok(Segment {
            code: code.to_string(),
            fields,
            is_header,
        });
    }

    let field_separator = separators.field.ok_or_else(malformed)?;
    let body = rest.strip_prefix(field_separator).ok_or_else(malformed)?;

    let mut raw_fields = body.split(field_separator);
    if is_header {
        fields.push(literal(field_separator.to_string()));
        fields.push(literal(raw_fields.next().unwrap_or("").to_string()));
    }
    fields.extend(raw_fields.map(|raw| parse_field(raw, separators)));

    Ok(Segment {
        code: code.to_string(),
        fields,
        is_header,
    })
}

fn literal(text: String) -> Field {
    vec![vec![vec![text]]]
}

fn parse_field(raw: &str, separators: &DeclaredSeparators) -> Field {
    split(raw, separators.repetition)
        .map(|repetition| {
            split(repetition, separators.component)
                .map(|component| {
                    split(component, separators.subcomponent)
                        .map(|value| separators.unescape(value).into_owned())
                        .collect::<Component>()
                })
                .collect::<Repetition>()
        })
        .collect()
}

fn split(text: &str, separator: Option<char>) -> Box<dyn Iterator<Item = &str> + '_> {
    match separator {
        Some(separator) => Box::new(text.split(separator)),
        None => Box::new(std::iter::once(text)),
    }
}

fn is_empty_component(component: &Component) -> bool {
    component.iter().all(String::is_empty)
}

fn is_empty_repetition(repetition: &Repetition) -> bool {
    repetition.iter().all(is_empty_component)
}

/// Where a node sits in the message; indexes are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Root,
    Segment(usize),
    Field {
        segment: usize,
        field: usize,
        repetition: usize,
    },
    Component {
        segment: usize,
        field: usize,
        repetition: usize,
        component: usize,
    },
    Subcomponent {
        segment: usize,
        field: usize,
        repetition: usize,
        component: usize,
        subcomponent: usize,
    },
}

/// A node of an [`Er7Message`] tree.
///
/// Empty fields, components and subcomponents are not nodes, except that
/// an empty field repetition followed by a populated one stays so later
/// repetitions keep their instance numbers. A field or component holding a
/// single value is a leaf.
#[derive(Debug, Clone, Copy)]
pub struct Er7Node<'a> {
    message: &'a Er7Message,
    cursor: Cursor,
}

impl<'a> Er7Node<'a> {
    fn at(&self, cursor: Cursor) -> Self {
        Er7Node {
            message: self.message,
            cursor,
        }
    }

    fn segment(&self, index: usize) -> &'a Segment {
        &self.message.segments[index]
    }

    fn repetition(&self, segment: usize, field: usize, repetition: usize) -> &'a Repetition {
        &self.segment(segment).fields[field][repetition]
    }
}

impl<'a> MessageNode for Er7Node<'a> {
    fn name(&self) -> Cow<'_, str> {
        match self.cursor {
            Cursor::Root => Cow::Owned(self.message.message_type()),
            Cursor::Segment(segment) => Cow::Borrowed(&self.segment(segment).code),
            Cursor::Field { segment, field, .. } => {
                Cow::Owned(format!("{}.{}", self.segment(segment).code, field + 1))
            }
            Cursor::Component {
                segment,
                field,
                component,
                ..
            } => Cow::Owned(format!(
                "{}.{}.{}",
                self.segment(segment).code,
                field + 1,
                component + 1
            )),
            Cursor::Subcomponent {
                segment,
                field,
                component,
                subcomponent,
                ..
            } => Cow::Owned(format!(
                "{}.{}.{}.{}",
                self.segment(segment).code,
                field + 1,
                component + 1,
                subcomponent + 1
            )),
        }
    }

    fn children(&self) -> Vec<Self> {
        match self.cursor {
            Cursor::Root => (0..self.message.segments.len())
                .map(|segment| self.at(Cursor::Segment(segment)))
                .collect(),
            Cursor::Segment(segment) => {
                let mut children = Vec::new();
                for (field, repetitions) in self.segment(segment).fields.iter().enumerate() {
                    // Keep empty repetitions that precede a populated one.
                    let kept = repetitions
                        .iter()
                        .rposition(|r| !is_empty_repetition(r))
                        .map_or(0, |last| last + 1);
                    let literal = self.segment(segment).is_header && field < 2;
                    let kept = if literal { repetitions.len() } else { kept };
                    children.extend((0..kept).map(|repetition| {
                        self.at(Cursor::Field {
                            segment,
                            field,
                            repetition,
                        })
                    }));
                }
                children
            }
            Cursor::Field {
                segment,
                field,
                repetition,
            } => {
                let components = self.repetition(segment, field, repetition);
                if is_single_value(components) {
                    return Vec::new();
                }
                components
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| !is_empty_component(c))
                    .map(|(component, _)| {
                        self.at(Cursor::Component {
                            segment,
                            field,
                            repetition,
                            component,
                        })
                    })
                    .collect()
            }
            Cursor::Component {
                segment,
                field,
                repetition,
                component,
            } => {
                let subcomponents = &self.repetition(segment, field, repetition)[component];
                if subcomponents.len() == 1 {
                    return Vec::new();
                }
                subcomponents
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| !s.is_empty())
                    .map(|(subcomponent, _)| {
                        self.at(Cursor::Subcomponent {
                            segment,
                            field,
                            repetition,
                            component,
                            subcomponent,
                        })
                    })
                    .collect()
            }
            Cursor::Subcomponent { .. } => Vec::new(),
        }
    }

    fn text(&self) -> Cow<'_, str> {
        let value = match self.cursor {
            Cursor::Root | Cursor::Segment(_) => None,
            Cursor::Field {
                segment,
                field,
                repetition,
            } => {
                let components = self.repetition(segment, field, repetition);
                if is_single_value(components) {
                    components.first().and_then(|c| c.first())
                } else {
                    None
                }
            }
            Cursor::Component {
                segment,
                field,
                repetition,
                component,
            } => {
                let subcomponents = &self.repetition(segment, field, repetition)[component];
                if subcomponents.len() == 1 {
                    subcomponents.first()
                } else {
                    None
                }
            }
            Cursor::Subcomponent {
                segment,
                field,
                repetition,
                component,
                subcomponent,
            } => self.repetition(segment, field, repetition)[component].get(subcomponent),
        };
        Cow::Borrowed(value.map_or("", String::as_str))
    }
}

fn is_single_value(components: &Repetition) -> bool {
    components.len() == 1 && components.first().is_some_and(|c| c.len() == 1)
}
