//! Separator sets and escape sequences.

use std::borrow::Cow;
use std::fmt;

/// The five characters that tokenize an ER7 message.
///
/// The default is the conventional `|^~\&`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeparatorSet {
    /// Between fields (`|`).
    pub field: char,
    /// Between components (`^`).
    pub component: char,
    /// Between field repetitions (`~`).
    pub repetition: char,
    /// Opens and closes escape sequences (`\`).
    pub escape: char,
    /// Between subcomponents (`&`).
    pub subcomponent: char,
}

impl Default for SeparatorSet {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl SeparatorSet {
    /// The header's second field: component, repetition, escape, subcomponent.
    pub fn encoding_characters(&self) -> String {
        [self.component, self.repetition, self.escape, self.subcomponent]
            .iter()
            .collect()
    }

    /// Replaces every separator in `text` with its escape sequence.
    ///
    /// ```rust
    /// use hl7_er7::SeparatorSet;
    ///
    /// let separators = SeparatorSet::default();
    /// assert_eq!(separators.escape("A|B^C"), "A\\F\\B\\S\\C");
    /// ```
    pub fn escape(&self, text: &str) -> String {
        let declared = DeclaredSeparators::from(*self);
        match declared.escape(text, false) {
            Ok(escaped) => escaped.into_owned(),
            Err(_) => text.to_string(),
        }
    }

    /// Decodes escape sequences in `text`.
    pub fn unescape(&self, text: &str) -> String {
        DeclaredSeparators::from(*self).unescape(text).into_owned()
    }
}

impl fmt::Display for SeparatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.field, self.encoding_characters())
    }
}

/// Separators as declared by a message header.
///
/// A header may declare fewer than four encoding characters, so every
/// separator is optional until declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeclaredSeparators {
    /// Field separator.
    pub field: Option<char>,
    /// Component separator.
    pub component: Option<char>,
    /// Repetition separator.
    pub repetition: Option<char>,
    /// Escape character.
    pub escape: Option<char>,
    /// Subcomponent separator.
    pub subcomponent: Option<char>,
}

impl From<SeparatorSet> for DeclaredSeparators {
    fn from(set: SeparatorSet) -> Self {
        Self {
            field: Some(set.field),
            component: Some(set.component),
            repetition: Some(set.repetition),
            escape: Some(set.escape),
            subcomponent: Some(set.subcomponent),
        }
    }
}

impl DeclaredSeparators {
    /// Reads separators from a header's first two fields.
    ///
    /// `field` must be exactly one character; `encoding` holds one to four
    /// characters assigned positionally to component, repetition, escape and
    /// subcomponent. All declared characters must differ.
    pub fn from_header(field: &str, encoding: &str) -> Result<Self, String> {
        let mut field_chars = field.chars();
        let (Some(field_separator), None) = (field_chars.next(), field_chars.next()) else {
            return Err(format!(
                "field separator must be one character, found {:?}",
                field
            ));
        };

        let encoding: Vec<char> = encoding.chars().collect();
        if encoding.is_empty() || encoding.len() > 4 {
            return Err(format!(
                "expected 1 to 4 encoding characters, found {}",
                encoding.len()
            ));
        }

        let mut seen = vec![field_separator];
        for c in &encoding {
            if seen.contains(c) {
                return Err(format!("separator {:?} declared twice", c));
            }
            seen.push(*c);
        }

        Ok(Self {
            field: Some(field_separator),
            component: encoding.first().copied(),
            repetition: encoding.get(1).copied(),
            escape: encoding.get(2).copied(),
            subcomponent: encoding.get(3).copied(),
        })
    }

    /// Fills undeclared separators from `fallback`.
    pub fn or_fallback(self, fallback: &SeparatorSet) -> Self {
        Self {
            field: self.field.or(Some(fallback.field)),
            component: self.component.or(Some(fallback.component)),
            repetition: self.repetition.or(Some(fallback.repetition)),
            escape: self.escape.or(Some(fallback.escape)),
            subcomponent: self.subcomponent.or(Some(fallback.subcomponent)),
        }
    }

    /// Returns the full set if all five are declared.
    pub fn complete(&self) -> Option<SeparatorSet> {
        Some(SeparatorSet {
            field: self.field?,
            component: self.component?,
            repetition: self.repetition?,
            escape: self.escape?,
            subcomponent: self.subcomponent?,
        })
    }

    /// Escape token letter for a reserved character.
    fn token_for(&self, c: char) -> Option<&'static str> {
        let is = |separator: Option<char>| separator == Some(c);
        if is(self.escape) {
            Some("E")
        } else if is(self.field) {
            Some("F")
        } else if is(self.component) {
            Some("S")
        } else if is(self.subcomponent) {
            Some("T")
        } else if is(self.repetition) {
            Some("R")
        } else {
            None
        }
    }

    /// Escapes every declared separator in `text` in one pass.
    ///
    /// A single pass is equivalent to escaping the escape character first,
    /// so inserted sequences are never escaped again. With
    /// `escape_line_breaks`, CR and LF become `\X0D\` and `\X0A\`.
    ///
    /// Returns the first character that needs escaping when no escape
    /// character is declared.
    pub fn escape<'t>(&self, text: &'t str, escape_line_breaks: bool) -> Result<Cow<'t, str>, char> {
        let line_break = |c: char| escape_line_breaks && (c == '\r' || c == '\n');
        let Some(offending) = text
            .chars()
            .find(|c| self.token_for(*c).is_some() || line_break(*c))
        else {
            return Ok(Cow::Borrowed(text));
        };
        let Some(escape) = self.escape else {
            return Err(offending);
        };

        let mut out = String::with_capacity(text.len() + 8);
        for c in text.chars() {
            let token = match c {
                _ if self.token_for(c).is_some() => self.token_for(c),
                '\r' if escape_line_breaks => Some("X0D"),
                '\n' if escape_line_breaks => Some("X0A"),
                _ => None,
            };
            match token {
                Some(token) => {
                    out.push(escape);
                    out.push_str(token);
                    out.push(escape);
                }
                None => out.push(c),
            }
        }
        Ok(Cow::Owned(out))
    }

    /// Decodes `\F\ \S\ \T\ \R\ \E\` and `\Xhh..\` sequences.
    ///
    /// Unknown or unterminated sequences are kept verbatim.
    pub fn unescape<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let Some(escape) = self.escape else {
            return Cow::Borrowed(text);
        };
        if !text.contains(escape) {
            return Cow::Borrowed(text);
        }

        let width = escape.len_utf8();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(escape) {
            out.push_str(&rest[..start]);
            let after = &rest[start + width..];
            let Some(end) = after.find(escape) else {
                out.push_str(&rest[start..]);
                return Cow::Owned(out);
            };
            let token = &after[..end];
            match self.decode_token(token) {
                Some(decoded) => out.push_str(&decoded),
                None => {
                    out.push(escape);
                    out.push_str(token);
                    out.push(escape);
                }
            }
            rest = &after[end + width..];
        }
        out.push_str(rest);
        Cow::Owned(out)
    }

    fn decode_token(&self, token: &str) -> Option<String> {
        let separator = match token {
            "F" => self.field,
            "S" => self.component,
            "T" => self.subcomponent,
            "R" => self.repetition,
            "E" => self.escape,
            _ => return decode_hex(token.strip_prefix('X')?),
        };
        separator.map(String::from)
    }
}

fn decode_hex(digits: &str) -> Option<String> {
    if digits.is_empty() || digits.len() % 2 != 0 || !digits.is_ascii() {
        return None;
    }
    let bytes = (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(field: &str, encoding: &str) -> DeclaredSeparators {
        DeclaredSeparators::from_header(field, encoding).unwrap()
    }

    #[test]
    fn test_default_set() {
        let set = SeparatorSet::default();
        assert_eq!(set.to_string(), "|^~\\&");
        assert_eq!(set.encoding_characters(), "^~\\&");
    }

    #[test]
    fn test_from_full_header() {
        let separators = declared("|", "^~\\&");
        assert_eq!(separators.complete(), Some(SeparatorSet::default()));
    }

    #[test]
    fn test_from_partial_header() {
        let separators = declared("|", "^~");
        assert_eq!(separators.component, Some('^'));
        assert_eq!(separators.repetition, Some('~'));
        assert_eq!(separators.escape, None);
        assert_eq!(separators.subcomponent, None);
        assert_eq!(separators.complete(), None);
    }

    #[test]
    fn test_custom_header() {
        let separators = declared("#", "$%!*");
        assert_eq!(separators.component, Some('$'));
        assert_eq!(separators.subcomponent, Some('*'));
    }

    #[test]
    fn test_malformed_headers() {
        assert!(DeclaredSeparators::from_header("", "^~\\&").is_err());
        assert!(DeclaredSeparators::from_header("||", "^~\\&").is_err());
        assert!(DeclaredSeparators::from_header("|", "").is_err());
        assert!(DeclaredSeparators::from_header("|", "^~\\&#!").is_err());
        assert!(DeclaredSeparators::from_header("|", "^^").is_err());
        assert!(DeclaredSeparators::from_header("|", "^|").is_err());
    }

    #[test]
    fn test_or_fallback_fills_missing() {
        let separators = declared("|", "^~").or_fallback(&SeparatorSet::default());
        assert_eq!(separators.complete(), Some(SeparatorSet::default()));
    }

    #[test]
    fn test_escape_every_separator() {
        let separators = SeparatorSet::default();
        assert_eq!(separators.escape("a|b^c~d\\e&f"), "a\\F\\b\\S\\c\\R\\d\\E\\e\\T\\f");
    }

    #[test]
    fn test_escape_does_not_double_escape() {
        let separators = SeparatorSet::default();
        assert_eq!(separators.escape("\\F\\"), "\\E\\F\\E\\");
    }

    #[test]
    fn test_escape_untouched_text_is_borrowed() {
        let separators = DeclaredSeparators::from(SeparatorSet::default());
        assert!(matches!(separators.escape("plain", true), Ok(Cow::Borrowed("plain"))));
    }

    #[test]
    fn test_escape_line_breaks() {
        let separators = DeclaredSeparators::from(SeparatorSet::default());
        assert_eq!(separators.escape("a\rb", true).unwrap(), "a\\X0D\\b");
        assert_eq!(separators.escape("a\rb", false).unwrap(), "a\rb");
    }

    #[test]
    fn test_escape_without_escape_character() {
        let separators = declared("|", "^~");
        assert_eq!(separators.escape("a&b", false).unwrap(), "a&b");
        assert_eq!(separators.escape("a^b", false), Err('^'));
    }

    #[test]
    fn test_unescape() {
        let separators = SeparatorSet::default();
        assert_eq!(separators.unescape("a\\F\\b\\S\\c\\R\\d\\E\\e\\T\\f"), "a|b^c~d\\e&f");
        assert_eq!(separators.unescape("line\\X0D0A\\end"), "line\r\nend");
    }

    #[test]
    fn test_unescape_keeps_unknown_sequences() {
        let separators = SeparatorSet::default();
        assert_eq!(separators.unescape("\\H\\bold\\N\\"), "\\H\\bold\\N\\");
        assert_eq!(separators.unescape("dangling\\F"), "dangling\\F");
        assert_eq!(separators.unescape("\\XZZ\\"), "\\XZZ\\");
    }

    #[test]
    fn test_escape_round_trip_with_custom_set() {
        let set = SeparatorSet {
            field: '#',
            component: '$',
            repetition: '%',
            escape: '!',
            subcomponent: '*',
        };
        let text = "50% off! #1 $5 * 2";
        assert_eq!(set.unescape(&set.escape(text)), text);
    }
}
