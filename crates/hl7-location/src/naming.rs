//! Node naming conventions shared by tree-shaped message representations.
//!
//! | Node | Name | Example |
//! |------|------|---------|
//! | Message root | message structure id | `ADT_A01` |
//! | Segment group | `<parent>.<GROUP>` | `ADT_A01.INSURANCE` |
//! | Segment | 3-character code | `PID` |
//! | Field | `<SEG>.<position>` | `PID.3` |
//! | Component | `<field>.<position>` | `PID.3.1` |
//! | Subcomponent | `<component>.<position>` | `PID.3.1.2` |

/// Returns true for a 3-character segment code (`[A-Z0-9]{3}`).
pub fn is_segment_code(name: &str) -> bool {
    name.len() == 3 && name.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Returns true for a segment group token (`[A-Z0-9_]+`).
pub fn is_group_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Returns true when a node found where a segment is allowed names a
/// segment group instead.
pub fn is_group_name(name: &str) -> bool {
    name.contains('.')
}

/// Extracts the group token from a group node name (`ADT_A01.PATIENT` → `PATIENT`).
pub fn group_token(name: &str) -> Option<&str> {
    let (_, token) = name.rsplit_once('.')?;
    is_group_token(token).then_some(token)
}

/// Splits `<prefix>.<position>` into its parts.
///
/// Returns `None` unless the suffix is a positive integer without leading
/// zeros and the prefix is non-empty.
pub fn split_position(name: &str) -> Option<(&str, u32)> {
    let (prefix, digits) = name.rsplit_once('.')?;
    if prefix.is_empty() {
        return None;
    }
    parse_position(digits).map(|position| (prefix, position))
}

/// Returns the position of `name` when it is `<parent>.<position>`.
pub fn child_position(name: &str, parent: &str) -> Option<u32> {
    let rest = name.strip_prefix(parent)?.strip_prefix('.')?;
    parse_position(rest)
}

/// Builds the conventional name of a positional child.
pub fn child_name(parent: &str, position: u32) -> String {
    format!("{}.{}", parent, position)
}

pub(crate) fn parse_position(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_codes() {
        assert!(is_segment_code("PID"));
        assert!(is_segment_code("ZP1"));
        assert!(!is_segment_code("PI"));
        assert!(!is_segment_code("PIDX"));
        assert!(!is_segment_code("pid"));
        assert!(!is_segment_code("PI."));
    }

    #[test]
    fn test_group_tokens() {
        assert!(is_group_name("ADT_A01.INSURANCE"));
        assert!(!is_group_name("PID"));
        assert_eq!(group_token("ORU_R01.PATIENT_RESULT"), Some("PATIENT_RESULT"));
        assert_eq!(group_token("ORU_R01.patient"), None);
        assert_eq!(group_token("PID"), None);
    }

    #[test]
    fn test_split_position() {
        assert_eq!(split_position("PID.3"), Some(("PID", 3)));
        assert_eq!(split_position("PID.3.12"), Some(("PID.3", 12)));
        assert_eq!(split_position("CX.1"), Some(("CX", 1)));
        assert_eq!(split_position("PID.03"), None);
        assert_eq!(split_position("PID.0"), None);
        assert_eq!(split_position("PID.x"), None);
        assert_eq!(split_position(".3"), None);
        assert_eq!(split_position("PID"), None);
    }

    #[test]
    fn test_child_position() {
        assert_eq!(child_position("PID.3", "PID"), Some(3));
        assert_eq!(child_position("PID.3.1", "PID.3"), Some(1));
        assert_eq!(child_position("PV1.3", "PID"), None);
        assert_eq!(child_position("PID.3.1", "PID"), None);
        assert_eq!(child_position("PID3", "PID"), None);
    }

    #[test]
    fn test_child_name() {
        assert_eq!(child_name("PID", 3), "PID.3");
        assert_eq!(child_name("PID.3", 1), "PID.3.1");
    }
}
