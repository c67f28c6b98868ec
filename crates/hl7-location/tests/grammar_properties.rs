//! Property tests for the location grammar.

use hl7_location::{parse, parse_structural, ElementType, LocationAddress};
use proptest::prelude::*;

fn instance() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        (1u32..500).prop_map(|n| n.to_string()),
    ]
}

fn group() -> impl Strategy<Value = String> {
    ("[A-Z][A-Z0-9_]{0,15}", instance()).prop_map(|(name, n)| format!("{}[{}]/", name, n))
}

fn compact_location() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(group(), 0..3),
        "[A-Z][A-Z0-9]{2}",
        instance(),
        prop::option::of((
            1u32..100,
            instance(),
            prop::option::of((1u32..30, prop::option::of(1u32..30))),
        )),
    )
        .prop_map(|(groups, segment, segment_instance, field)| {
            let mut text = groups.concat();
            text.push_str(&format!("{}[{}]", segment, segment_instance));
            if let Some((position, field_instance, component)) = field {
                text.push_str(&format!(".{}[{}]", position, field_instance));
                if let Some((component, sub)) = component {
                    text.push_str(&format!(".{}", component));
                    if let Some(sub) = sub {
                        text.push_str(&format!(".{}", sub));
                    }
                }
            }
            text
        })
}

fn expected_element_type(location: &LocationAddress) -> ElementType {
    if location.subcomponent_position().is_some() {
        ElementType::Subcomponent
    } else if location.component_position().is_some() {
        ElementType::Component
    } else if location.field_position().is_some() {
        ElementType::Field
    } else {
        ElementType::Segment
    }
}

proptest! {
    #[test]
    fn compact_form_round_trips(text in compact_location()) {
        let location = parse(&text).unwrap();
        prop_assert_eq!(location.to_compact_form(), text);
    }

    #[test]
    fn structural_form_round_trips(text in compact_location()) {
        let location = parse(&text).unwrap();
        let structural = location.to_structural_form();
        prop_assert_eq!(parse_structural(&structural).unwrap(), location);
    }

    #[test]
    fn element_type_is_deepest_level(text in compact_location()) {
        let location = parse(&text).unwrap();
        prop_assert_eq!(location.element_type(), expected_element_type(&location));
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,40}") {
        let _ = parse(&text);
        let _ = parse_structural(&text);
    }
}
