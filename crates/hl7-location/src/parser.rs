//! Location grammar parsers using nom.
//!
//! Compact form:
//!
//! ```text
//! location   = *(group "/") segment ["." field ["." component ["." subcomponent]]]
//! group      = GROUP "[" instance "]"
//! segment    = SEG "[" instance "]"
//! field      = position "[" instance "]"
//! instance   = position / "*"
//! position   = %x31-39 *DIGIT
//! ```
//!
//! Structural form:
//!
//! ```text
//! location   = "/*" *("/*[ends-with(name(),'." GROUP "')]" [index]) "/" SEG [index]
//!              ["/" SEG "." position [index] ["/" SEG "." position "." position
//!              ["/" SEG "." position "." position "." position]]]
//! index      = "[" position "]"
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, value, verify},
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult,
};

use crate::address::{ComponentRef, FieldRef, Instance, LocationAddress, SegmentGroupRef};
use crate::error::{LocationError, LocationResult};

/// Parse a compact-form location string.
///
/// # Examples
///
/// ```rust
/// use hl7_location::{parse, ElementType};
///
/// let location = parse("PID[1].3[1].1").unwrap();
/// assert_eq!(location.segment(), "PID");
/// assert_eq!(location.element_type(), ElementType::Component);
///
/// let grouped = parse("PATIENT_RESULT[1]/ORDER_OBSERVATION[2]/OBX[*].5[1]").unwrap();
/// assert_eq!(grouped.groups().len(), 2);
///
/// assert!(parse("PID[1].3").is_err());
/// ```
pub fn parse(input: &str) -> LocationResult<LocationAddress> {
    run(input, compact_location)
}

/// Parse a structural-form location string.
///
/// # Examples
///
/// ```rust
/// use hl7_location::{parse, parse_structural};
///
/// let location = parse_structural("/*/PID[1]/PID.3[2]/PID.3.1").unwrap();
/// assert_eq!(location, parse("PID[1].3[2].1").unwrap());
/// ```
pub fn parse_structural(input: &str) -> LocationResult<LocationAddress> {
    run(input, structural_location)
}

fn run(
    input: &str,
    parser: fn(&str) -> IResult<&str, LocationAddress>,
) -> LocationResult<LocationAddress> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LocationError::Empty);
    }

    match all_consuming(parser)(input) {
        Ok((_, location)) => Ok(location),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            Err(LocationError::Syntax {
                input: input.to_string(),
                position,
                message: if e.input.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected input at: '{}'", truncate(e.input, 20))
                },
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(LocationError::Syntax {
            input: input.to_string(),
            position: input.len(),
            message: "incomplete location".to_string(),
        }),
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ============================================================================
// Shared tokens
// ============================================================================

fn position(input: &str) -> IResult<&str, u32> {
    map_res(verify(digit1, |d: &str| !d.starts_with('0')), |d: &str| {
        d.parse::<u32>()
    })(input)
}

fn instance(input: &str) -> IResult<&str, Instance> {
    alt((
        value(Instance::Wildcard, char('*')),
        map(position, Instance::Number),
    ))(input)
}

fn bracketed_instance(input: &str) -> IResult<&str, Instance> {
    delimited(char('['), instance, char(']'))(input)
}

fn index_predicate(input: &str) -> IResult<&str, u32> {
    delimited(char('['), position, char(']'))(input)
}

fn segment_code(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 3, |c: char| c.is_ascii_uppercase() || c.is_ascii_digit())(input)
}

fn group_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')(input)
}

// ============================================================================
// Compact form
// ============================================================================

fn compact_location(input: &str) -> IResult<&str, LocationAddress> {
    let (input, groups) = many0(terminated(compact_group, char('/')))(input)?;
    let (input, segment) = segment_code(input)?;
    let (input, segment_instance) = bracketed_instance(input)?;
    let (input, field) = opt(preceded(char('.'), compact_field))(input)?;

    Ok((
        input,
        LocationAddress::from_parts(groups, segment.to_string(), segment_instance, field),
    ))
}

fn compact_group(input: &str) -> IResult<&str, SegmentGroupRef> {
    let (input, name) = group_token(input)?;
    let (input, instance) = bracketed_instance(input)?;
    Ok((
        input,
        SegmentGroupRef {
            name: name.to_string(),
            instance,
        },
    ))
}

fn compact_field(input: &str) -> IResult<&str, FieldRef> {
    let (input, position_) = position(input)?;
    let (input, instance) = bracketed_instance(input)?;
    let (input, component) = opt(preceded(char('.'), compact_component))(input)?;
    Ok((
        input,
        FieldRef {
            position: position_,
            instance,
            component,
        },
    ))
}

fn compact_component(input: &str) -> IResult<&str, ComponentRef> {
    let (input, position_) = position(input)?;
    let (input, subcomponent) = opt(preceded(char('.'), position))(input)?;
    Ok((
        input,
        ComponentRef {
            position: position_,
            subcomponent,
        },
    ))
}

// ============================================================================
// Structural form
// ============================================================================

fn structural_location(input: &str) -> IResult<&str, LocationAddress> {
    let (input, _) = tag("/*")(input)?;
    let (input, groups) = many0(preceded(char('/'), structural_group))(input)?;
    let (input, _) = char('/')(input)?;
    let (input, segment) = segment_code(input)?;
    let (input, segment_instance) = optional_index(input)?;
    let (input, field) = structural_field(input, segment)?;

    Ok((
        input,
        LocationAddress::from_parts(groups, segment.to_string(), segment_instance, field),
    ))
}

fn optional_index(input: &str) -> IResult<&str, Instance> {
    map(opt(index_predicate), |n| {
        n.map_or(Instance::Wildcard, Instance::Number)
    })(input)
}

fn structural_group(input: &str) -> IResult<&str, SegmentGroupRef> {
    let (input, name) = delimited(tag("*[ends-with(name(),'."), group_token, tag("')]"))(input)?;
    let (input, instance) = optional_index(input)?;
    Ok((
        input,
        SegmentGroupRef {
            name: name.to_string(),
            instance,
        },
    ))
}

/// `/<parent>.<n>` where `<parent>` must be the enclosing step's name.
fn child_step<'a>(input: &'a str, parent: &str) -> IResult<&'a str, u32> {
    let (input, _) = char('/')(input)?;
    let (input, _) = tag(parent)(input)?;
    let (input, _) = char('.')(input)?;
    position(input)
}

fn structural_field<'a>(input: &'a str, segment: &str) -> IResult<&'a str, Option<FieldRef>> {
    let Ok((rest, position_)) = child_step(input, segment) else {
        return Ok((input, None));
    };
    let (rest, instance) = optional_index(rest)?;

    let field_name = format!("{}.{}", segment, position_);
    let (rest, component) = match child_step(rest, &field_name) {
        Ok((after, component_position)) => {
            let component_name = format!("{}.{}", field_name, component_position);
            let (after, subcomponent) = match child_step(after, &component_name) {
                Ok((after_sub, sub)) => (after_sub, Some(sub)),
                Err(_) => (after, None),
            };
            (
                after,
                Some(ComponentRef {
                    position: component_position,
                    subcomponent,
                }),
            )
        }
        Err(_) => (rest, None),
    };

    Ok((
        rest,
        Some(FieldRef {
            position: position_,
            instance,
            component,
        }),
    ))
}

// ============================================================================
// Tests
// ============================================================================
