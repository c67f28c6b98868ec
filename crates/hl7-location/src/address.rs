//! Location address types.

use std::fmt;

use crate::error::{LocationError, LocationResult};
use crate::naming;

/// Instance number of a repeatable element: 1-based, or `*` for every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instance {
    /// A concrete 1-based instance.
    Number(u32),
    /// Every instance: `*`
    Wildcard,
}

impl Instance {
    /// The first instance.
    pub const FIRST: Instance = Instance::Number(1);

    /// Returns true for `*`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Instance::Wildcard)
    }

    /// Returns the concrete number, if any.
    pub fn number(&self) -> Option<u32> {
        match self {
            Instance::Number(n) => Some(*n),
            Instance::Wildcard => None,
        }
    }
}

impl From<u32> for Instance {
    fn from(n: u32) -> Self {
        Instance::Number(n)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::Number(n) => write!(f, "{}", n),
            Instance::Wildcard => write!(f, "*"),
        }
    }
}

/// Depth of an addressed element, from coarsest to finest.
///
/// [`LocationAddress::element_type`] never returns `SegmentGroup`: every
/// address names a segment, so a group path alone is not addressable. The
/// variant keeps the full depth ordering for callers that classify tree
/// nodes, where a group sits above its segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// A named grouping of segments.
    SegmentGroup,
    /// A 3-character segment.
    Segment,
    /// A field within a segment.
    Field,
    /// A component within a field.
    Component,
    /// A subcomponent within a component.
    Subcomponent,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::SegmentGroup => write!(f, "segment group"),
            ElementType::Segment => write!(f, "segment"),
            ElementType::Field => write!(f, "field"),
            ElementType::Component => write!(f, "component"),
            ElementType::Subcomponent => write!(f, "subcomponent"),
        }
    }
}

/// One step of the segment group path: `PATIENT[1]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentGroupRef {
    /// Group token, e.g. `PATIENT_RESULT`.
    pub name: String,
    /// Instance of the group under its parent.
    pub instance: Instance,
}

impl SegmentGroupRef {
    /// Creates a group reference, validating the token.
    pub fn new(name: impl Into<String>, instance: impl Into<Instance>) -> LocationResult<Self> {
        let name = name.into();
        if !naming::is_group_token(&name) {
            return Err(LocationError::InvalidName {
                name,
                expected: "segment group",
            });
        }
        Ok(Self {
            name,
            instance: instance.into(),
        })
    }
}

/// Component position, with an optional subcomponent position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentRef {
    /// 1-based component position.
    pub position: u32,
    /// 1-based subcomponent position.
    pub subcomponent: Option<u32>,
}

/// Field position and instance, with an optional component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldRef {
    /// 1-based field position.
    pub position: u32,
    /// Repetition of the field.
    pub instance: Instance,
    /// Component, if the address goes deeper than the field.
    pub component: Option<ComponentRef>,
}

/// Address of an element inside a message.
///
/// Deeper levels can only be present when all shallower ones are; the nested
/// options make any other shape unrepresentable.
///
/// # Example
///
/// ```rust
/// use hl7_location::{ElementType, Instance, LocationAddress};
///
/// let location = LocationAddress::new("PID", 1)
///     .unwrap()
///     .with_field(3, 2)
///     .with_component(1);
///
/// assert_eq!(location.to_compact_form(), "PID[1].3[2].1");
/// assert_eq!(location.element_type(), ElementType::Component);
/// assert_eq!(location.field_instance(), Some(Instance::Number(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationAddress {
    groups: Vec<SegmentGroupRef>,
    segment: String,
    segment_instance: Instance,
    field: Option<FieldRef>,
}

impl LocationAddress {
    /// Creates a segment-level address, validating the segment code.
    pub fn new(segment: impl Into<String>, instance: impl Into<Instance>) -> LocationResult<Self> {
        let segment = segment.into();
        if !naming::is_segment_code(&segment) {
            return Err(LocationError::InvalidName {
                name: segment,
                expected: "segment",
            });
        }
        Ok(Self {
            groups: Vec::new(),
            segment,
            segment_instance: instance.into(),
            field: None,
        })
    }

    /// Replaces the segment group path.
    pub fn with_groups(mut self, groups: Vec<SegmentGroupRef>) -> Self {
        self.groups = groups;
        self
    }

    /// Sets the field, dropping any component.
    pub fn with_field(mut self, position: u32, instance: impl Into<Instance>) -> Self {
        self.field = Some(FieldRef {
            position,
            instance: instance.into(),
            component: None,
        });
        self
    }

    /// Sets the component, dropping any subcomponent.
    ///
    /// Has no effect on an address without a field.
    pub fn with_component(mut self, position: u32) -> Self {
        if let Some(field) = self.field.as_mut() {
            field.component = Some(ComponentRef {
                position,
                subcomponent: None,
            });
        }
        self
    }

    /// Sets the subcomponent.
    ///
    /// Has no effect on an address without a component.
    pub fn with_subcomponent(mut self, position: u32) -> Self {
        if let Some(component) = self.field.as_mut().and_then(|f| f.component.as_mut()) {
            component.subcomponent = Some(position);
        }
        self
    }

    /// Replaces the segment instance.
    pub fn with_segment_instance(mut self, instance: impl Into<Instance>) -> Self {
        self.segment_instance = instance.into();
        self
    }

    /// Replaces the field instance. Has no effect on an address without a field.
    pub fn with_field_instance(mut self, instance: impl Into<Instance>) -> Self {
        if let Some(field) = self.field.as_mut() {
            field.instance = instance.into();
        }
        self
    }

    pub(crate) fn from_parts(
        groups: Vec<SegmentGroupRef>,
        segment: String,
        segment_instance: Instance,
        field: Option<FieldRef>,
    ) -> Self {
        Self {
            groups,
            segment,
            segment_instance,
            field,
        }
    }

    /// Segment groups, outermost first.
    pub fn groups(&self) -> &[SegmentGroupRef] {
        &self.groups
    }

    /// The 3-character segment code.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Instance of the segment under its parent.
    pub fn segment_instance(&self) -> Instance {
        self.segment_instance
    }

    /// The field reference, if present.
    pub fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    /// Field position, if present.
    pub fn field_position(&self) -> Option<u32> {
        self.field.map(|f| f.position)
    }

    /// Field instance, if present.
    pub fn field_instance(&self) -> Option<Instance> {
        self.field.map(|f| f.instance)
    }

    /// Component position, if present.
    pub fn component_position(&self) -> Option<u32> {
        self.field.and_then(|f| f.component).map(|c| c.position)
    }

    /// Subcomponent position, if present.
    pub fn subcomponent_position(&self) -> Option<u32> {
        self.field
            .and_then(|f| f.component)
            .and_then(|c| c.subcomponent)
    }

    /// The deepest populated level, from `Segment` to `Subcomponent`.
    pub fn element_type(&self) -> ElementType {
        match self.field {
            None => ElementType::Segment,
            Some(FieldRef { component: None, .. }) => ElementType::Field,
            Some(FieldRef {
                component: Some(ComponentRef {
                    subcomponent: None, ..
                }),
                ..
            }) => ElementType::Component,
            Some(FieldRef {
                component: Some(ComponentRef {
                    subcomponent: Some(_),
                    ..
                }),
                ..
            }) => ElementType::Subcomponent,
        }
    }

    /// Returns true if any group, segment or field instance is `*`.
    pub fn has_wildcard(&self) -> bool {
        self.segment_instance.is_wildcard()
            || self.groups.iter().any(|g| g.instance.is_wildcard())
            || self.field.is_some_and(|f| f.instance.is_wildcard())
    }

    /// Compact form: `PATIENT[1]/PID[1].3[1].1.2`
    pub fn to_compact_form(&self) -> String {
        self.to_string()
    }

    /// Structural form over element names:
    /// `/*/*[ends-with(name(),'.PATIENT')][1]/PID[1]/PID.3[1]/PID.3.1/PID.3.1.2`
    ///
    /// A `*` instance is written without a positional predicate so the step
    /// selects every instance.
    pub fn to_structural_form(&self) -> String {
        let mut out = String::from("/*");
        for group in &self.groups {
            out.push_str(&format!("/*[ends-with(name(),'.{}')]", group.name));
            push_predicate(&mut out, group.instance);
        }
        out.push('/');
        out.push_str(&self.segment);
        push_predicate(&mut out, self.segment_instance);

        if let Some(field) = self.field {
            let field_name = naming::child_name(&self.segment, field.position);
            out.push('/');
            out.push_str(&field_name);
            push_predicate(&mut out, field.instance);

            if let Some(component) = field.component {
                let component_name = naming::child_name(&field_name, component.position);
                out.push('/');
                out.push_str(&component_name);

                if let Some(sub) = component.subcomponent {
                    out.push('/');
                    out.push_str(&naming::child_name(&component_name, sub));
                }
            }
        }
        out
    }
}

fn push_predicate(out: &mut String, instance: Instance) {
    if let Instance::Number(n) = instance {
        out.push_str(&format!("[{}]", n));
    }
}

impl fmt::Display for LocationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, "{}[{}]/", group.name, group.instance)?;
        }
        write!(f, "{}[{}]", self.segment, self.segment_instance)?;
        if let Some(field) = self.field {
            write!(f, ".{}[{}]", field.position, field.instance)?;
            if let Some(component) = field.component {
                write!(f, ".{}", component.position)?;
                if let Some(sub) = component.subcomponent {
                    write!(f, ".{}", sub)?;
                }
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for LocationAddress {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}
