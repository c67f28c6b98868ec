//! # hl7-location
//!
//! Positional addressing for HL7 v2 messages.
//!
//! This crate provides:
//! - **[`LocationAddress`]**: names any segment group, segment, field,
//!   component or subcomponent of a message, with instance numbers
//! - **Compact form parser**: `PATIENT[1]/PID[1].3[2].1.2`
//! - **Structural form**: the same address as a path over element names,
//!   for tree-shaped messages
//! - **[`MessageNode`]**: the tree capability that discovery and transcoding
//!   are written against
//!
//! ## Usage
//!
//! ```rust
//! use hl7_location::{parse, ElementType};
//!
//! let location = parse("PID[1].3[2].1").unwrap();
//! assert_eq!(location.element_type(), ElementType::Component);
//! assert_eq!(location.to_compact_form(), "PID[1].3[2].1");
//! assert_eq!(location.to_structural_form(), "/*/PID[1]/PID.3[2]/PID.3.1");
//! ```
//!
//! ## Compact Form Quick Reference
//!
//! | Part | Example | Meaning |
//! |------|---------|---------|
//! | Group | `PATIENT[1]/` | First `PATIENT` group under its parent |
//! | Segment | `PID[1]` | First `PID` under its parent |
//! | Field | `.3[2]` | Second repetition of field 3 |
//! | Component | `.1` | Component 1 |
//! | Subcomponent | `.2` | Subcomponent 2 |
//! | Wildcard | `OBX[*]` | Every instance, resolved against a message |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod address;
mod error;
pub mod naming;
mod node;
mod parser;

pub use address::{
    ComponentRef, ElementType, FieldRef, Instance, LocationAddress, SegmentGroupRef,
};
pub use error::{ErrorKind, LocationError, LocationResult};
pub use node::{MessageNode, SourcePosition};
pub use parser::{parse, parse_structural};
