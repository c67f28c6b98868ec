//! Abstract tree capability over parsed messages.
//!
//! Discovery and transcoding are written once against [`MessageNode`]; each
//! concrete tree shape (markup tree, parsed wire-format tree) implements it.

use std::borrow::Cow;
use std::fmt;

/// 1-based line and column of a node in its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePosition {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl SourcePosition {
    /// Creates a position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A node of a tree-shaped message.
///
/// Implementations are usually cheap handles (`&Element`, or a small `Copy`
/// cursor into a parsed message), so `children` returns them by value.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use hl7_location::MessageNode;
///
/// struct Node {
///     name: String,
///     text: String,
///     children: Vec<Node>,
/// }
///
/// impl<'a> MessageNode for &'a Node {
///     fn name(&self) -> Cow<'_, str> {
///         Cow::Borrowed(&self.name)
///     }
///
///     fn children(&self) -> Vec<Self> {
///         let node: &'a Node = self;
///         node.children.iter().collect()
///     }
///
///     fn text(&self) -> Cow<'_, str> {
///         Cow::Borrowed(&self.text)
///     }
/// }
/// ```
pub trait MessageNode: Sized {
    /// The node's element name.
    fn name(&self) -> Cow<'_, str>;

    /// Child nodes in document order.
    fn children(&self) -> Vec<Self>;

    /// Text content. Only meaningful for leaves.
    fn text(&self) -> Cow<'_, str>;

    /// Where the node starts in its source, when known.
    fn source_position(&self) -> Option<SourcePosition> {
        None
    }
}
