//! Syntax nodes.

use crate::kind::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a Strand syntax tree.
///
/// Each node exclusively owns its children, so a tree has no sharing and no
/// cycles. Which children a kind expects is documented on the constructors
/// in [`crate::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<Node>>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            value: None,
            left: None,
            right: None,
        }
    }

    pub fn leaf(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(kind)
        }
    }

    pub fn unary(kind: NodeKind, child: Node) -> Self {
        Self {
            left: Some(Box::new(child)),
            ..Self::new(kind)
        }
    }

    pub fn binary(kind: NodeKind, left: Node, right: Node) -> Self {
        Self {
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            ..Self::new(kind)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_left(mut self, child: Node) -> Self {
        self.left = Some(Box::new(child));
        self
    }

    pub fn with_right(mut self, child: Node) -> Self {
        self.right = Some(Box::new(child));
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// Compare whole subtrees, children included.
    ///
    /// `==` only looks at kind and value; use this when the shape matters.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        fn child_eq(a: Option<&Node>, b: Option<&Node>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.structurally_eq(b),
                (None, None) => true,
                _ => false,
            }
        }

        self == other
            && child_eq(self.left(), other.left())
            && child_eq(self.right(), other.right())
    }

    /// Number of nodes in the subtree rooted here.
    pub fn size(&self) -> usize {
        1 + self.left().map_or(0, Node::size) + self.right().map_or(0, Node::size)
    }

    pub fn depth(&self) -> usize {
        1 + self
            .left()
            .map_or(0, Node::depth)
            .max(self.right().map_or(0, Node::depth))
    }

    /// Number of statements reachable by unrolling nested sequences.
    pub fn statement_count(&self) -> usize {
        match self.kind {
            NodeKind::Sequence => {
                self.left().map_or(0, Node::statement_count)
                    + self.right().map_or(0, Node::statement_count)
            }
            _ => 1,
        }
    }
}

// Equality deliberately ignores children: two sequences with different
// bodies compare equal. `structurally_eq` compares subtrees.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} '{}'", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_children() {
        let a = Node::binary(
            NodeKind::Sequence,
            Node::leaf(NodeKind::LiteralInteger, "1"),
            Node::leaf(NodeKind::LiteralInteger, "2"),
        );
        let b = Node::new(NodeKind::Sequence);

        assert_eq!(a, b);
        assert!(!a.structurally_eq(&b));
    }

    #[test]
    fn test_equality_checks_kind_and_value() {
        let x = Node::leaf(NodeKind::Identifier, "x");
        assert_eq!(x, Node::leaf(NodeKind::Identifier, "x"));
        assert_ne!(x, Node::leaf(NodeKind::Identifier, "y"));
        assert_ne!(x, Node::leaf(NodeKind::LiteralString, "x"));
    }

    #[test]
    fn test_size_and_depth() {
        let tree = Node::binary(
            NodeKind::Add,
            Node::leaf(NodeKind::LiteralInteger, "1"),
            Node::unary(NodeKind::Not, Node::leaf(NodeKind::LiteralInteger, "0")),
        );
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_display_includes_value() {
        assert_eq!(Node::leaf(NodeKind::Identifier, "count").to_string(), "identifier 'count'");
        assert_eq!(Node::new(NodeKind::Block).to_string(), "block");
    }
}
