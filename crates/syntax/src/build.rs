//! Tree-building helpers.
//!
//! These mirror the shapes the parser produces, so tests and tools can write
//! trees without spelling out every `Box`.

use crate::kind::NodeKind;
use crate::node::Node;
use std::fmt::Display;

pub fn boolean(value: bool) -> Node {
    Node::leaf(NodeKind::LiteralBoolean, value.to_string())
}

pub fn character(value: char) -> Node {
    Node::leaf(NodeKind::LiteralCharacter, value.to_string())
}

pub fn int(value: impl Display) -> Node {
    Node::leaf(NodeKind::LiteralInteger, value.to_string())
}

pub fn float(value: impl Display) -> Node {
    Node::leaf(NodeKind::LiteralFloat, value.to_string())
}

pub fn string(value: impl Into<String>) -> Node {
    Node::leaf(NodeKind::LiteralString, value)
}

pub fn ident(name: impl Into<String>) -> Node {
    Node::leaf(NodeKind::Identifier, name)
}

/// `kind` should be one of the `Cast*` kinds.
pub fn cast(kind: NodeKind, operand: Node) -> Node {
    Node::unary(kind, operand)
}

pub fn add(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Add, left, right)
}

pub fn sub(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Subtract, left, right)
}

pub fn mul(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Multiply, left, right)
}

pub fn div(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Divide, left, right)
}

pub fn rem(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Modulo, left, right)
}

pub fn and(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::And, left, right)
}

pub fn or(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Or, left, right)
}

pub fn not(operand: Node) -> Node {
    Node::unary(NodeKind::Not, operand)
}

pub fn equal(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Equal, left, right)
}

pub fn less(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Less, left, right)
}

pub fn greater(left: Node, right: Node) -> Node {
    Node::binary(NodeKind::Greater, left, right)
}

pub fn assign(name: impl Into<String>, value: Node) -> Node {
    Node::binary(NodeKind::Assign, ident(name), value)
}

pub fn print(value: Node) -> Node {
    Node::unary(NodeKind::Print, value)
}

pub fn assert(condition: Node) -> Node {
    Node::unary(NodeKind::Assert, condition)
}

/// Sleep for a number of milliseconds.
pub fn sleep(millis: Node) -> Node {
    Node::unary(NodeKind::Sleep, millis)
}

pub fn block(body: Node) -> Node {
    Node::unary(NodeKind::Block, body)
}

pub fn if_then(condition: Node, then: Node) -> Node {
    Node::binary(NodeKind::If, condition, then)
}

/// The two branches travel as the children of a `sequence` node.
pub fn if_else(condition: Node, then: Node, otherwise: Node) -> Node {
    Node::binary(
        NodeKind::IfElse,
        condition,
        Node::binary(NodeKind::Sequence, then, otherwise),
    )
}

pub fn while_loop(condition: Node, body: Node) -> Node {
    Node::binary(NodeKind::Loop, condition, body)
}

/// Spawn a pre-compiled task unit by name.
pub fn multitask(unit: impl Into<String>) -> Node {
    Node::leaf(NodeKind::Multitask, unit)
}

/// Spawn `body` compiled into a new task unit called `unit`.
pub fn multitask_inline(unit: impl Into<String>, body: Node) -> Node {
    Node::leaf(NodeKind::Multitask, unit).with_left(body)
}

/// Chain statements into right-nested `sequence` nodes.
pub fn seq(statements: impl IntoIterator<Item = Node>) -> Node {
    let mut statements: Vec<Node> = statements.into_iter().collect();
    let Some(last) = statements.pop() else {
        return Node::new(NodeKind::Sequence);
    };

    let mut tail = Node::unary(NodeKind::Sequence, last);
    while let Some(statement) = statements.pop() {
        tail = Node::binary(NodeKind::Sequence, statement, tail);
    }
    tail
}
