//! Node kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The tag of a syntax node.
///
/// The serialized name of each kind (see [`NodeKind::as_str`]) is the name
/// used by the JSON tree format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    // Structure
    Sequence,
    Block,

    // Literals
    LiteralBoolean,
    LiteralCharacter,
    LiteralInteger,
    LiteralFloat,
    LiteralString,

    // Casts
    CastChar,
    CastByte,
    CastShort,
    CastInt,
    CastLong,
    CastFloat,
    CastDouble,

    // Numeric operators
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Boolean and comparison operators
    And,
    Or,
    Equal,
    Greater,
    Less,
    Not,

    // Statements and names
    Assign,
    Identifier,
    If,
    IfElse,
    Loop,
    Assert,
    Print,
    Multitask,
    Sleep,
}

impl NodeKind {
    pub const ALL: [NodeKind; 34] = [
        NodeKind::Sequence,
        NodeKind::Block,
        NodeKind::LiteralBoolean,
        NodeKind::LiteralCharacter,
        NodeKind::LiteralInteger,
        NodeKind::LiteralFloat,
        NodeKind::LiteralString,
        NodeKind::CastChar,
        NodeKind::CastByte,
        NodeKind::CastShort,
        NodeKind::CastInt,
        NodeKind::CastLong,
        NodeKind::CastFloat,
        NodeKind::CastDouble,
        NodeKind::Add,
        NodeKind::Subtract,
        NodeKind::Multiply,
        NodeKind::Divide,
        NodeKind::Modulo,
        NodeKind::And,
        NodeKind::Or,
        NodeKind::Equal,
        NodeKind::Greater,
        NodeKind::Less,
        NodeKind::Not,
        NodeKind::Assign,
        NodeKind::Identifier,
        NodeKind::If,
        NodeKind::IfElse,
        NodeKind::Loop,
        NodeKind::Assert,
        NodeKind::Print,
        NodeKind::Multitask,
        NodeKind::Sleep,
    ];

    /// Convert to the serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Sequence => "sequence",
            NodeKind::Block => "block",
            NodeKind::LiteralBoolean => "literal-boolean",
            NodeKind::LiteralCharacter => "literal-character",
            NodeKind::LiteralInteger => "literal-integer",
            NodeKind::LiteralFloat => "literal-float",
            NodeKind::LiteralString => "literal-string",
            NodeKind::CastChar => "cast-char",
            NodeKind::CastByte => "cast-byte",
            NodeKind::CastShort => "cast-short",
            NodeKind::CastInt => "cast-int",
            NodeKind::CastLong => "cast-long",
            NodeKind::CastFloat => "cast-float",
            NodeKind::CastDouble => "cast-double",
            NodeKind::Add => "add",
            NodeKind::Subtract => "subtract",
            NodeKind::Multiply => "multiply",
            NodeKind::Divide => "divide",
            NodeKind::Modulo => "modulo",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Equal => "equal",
            NodeKind::Greater => "greater",
            NodeKind::Less => "less",
            NodeKind::Not => "not",
            NodeKind::Assign => "assign",
            NodeKind::Identifier => "identifier",
            NodeKind::If => "if",
            NodeKind::IfElse => "if-else",
            NodeKind::Loop => "loop",
            NodeKind::Assert => "assert",
            NodeKind::Print => "print",
            NodeKind::Multitask => "multitask",
            NodeKind::Sleep => "sleep",
        }
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::LiteralBoolean
                | NodeKind::LiteralCharacter
                | NodeKind::LiteralInteger
                | NodeKind::LiteralFloat
                | NodeKind::LiteralString
        )
    }

    pub fn is_cast(self) -> bool {
        matches!(
            self,
            NodeKind::CastChar
                | NodeKind::CastByte
                | NodeKind::CastShort
                | NodeKind::CastInt
                | NodeKind::CastLong
                | NodeKind::CastFloat
                | NodeKind::CastDouble
        )
    }

    pub fn is_numeric_operator(self) -> bool {
        matches!(
            self,
            NodeKind::Add
                | NodeKind::Subtract
                | NodeKind::Multiply
                | NodeKind::Divide
                | NodeKind::Modulo
        )
    }

    /// Operators lowered through conditional jumps rather than an instruction.
    pub fn is_boolean_operator(self) -> bool {
        matches!(
            self,
            NodeKind::And
                | NodeKind::Or
                | NodeKind::Equal
                | NodeKind::Greater
                | NodeKind::Less
                | NodeKind::Not
        )
    }

    /// Kinds that produce exactly one value when compiled.
    pub fn is_expression(self) -> bool {
        self == NodeKind::Identifier
            || self.is_literal()
            || self.is_cast()
            || self.is_numeric_operator()
            || self.is_boolean_operator()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>(), Ok(kind));
        }
        assert!("while".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        let json = serde_json::to_string(&NodeKind::IfElse).unwrap();
        assert_eq!(json, "\"if-else\"");
        let json = serde_json::to_string(&NodeKind::LiteralCharacter).unwrap();
        assert_eq!(json, "\"literal-character\"");
    }

    #[test]
    fn test_categories_are_disjoint() {
        for kind in NodeKind::ALL {
            let hits = [
                kind.is_literal(),
                kind.is_cast(),
                kind.is_numeric_operator(),
                kind.is_boolean_operator(),
                kind == NodeKind::Identifier,
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert!(hits <= 1, "{kind} claimed by more than one category");
        }
    }

    #[test]
    fn test_statements_are_not_expressions() {
        assert!(!NodeKind::Assign.is_expression());
        assert!(!NodeKind::Print.is_expression());
        assert!(NodeKind::Not.is_expression());
        assert!(NodeKind::CastDouble.is_expression());
    }
}
