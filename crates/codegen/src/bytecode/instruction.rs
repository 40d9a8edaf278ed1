//! Instruction definitions
//!
//! Instructions target a stack machine: operands are taken from and results
//! pushed onto the evaluation stack. Jump targets are symbolic [`Label`]s,
//! placed in the stream with [`Instruction::Label`] and resolved when a unit
//! is listed or loaded.

use crate::types::{ArithOp, Conversion, NumericFamily, SlotKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}L"),
            Constant::Float(v) => write!(f, "{v:?}f"),
            Constant::Double(v) => write!(f, "{v:?}d"),
            Constant::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// Comparison of the popped int against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZeroTest {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ZeroTest {
    pub fn negate(self) -> Self {
        match self {
            ZeroTest::Eq => ZeroTest::Ne,
            ZeroTest::Ne => ZeroTest::Eq,
            ZeroTest::Lt => ZeroTest::Ge,
            ZeroTest::Le => ZeroTest::Gt,
            ZeroTest::Gt => ZeroTest::Le,
            ZeroTest::Ge => ZeroTest::Lt,
        }
    }

    pub fn holds(self, value: i64) -> bool {
        match self {
            ZeroTest::Eq => value == 0,
            ZeroTest::Ne => value != 0,
            ZeroTest::Lt => value < 0,
            ZeroTest::Le => value <= 0,
            ZeroTest::Gt => value > 0,
            ZeroTest::Ge => value >= 0,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            ZeroTest::Eq => "ifeq",
            ZeroTest::Ne => "ifne",
            ZeroTest::Lt => "iflt",
            ZeroTest::Le => "ifle",
            ZeroTest::Gt => "ifgt",
            ZeroTest::Ge => "ifge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeKind {
    Static,
    Virtual,
    Special,
}

/// A method or field reference: owner class, member name, type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

impl MemberRef {
    pub fn new(owner: &str, name: &str, descriptor: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.descriptor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    // Stack and locals
    Push(Constant),
    Dup,
    Load { kind: SlotKind, slot: u16 },
    Store { kind: SlotKind, slot: u16 },

    // Arithmetic and conversion
    Arith { op: ArithOp, family: NumericFamily },
    Convert(Conversion),

    // Control flow
    JumpIf { test: ZeroTest, target: Label },
    Jump { target: Label },
    Label(Label),

    // Objects and calls
    New { class: String },
    GetStatic(MemberRef),
    Invoke { kind: InvokeKind, method: MemberRef },
    Throw,
    Return,
}

impl Instruction {
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }

    /// Label this instruction may transfer control to.
    pub fn jump_target(&self) -> Option<Label> {
        match self {
            Instruction::JumpIf { target, .. } | Instruction::Jump { target } => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(constant) => write!(f, "ldc {constant}"),
            Instruction::Dup => write!(f, "dup"),
            Instruction::Load { kind, slot } => write!(f, "{}load {slot}", kind.prefix()),
            Instruction::Store { kind, slot } => write!(f, "{}store {slot}", kind.prefix()),
            Instruction::Arith { op, family } => write!(f, "{}{}", family.prefix(), op.as_str()),
            Instruction::Convert(conversion) => write!(f, "{}", conversion.mnemonic()),
            Instruction::JumpIf { test, target } => write!(f, "{} {target}", test.mnemonic()),
            Instruction::Jump { target } => write!(f, "goto {target}"),
            Instruction::Label(label) => write!(f, "{label}:"),
            Instruction::New { class } => write!(f, "new {class}"),
            Instruction::GetStatic(field) => write!(f, "getstatic {field}"),
            Instruction::Invoke { kind, method } => {
                let mnemonic = match kind {
                    InvokeKind::Static => "invokestatic",
                    InvokeKind::Virtual => "invokevirtual",
                    InvokeKind::Special => "invokespecial",
                };
                write!(f, "{mnemonic} {method}")
            }
            Instruction::Throw => write!(f, "athrow"),
            Instruction::Return => write!(f, "return"),
        }
    }
}
