//! Operand types and the conversions between them
//!
//! Every value on the runtime evaluation stack belongs to one
//! [`OperandType`]. The type decides which arithmetic family and which local
//! slot instructions apply, and which conversions exist. Boolean, char, byte
//! and short share the int representation at runtime, so their arithmetic
//! uses the int family, but the compile-time type keeps the narrower type.

use crate::error::{CodegenError, CodegenResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandType {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Reference,
    Array,
    ReturnAddress,
}

/// Instruction family used for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericFamily {
    Int,
    Long,
    Float,
    Double,
}

/// Instruction family used for local slot loads and stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Int,
    Long,
    Float,
    Double,
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// A single conversion instruction, or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conversion {
    Identity,
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
    I2B,
    I2C,
    I2S,
}

impl OperandType {
    pub fn name(self) -> &'static str {
        match self {
            OperandType::Boolean => "boolean",
            OperandType::Char => "char",
            OperandType::Byte => "byte",
            OperandType::Short => "short",
            OperandType::Int => "int",
            OperandType::Long => "long",
            OperandType::Float => "float",
            OperandType::Double => "double",
            OperandType::Reference => "reference",
            OperandType::Array => "array",
            OperandType::ReturnAddress => "return-address",
        }
    }

    /// Types represented as an int at runtime.
    pub fn is_int_category(self) -> bool {
        matches!(
            self,
            OperandType::Boolean
                | OperandType::Char
                | OperandType::Byte
                | OperandType::Short
                | OperandType::Int
        )
    }

    pub fn is_numeric(self) -> bool {
        self.arithmetic_family().is_ok() && self != OperandType::Boolean
    }

    pub fn arithmetic_family(self) -> CodegenResult<NumericFamily> {
        match self {
            t if t.is_int_category() => Ok(NumericFamily::Int),
            OperandType::Long => Ok(NumericFamily::Long),
            OperandType::Float => Ok(NumericFamily::Float),
            OperandType::Double => Ok(NumericFamily::Double),
            ty => Err(CodegenError::UnsupportedOperation {
                operation: "arithmetic".to_string(),
                ty,
                node: None,
            }),
        }
    }

    pub fn slot_kind(self) -> CodegenResult<SlotKind> {
        match self {
            t if t.is_int_category() => Ok(SlotKind::Int),
            OperandType::Long => Ok(SlotKind::Long),
            OperandType::Float => Ok(SlotKind::Float),
            OperandType::Double => Ok(SlotKind::Double),
            OperandType::Reference | OperandType::Array => Ok(SlotKind::Reference),
            ty => Err(CodegenError::UnsupportedOperation {
                operation: "local variable access".to_string(),
                ty,
                node: None,
            }),
        }
    }

    /// The one instruction converting `self` into `target`.
    ///
    /// The table is not closed under composition: a conversion that would
    /// need two instructions (long to byte, boolean to float) is rejected
    /// rather than chained.
    pub fn conversion_to(self, target: OperandType) -> CodegenResult<Conversion> {
        use OperandType::*;

        if self == target {
            return Ok(Conversion::Identity);
        }

        let conversion = match (self, target) {
            // Booleans already are ints; nothing else accepts them.
            (Boolean, Int) => Some(Conversion::Identity),
            (Boolean, _) | (_, Boolean) => None,

            (Char | Byte | Short | Int, Int) => Some(Conversion::Identity),
            (Byte, Short) => Some(Conversion::Identity),
            (Char | Short | Int, Byte) => Some(Conversion::I2B),
            (Byte | Short | Int, Char) => Some(Conversion::I2C),
            (Char | Int, Short) => Some(Conversion::I2S),
            (Char | Byte | Short | Int, Long) => Some(Conversion::I2L),
            (Char | Byte | Short | Int, Float) => Some(Conversion::I2F),
            (Char | Byte | Short | Int, Double) => Some(Conversion::I2D),

            (Long, Int) => Some(Conversion::L2I),
            (Long, Float) => Some(Conversion::L2F),
            (Long, Double) => Some(Conversion::L2D),

            (Float, Int) => Some(Conversion::F2I),
            (Float, Long) => Some(Conversion::F2L),
            (Float, Double) => Some(Conversion::F2D),

            (Double, Int) => Some(Conversion::D2I),
            (Double, Long) => Some(Conversion::D2L),
            (Double, Float) => Some(Conversion::D2F),

            _ => None,
        };

        conversion.ok_or(CodegenError::UnsupportedConversion {
            from: self,
            to: target,
            node: None,
        })
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl NumericFamily {
    /// Mnemonic prefix of the family.
    pub fn prefix(self) -> char {
        match self {
            NumericFamily::Int => 'i',
            NumericFamily::Long => 'l',
            NumericFamily::Float => 'f',
            NumericFamily::Double => 'd',
        }
    }
}

impl SlotKind {
    pub fn prefix(self) -> char {
        match self {
            SlotKind::Int => 'i',
            SlotKind::Long => 'l',
            SlotKind::Float => 'f',
            SlotKind::Double => 'd',
            SlotKind::Reference => 'a',
        }
    }
}

impl ArithOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
            ArithOp::Rem => "rem",
        }
    }
}

impl Conversion {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Conversion::Identity => "nop",
            Conversion::I2L => "i2l",
            Conversion::I2F => "i2f",
            Conversion::I2D => "i2d",
            Conversion::L2I => "l2i",
            Conversion::L2F => "l2f",
            Conversion::L2D => "l2d",
            Conversion::F2I => "f2i",
            Conversion::F2L => "f2l",
            Conversion::F2D => "f2d",
            Conversion::D2I => "d2i",
            Conversion::D2L => "d2l",
            Conversion::D2F => "d2f",
            Conversion::I2B => "i2b",
            Conversion::I2C => "i2c",
            Conversion::I2S => "i2s",
        }
    }
}
