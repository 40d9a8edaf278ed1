//! Bytecode module root
//! Re-exports the instruction set, the emission buffer and unit artifacts.

pub mod buffer;
pub mod instruction;
pub mod unit;

pub use buffer::CodeBuffer;
pub use instruction::{Constant, Instruction, InvokeKind, Label, MemberRef, ZeroTest};
pub use unit::{LocalVariable, Unit, UnitKind};
