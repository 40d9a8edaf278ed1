//! Instruction emission
//!
//! `CodeBuffer` is the emission surface the compilers write through: one
//! method per primitive (constant, local load/store, arithmetic, conversion,
//! conditional and unconditional jump, label, object construction, method
//! call, throw). It knows nothing about types; keeping the type stack in
//! step is the caller's job.

use super::instruction::{Constant, Instruction, InvokeKind, Label, MemberRef, ZeroTest};
use crate::types::{ArithOp, Conversion, NumericFamily, SlotKind};
use tracing::trace;

#[derive(Debug, Default)]
pub struct CodeBuffer {
    instructions: Vec<Instruction>,
    next_label: u32,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, instr: Instruction) {
        trace!(offset = self.instructions.len(), instruction = %instr, "emit");
        self.instructions.push(instr);
    }

    pub fn emit_constant(&mut self, constant: Constant) {
        self.emit(Instruction::Push(constant));
    }

    pub fn emit_load(&mut self, kind: SlotKind, slot: u16) {
        self.emit(Instruction::Load { kind, slot });
    }

    pub fn emit_store(&mut self, kind: SlotKind, slot: u16) {
        self.emit(Instruction::Store { kind, slot });
    }

    pub fn emit_arithmetic(&mut self, op: ArithOp, family: NumericFamily) {
        self.emit(Instruction::Arith { op, family });
    }

    /// Identity conversions emit nothing.
    pub fn emit_conversion(&mut self, conversion: Conversion) {
        if conversion != Conversion::Identity {
            self.emit(Instruction::Convert(conversion));
        }
    }

    pub fn emit_conditional_jump(&mut self, test: ZeroTest, target: Label) {
        self.emit(Instruction::JumpIf { test, target });
    }

    pub fn emit_jump(&mut self, target: Label) {
        self.emit(Instruction::Jump { target });
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn emit_label(&mut self, label: Label) {
        self.emit(Instruction::Label(label));
    }

    pub fn emit_new(&mut self, class: &str) {
        self.emit(Instruction::New {
            class: class.to_string(),
        });
    }

    pub fn emit_dup(&mut self) {
        self.emit(Instruction::Dup);
    }

    pub fn emit_get_static(&mut self, owner: &str, name: &str, descriptor: &str) {
        self.emit(Instruction::GetStatic(MemberRef::new(owner, name, descriptor)));
    }

    pub fn emit_invoke(&mut self, kind: InvokeKind, owner: &str, name: &str, descriptor: &str) {
        self.emit(Instruction::Invoke {
            kind,
            method: MemberRef::new(owner, name, descriptor),
        });
    }

    pub fn emit_throw(&mut self) {
        self.emit(Instruction::Throw);
    }

    pub fn emit_return(&mut self) {
        self.emit(Instruction::Return);
    }

    pub fn current_offset(&self) -> usize {
        self.instructions.len()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_sequential() {
        let mut code = CodeBuffer::new();
        assert_eq!(code.new_label(), Label(0));
        assert_eq!(code.new_label(), Label(1));
        assert_eq!(code.current_offset(), 0);
    }

    #[test]
    fn test_identity_conversion_is_skipped() {
        let mut code = CodeBuffer::new();
        code.emit_conversion(Conversion::Identity);
        code.emit_conversion(Conversion::I2L);

        assert_eq!(code.instructions(), &[Instruction::Convert(Conversion::I2L)]);
    }

    #[test]
    fn test_emit_records_in_order() {
        let mut code = CodeBuffer::new();
        let end = code.new_label();
        code.emit_constant(Constant::Int(1));
        code.emit_conditional_jump(ZeroTest::Eq, end);
        code.emit_label(end);
        code.emit_return();

        let instructions = code.into_instructions();
        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[1].jump_target(), Some(end));
        assert!(instructions[2].is_label());
    }
}
