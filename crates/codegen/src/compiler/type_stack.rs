//! Compile-time shadow of the runtime evaluation stack
//!
//! Every instruction that pushes a value is paired with a [`TypeStack::push`]
//! and every instruction that consumes one with a pop. The deepest point
//! reached is the unit's maximum stack size.

use crate::error::{CodegenError, CodegenResult};
use crate::types::OperandType;
use strand_syntax::Node;

#[derive(Debug, Default, Clone)]
pub struct TypeStack {
    entries: Vec<OperandType>,
    max_depth: usize,
}

impl TypeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ty: OperandType) {
        self.entries.push(ty);
        self.max_depth = self.max_depth.max(self.entries.len());
    }

    /// Pop the top type; `at` names the construct consuming it.
    pub fn pop(&mut self, at: &Node) -> CodegenResult<OperandType> {
        self.entries
            .pop()
            .ok_or_else(|| CodegenError::structural(at, "type stack underflow"))
    }

    /// Pop a value that must be represented as an int at runtime.
    pub fn pop_int_category(&mut self, at: &Node) -> CodegenResult<OperandType> {
        let ty = self.pop(at)?;
        if !ty.is_int_category() {
            return Err(CodegenError::type_mismatch(at, "integer category", ty));
        }
        Ok(ty)
    }

    pub fn peek(&self) -> Option<OperandType> {
        self.entries.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
