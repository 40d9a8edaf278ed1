//! Scoped symbol table mapping identifiers to local slots
//!
//! Frames form a stack. Lookups search from the innermost frame outward.
//! Slots are numbered sequentially from 0 in declaration order; a nested
//! frame continues after the slots of its enclosing frames and gives its
//! slots back when it is left.

use crate::bytecode::LocalVariable;
use crate::error::{CodegenError, CodegenResult};
use crate::types::OperandType;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub slot: u16,
    pub ty: OperandType,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    frames: Vec<IndexMap<String, Symbol>>,
    next_slot: u16,
    max_slots: u16,
    declared: Vec<LocalVariable>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(IndexMap::new());
    }

    pub fn exit_scope(&mut self) -> CodegenResult<()> {
        let frame = self.frames.pop().ok_or_else(|| CodegenError::Structural {
            node: "scope".to_string(),
            message: "exit_scope called with no scope open".to_string(),
        })?;
        self.next_slot -= frame.len() as u16;
        Ok(())
    }

    /// Bind `name` in the innermost frame and return its slot.
    ///
    /// Declaring a name the frame already holds returns the existing slot
    /// when the types agree.
    pub fn declare(&mut self, name: &str, ty: OperandType) -> CodegenResult<u16> {
        let frame = self.frames.last_mut().ok_or_else(|| CodegenError::Structural {
            node: format!("identifier '{name}'"),
            message: "declaration outside of any scope".to_string(),
        })?;

        if let Some(existing) = frame.get(name) {
            if existing.ty != ty {
                return Err(CodegenError::TypeMismatch {
                    node: format!("identifier '{name}'"),
                    expected: existing.ty.to_string(),
                    actual: ty.to_string(),
                });
            }
            return Ok(existing.slot);
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.max_slots = self.max_slots.max(self.next_slot);
        frame.insert(name.to_string(), Symbol { slot, ty });
        self.declared.push(LocalVariable {
            name: name.to_string(),
            slot,
            ty,
        });
        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    /// Number of slots the unit needs.
    pub fn slot_count(&self) -> u16 {
        self.max_slots
    }

    /// Every declaration made so far, including those of closed scopes.
    pub fn locals(&self) -> &[LocalVariable] {
        &self.declared
    }

    pub fn into_locals(self) -> Vec<LocalVariable> {
        self.declared
    }
}
