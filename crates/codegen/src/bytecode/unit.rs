//! Compiled units
//!
//! A unit is one independently loadable artifact: either the program entry
//! point or a spawnable task. Task units carry a zero-argument constructor
//! and implement the runnable capability; their body becomes the `run`
//! method.

use super::instruction::{Instruction, Label};
use crate::error::{CodegenError, CodegenResult};
use crate::types::OperandType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Program,
    Task,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Program => f.write_str("program"),
            UnitKind::Task => f.write_str("task"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub slot: u16,
    pub ty: OperandType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub kind: UnitKind,
    pub max_locals: u16,
    pub max_stack: u16,
    pub locals: Vec<LocalVariable>,
    pub instructions: Vec<Instruction>,
}

impl Unit {
    pub fn new(name: String, kind: UnitKind) -> Self {
        Self {
            name,
            kind,
            max_locals: 0,
            max_stack: 0,
            locals: Vec::new(),
            instructions: Vec::new(),
        }
    }

    /// Name of the method holding the unit body.
    pub fn entry_point(&self) -> &'static str {
        match self.kind {
            UnitKind::Program => "main",
            UnitKind::Task => "run",
        }
    }

    pub fn is_runnable(&self) -> bool {
        self.kind == UnitKind::Task
    }

    pub fn has_default_constructor(&self) -> bool {
        self.kind == UnitKind::Task
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction index of every placed label.
    pub fn label_offsets(&self) -> IndexMap<Label, usize> {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(offset, instr)| match instr {
                Instruction::Label(label) => Some((*label, offset)),
                _ => None,
            })
            .collect()
    }

    /// Every label placed once and every jump landing on a placed label.
    pub fn check_labels(&self) -> CodegenResult<()> {
        let mut placed = IndexMap::new();
        for (offset, instr) in self.instructions.iter().enumerate() {
            if let Instruction::Label(label) = instr
                && placed.insert(*label, offset).is_some()
            {
                return Err(self.invalid(format!("label {label} placed twice")));
            }
        }

        for instr in &self.instructions {
            if let Some(target) = instr.jump_target()
                && !placed.contains_key(&target)
            {
                return Err(self.invalid(format!("jump to unplaced label {target}")));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> CodegenError {
        CodegenError::Artifact {
            path: self.name.clone(),
            reason,
        }
    }

    /// Human-readable rendering of the unit.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "; {} {} ({}) locals={} stack={}",
            self.kind,
            self.name,
            self.entry_point(),
            self.max_locals,
            self.max_stack
        );
        for local in &self.locals {
            let _ = writeln!(out, ";   slot {} {}: {}", local.slot, local.name, local.ty);
        }
        for (offset, instr) in self.instructions.iter().enumerate() {
            if instr.is_label() {
                let _ = writeln!(out, "{instr}");
            } else {
                let _ = writeln!(out, "{offset:>5}  {instr}");
            }
        }
        out
    }
}
