//! Compilation context holding per-unit state during code generation

use crate::bytecode::{CodeBuffer, Constant, Unit, UnitKind};
use crate::compiler::driver::Session;
use crate::compiler::symbols::SymbolTable;
use crate::compiler::type_stack::TypeStack;
use crate::types::OperandType;

/// State of one unit being compiled.
///
/// Every compile call receives the context by `&mut`; a fresh one is built
/// for each unit, including inline task units, so no two units share a type
/// stack or symbol table.
pub struct CompileContext<'s> {
    pub session: &'s mut Session,
    pub unit_name: String,
    pub types: TypeStack,
    pub symbols: SymbolTable,
    pub code: CodeBuffer,
}

impl<'s> CompileContext<'s> {
    pub fn new(session: &'s mut Session, unit_name: impl Into<String>) -> Self {
        Self {
            session,
            unit_name: unit_name.into(),
            types: TypeStack::new(),
            symbols: SymbolTable::new(),
            code: CodeBuffer::new(),
        }
    }

    /// Emit a constant and record its type.
    pub fn push_constant(&mut self, constant: Constant, ty: OperandType) {
        self.code.emit_constant(constant);
        self.types.push(ty);
    }

    pub fn finish(self, kind: UnitKind) -> Unit {
        Unit {
            max_locals: self.symbols.slot_count(),
            max_stack: self.types.max_depth() as u16,
            locals: self.symbols.into_locals(),
            instructions: self.code.into_instructions(),
            ..Unit::new(self.unit_name, kind)
        }
    }
}
