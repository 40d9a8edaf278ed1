//! # Strand Code Generation
//!
//! This crate compiles Strand syntax trees into units for a typed stack
//! machine.
//!
//! ## Architecture
//!
//! The code generation pipeline:
//! 1. **Input**: a [`strand_syntax::Node`] tree, in memory or loaded from JSON
//! 2. **Statements**: [`StmtCompiler`] walks the tree and delegates to
//!    [`ExprCompiler`] and [`ControlFlowCompiler`]
//! 3. **Typing**: a compile-time [`TypeStack`](compiler::TypeStack) mirrors
//!    the runtime stack and a scoped [`SymbolTable`](compiler::SymbolTable)
//!    assigns local slots
//! 4. **Emission**: instructions go through a [`CodeBuffer`](bytecode::CodeBuffer)
//! 5. **Multitask**: inline task bodies become separate units; named tasks
//!    are resolved through a [`UnitResolver`]
//! 6. **Output**: a [`Compilation`] whose units an [`ArtifactStore`] writes
//!    to disk
//!
//! ## Usage
//!
//! ```rust
//! use strand_codegen::compile;
//! use strand_syntax::build::{add, assign, ident, int, print, seq};
//!
//! let tree = seq([assign("x", add(int(1), int(2))), print(ident("x"))]);
//! let compilation = compile(&tree).unwrap();
//! assert_eq!(compilation.program().max_locals, 1);
//! ```

pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod error;
pub mod linker;
pub mod types;

pub use bytecode::{Instruction, Unit, UnitKind};
pub use compiler::{Compilation, ControlFlowCompiler, ExprCompiler, Session, StmtCompiler};
pub use config::CompilerConfig;
pub use error::{CodegenError, CodegenResult};
pub use linker::{ArtifactStore, UnitResolver};
pub use types::OperandType;

/// Compile a program tree with the default configuration
///
/// # Arguments
/// * `tree` - The program body
///
/// # Returns
/// The program unit and every inline task unit it spawns
pub fn compile(tree: &strand_syntax::Node) -> CodegenResult<Compilation> {
    Session::default().compile_program(tree)
}
