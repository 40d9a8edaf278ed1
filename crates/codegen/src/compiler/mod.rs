//! Compiler passes
//!
//! Tree-walking translation of syntax trees into units. The statement,
//! expression and control-flow compilers recurse into each other through a
//! shared [`CompileContext`]; the driver owns the per-unit lifecycle.

pub mod context;
pub mod control_flow;
pub mod driver;
pub mod expr;
pub mod stmt;
pub mod symbols;
pub mod type_stack;

pub use context::CompileContext;
pub use control_flow::ControlFlowCompiler;
pub use driver::{Compilation, Session};
pub use expr::ExprCompiler;
pub use stmt::StmtCompiler;
pub use symbols::{Symbol, SymbolTable};
pub use type_stack::TypeStack;
