//! # Strand Syntax
//!
//! Syntax tree model consumed by the Strand code generator.
//!
//! Trees are strict binary trees: every [`Node`] owns at most a left and a
//! right child, and carries an optional raw text value used for literal
//! parsing and identifier names. The scanner and parser that produce these
//! trees from source text live outside this crate; trees reach the compiler
//! either in memory or through the JSON form in [`persist`].
//!
//! ## Usage
//!
//! ```rust
//! use strand_syntax::build::{assign, int, print, ident, seq};
//!
//! let program = seq([assign("x", int(5)), print(ident("x"))]);
//! assert_eq!(program.statement_count(), 2);
//! ```

pub mod build;
pub mod error;
pub mod kind;
pub mod node;
pub mod persist;

pub use error::{SyntaxError, SyntaxResult};
pub use kind::NodeKind;
pub use node::Node;
pub use persist::{from_json, load_tree, save_tree, to_json};
