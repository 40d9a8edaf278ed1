//! Textual persistence of syntax trees.
//!
//! Trees are stored as JSON objects with the fields `kind`, `value`, `left`
//! and `right`; absent fields are omitted:
//!
//! ```json
//! {"kind": "print", "left": {"kind": "literal-integer", "value": "7"}}
//! ```
//!
//! Sequences nest to the right, so a long program is a deep object; reading
//! has no recursion limit and grows the stack on demand.

use crate::error::SyntaxResult;
use crate::node::Node;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub fn to_json(tree: &Node) -> SyntaxResult<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

pub fn from_json(text: &str) -> SyntaxResult<Node> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let tree = Node::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(tree)
}

pub fn save_tree(path: &Path, tree: &Node) -> SyntaxResult<()> {
    fs::write(path, to_json(tree)?)?;
    Ok(())
}

pub fn load_tree(path: &Path) -> SyntaxResult<Node> {
    let text = fs::read_to_string(path)?;
    from_json(&text)
}
