//! Compiler configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the task search path.
pub const TASK_PATH_ENV: &str = "STRAND_TASK_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Name given to the program unit.
    pub program_name: String,
    /// Directory unit files are written to.
    pub output_dir: PathBuf,
    /// Platform path list searched for pre-compiled task units.
    pub task_search_path: Option<String>,
    /// Write a `.lst` listing next to every unit file.
    pub emit_listing: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program_name: "Main".to_string(),
            output_dir: PathBuf::from("."),
            task_search_path: None,
            emit_listing: false,
        }
    }
}

impl CompilerConfig {
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn with_task_search_path(mut self, path: impl Into<String>) -> Self {
        self.task_search_path = Some(path.into());
        self
    }
}
