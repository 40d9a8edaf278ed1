//! Pipeline for processing Strand syntax trees.
//!
//! Every command loads a tree, compiles it with a fresh session and either
//! stops there (`check`) or persists the units (`build`). A failure anywhere
//! aborts the whole run; no unit is written unless every unit compiled.

use std::path::{Path, PathBuf};
use strand_codegen::linker::store;
use strand_codegen::{ArtifactStore, CodegenError, Compilation, CompilerConfig, Session};
use strand_syntax::SyntaxError;
use thiserror::Error;
use tracing::info;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

fn compile_file(file: &Path, config: CompilerConfig) -> PipelineResult<Compilation> {
    let tree = strand_syntax::load_tree(file).map_err(|source| PipelineError::Syntax {
        path: file.to_path_buf(),
        source,
    })?;
    info!(file = %file.display(), nodes = tree.size(), "loaded syntax tree");

    Ok(Session::new(config).compile_program(&tree)?)
}

/// Compile `file` without writing any output.
pub fn check_file(file: &Path, config: CompilerConfig) -> PipelineResult<Compilation> {
    compile_file(file, config)
}

/// Compile `file` and write its units to the configured output directory.
pub fn build_file(file: &Path, config: CompilerConfig) -> PipelineResult<Vec<PathBuf>> {
    let store = ArtifactStore::new(&config.output_dir).with_listings(config.emit_listing);
    let compilation = compile_file(file, config)?;
    Ok(compilation.persist(&store)?)
}

/// Listing of a unit file.
pub fn list_unit(path: &Path) -> PipelineResult<String> {
    Ok(store::read_unit(path)?.listing())
}
