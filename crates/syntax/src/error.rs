//! Syntax tree persistence errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("Malformed syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
