//! Codegen error types

use crate::types::OperandType;
use strand_syntax::Node;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Malformed tree at {node}: {message}")]
    Structural { node: String, message: String },

    #[error("Type mismatch at {node}: expected {expected}, got {actual}")]
    TypeMismatch {
        node: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported conversion from {from} to {to}{}", located(.node))]
    UnsupportedConversion {
        from: OperandType,
        to: OperandType,
        node: Option<String>,
    },

    #[error("Unsupported operation: {operation} on {ty}{}", located(.node))]
    UnsupportedOperation {
        operation: String,
        ty: OperandType,
        node: Option<String>,
    },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unexpected node in {context} position: {node}")]
    UnexpectedNode { node: String, context: &'static str },

    #[error("Cannot print values of type {ty} at {node}")]
    UnsupportedPrintType { ty: OperandType, node: String },

    #[error("Task unit '{name}' not found on search path '{search_path}'")]
    UnitNotFound { name: String, search_path: String },

    #[error("Malformed search path: {0}")]
    MalformedSearchPath(String),

    #[error("Unit '{name}' cannot be spawned: {reason}")]
    InvalidTaskUnit { name: String, reason: String },

    #[error("Invalid unit artifact {path}: {reason}")]
    Artifact { path: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unit encoding error: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    #[error("Unit decoding error: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),
}

fn located(node: &Option<String>) -> String {
    node.as_ref()
        .map(|node| format!(" at {node}"))
        .unwrap_or_default()
}

impl CodegenError {
    pub fn structural(node: &Node, message: impl Into<String>) -> Self {
        CodegenError::Structural {
            node: node.to_string(),
            message: message.into(),
        }
    }

    pub fn type_mismatch(node: &Node, expected: impl ToString, actual: impl ToString) -> Self {
        CodegenError::TypeMismatch {
            node: node.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn unexpected(node: &Node, context: &'static str) -> Self {
        CodegenError::UnexpectedNode {
            node: node.to_string(),
            context,
        }
    }

    /// Attach the offending node to lattice errors raised without one.
    pub fn located(self, at: &Node) -> Self {
        match self {
            CodegenError::UnsupportedConversion { from, to, node: None } => {
                CodegenError::UnsupportedConversion {
                    from,
                    to,
                    node: Some(at.to_string()),
                }
            }
            CodegenError::UnsupportedOperation {
                operation,
                ty,
                node: None,
            } => CodegenError::UnsupportedOperation {
                operation,
                ty,
                node: Some(at.to_string()),
            },
            other => other,
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;
