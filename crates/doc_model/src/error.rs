//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
