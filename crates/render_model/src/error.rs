//! Error types for render model
//!
//! Schema problems never surface here; they are rendered in place as
//! placeholders or error markers. These errors cover decoding input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Document decoding failed: {0}")]
    Document(#[from] doc_model::DocModelError),

    #[error("Expression decoding failed: {0}")]
    Expression(#[from] math::MathError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
