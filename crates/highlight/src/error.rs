//! Error types for highlight coordination

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HighlightError {
    #[error("Unknown highlight mode: {0}")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, HighlightError>;
