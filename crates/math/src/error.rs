//! Error types for the math crate

use thiserror::Error;

/// Errors that can occur in math operations
///
/// Rendering never fails on schema problems; these cover decoding and
/// structural checks performed by callers.
#[derive(Error, Debug)]
pub enum MathError {
    /// Invalid math structure
    #[error("Invalid math structure: {0}")]
    InvalidStructure(String),

    /// JSON decoding or encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for math operations
pub type MathResult<T> = Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::InvalidStructure("empty matrix row".to_string());
        assert_eq!(err.to_string(), "Invalid math structure: empty matrix row");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let math_err: MathError = json_err.into();
        assert!(matches!(math_err, MathError::Json(_)));
    }
}
