//! Highlight modes and the context they are evaluated in

use crate::error::HighlightError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which occurrences of an id a highlight request reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightMode {
    /// Only inside the current proof node
    #[default]
    WithinProofNode,
    /// Everywhere in the document
    EntireDocument,
    /// Every proof node up to and including the current one
    CurrentAndPrevious,
}

impl HighlightMode {
    pub const ALL: [HighlightMode; 3] = [
        HighlightMode::WithinProofNode,
        HighlightMode::EntireDocument,
        HighlightMode::CurrentAndPrevious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightMode::WithinProofNode => "within-proof-node",
            HighlightMode::EntireDocument => "entire-document",
            HighlightMode::CurrentAndPrevious => "current-and-previous",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HighlightMode::WithinProofNode => "Within proof node",
            HighlightMode::EntireDocument => "Entire document",
            HighlightMode::CurrentAndPrevious => "Current and previous",
        }
    }

    /// Next mode in cycling order
    pub fn next(&self) -> Self {
        match self {
            HighlightMode::WithinProofNode => HighlightMode::EntireDocument,
            HighlightMode::EntireDocument => HighlightMode::CurrentAndPrevious,
            HighlightMode::CurrentAndPrevious => HighlightMode::WithinProofNode,
        }
    }
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightMode {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HighlightMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| HighlightError::UnknownMode(s.to_string()))
    }
}

/// Where the reader currently is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightContext {
    #[serde(default)]
    pub proof_node_id: Option<String>,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub mode: HighlightMode,
}

impl HighlightContext {
    pub fn new(mode: HighlightMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_proof_node(mut self, id: impl Into<String>) -> Self {
        self.proof_node_id = Some(id.into());
        self
    }

    pub fn with_section(mut self, id: impl Into<String>) -> Self {
        self.section_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        for mode in HighlightMode::ALL {
            assert_eq!(mode.to_string().parse::<HighlightMode>(), Ok(mode));
        }
        assert_eq!(
            "sideways".parse::<HighlightMode>(),
            Err(HighlightError::UnknownMode("sideways".to_string()))
        );
    }

    #[test]
    fn test_mode_cycle_returns_to_start() {
        let start = HighlightMode::default();
        assert_eq!(start.next().next().next(), start);
        assert_ne!(start.next(), start);
    }

    #[test]
    fn test_mode_serde_is_kebab_case() {
        let json = serde_json::to_string(&HighlightMode::CurrentAndPrevious).unwrap();
        assert_eq!(json, "\"current-and-previous\"");
    }
}
