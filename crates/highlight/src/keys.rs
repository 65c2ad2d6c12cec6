//! Keyboard bindings for the highlight coordinator

use crate::mode::HighlightMode;
use serde::{Deserialize, Serialize};

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    SetMode(HighlightMode),
    CycleMode,
    Clear,
}

/// Key names as reported by the host, e.g. `"1"`, `"m"`, `"Escape"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub within_proof_node: String,
    pub entire_document: String,
    pub current_and_previous: String,
    pub cycle_mode: String,
    pub clear: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            within_proof_node: "1".to_string(),
            entire_document: "2".to_string(),
            current_and_previous: "3".to_string(),
            cycle_mode: "m".to_string(),
            clear: "Escape".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: &str) -> Option<KeyAction> {
        if key.is_empty() {
            return None;
        }
        if key == self.within_proof_node {
            Some(KeyAction::SetMode(HighlightMode::WithinProofNode))
        } else if key == self.entire_document {
            Some(KeyAction::SetMode(HighlightMode::EntireDocument))
        } else if key == self.current_and_previous {
            Some(KeyAction::SetMode(HighlightMode::CurrentAndPrevious))
        } else if key == self.cycle_mode {
            Some(KeyAction::CycleMode)
        } else if key == self.clear {
            Some(KeyAction::Clear)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.action_for("1"),
            Some(KeyAction::SetMode(HighlightMode::WithinProofNode))
        );
        assert_eq!(
            bindings.action_for("3"),
            Some(KeyAction::SetMode(HighlightMode::CurrentAndPrevious))
        );
        assert_eq!(bindings.action_for("Escape"), Some(KeyAction::Clear));
        assert_eq!(bindings.action_for("x"), None);
        assert_eq!(bindings.action_for(""), None);
    }

    #[test]
    fn test_partial_bindings_from_json() {
        let bindings: KeyBindings = serde_json::from_str(r#"{"cycle_mode": "Tab"}"#).unwrap();
        assert_eq!(bindings.action_for("Tab"), Some(KeyAction::CycleMode));
        assert_eq!(bindings.action_for("m"), None);
        assert_eq!(bindings.clear, "Escape");
    }
}
