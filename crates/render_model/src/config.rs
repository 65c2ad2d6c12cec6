//! HTML rendering configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Prepended to every class name the writer emits
    pub class_prefix: String,
    /// Show "1.", "2.", ... before proof steps
    pub number_steps: bool,
    /// Render before/after traces of rewrite and simplify tactics
    pub show_step_traces: bool,
    pub show_qed: bool,
    /// Wrap output in a complete HTML document
    pub standalone: bool,
    /// Title of the standalone document
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            class_prefix: String::new(),
            number_steps: true,
            show_step_traces: false,
            show_qed: true,
            standalone: false,
            title: "Document".to_string(),
        }
    }
}

impl HtmlConfig {
    /// Full class name with the configured prefix
    pub fn class_name(&self, class: &str) -> String {
        format!("{}{}", self.class_prefix, class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HtmlConfig::default();
        assert!(config.number_steps);
        assert!(!config.show_step_traces);
        assert_eq!(config.class_name("proof"), "proof");
    }

    #[test]
    fn test_partial_json() {
        let config: HtmlConfig =
            serde_json::from_str(r#"{"class_prefix": "md-", "standalone": true}"#).unwrap();
        assert_eq!(config.class_name("proof"), "md-proof");
        assert!(config.standalone);
        assert!(config.show_qed);
    }
}
