//! Renderer settings file
//!
//! One JSON file configures the HTML writer, the expression renderer and the
//! highlight key bindings. Missing sections take their defaults.

use highlight::KeyBindings;
use math::RenderConfig;
use render_model::HtmlConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub html: HtmlConfig,
    pub math: RenderConfig,
    pub keys: KeyBindings,
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A file that cannot be parsed is logged and replaced by defaults; a file
    /// that cannot be read is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        match serde_json::from_str::<Settings>(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                Settings::default()
            }
        }
    }
}
