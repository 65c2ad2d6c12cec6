//! Layout containers and interactive blocks

use crate::rich_text::{RichText, RichTextSegment};
use crate::section::SectionContentNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Panels
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideBySideLayout {
    pub left_panel: Panel,
    pub right_panel: Panel,
    #[serde(default)]
    pub highlight_correspondence: Option<bool>,
    #[serde(default)]
    pub layout_config: Option<SideBySideConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideBySideConfig {
    #[serde(default)]
    pub left_width: Option<String>,
    #[serde(default)]
    pub right_width: Option<String>,
    #[serde(default)]
    pub gap: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub panels: Vec<Panel>,
    pub layout_type: PanelLayoutType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelLayoutType {
    Tabs,
    Accordion,
    Grid { columns: usize },
    Sidebar { main_panel_id: String },
    FloatingPanels,
}

impl PanelLayoutType {
    pub fn css_name(&self) -> &'static str {
        match self {
            PanelLayoutType::Tabs => "tabs",
            PanelLayoutType::Accordion => "accordion",
            PanelLayoutType::Grid { .. } => "grid",
            PanelLayoutType::Sidebar { .. } => "sidebar",
            PanelLayoutType::FloatingPanels => "floating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    #[serde(default)]
    pub title: Option<RichText>,
    pub content: Vec<SectionContentNode>,
    #[serde(default)]
    pub panel_role: Option<PanelRole>,
    #[serde(default)]
    pub initially_visible: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelRole {
    MainContent,
    ComparisonLeft,
    ComparisonRight,
    SourceTheory,
    TargetTheory,
    TypeAnnotations,
    ResourceBank,
    Navigation,
    ControlPanel,
    InfoBox,
}

// =============================================================================
// Annotations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationOverlay {
    pub base_content: Vec<SectionContentNode>,
    pub annotations: Vec<Annotation>,
    pub overlay_style: OverlayStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    /// Element id the annotation attaches to
    pub target_selector: String,
    pub annotation_content: Vec<RichTextSegment>,
    pub annotation_type: AnnotationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationType {
    TypeInfo,
    Definition,
    Explanation,
    Animation,
    Highlight,
    Warning,
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayStyle {
    Tooltip,
    Popover,
    Inline,
    Sidebar,
    Highlight,
}

// =============================================================================
// Interactive blocks
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveDiagramNode {
    /// Kind of diagram, e.g. `commutative_diagram`
    pub diagram_type_id: String,
    /// Diagram-specific payload, passed through untouched
    pub data: String,
    #[serde(default)]
    pub caption: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveControls {
    pub controls: Vec<Control>,
    #[serde(default)]
    pub target_content_ids: Vec<String>,
    pub layout: ControlLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub label: String,
    pub control_type: ControlType,
    pub parameter_name: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlType {
    Slider { min: f64, max: f64, step: f64 },
    Toggle,
    Dropdown { options: Vec<String> },
    NumberInput {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    ColorPicker,
    Button { action: String },
    RadioGroup { options: Vec<String> },
    #[serde(untagged)]
    Unknown(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlLayout {
    Horizontal,
    Vertical,
    Grid { columns: usize },
    Floating,
}

impl ControlLayout {
    pub fn css_name(&self) -> &'static str {
        match self {
            ControlLayout::Horizontal => "horizontal",
            ControlLayout::Vertical => "vertical",
            ControlLayout::Grid { .. } => "grid",
            ControlLayout::Floating => "floating",
        }
    }
}
