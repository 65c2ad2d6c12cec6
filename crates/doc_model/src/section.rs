//! Sections and their content blocks
//!
//! A `Section` is a navigable part of a document. Its content is an ordered
//! list of `SectionContentNode` blocks; blocks nest arbitrarily through
//! sub-sections, layout containers and structured math.

use crate::blocks::*;
use crate::branching::BranchingContainer;
use crate::document::MathDocument;
use crate::error::Result;
use crate::panels::*;
use crate::rich_text::RichText;
use crate::structured::StructuredMathNode;
use math::ExpressionNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Section
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: Option<RichText>,
    #[serde(default)]
    pub content: Vec<SectionContentNode>,
    /// Free-form key/value pairs (tags, abstraction level, visibility)
    #[serde(default)]
    pub metadata: Vec<(String, String)>,
    #[serde(default)]
    pub display_options: Option<SectionDisplayOptions>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(RichText::plain(title));
        self
    }

    pub fn with_content(mut self, content: Vec<SectionContentNode>) -> Self {
        self.content = content;
        self
    }

    /// Parse a section from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Look up a metadata value
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn shows_title_numbering(&self) -> bool {
        self.display_options
            .as_ref()
            .and_then(|o| o.show_title_numbering)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionDisplayOptions {
    #[serde(default)]
    pub show_title_numbering: Option<bool>,
}

// =============================================================================
// Content nodes
// =============================================================================

/// A content block inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SectionContentNode {
    #[serde(alias = "Paragraph")]
    RichText(RichText),
    /// Display math; a missing payload is kept so it can be reported in place
    #[serde(alias = "MathNode")]
    Math {
        #[serde(default)]
        math: Option<ExpressionNode>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        caption: Option<RichText>,
    },
    StructuredMath(StructuredMathNode),
    List(ListNode),
    Table(TableNode),
    CodeBlock(CodeBlockNode),
    Image(ImageNode),
    SubSection(Box<Section>),
    SideBySideLayout(SideBySideLayout),
    PanelLayout(PanelLayout),
    Grid(GridNode),
    Columns(ColumnsNode),
    InteractiveDiagram(InteractiveDiagramNode),
    InteractiveControls(InteractiveControls),
    AnnotationOverlay(AnnotationOverlay),
    BranchingContainer(BranchingContainer),
    CollapsibleBlock(CollapsibleBlockNode),
    QuoteBlock {
        content: Vec<RichText>,
        #[serde(default)]
        attribution: Option<RichText>,
    },
    AlertBox {
        style: AlertBoxStyle,
        content: Vec<SectionContentNode>,
    },
    ThematicBreak,
    CustomComponent {
        #[serde(alias = "component_name")]
        name: String,
        #[serde(default)]
        props: Option<String>,
        #[serde(default)]
        fallback_content: Vec<SectionContentNode>,
    },
    /// Reference to a section rendered elsewhere
    EmbeddedSectionRef(String),
    /// A whole document nested in place, e.g. a preview or tooltip
    EmbeddedDocument(Box<MathDocument>),
    #[serde(untagged)]
    Unsupported(Value),
}

impl SectionContentNode {
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "RichText",
        "Paragraph",
        "Math",
        "MathNode",
        "StructuredMath",
        "List",
        "Table",
        "CodeBlock",
        "Image",
        "SubSection",
        "SideBySideLayout",
        "PanelLayout",
        "Grid",
        "Columns",
        "InteractiveDiagram",
        "InteractiveControls",
        "AnnotationOverlay",
        "BranchingContainer",
        "CollapsibleBlock",
        "QuoteBlock",
        "AlertBox",
        "ThematicBreak",
        "CustomComponent",
        "EmbeddedSectionRef",
        "EmbeddedDocument",
    ];

    /// Display math block with an expression payload
    pub fn math(node: ExpressionNode) -> Self {
        SectionContentNode::Math {
            math: Some(node),
            label: None,
            caption: None,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        SectionContentNode::RichText(RichText::plain(text))
    }

    pub fn tag(&self) -> &'static str {
        use SectionContentNode as N;
        match self {
            N::RichText(_) => "RichText",
            N::Math { .. } => "Math",
            N::StructuredMath(_) => "StructuredMath",
            N::List(_) => "List",
            N::Table(_) => "Table",
            N::CodeBlock(_) => "CodeBlock",
            N::Image(_) => "Image",
            N::SubSection(_) => "SubSection",
            N::SideBySideLayout(_) => "SideBySideLayout",
            N::PanelLayout(_) => "PanelLayout",
            N::Grid(_) => "Grid",
            N::Columns(_) => "Columns",
            N::InteractiveDiagram(_) => "InteractiveDiagram",
            N::InteractiveControls(_) => "InteractiveControls",
            N::AnnotationOverlay(_) => "AnnotationOverlay",
            N::BranchingContainer(_) => "BranchingContainer",
            N::CollapsibleBlock(_) => "CollapsibleBlock",
            N::QuoteBlock { .. } => "QuoteBlock",
            N::AlertBox { .. } => "AlertBox",
            N::ThematicBreak => "ThematicBreak",
            N::CustomComponent { .. } => "CustomComponent",
            N::EmbeddedSectionRef(_) => "EmbeddedSectionRef",
            N::EmbeddedDocument(_) => "EmbeddedDocument",
            N::Unsupported(_) => "Unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::ExpressionContent;

    #[test]
    fn test_section_from_json() {
        let json = r#"{
            "id": "intro",
            "title": {"segments": [{"Text": "Introduction"}]},
            "content": [
                {"RichText": {"segments": [{"Text": "Hello"}]}},
                {"Math": {"math": {"id": "e1", "content": {"Identifier": {"body": "x"}}}}},
                "ThematicBreak"
            ],
            "metadata": [["level", "L2"]]
        }"#;
        let section = Section::from_json(json).unwrap();
        assert_eq!(section.id, "intro");
        assert_eq!(section.content.len(), 3);
        assert_eq!(section.metadata_value("level"), Some("L2"));
        assert_eq!(section.title.as_ref().map(|t| t.plain_text()).as_deref(), Some("Introduction"));
    }

    #[test]
    fn test_legacy_tag_aliases() {
        let json = r#"[
            {"Paragraph": {"segments": []}},
            {"MathNode": {"math": {"id": "m", "content": "Empty"}, "label": "eq1"}}
        ]"#;
        let nodes: Vec<SectionContentNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes[0].tag(), "RichText");
        match &nodes[1] {
            SectionContentNode::Math { math, label, .. } => {
                assert!(matches!(
                    math.as_ref().map(|m| m.content.as_ref()),
                    Some(ExpressionContent::Empty)
                ));
                assert_eq!(label.as_deref(), Some("eq1"));
            }
            other => panic!("Expected math block, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_math_payload_is_representable() {
        let node: SectionContentNode = serde_json::from_str(r#"{"Math": {"label": "eq2"}}"#).unwrap();
        assert!(matches!(node, SectionContentNode::Math { math: None, .. }));
    }

    #[test]
    fn test_unknown_block_does_not_fail_section() {
        let json = r#"{"id": "s", "content": [{"Hologram": {"x": 1}}, {"RichText": {"segments": []}}]}"#;
        let section = Section::from_json(json).unwrap();
        assert_eq!(section.content[0].tag(), "Unsupported");
        assert_eq!(section.content[1].tag(), "RichText");
    }

    #[test]
    fn test_known_tags_match_variants() {
        let samples = [
            SectionContentNode::paragraph("a"),
            SectionContentNode::math(ExpressionNode::identifier("x")),
            SectionContentNode::ThematicBreak,
            SectionContentNode::EmbeddedSectionRef("other".to_string()),
        ];
        for node in samples {
            assert!(SectionContentNode::KNOWN_TAGS.contains(&node.tag()));
        }
    }

    #[test]
    fn test_embedded_document_block() {
        let json = r#"{"EmbeddedDocument": {"id": "tip", "content_type": {"TooltipSummary": {
            "content": {"key_points": [{"id": "k1", "content": [{"Text": "closure"}]}]}
        }}}}"#;
        let node: SectionContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.tag(), "EmbeddedDocument");
        assert!(SectionContentNode::KNOWN_TAGS.contains(&node.tag()));
    }

    #[test]
    fn test_title_numbering_defaults_off() {
        let section = Section::new("s");
        assert!(!section.shows_title_numbering());
    }
}
