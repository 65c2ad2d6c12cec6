//! Rich text - Paragraph-level text mixing prose, inline math and links

use math::ExpressionNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A paragraph of rich text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub segments: Vec<RichTextSegment>,
    #[serde(default)]
    pub alignment: Option<TextAlignment>,
}

impl RichText {
    /// A paragraph holding a single plain text segment
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            segments: vec![RichTextSegment::Text(text.into())],
            alignment: None,
        }
    }

    pub fn from_segments(segments: Vec<RichTextSegment>) -> Self {
        Self {
            segments,
            alignment: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenated text of the plain segments, used for titles and logs
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            segment.write_plain(&mut out);
        }
        out
    }
}

/// One run of rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextSegment {
    Text(String),
    StyledText {
        text: String,
        #[serde(default)]
        styles: Vec<TextStyle>,
    },
    /// Inline math
    Math(ExpressionNode),
    Link {
        content: Vec<RichTextSegment>,
        target: LinkTarget,
        #[serde(default)]
        tooltip: Option<String>,
    },
    FootnoteReference(String),
    CodeInline(String),
    InteractiveVariable {
        variable_id: String,
        display_name: String,
    },
    #[serde(untagged)]
    Unknown(Value),
}

impl RichTextSegment {
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "Text",
        "StyledText",
        "Math",
        "Link",
        "FootnoteReference",
        "CodeInline",
        "InteractiveVariable",
    ];

    fn write_plain(&self, out: &mut String) {
        match self {
            RichTextSegment::Text(text) | RichTextSegment::CodeInline(text) => out.push_str(text),
            RichTextSegment::StyledText { text, .. } => out.push_str(text),
            RichTextSegment::Link { content, .. } => {
                for segment in content {
                    segment.write_plain(out);
                }
            }
            RichTextSegment::InteractiveVariable { display_name, .. } => {
                out.push_str(display_name)
            }
            RichTextSegment::Math(_)
            | RichTextSegment::FootnoteReference(_)
            | RichTextSegment::Unknown(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Color(String),
    BackgroundColor(String),
    FontSize(String),
    FontFamily(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlignment {
    pub fn css_value(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
            TextAlignment::Justify => "justify",
        }
    }
}

/// Where a link points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkTarget {
    Url(String),
    /// Another section or content block in the system
    InternalPageId(String),
    DefinitionId {
        term_id: String,
        #[serde(default)]
        theory_context: Option<String>,
    },
    TheoremId(String),
    GlossaryTerm(String),
    BibliographyKey(String),
    InteractiveElementId(String),
    #[serde(untagged)]
    Unknown(Value),
}
