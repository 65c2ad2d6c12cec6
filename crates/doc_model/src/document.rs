//! Top-level documents
//!
//! A `MathDocument` wraps one of several document kinds. Long-form kinds
//! carry a `DocumentStructure` (abstract, contents, body, footnotes,
//! glossary, bibliography); summaries, interactive pages, comparisons and
//! embeds carry their own content. Per-kind metadata the renderer does not
//! use is kept as raw JSON in `details`.

use crate::error::Result;
use crate::rich_text::RichTextSegment;
use crate::section::{Section, SectionContentNode};
use math::ExpressionNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathDocument {
    pub id: String,
    pub content_type: MathDocumentType,
}

impl MathDocument {
    pub fn new(id: impl Into<String>, content_type: MathDocumentType) -> Self {
        Self {
            id: id.into(),
            content_type,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn title(&self) -> Option<&str> {
        use MathDocumentType as T;
        match &self.content_type {
            T::WikiPage(c)
            | T::Textbook(c)
            | T::ScientificPaper(c)
            | T::PersonalNotes(c)
            | T::MathematicianNotes(c)
            | T::StudyNotes(c) => Some(c.title.as_str()),
            T::TooltipSummary(c) | T::BlogPost(c) | T::AbstractSummary(c) | T::ConceptMap(c) => {
                c.title.as_deref()
            }
            T::AnimatedPresentation(c)
            | T::InteractivePlayground(c)
            | T::TypeMappingDisplay(c)
            | T::ResourcePanel(c) => Some(c.title.as_str()),
            T::ComparisonPage(c) => Some(c.title.as_str()),
            T::TransformationMapping(c) | T::ConceptAlignment(c) => Some(c.title.as_str()),
            T::StaticPreview(_)
            | T::LiveEmbed(_)
            | T::ConceptExtract(_)
            | T::IFrameEmbed(_)
            | T::Unknown(_) => None,
        }
    }
}

/// Document kind with its content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathDocumentType {
    WikiPage(StructuredDocument),
    Textbook(StructuredDocument),
    ScientificPaper(StructuredDocument),
    PersonalNotes(StructuredDocument),
    MathematicianNotes(StructuredDocument),
    StudyNotes(StructuredDocument),

    TooltipSummary(SummaryDocument),
    BlogPost(SummaryDocument),
    AbstractSummary(SummaryDocument),
    ConceptMap(SummaryDocument),

    AnimatedPresentation(InteractiveDocument),
    InteractivePlayground(InteractiveDocument),
    TypeMappingDisplay(InteractiveDocument),
    ResourcePanel(InteractiveDocument),

    ComparisonPage(ComparisonDocument),
    TransformationMapping(RelationshipDocument),
    ConceptAlignment(RelationshipDocument),

    StaticPreview(EmbedDocument),
    LiveEmbed(EmbedDocument),
    ConceptExtract(EmbedDocument),
    IFrameEmbed(EmbedDocument),

    #[serde(untagged)]
    Unknown(Value),
}

impl MathDocumentType {
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "WikiPage",
        "Textbook",
        "ScientificPaper",
        "PersonalNotes",
        "MathematicianNotes",
        "StudyNotes",
        "TooltipSummary",
        "BlogPost",
        "AbstractSummary",
        "ConceptMap",
        "AnimatedPresentation",
        "InteractivePlayground",
        "TypeMappingDisplay",
        "ResourcePanel",
        "ComparisonPage",
        "TransformationMapping",
        "ConceptAlignment",
        "StaticPreview",
        "LiveEmbed",
        "ConceptExtract",
        "IFrameEmbed",
    ];

    pub fn tag(&self) -> &'static str {
        use MathDocumentType as T;
        match self {
            T::WikiPage(_) => "WikiPage",
            T::Textbook(_) => "Textbook",
            T::ScientificPaper(_) => "ScientificPaper",
            T::PersonalNotes(_) => "PersonalNotes",
            T::MathematicianNotes(_) => "MathematicianNotes",
            T::StudyNotes(_) => "StudyNotes",
            T::TooltipSummary(_) => "TooltipSummary",
            T::BlogPost(_) => "BlogPost",
            T::AbstractSummary(_) => "AbstractSummary",
            T::ConceptMap(_) => "ConceptMap",
            T::AnimatedPresentation(_) => "AnimatedPresentation",
            T::InteractivePlayground(_) => "InteractivePlayground",
            T::TypeMappingDisplay(_) => "TypeMappingDisplay",
            T::ResourcePanel(_) => "ResourcePanel",
            T::ComparisonPage(_) => "ComparisonPage",
            T::TransformationMapping(_) => "TransformationMapping",
            T::ConceptAlignment(_) => "ConceptAlignment",
            T::StaticPreview(_) => "StaticPreview",
            T::LiveEmbed(_) => "LiveEmbed",
            T::ConceptExtract(_) => "ConceptExtract",
            T::IFrameEmbed(_) => "IFrameEmbed",
            T::Unknown(_) => "Unknown",
        }
    }
}

// =============================================================================
// Long-form documents
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub title: String,
    #[serde(default)]
    pub structure: DocumentStructure,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    #[serde(default)]
    pub abstract_content: Option<Section>,
    #[serde(default)]
    pub table_of_contents: Option<TocNode>,
    #[serde(default)]
    pub body: Vec<Section>,
    #[serde(default)]
    pub footnotes: Vec<Section>,
    #[serde(default)]
    pub glossary: Vec<Section>,
    #[serde(default)]
    pub bibliography: Vec<BibEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TocNode {
    pub title: String,
    /// Id of the section the entry points at
    pub target_id: String,
    #[serde(default)]
    pub children: Vec<TocNode>,
}

/// BibTeX-like entry; `fields` keeps producer order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BibEntry {
    pub entry_type: String,
    #[serde(default)]
    pub fields: Vec<(String, String)>,
}

impl BibEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Citation key from a `key`, `id` or `citation_key` field
    pub fn key(&self) -> Option<&str> {
        ["key", "id", "citation_key"]
            .into_iter()
            .find_map(|name| self.field(name))
    }

    /// One-line reference: author, title, venue and year
    pub fn citation(&self) -> String {
        let venue = ["journal", "booktitle", "publisher"]
            .into_iter()
            .find_map(|name| self.field(name));
        let parts: Vec<&str> = [self.field("author"), self.field("title"), venue, self.field("year")]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            return self
                .fields
                .iter()
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
                .join(", ");
        }
        format!("{}.", parts.join(". "))
    }
}

// =============================================================================
// Summaries
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: SimplifiedContent,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedContent {
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
    #[serde(default)]
    pub essential_definitions: Vec<EssentialDefinition>,
    #[serde(default)]
    pub core_examples: Vec<CoreExample>,
    #[serde(default)]
    pub concept_relationships: Vec<Value>,
}

impl SimplifiedContent {
    pub fn is_empty(&self) -> bool {
        self.key_points.is_empty()
            && self.essential_definitions.is_empty()
            && self.core_examples.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub id: String,
    #[serde(default)]
    pub content: Vec<RichTextSegment>,
    /// `Critical`, `Important`, `Helpful` or `Supplementary`
    #[serde(default)]
    pub importance_level: Option<String>,
    #[serde(default)]
    pub source_section_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssentialDefinition {
    pub term: String,
    #[serde(default)]
    pub simplified_definition: Vec<RichTextSegment>,
    #[serde(default)]
    pub formal_definition: Option<ExpressionNode>,
    #[serde(default)]
    pub intuitive_explanation: Option<Vec<RichTextSegment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreExample {
    pub example_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Vec<SectionContentNode>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
}

// =============================================================================
// Interactive, comparison and relationship pages
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractiveDocument {
    pub title: String,
    #[serde(default)]
    pub base_content: Vec<Section>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDocument {
    pub title: String,
    #[serde(default)]
    pub comparison_structure: ComparisonStructure,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStructure {
    #[serde(default)]
    pub comparison_type: String,
    #[serde(default)]
    pub sections: Vec<ComparisonSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSection {
    pub section_id: String,
    #[serde(default)]
    pub left_content: Vec<SectionContentNode>,
    #[serde(default)]
    pub right_content: Vec<SectionContentNode>,
    #[serde(default)]
    pub comparison_notes: Option<Vec<RichTextSegment>>,
}

/// Transformation mappings and concept alignments between two theories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDocument {
    pub title: String,
    #[serde(default)]
    pub source_theory: Option<String>,
    #[serde(default)]
    pub target_theory: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

// =============================================================================
// Embeds
// =============================================================================

/// Preview or live view of another document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedDocument {
    pub source_document_id: String,
    /// Only static previews carry a snapshot
    #[serde(default)]
    pub content_snapshot: Option<SimplifiedContent>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
