//! Structured mathematical content: definitions, theorems, examples and friends

use crate::blocks::CollapsibleBlockNode;
use crate::proof::ProofDisplay;
use crate::rich_text::{LinkTarget, RichText, RichTextSegment};
use crate::section::SectionContentNode;
use math::ExpressionNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuredMathNode {
    Definition {
        #[serde(default)]
        term_display: Vec<RichTextSegment>,
        #[serde(default)]
        formal_term: Option<ExpressionNode>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        body: Vec<SectionContentNode>,
        #[serde(default)]
        abstraction_meta: Option<AbstractionMetadata>,
    },
    TheoremLike {
        kind: TheoremLikeKind,
        #[serde(default)]
        label: Option<String>,
        statement: TheoremStatement,
        #[serde(default)]
        proof: Option<ProofDisplay>,
        #[serde(default)]
        abstraction_meta: Option<AbstractionMetadata>,
    },
    Example {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        introduction: Vec<SectionContentNode>,
        #[serde(default)]
        body: Vec<SectionContentNode>,
        #[serde(default)]
        explanation: Vec<SectionContentNode>,
    },
    Remark {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        body: Vec<SectionContentNode>,
    },
    Axiom {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        statement: Vec<SectionContentNode>,
        #[serde(default)]
        abstraction_meta: Option<AbstractionMetadata>,
    },
    Exercise {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        problem_statement: Vec<SectionContentNode>,
        #[serde(default)]
        hints: Vec<CollapsibleBlockNode>,
        #[serde(default)]
        solution: Option<Box<CollapsibleBlockNode>>,
    },
    ConstructorDefinition {
        #[serde(default)]
        title_display: Vec<RichTextSegment>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        body: Vec<SectionContentNode>,
        /// Parameter name and its description
        #[serde(default)]
        formal_parameters: Vec<(String, Vec<RichTextSegment>)>,
        #[serde(default)]
        return_type_summary: Vec<RichTextSegment>,
        #[serde(default)]
        return_type_link: Option<LinkTarget>,
    },
    CollectionView {
        collection_type: String,
        #[serde(default)]
        description: Option<RichText>,
        /// Variant name and a short summary
        #[serde(default)]
        variants: Vec<(String, String)>,
        #[serde(default)]
        variant_links: Vec<LinkTarget>,
    },
    #[serde(untagged)]
    Unknown(Value),
}

impl StructuredMathNode {
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "Definition",
        "TheoremLike",
        "Example",
        "Remark",
        "Axiom",
        "Exercise",
        "ConstructorDefinition",
        "CollectionView",
    ];

    /// Heading shown on the title line of the block
    pub fn title(&self) -> String {
        match self {
            StructuredMathNode::Definition { .. } => "Definition".to_string(),
            StructuredMathNode::TheoremLike { kind, .. } => kind.name().to_string(),
            StructuredMathNode::Example { .. } => "Example".to_string(),
            StructuredMathNode::Remark { .. } => "Remark".to_string(),
            StructuredMathNode::Axiom { .. } => "Axiom".to_string(),
            StructuredMathNode::Exercise { .. } => "Exercise".to_string(),
            StructuredMathNode::ConstructorDefinition { .. } => "Constructor".to_string(),
            StructuredMathNode::CollectionView {
                collection_type, ..
            } => collection_type.clone(),
            StructuredMathNode::Unknown(_) => String::new(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            StructuredMathNode::Definition { label, .. }
            | StructuredMathNode::TheoremLike { label, .. }
            | StructuredMathNode::Example { label, .. }
            | StructuredMathNode::Remark { label, .. }
            | StructuredMathNode::Axiom { label, .. }
            | StructuredMathNode::Exercise { label, .. }
            | StructuredMathNode::ConstructorDefinition { label, .. } => label.as_deref(),
            StructuredMathNode::CollectionView { .. } | StructuredMathNode::Unknown(_) => None,
        }
    }

    /// CSS modifier for the block
    pub fn css_name(&self) -> &'static str {
        match self {
            StructuredMathNode::Definition { .. } => "definition",
            StructuredMathNode::TheoremLike { .. } => "theorem",
            StructuredMathNode::Example { .. } => "example",
            StructuredMathNode::Remark { .. } => "remark",
            StructuredMathNode::Axiom { .. } => "axiom",
            StructuredMathNode::Exercise { .. } => "exercise",
            StructuredMathNode::ConstructorDefinition { .. } => "constructor",
            StructuredMathNode::CollectionView { .. } => "collection",
            StructuredMathNode::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TheoremStatement {
    Content(Vec<SectionContentNode>),
    Mathematical(ExpressionNode),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbstractionMetadata {
    /// Abstraction level, 1 through 4
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub source_template_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TheoremLikeKind {
    Theorem,
    Lemma,
    Proposition,
    Corollary,
    Conjecture,
    Principle,
}

impl TheoremLikeKind {
    pub fn name(&self) -> &'static str {
        match self {
            TheoremLikeKind::Theorem => "Theorem",
            TheoremLikeKind::Lemma => "Lemma",
            TheoremLikeKind::Proposition => "Proposition",
            TheoremLikeKind::Corollary => "Corollary",
            TheoremLikeKind::Conjecture => "Conjecture",
            TheoremLikeKind::Principle => "Principle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theorem_with_mathematical_statement() {
        let json = r#"{"TheoremLike": {
            "kind": "Lemma",
            "label": "2.1",
            "statement": {"Mathematical": {"id": "s", "content": {"Identifier": {"body": "P"}}}}
        }}"#;
        let node: StructuredMathNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.title(), "Lemma");
        assert_eq!(node.label(), Some("2.1"));
        assert_eq!(node.css_name(), "theorem");
    }

    #[test]
    fn test_collection_title_uses_type_name() {
        let json = r#"{"CollectionView": {"collection_type": "Group Axioms", "variants": [["Closure", "a*b in G"]]}}"#;
        let node: StructuredMathNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.title(), "Group Axioms");
        assert_eq!(node.label(), None);
    }

    #[test]
    fn test_constructor_title() {
        let node: StructuredMathNode =
            serde_json::from_str(r#"{"ConstructorDefinition": {"label": "c"}}"#).unwrap();
        assert_eq!(node.title(), "Constructor");
    }

    #[test]
    fn test_unknown_structured_node() {
        let node: StructuredMathNode = serde_json::from_str(r#"{"Scholium": {}}"#).unwrap();
        assert!(matches!(node, StructuredMathNode::Unknown(_)));
        assert_eq!(node.title(), "");
    }
}
